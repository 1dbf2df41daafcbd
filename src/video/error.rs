use std::path::PathBuf;
use thiserror::Error;

/// Fatal per-file failures. One of these aborts the run for the
/// offending video; per-frame collaborator failures are downgraded
/// instead (see `providers::ReadError`).
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,
    #[error("ffprobe not found in PATH")]
    FfprobeNotFound,
    #[error("cannot probe {path}: {message}")]
    Probe { path: PathBuf, message: String },
    #[error("no video stream in {0}")]
    NoVideoStream(PathBuf),
    #[error("cannot decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("cannot write image {path}: {message}")]
    ImageWrite { path: PathBuf, message: String },
}
