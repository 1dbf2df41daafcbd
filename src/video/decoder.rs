//! FFprobe metadata and a synchronous RGB24 rawvideo frame stream.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use log::{debug, warn};
use serde::Deserialize;

use super::error::VideoError;

/// Video stream information needed to drive sampling.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = rate.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den > 0.0 && num > 0.0 {
        Some(num / den)
    } else {
        None
    }
}

/// Probe a video file for dimensions, duration and frame rate.
pub fn probe_video(path: &Path) -> Result<VideoInfo, VideoError> {
    which::which("ffprobe").map_err(|_| VideoError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()?;

    if !output.status.success() {
        return Err(VideoError::Probe {
            path: path.to_path_buf(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let probe: FfprobeOutput =
        serde_json::from_slice(&output.stdout).map_err(|e| VideoError::Probe {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| VideoError::NoVideoStream(path.to_path_buf()))?;

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .ok_or_else(|| VideoError::Probe {
            path: path.to_path_buf(),
            message: "no usable frame rate".to_string(),
        })?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(VideoError::Probe {
                path: path.to_path_buf(),
                message: "missing video dimensions".to_string(),
            })
        }
    };

    let duration = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoInfo {
        duration,
        width,
        height,
        fps,
    })
}

/// Streams decoded RGB24 frames from an ffmpeg child process at the
/// video's native frame rate.
pub struct FrameStream {
    path: PathBuf,
    child: Child,
    stdout: ChildStdout,
    info: VideoInfo,
    frame_size: usize,
    next_index: u64,
    done: bool,
}

impl FrameStream {
    pub fn open(path: &Path) -> Result<Self, VideoError> {
        let info = probe_video(path)?;
        which::which("ffmpeg").map_err(|_| VideoError::FfmpegNotFound)?;

        let mut child = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| VideoError::Decode {
                path: path.to_path_buf(),
                message: format!("failed to spawn ffmpeg: {e}"),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| VideoError::Decode {
            path: path.to_path_buf(),
            message: "failed to capture ffmpeg stdout".to_string(),
        })?;

        let frame_size = (info.width * info.height * 3) as usize;
        debug!(
            "decoding {} ({}x{} @ {:.2} fps)",
            path.display(),
            info.width,
            info.height,
            info.fps
        );

        Ok(Self {
            path: path.to_path_buf(),
            child,
            stdout,
            info,
            frame_size,
            next_index: 0,
            done: false,
        })
    }

    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Read the next decoded frame into `buf`. Returns the zero-based
    /// frame index, or `None` at end of stream. A truncated trailing
    /// frame is discarded.
    pub fn next_frame(&mut self, buf: &mut Vec<u8>) -> Result<Option<u64>, VideoError> {
        if self.done {
            return Ok(None);
        }

        buf.resize(self.frame_size, 0);
        let filled = read_full(&mut self.stdout, buf).map_err(|e| VideoError::Decode {
            path: self.path.clone(),
            message: format!("stream read failed: {e}"),
        })?;

        if filled < self.frame_size {
            self.done = true;
            if filled > 0 {
                warn!("discarding truncated frame at end of {}", self.path.display());
            }
            self.finish()?;
            return Ok(None);
        }

        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(index))
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        let status = self.child.wait().map_err(|e| VideoError::Decode {
            path: self.path.clone(),
            message: format!("failed to reap ffmpeg: {e}"),
        })?;
        if !status.success() && self.next_index == 0 {
            return Err(VideoError::Decode {
                path: self.path.clone(),
                message: format!("ffmpeg exited with {status}"),
            });
        }
        Ok(())
    }
}

/// Fill `buf` from `reader`, stopping early only at end of stream.
/// Returns the number of bytes actually read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

impl Drop for FrameStream {
    fn drop(&mut self) {
        if !self.done {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
