//! End-to-end orchestration: sample, OCR, dedupe, junk-filter, tag,
//! align. Per-frame collaborator failures are downgraded to empty
//! values at the frame boundary; per-file failures abort the run.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::align::aligner::align;
use crate::align::transcript::{AlignedUnit, TranscriptSegment};
use crate::config::{ConfigError, PipelineConfig};
use crate::providers::{FrameTagger, TextReader};
use crate::refine::deduplicator::dedupe;
use crate::refine::junk_filter::filter_junk;
use crate::sampler::sampler::extract;
use crate::video::error::VideoError;
use crate::video::frame::Frame;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Video(#[from] VideoError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validates the configuration before any processing.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one video end to end against an already-produced
    /// transcript.
    pub fn process(
        &self,
        video: &Path,
        transcript: &[TranscriptSegment],
        ocr: &dyn TextReader,
        tagger: &dyn FrameTagger,
    ) -> Result<Vec<AlignedUnit>, PipelineError> {
        let frames = extract(video, &self.config.sampler)?;
        Ok(self.process_frames(frames, transcript, ocr, tagger))
    }

    /// The post-decode stages, for hosts that source frames themselves.
    pub fn process_frames(
        &self,
        frames: Vec<Frame>,
        transcript: &[TranscriptSegment],
        ocr: &dyn TextReader,
        tagger: &dyn FrameTagger,
    ) -> Vec<AlignedUnit> {
        let sampled = frames.len();
        let frames = self.apply_ocr(frames, ocr);
        let frames = dedupe(frames, &self.config.dedup);
        let deduped = frames.len();
        let frames = filter_junk(frames, &self.config.junk_patterns);
        info!(
            "{} sampled -> {} deduped -> {} after junk filter",
            sampled,
            deduped,
            frames.len()
        );
        let frames = self.apply_tags(frames, tagger);

        align(transcript, &frames, &self.config.align)
    }

    fn apply_ocr(&self, frames: Vec<Frame>, ocr: &dyn TextReader) -> Vec<Frame> {
        frames
            .into_iter()
            .map(|mut frame| {
                match ocr.read(&frame) {
                    Ok(text) => frame.ocr_text = Some(text),
                    Err(err) => {
                        // one bad frame never aborts the batch
                        warn!("OCR failed at {:.1}s: {err}", frame.timestamp);
                        frame.ocr_text = None;
                    }
                }
                frame
            })
            .collect()
    }

    fn apply_tags(&self, mut frames: Vec<Frame>, tagger: &dyn FrameTagger) -> Vec<Frame> {
        let batch_size = self.config.tag_batch_size.max(1);

        for chunk in frames.chunks_mut(batch_size) {
            let texts: Vec<String> = chunk
                .iter()
                .map(|f| f.ocr_text_or_empty().to_string())
                .collect();
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

            match tagger.tag_batch(&refs) {
                Ok(mut tags) => {
                    // short responses are padded, long ones truncated
                    tags.resize(chunk.len(), Vec::new());
                    for (frame, frame_tags) in chunk.iter_mut().zip(tags) {
                        frame.tags = Some(frame_tags);
                    }
                }
                Err(err) => {
                    warn!("tagging batch failed: {err}");
                    for frame in chunk.iter_mut() {
                        frame.tags = Some(Vec::new());
                    }
                }
            }
        }

        frames
    }
}

/// Persist frames as `slide_1.png`, `slide_2.png`, ... so downstream
/// artifacts can reference them by stable sequence position.
pub fn save_frames(frames: &[Frame], dir: &Path) -> Result<Vec<PathBuf>, VideoError> {
    fs::create_dir_all(dir)?;

    let mut paths = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("slide_{}.png", i + 1));
        let img = image::RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| VideoError::ImageWrite {
                path: path.clone(),
                message: "frame buffer does not match its dimensions".to_string(),
            })?;
        img.save(&path).map_err(|e| VideoError::ImageWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        paths.push(path);
    }
    Ok(paths)
}
