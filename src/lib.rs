//! Structured knowledge extraction from recorded presentations.
//!
//! The core is a two-part design:
//! 1. an adaptive visual-change frame sampler that walks the video
//!    timeline and keeps the frames where slide content changed, under
//!    rate limits and density-adaptive sampling profiles, followed by
//!    dedup and junk-filter refinement passes;
//! 2. an alignment engine that matches each transcript segment to the
//!    single best slide frame by combining semantic-tag overlap,
//!    OCR-text overlap and timestamp proximity.
//!
//! Transcription, OCR and tag generation are external collaborators
//! behind the traits in [`providers`].

pub mod align;
pub mod config;
pub mod pipeline;
pub mod providers;
pub mod refine;
pub mod sampler;
pub mod video;

pub use align::{align, AlignConfig, AlignedUnit, TranscriptSegment};
pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{save_frames, Pipeline, PipelineError};
pub use providers::{FrameTagger, ReadError, TextReader, Transcriber};
pub use refine::{dedupe, filter_junk, DedupConfig};
pub use sampler::{extract, FrameSampler, SamplerConfig, SamplingProfile};
pub use video::{Frame, VideoError};

/// Initialize env_logger for host binaries; safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
