//! Transcript-to-slide alignment.

pub mod aligner;
pub mod transcript;

pub use aligner::{align, AlignConfig, DEFAULT_STOP_WORDS};
pub use transcript::{AlignedUnit, TranscriptSegment};
