use serde::{Deserialize, Serialize};

/// One utterance from the external transcription collaborator.
/// Read-only input to alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Seconds from the start of the media.
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// One transcript segment paired with the slide it was spoken over.
/// The alignment engine's sole output type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedUnit {
    pub start: f64,
    pub end: f64,
    pub speech: String,
    pub slide_text: String,
}
