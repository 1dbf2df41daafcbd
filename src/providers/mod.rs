//! Trait seams for the external collaborators: speech-to-text, OCR of
//! a single image, and semantic tag generation. Real backends live
//! outside this crate; mocks here serve tests and host wiring.

use std::path::Path;

use thiserror::Error;

use crate::align::transcript::TranscriptSegment;
use crate::video::frame::Frame;

/// A per-frame collaborator failure. Never fatal: the pipeline
/// downgrades it to empty text/tags at the frame boundary.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("backend error: {0}")]
    Backend(String),
}

/// Optical character recognition over a single frame image.
pub trait TextReader: Send + Sync {
    fn read(&self, frame: &Frame) -> Result<String, ReadError>;
}

/// Semantic tag generation over a batch of frames' OCR text. Returned
/// tag lists are aligned by position; callers pad short results with
/// empty tag sets.
pub trait FrameTagger: Send + Sync {
    fn tag_batch(&self, texts: &[&str]) -> Result<Vec<Vec<String>>, ReadError>;
}

/// Speech-to-text over a media file.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, media: &Path) -> Result<Vec<TranscriptSegment>, ReadError>;
}

type ReadFn = dyn Fn(&Frame) -> Result<String, ReadError> + Send + Sync;

pub struct MockTextReader {
    read_fn: Option<Box<ReadFn>>,
}

impl MockTextReader {
    pub fn new() -> Self {
        Self { read_fn: None }
    }

    pub fn with_fn<F>(read_fn: F) -> Self
    where
        F: Fn(&Frame) -> Result<String, ReadError> + Send + Sync + 'static,
    {
        Self {
            read_fn: Some(Box::new(read_fn)),
        }
    }

    /// Fixed text keyed by frame timestamp.
    pub fn with_texts(texts: Vec<(f64, String)>) -> Self {
        Self::with_fn(move |frame| {
            Ok(texts
                .iter()
                .find(|(ts, _)| (ts - frame.timestamp).abs() < 1e-6)
                .map(|(_, text)| text.clone())
                .unwrap_or_default())
        })
    }

    /// Fails on every frame, for exercising the fail-open path.
    pub fn failing() -> Self {
        Self::with_fn(|_| Err(ReadError::Backend("mock OCR failure".to_string())))
    }
}

impl Default for MockTextReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TextReader for MockTextReader {
    fn read(&self, frame: &Frame) -> Result<String, ReadError> {
        match &self.read_fn {
            Some(read_fn) => read_fn(frame),
            None => Ok(String::new()),
        }
    }
}

pub struct MockFrameTagger {
    tags: Vec<Vec<String>>,
    fail: bool,
}

impl MockFrameTagger {
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            fail: false,
        }
    }

    /// Returns these tag lists positionally for each batch, however
    /// many or few the batch asked for.
    pub fn with_tags(tags: Vec<Vec<String>>) -> Self {
        Self { tags, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            tags: Vec::new(),
            fail: true,
        }
    }
}

impl Default for MockFrameTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTagger for MockFrameTagger {
    fn tag_batch(&self, texts: &[&str]) -> Result<Vec<Vec<String>>, ReadError> {
        if self.fail {
            return Err(ReadError::Backend("mock tagger failure".to_string()));
        }
        if self.tags.is_empty() {
            return Ok(vec![Vec::new(); texts.len()]);
        }
        Ok(self.tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frame(timestamp: f64) -> Frame {
        Frame::new(timestamp, 4, 4, vec![0u8; 4 * 4 * 3])
    }

    #[test]
    fn test_mock_reader_default_empty() {
        let reader = MockTextReader::new();
        let text = reader.read(&test_frame(0.0)).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_mock_reader_with_texts() {
        let reader =
            MockTextReader::with_texts(vec![(1.0, "slide one".to_string())]);
        assert_eq!(reader.read(&test_frame(1.0)).unwrap(), "slide one");
        assert_eq!(reader.read(&test_frame(2.0)).unwrap(), "");
    }

    #[test]
    fn test_mock_reader_failing() {
        let reader = MockTextReader::failing();
        assert!(reader.read(&test_frame(0.0)).is_err());
    }

    #[test]
    fn test_mock_tagger_matches_batch_len() {
        let tagger = MockFrameTagger::new();
        let tags = tagger.tag_batch(&["a", "b", "c"]).unwrap();
        assert_eq!(tags.len(), 3);
    }
}
