//! Removes frames whose extracted text matches known non-content
//! screens (meeting-client chrome, waiting rooms).

use log::debug;
use once_cell::sync::Lazy;

use crate::video::frame::Frame;

/// Substrings of non-content screens, matched against lowercase OCR text.
pub static DEFAULT_JUNK_PATTERNS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "waiting for others",
        "waiting for the host",
        "you are muted",
        "is presenting",
        "recording this meeting",
        "share screen",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

/// Drop frames whose OCR text contains any junk pattern.
///
/// A frame whose text could not be read is kept: junk removal is an
/// optimization, and discarding frames on missing evidence would lose
/// real slides.
pub fn filter_junk(frames: Vec<Frame>, patterns: &[String]) -> Vec<Frame> {
    frames
        .into_iter()
        .filter(|frame| match &frame.ocr_text {
            // fail open: no readable text, keep the frame
            None => true,
            Some(text) => {
                let lower = text.to_lowercase();
                let junk = patterns
                    .iter()
                    .filter(|p| !p.is_empty())
                    .any(|p| lower.contains(&p.to_lowercase()));
                if junk {
                    debug!("junk frame at {:.1}s", frame.timestamp);
                }
                !junk
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_text(timestamp: f64, text: Option<&str>) -> Frame {
        let mut frame = Frame::new(timestamp, 8, 8, vec![0u8; 8 * 8 * 3]);
        frame.ocr_text = text.map(str::to_string);
        frame
    }

    #[test]
    fn test_junk_pattern_removes_frame() {
        let frames = vec![
            frame_with_text(0.0, Some("Q3 revenue overview")),
            frame_with_text(1.0, Some("Waiting for others to join...")),
            frame_with_text(2.0, Some("architecture diagram")),
        ];
        let kept = filter_junk(frames, &DEFAULT_JUNK_PATTERNS);
        assert_eq!(kept.len(), 2);
        assert!((kept[0].timestamp - 0.0).abs() < f64::EPSILON);
        assert!((kept[1].timestamp - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unreadable_text_kept() {
        let frames = vec![frame_with_text(0.0, None)];
        let kept = filter_junk(frames, &DEFAULT_JUNK_PATTERNS);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let frames = vec![frame_with_text(0.0, Some("YOU ARE MUTED"))];
        let kept = filter_junk(frames, &DEFAULT_JUNK_PATTERNS);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let patterns = vec![String::new()];
        let frames = vec![frame_with_text(0.0, Some("anything"))];
        let kept = filter_junk(frames, &patterns);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_substring_match_inside_longer_text() {
        let frames = vec![frame_with_text(
            0.0,
            Some("Meet - John Doe is presenting to everyone"),
        )];
        let kept = filter_junk(frames, &DEFAULT_JUNK_PATTERNS);
        assert!(kept.is_empty());
    }
}
