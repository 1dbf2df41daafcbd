//! Matches each transcript segment to the single best slide frame
//! using tag overlap, OCR-text overlap and timestamp proximity.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::video::frame::Frame;

use super::transcript::{AlignedUnit, TranscriptSegment};

/// Function words excluded from OCR-text overlap scoring.
pub static DEFAULT_STOP_WORDS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has",
        "had", "do", "does", "did", "will", "would", "could", "should", "may", "might", "can",
        "to", "of", "in", "for", "on", "with", "at", "by", "from", "or", "and", "so", "but",
        "if", "then", "that", "this", "it", "its", "we", "you", "they", "i", "he", "she", "my",
        "your", "our", "their",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Frames considered on each side of the anchor.
    pub window: usize,
    /// Anchor may sit this many seconds after the segment start.
    pub tolerance_before: f64,
    /// Candidates may sit this many seconds after the segment end.
    pub tolerance_after: f64,
    /// Scales timestamp distance in the proximity score.
    pub timestamp_divisor: f64,
    pub tag_weight: f32,
    pub text_weight: f32,
    pub time_weight: f32,
    pub stop_words: Vec<String>,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            window: 3,
            tolerance_before: 5.0,
            tolerance_after: 10.0,
            timestamp_divisor: 10.0,
            tag_weight: 0.5,
            text_weight: 0.3,
            time_weight: 0.2,
            stop_words: DEFAULT_STOP_WORDS.clone(),
        }
    }
}

/// Align every transcript segment to its best-matching frame.
///
/// One output per input segment, in input order. Each segment's
/// decision is independent, so the work is parallelized per segment;
/// the frame list is finalized and only read.
pub fn align(
    transcript: &[TranscriptSegment],
    frames: &[Frame],
    config: &AlignConfig,
) -> Vec<AlignedUnit> {
    let stop_words: HashSet<&str> = config.stop_words.iter().map(String::as_str).collect();

    transcript
        .par_iter()
        .map(|segment| AlignedUnit {
            start: segment.start,
            end: segment.end,
            speech: segment.text.clone(),
            slide_text: best_slide_text(segment, frames, config, &stop_words),
        })
        .collect()
}

fn best_slide_text(
    segment: &TranscriptSegment,
    frames: &[Frame],
    config: &AlignConfig,
    stop_words: &HashSet<&str>,
) -> String {
    if frames.is_empty() {
        return String::new();
    }

    let speech = segment.text.to_lowercase();
    let speech_words: HashSet<&str> = speech.split_whitespace().collect();

    // anchor: nearest frame not too far past the segment start
    let mut anchor = 0usize;
    let mut min_diff = f64::INFINITY;
    for (i, frame) in frames.iter().enumerate() {
        if frame.timestamp <= segment.start + config.tolerance_before {
            let diff = (frame.timestamp - segment.start).abs();
            if diff < min_diff {
                min_diff = diff;
                anchor = i;
            }
        }
    }

    let lo = anchor.saturating_sub(config.window);
    let hi = (anchor + config.window + 1).min(frames.len());

    let mut best: Option<(f32, &Frame)> = None;
    for frame in &frames[lo..hi] {
        if frame.timestamp > segment.end + config.tolerance_after {
            continue;
        }

        let tag = tag_score(&speech_words, frame.tags.as_deref());
        let text = text_score(&speech, frame.ocr_text_or_empty(), stop_words);
        let time = timestamp_score(frame.timestamp, segment.start, config.timestamp_divisor);
        let combined =
            config.tag_weight * tag + config.text_weight * text + config.time_weight * time;

        // strict comparison: the first candidate wins ties
        if best.map_or(true, |(score, _)| combined > score) {
            best = Some((combined, frame));
        }
    }

    match best {
        Some((_, frame)) => frame.ocr_text_or_empty().to_string(),
        None => frames[anchor].ocr_text_or_empty().to_string(),
    }
}

/// Fraction of the frame's tags that share a word with the speech.
fn tag_score(speech_words: &HashSet<&str>, tags: Option<&[String]>) -> f32 {
    let tags = match tags {
        Some(tags) if !tags.is_empty() => tags,
        _ => return 0.0,
    };

    let matches = tags
        .iter()
        .filter(|tag| {
            tag.to_lowercase()
                .split_whitespace()
                .any(|word| speech_words.contains(word))
        })
        .count();

    matches as f32 / tags.len() as f32
}

/// Word overlap between speech and slide text, over the speech tokens.
fn text_score(speech_lower: &str, frame_text: &str, stop_words: &HashSet<&str>) -> f32 {
    let speech_tokens = content_tokens(speech_lower, stop_words);
    if speech_tokens.is_empty() {
        return 0.0;
    }
    let frame_lower = frame_text.to_lowercase();
    let frame_tokens = content_tokens(&frame_lower, stop_words);
    if frame_tokens.is_empty() {
        return 0.0;
    }

    let overlap = speech_tokens.intersection(&frame_tokens).count();
    overlap as f32 / speech_tokens.len() as f32
}

fn timestamp_score(frame_ts: f64, segment_start: f64, divisor: f64) -> f32 {
    (1.0 / (1.0 + (frame_ts - segment_start).abs() / divisor)) as f32
}

fn content_tokens<'a>(text: &'a str, stop_words: &HashSet<&str>) -> HashSet<&'a str> {
    text.split_whitespace()
        .filter(|w| w.len() > 2 && !stop_words.contains(*w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_at(timestamp: f64, text: &str, tags: &[&str]) -> Frame {
        let mut frame = Frame::new(timestamp, 8, 8, vec![0u8; 8 * 8 * 3]);
        frame.ocr_text = Some(text.to_string());
        if !tags.is_empty() {
            frame.tags = Some(tags.iter().map(|t| t.to_string()).collect());
        }
        frame
    }

    #[test]
    fn test_tag_overlap_dominates() {
        let transcript = vec![
            TranscriptSegment::new(0.0, 5.0, "intro"),
            TranscriptSegment::new(5.0, 10.0, "slide one details"),
        ];
        let frames = vec![
            frame_at(0.0, "welcome slide", &["intro"]),
            frame_at(6.0, "first topic", &["details"]),
        ];

        let aligned = align(&transcript, &frames, &AlignConfig::default());
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[0].slide_text, "welcome slide");
        assert_eq!(aligned[1].slide_text, "first topic");
    }

    #[test]
    fn test_empty_frame_list_yields_empty_slides() {
        let transcript = vec![
            TranscriptSegment::new(0.0, 5.0, "first"),
            TranscriptSegment::new(5.0, 10.0, "second"),
            TranscriptSegment::new(10.0, 15.0, "third"),
        ];

        let aligned = align(&transcript, &[], &AlignConfig::default());
        assert_eq!(aligned.len(), 3);
        for unit in &aligned {
            assert_eq!(unit.slide_text, "");
        }
    }

    #[test]
    fn test_one_output_per_segment() {
        let transcript: Vec<_> = (0..7)
            .map(|i| TranscriptSegment::new(i as f64 * 5.0, i as f64 * 5.0 + 5.0, "words here"))
            .collect();
        let frames = vec![frame_at(2.0, "slide", &[])];

        let aligned = align(&transcript, &frames, &AlignConfig::default());
        assert_eq!(aligned.len(), transcript.len());
        for (unit, segment) in aligned.iter().zip(&transcript) {
            assert_eq!(unit.start, segment.start);
            assert_eq!(unit.end, segment.end);
            assert_eq!(unit.speech, segment.text);
        }
    }

    #[test]
    fn test_deterministic_output() {
        let transcript = vec![
            TranscriptSegment::new(0.0, 4.0, "public apis and security"),
            TranscriptSegment::new(4.0, 9.0, "disaster recovery planning"),
        ];
        let frames = vec![
            frame_at(0.0, "apis security", &["public apis", "security"]),
            frame_at(3.0, "recovery", &["disaster recovery"]),
            frame_at(8.0, "pricing", &["pricing"]),
        ];

        let config = AlignConfig::default();
        let first = align(&transcript, &frames, &config);
        let second = align(&transcript, &frames, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tie_breaks_to_earliest_frame() {
        // two frames with identical tags and text, equidistant scores
        // apart from timestamp; make even the timestamp equal by
        // placing both at the same instant
        let transcript = vec![TranscriptSegment::new(0.0, 5.0, "topic words")];
        let frames = vec![
            frame_at(1.0, "first copy", &["topic"]),
            frame_at(1.0, "second copy", &["topic"]),
        ];

        let aligned = align(&transcript, &frames, &AlignConfig::default());
        assert_eq!(aligned[0].slide_text, "first copy");
    }

    #[test]
    fn test_no_candidates_falls_back_to_anchor() {
        // only frame is far past the segment end plus tolerance, and
        // past the anchor tolerance, so the anchor fallback (index 0)
        // supplies the text unscored
        let transcript = vec![TranscriptSegment::new(0.0, 1.0, "short")];
        let frames = vec![frame_at(100.0, "late slide", &[])];

        let aligned = align(&transcript, &frames, &AlignConfig::default());
        assert_eq!(aligned[0].slide_text, "late slide");
    }

    #[test]
    fn test_anchor_prefers_nearest_before_start() {
        let transcript = vec![TranscriptSegment::new(30.0, 35.0, "current material")];
        let frames = vec![
            frame_at(0.0, "old slide", &[]),
            frame_at(29.0, "current slide", &["current"]),
            frame_at(90.0, "future slide", &[]),
        ];

        let aligned = align(&transcript, &frames, &AlignConfig::default());
        assert_eq!(aligned[0].slide_text, "current slide");
    }

    #[test]
    fn test_text_score_ignores_stop_words() {
        let stop: HashSet<&str> = DEFAULT_STOP_WORDS.iter().map(String::as_str).collect();
        // "the" and "and" are stop words; "database" overlaps
        let score = text_score("the database and scaling", "database overview", &stop);
        assert!((score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tag_score_fraction() {
        let speech: HashSet<&str> = "we cover security today".split_whitespace().collect();
        let tags = vec!["security".to_string(), "pricing".to_string()];
        let score = tag_score(&speech, Some(&tags));
        assert!((score - 0.5).abs() < 1e-6);

        assert_eq!(tag_score(&speech, None), 0.0);
        assert_eq!(tag_score(&speech, Some(&[])), 0.0);
    }

    #[test]
    fn test_timestamp_score_decays() {
        let near = timestamp_score(1.0, 0.0, 10.0);
        let far = timestamp_score(50.0, 0.0, 10.0);
        assert!(near > far);
        assert!((timestamp_score(0.0, 0.0, 10.0) - 1.0).abs() < 1e-6);
    }
}
