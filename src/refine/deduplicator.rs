//! Second-pass merge of near-duplicate kept frames.
//!
//! A frame is dropped only when pixel and text evidence both call it a
//! duplicate. Pixel similarity alone over-merges slides that share a
//! background but differ in overlaid text; text similarity alone
//! over-merges visually distinct frames with sparse or failed OCR.

use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::video::frame::Frame;

/// Edge length of the fixed comparison thumbnail.
const THUMB_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Pixel similarity at or above this counts as duplicate evidence.
    pub pixel_similarity_threshold: f32,
    /// Text similarity at or above this counts as duplicate evidence.
    pub text_similarity_threshold: f32,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            pixel_similarity_threshold: 0.85,
            text_similarity_threshold: 0.90,
        }
    }
}

/// Sequential pass over kept frames; order-preserving. The first frame
/// is always kept; each later frame is compared against the last kept
/// one. Dropped frames are consumed, releasing their pixel buffers.
pub fn dedupe(frames: Vec<Frame>, config: &DedupConfig) -> Vec<Frame> {
    let mut kept: Vec<Frame> = Vec::with_capacity(frames.len());
    let mut last_thumb: Option<Vec<u8>> = None;

    for frame in frames {
        let thumb = frame.luma_thumbnail(THUMB_SIZE, THUMB_SIZE);

        let keep = match (&last_thumb, kept.last()) {
            (Some(prev_thumb), Some(prev_frame)) => {
                let pixel_sim = pixel_similarity(&thumb, prev_thumb);
                let text_sim =
                    text_similarity(frame.ocr_text_or_empty(), prev_frame.ocr_text_or_empty());
                // keep unless both signals agree it is a near-duplicate
                pixel_sim < config.pixel_similarity_threshold
                    || text_sim < config.text_similarity_threshold
            }
            _ => true,
        };

        if keep {
            last_thumb = Some(thumb);
            kept.push(frame);
        } else {
            debug!("dropped near-duplicate frame at {:.1}s", frame.timestamp);
        }
    }

    kept
}

/// `1 - (sum of absolute difference / max possible difference)` over
/// two equal-size grayscale thumbnails.
pub fn pixel_similarity(a: &[u8], b: &[u8]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let total_diff: u64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as i16 - *y as i16).unsigned_abs() as u64)
        .sum();
    1.0 - total_diff as f32 / (255.0 * a.len() as f32)
}

/// Intersection-over-union of lowercase words longer than two
/// characters. Two empty token sets are identical (1.0); one empty
/// side shares nothing (0.0).
pub fn text_similarity(a: &str, b: &str) -> f32 {
    let ta = word_tokens(a);
    let tb = word_tokens(b);

    match (ta.is_empty(), tb.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let intersection = ta.intersection(&tb).count();
            let union = ta.union(&tb).count();
            intersection as f32 / union as f32
        }
    }
}

fn word_tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .map(str::to_string)
        .collect()
}
