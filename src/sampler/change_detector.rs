//! Frame-difference capture decision.

/// Default per-pixel intensity delta that counts as "changed".
pub const DEFAULT_INTENSITY_DELTA: u8 = 25;

/// Decide whether a candidate frame differs enough from the previously
/// kept frame to be worth capturing.
///
/// Both buffers are grayscale at native resolution. The first frame
/// (no previous reference) always captures. Otherwise the fraction of
/// pixels whose absolute difference exceeds `intensity_delta` must
/// exceed `threshold`.
pub fn should_capture(
    candidate: &[u8],
    previous: Option<&[u8]>,
    threshold: f32,
    intensity_delta: u8,
) -> bool {
    let Some(prev) = previous else {
        return true;
    };
    if candidate.is_empty() || candidate.len() != prev.len() {
        return true;
    }

    let delta = intensity_delta as i16;
    let changed = candidate
        .iter()
        .zip(prev.iter())
        .filter(|(a, b)| (**a as i16 - **b as i16).abs() > delta)
        .count();

    changed as f32 / candidate.len() as f32 > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_always_captures() {
        let candidate = vec![128u8; 64];
        assert!(should_capture(&candidate, None, 0.05, 25));
    }

    #[test]
    fn test_identical_frames_skip() {
        let a = vec![128u8; 64];
        let b = vec![128u8; 64];
        assert!(!should_capture(&a, Some(&b), 0.05, 25));
    }

    #[test]
    fn test_full_change_captures() {
        let a = vec![0u8; 64];
        let b = vec![255u8; 64];
        assert!(should_capture(&a, Some(&b), 0.05, 25));
    }

    #[test]
    fn test_small_delta_ignored() {
        // every pixel differs, but by less than the intensity delta
        let a = vec![100u8; 64];
        let b = vec![110u8; 64];
        assert!(!should_capture(&a, Some(&b), 0.05, 25));
    }

    #[test]
    fn test_threshold_boundary() {
        // 4 of 100 pixels changed: 0.04 fraction
        let mut a = vec![0u8; 100];
        let b = vec![0u8; 100];
        for px in a.iter_mut().take(4) {
            *px = 255;
        }
        assert!(!should_capture(&a, Some(&b), 0.05, 25));
        assert!(should_capture(&a, Some(&b), 0.03, 25));
    }
}
