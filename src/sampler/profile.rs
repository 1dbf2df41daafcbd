use serde::{Deserialize, Serialize};

/// Content-density regimes the adaptive tracker can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    LowDensity,
    Standard,
    HighDensity,
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProfileKind::LowDensity => "low-density",
            ProfileKind::Standard => "standard",
            ProfileKind::HighDensity => "high-density",
        };
        f.write_str(name)
    }
}

/// A named bundle of interval/threshold/rate-limit parameters. A
/// profile switch replaces exactly these values; the total frame
/// budget is global and never switched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingProfile {
    pub kind: ProfileKind,
    /// Seconds of video time between examined frames.
    pub sample_interval: f64,
    /// Fraction of changed pixels (0..1) that triggers capture.
    pub pixel_change_threshold: f32,
    pub max_frames_per_minute: u32,
}

impl Default for SamplingProfile {
    fn default() -> Self {
        Self::standard()
    }
}

impl SamplingProfile {
    pub fn standard() -> Self {
        Self {
            kind: ProfileKind::Standard,
            sample_interval: 1.0,
            pixel_change_threshold: 0.05,
            max_frames_per_minute: 10,
        }
    }

    /// Dense content: sample more often, trigger on smaller changes.
    pub fn high_density() -> Self {
        Self {
            kind: ProfileKind::HighDensity,
            sample_interval: 0.5,
            pixel_change_threshold: 0.03,
            max_frames_per_minute: 20,
        }
    }

    /// Sparse content: sample less often, demand bigger changes.
    pub fn low_density() -> Self {
        Self {
            kind: ProfileKind::LowDensity,
            sample_interval: 2.0,
            pixel_change_threshold: 0.08,
            max_frames_per_minute: 6,
        }
    }
}
