//! Process-wide configuration: every tunable the pipeline uses, with
//! documented defaults, JSON5 file loading, and up-front validation.
//! Invalid values surface before any processing begins, never mid-run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::align::aligner::AlignConfig;
use crate::refine::deduplicator::DedupConfig;
use crate::refine::junk_filter::DEFAULT_JUNK_PATTERNS;
use crate::sampler::mode_tracker::TrackerConfig;
use crate::sampler::profile::SamplingProfile;
use crate::sampler::sampler::SamplerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be nonzero")]
    ZeroCap { name: &'static str },
    #[error("alignment weights must sum to 1.0, got {sum}")]
    WeightSum { sum: f32 },
    #[error("low_activity_threshold {low} must be below high_activity_threshold {high}")]
    ActivityBand { low: f64, high: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sampler: SamplerConfig,
    pub dedup: DedupConfig,
    pub junk_patterns: Vec<String>,
    pub align: AlignConfig,
    /// Frames per tagging-collaborator request.
    pub tag_batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            dedup: DedupConfig::default(),
            junk_patterns: DEFAULT_JUNK_PATTERNS.clone(),
            align: AlignConfig::default(),
            tag_batch_size: 10,
        }
    }
}

impl PipelineConfig {
    /// Load and validate a JSON5 config file. Absent fields fall back
    /// to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = json5::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_profile(&self.sampler.profile)?;
        if self.sampler.max_frames_total == 0 {
            return Err(ConfigError::ZeroCap {
                name: "sampler.max_frames_total",
            });
        }
        if let Some(tracker) = &self.sampler.adaptive {
            validate_tracker(tracker)?;
        }

        check_unit("dedup.pixel_similarity_threshold", self.dedup.pixel_similarity_threshold)?;
        check_unit("dedup.text_similarity_threshold", self.dedup.text_similarity_threshold)?;

        let align = &self.align;
        check_unit("align.tag_weight", align.tag_weight)?;
        check_unit("align.text_weight", align.text_weight)?;
        check_unit("align.time_weight", align.time_weight)?;
        let sum = align.tag_weight + align.text_weight + align.time_weight;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum { sum });
        }
        check_positive("align.timestamp_divisor", align.timestamp_divisor)?;

        Ok(())
    }
}

fn validate_profile(profile: &SamplingProfile) -> Result<(), ConfigError> {
    check_unit("profile.pixel_change_threshold", profile.pixel_change_threshold)?;
    check_positive("profile.sample_interval", profile.sample_interval)?;
    if profile.max_frames_per_minute == 0 {
        return Err(ConfigError::ZeroCap {
            name: "profile.max_frames_per_minute",
        });
    }
    Ok(())
}

fn validate_tracker(tracker: &TrackerConfig) -> Result<(), ConfigError> {
    check_positive("adaptive.analysis_window", tracker.analysis_window)?;
    if tracker.low_activity_threshold >= tracker.high_activity_threshold {
        return Err(ConfigError::ActivityBand {
            low: tracker.low_activity_threshold,
            high: tracker.high_activity_threshold,
        });
    }
    validate_profile(&tracker.high_profile)?;
    validate_profile(&tracker.low_profile)
}

fn check_unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            name,
            value: value as f64,
        });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value <= 0.0 || !value.is_finite() {
        return Err(ConfigError::NotPositive { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut config = PipelineConfig::default();
        config.dedup.pixel_similarity_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = PipelineConfig::default();
        config.align.tag_weight = 0.9;
        assert!(matches!(config.validate(), Err(ConfigError::WeightSum { .. })));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = PipelineConfig::default();
        config.sampler.profile.sample_interval = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { .. })
        ));
    }

    #[test]
    fn test_inverted_activity_band_rejected() {
        let mut config = PipelineConfig::default();
        let tracker = config.sampler.adaptive.as_mut().unwrap();
        tracker.low_activity_threshold = 8.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ActivityBand { .. })
        ));
    }

    #[test]
    fn test_zero_rate_cap_rejected() {
        let mut config = PipelineConfig::default();
        config.sampler.profile.max_frames_per_minute = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroCap { .. })));
    }

    #[test]
    fn test_from_file_partial_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{{ tag_batch_size: 4, dedup: {{ pixel_similarity_threshold: 0.8 }} }}"
        )
        .unwrap();

        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tag_batch_size, 4);
        assert!((config.dedup.pixel_similarity_threshold - 0.8).abs() < 1e-6);
        // untouched fields keep their defaults
        assert!((config.dedup.text_similarity_threshold - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_from_file_invalid_value_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ dedup: {{ text_similarity_threshold: -0.2 }} }}").unwrap();
        assert!(PipelineConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not valid json5 {{{{").unwrap();
        assert!(matches!(
            PipelineConfig::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
