//! Periodic control loop that switches the active sampling profile
//! between content-density regimes.

use std::collections::VecDeque;

use log::info;
use serde::{Deserialize, Serialize};

use super::profile::{ProfileKind, SamplingProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Trailing span of video time (seconds) used to measure capture
    /// density, and the cadence at which switches are evaluated.
    pub analysis_window: f64,
    /// Frames per minute above which the high-density profile engages.
    pub high_activity_threshold: f64,
    /// Frames per minute below which the low-density profile engages.
    pub low_activity_threshold: f64,
    pub high_profile: SamplingProfile,
    pub low_profile: SamplingProfile,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            analysis_window: 60.0,
            high_activity_threshold: 5.0,
            low_activity_threshold: 1.0,
            high_profile: SamplingProfile::high_density(),
            low_profile: SamplingProfile::low_density(),
        }
    }
}

/// Diagnostic record of one profile switch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSwitch {
    pub timestamp: f64,
    /// Frames per minute measured over the trailing window.
    pub rate: f64,
    pub from: ProfileKind,
    pub to: ProfileKind,
}

/// Watches recent capture density and decides when the active profile
/// should change. Owned by the sampler for one video's processing run.
///
/// The band between the two activity thresholds is a hysteresis zone:
/// rates inside it leave the current profile in place.
pub struct ModeTracker {
    config: TrackerConfig,
    window: VecDeque<f64>,
    current: ProfileKind,
    last_check: f64,
    switches: Vec<ProfileSwitch>,
}

impl ModeTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            window: VecDeque::new(),
            current: ProfileKind::Standard,
            last_check: 0.0,
            switches: Vec::new(),
        }
    }

    /// Record a kept frame.
    pub fn note_capture(&mut self, timestamp: f64) {
        self.window.push_back(timestamp);
        self.prune(timestamp);
    }

    fn prune(&mut self, now: f64) {
        let cutoff = now - self.config.analysis_window;
        while self.window.front().is_some_and(|&t| t < cutoff) {
            self.window.pop_front();
        }
    }

    /// Evaluate the transition rule if an analysis window has elapsed
    /// since the last check. Returns the profile to switch to, if any.
    pub fn check(&mut self, timestamp: f64) -> Option<SamplingProfile> {
        if timestamp - self.last_check < self.config.analysis_window {
            return None;
        }
        self.last_check = timestamp;
        self.prune(timestamp);

        let rate = self.window.len() as f64 * 60.0 / self.config.analysis_window;
        let next = if rate > self.config.high_activity_threshold {
            ProfileKind::HighDensity
        } else if rate < self.config.low_activity_threshold {
            ProfileKind::LowDensity
        } else {
            self.current
        };

        if next == self.current {
            return None;
        }

        info!(
            "profile switch {} -> {} at {:.1}s ({:.1} frames/min)",
            self.current, next, timestamp, rate
        );
        self.switches.push(ProfileSwitch {
            timestamp,
            rate,
            from: self.current,
            to: next,
        });
        self.current = next;

        let profile = match next {
            ProfileKind::HighDensity => self.config.high_profile.clone(),
            ProfileKind::LowDensity => self.config.low_profile.clone(),
            ProfileKind::Standard => SamplingProfile::standard(),
        };
        Some(profile)
    }

    pub fn current(&self) -> ProfileKind {
        self.current
    }

    pub fn switches(&self) -> &[ProfileSwitch] {
        &self.switches
    }
}
