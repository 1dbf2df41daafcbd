//! Adaptive visual-change frame sampling.
//!
//! A single forward pass over the video timeline:
//! 1. rate controller - per-minute and total capture budgets
//! 2. change detector - grayscale frame difference against the last kept frame
//! 3. mode tracker - switches the active profile between density regimes

pub mod change_detector;
pub mod mode_tracker;
pub mod profile;
pub mod rate_controller;
pub mod sampler;

pub use change_detector::should_capture;
pub use mode_tracker::{ModeTracker, ProfileSwitch, TrackerConfig};
pub use profile::{ProfileKind, SamplingProfile};
pub use rate_controller::{Permit, RateController};
pub use sampler::{extract, FrameSampler, SampleDecision, SamplerConfig};
