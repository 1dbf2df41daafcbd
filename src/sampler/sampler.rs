//! Frame sampling: a pure per-frame decision object plus the video
//! decode driver that feeds it.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::video::decoder::FrameStream;
use crate::video::error::VideoError;
use crate::video::frame::{luma_from_rgb, Frame};

use super::change_detector::{should_capture, DEFAULT_INTENSITY_DELTA};
use super::mode_tracker::{ModeTracker, ProfileSwitch, TrackerConfig};
use super::profile::SamplingProfile;
use super::rate_controller::{Permit, RateController};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Profile active at the start of the run.
    pub profile: SamplingProfile,
    /// Hard cap on kept frames for the whole video.
    pub max_frames_total: u32,
    /// `None` disables adaptive profile switching.
    pub adaptive: Option<TrackerConfig>,
    /// Per-pixel intensity delta counted as a changed pixel.
    pub pixel_intensity_delta: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            profile: SamplingProfile::standard(),
            max_frames_total: 300,
            adaptive: Some(TrackerConfig::default()),
            pixel_intensity_delta: DEFAULT_INTENSITY_DELTA,
        }
    }
}

/// What to do with an examined frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDecision {
    Keep,
    Skip,
    /// Total budget exhausted; stop examining frames entirely.
    Stop,
}

/// Per-video sampling state: active profile, rate buckets, adaptive
/// tracker, and the previously kept frame used as the change
/// reference. Fed one examined frame at a time by a decode driver.
pub struct FrameSampler {
    active: SamplingProfile,
    intensity_delta: u8,
    rate: RateController,
    tracker: Option<ModeTracker>,
    prev_kept: Option<Vec<u8>>,
    examined: u64,
}

impl FrameSampler {
    pub fn new(config: &SamplerConfig) -> Self {
        Self {
            active: config.profile.clone(),
            intensity_delta: config.pixel_intensity_delta,
            rate: RateController::new(
                config.profile.max_frames_per_minute,
                config.max_frames_total,
            ),
            tracker: config.adaptive.clone().map(ModeTracker::new),
            prev_kept: None,
            examined: 0,
        }
    }

    /// The interval the driver should currently examine frames at.
    pub fn sample_interval(&self) -> f64 {
        self.active.sample_interval
    }

    pub fn active_profile(&self) -> &SamplingProfile {
        &self.active
    }

    pub fn examined_count(&self) -> u64 {
        self.examined
    }

    pub fn kept_count(&self) -> u32 {
        self.rate.total()
    }

    pub fn switches(&self) -> &[ProfileSwitch] {
        self.tracker.as_ref().map_or(&[], |t| t.switches())
    }

    /// Decide whether the examined frame at `timestamp` is kept. The
    /// caller owns frame construction; this sees only the grayscale
    /// buffer.
    pub fn offer(&mut self, timestamp: f64, luma: &[u8]) -> SampleDecision {
        self.examined += 1;

        match self.rate.permit(timestamp) {
            Permit::BudgetExhausted => return SampleDecision::Stop,
            Permit::MinuteExhausted => {
                self.maybe_switch(timestamp);
                return SampleDecision::Skip;
            }
            Permit::Granted => {}
        }

        if !should_capture(
            luma,
            self.prev_kept.as_deref(),
            self.active.pixel_change_threshold,
            self.intensity_delta,
        ) {
            self.maybe_switch(timestamp);
            return SampleDecision::Skip;
        }

        self.prev_kept = Some(luma.to_vec());
        self.rate.record(timestamp);
        if let Some(tracker) = &mut self.tracker {
            tracker.note_capture(timestamp);
        }
        self.maybe_switch(timestamp);
        SampleDecision::Keep
    }

    fn maybe_switch(&mut self, timestamp: f64) {
        let Some(tracker) = &mut self.tracker else {
            return;
        };
        if let Some(profile) = tracker.check(timestamp) {
            self.rate.set_minute_cap(profile.max_frames_per_minute);
            self.active = profile;
        }
    }
}

/// Walk the video timeline and collect kept frames in timestamp order.
///
/// Decodes at native frame rate, examines one frame per
/// `round(fps * sample_interval)` decoded frames, and re-reads the
/// stride after every decision so profile switches take effect
/// immediately.
pub fn extract(path: &Path, config: &SamplerConfig) -> Result<Vec<Frame>, VideoError> {
    let mut stream = FrameStream::open(path)?;
    let info = stream.info().clone();
    let mut sampler = FrameSampler::new(config);

    let mut frames: Vec<Frame> = Vec::new();
    let mut buf: Vec<u8> = Vec::new();
    let mut stride = stride_for(info.fps, sampler.sample_interval());

    while let Some(index) = stream.next_frame(&mut buf)? {
        if index % stride != 0 {
            continue;
        }
        let timestamp = index as f64 / info.fps;
        let luma = luma_from_rgb(&buf);

        match sampler.offer(timestamp, &luma) {
            SampleDecision::Keep => {
                frames.push(Frame::new(timestamp, info.width, info.height, buf.clone()));
            }
            SampleDecision::Skip => {}
            SampleDecision::Stop => {
                info!("frame budget exhausted at {timestamp:.1}s");
                break;
            }
        }
        stride = stride_for(info.fps, sampler.sample_interval());
    }

    info!(
        "kept {} of {} examined frames from {} ({:.1}s)",
        frames.len(),
        sampler.examined_count(),
        path.display(),
        info.duration
    );
    Ok(frames)
}

fn stride_for(fps: f64, interval: f64) -> u64 {
    ((fps * interval).round() as u64).max(1)
}
