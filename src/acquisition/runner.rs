//! The capture-and-publish acquisition loop.
//!
//! One run owns the whole camera lifecycle: open and probe, start
//! streaming, then a fixed-cadence loop of one-shot adjustments, capture,
//! and publication until the liveness flag clears or a frame budget is
//! exhausted. Only the open can abort a run; every later failure is
//! surfaced, counted, and survived so the output cadence holds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::camera::{CameraSdk, CameraSession, SdkError};
use crate::publish::{ImageMessage, ImageSink, PixelEncoding};

use super::clock::Clock;
use super::rate::LoopRate;

/// Tunables for one acquisition run.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// 1-based vendor index of the camera to open.
    pub device_index: u32,
    /// Brightness target for the one-shot exposure and gain adjustments.
    pub brightness_target: u8,
    /// Capture cadence in frames per second.
    pub rate_hz: u32,
    /// Stop after this many published frames; `None` runs until the
    /// liveness flag clears.
    pub max_frames: Option<u64>,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            device_index: 1,
            brightness_target: 90,
            rate_hz: 10,
            max_frames: None,
        }
    }
}

/// Counters accumulated over one acquisition run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Loop iterations entered.
    pub iterations: u64,
    /// Messages handed to the sink.
    pub frames_published: u64,
    /// Captures that returned an error.
    pub capture_failures: u64,
    /// One-shot auto exposure calls that returned an error.
    pub exposure_failures: u64,
    /// One-shot auto gain calls that returned an error.
    pub gain_failures: u64,
    /// One-shot auto white-balance calls that returned an error.
    pub white_balance_failures: u64,
}

/// Drives one camera from open to close at a fixed cadence.
pub struct AcquisitionLoop<S: CameraSdk, C: Clock> {
    sdk: S,
    clock: C,
    settings: LoopSettings,
    running: Arc<AtomicBool>,
}

impl<S: CameraSdk, C: Clock> AcquisitionLoop<S, C> {
    /// Creates a loop over `sdk`, paced by `clock`, alive while `running`
    /// holds true.
    pub fn new(sdk: S, clock: C, settings: LoopSettings, running: Arc<AtomicBool>) -> Self {
        Self {
            sdk,
            clock,
            settings,
            running,
        }
    }

    /// Runs the loop to completion, publishing every frame to `sink`.
    ///
    /// Returns the run counters, or the open error when the camera could
    /// not be acquired at all. The liveness flag is checked once at the
    /// head of each iteration; an iteration in flight always finishes.
    pub fn run<K: ImageSink>(self, sink: &mut K) -> Result<LoopStats, SdkError> {
        let mut session = CameraSession::open(self.sdk, self.settings.device_index)?;
        let geometry = session.geometry();
        if geometry.is_degenerate() {
            tracing::warn!(
                height = geometry.height,
                width = geometry.width,
                "sensor geometry is degenerate, published frames will be empty"
            );
        }
        let mut frame = vec![0u8; geometry.pixel_count()];

        if let Err(error) = session.start_streaming() {
            tracing::warn!(%error, "failed to start streaming");
        }
        tracing::info!(
            height = geometry.height,
            width = geometry.width,
            rate_hz = self.settings.rate_hz,
            "acquisition started"
        );

        let mut stats = LoopStats::default();
        let mut rate = LoopRate::from_hz(self.settings.rate_hz, self.clock.monotonic());

        while self.running.load(Ordering::Relaxed) {
            if let Some(limit) = self.settings.max_frames {
                if stats.frames_published >= limit {
                    break;
                }
            }
            stats.iterations += 1;

            if let Err(error) = session.one_shot_auto_exposure(self.settings.brightness_target) {
                stats.exposure_failures += 1;
                tracing::debug!(%error, "one-shot auto exposure failed");
            }
            if let Err(error) = session.one_shot_auto_gain(self.settings.brightness_target) {
                stats.gain_failures += 1;
                tracing::debug!(%error, "one-shot auto gain failed");
            }
            if let Err(error) = session.one_shot_auto_white_balance() {
                stats.white_balance_failures += 1;
                tracing::debug!(%error, "one-shot auto white balance failed");
            }

            // A failed capture leaves the previous frame in the buffer;
            // the message goes out either way so the cadence holds.
            if let Err(error) = session.capture_into(&mut frame) {
                stats.capture_failures += 1;
                tracing::error!(%error, "failed to capture image");
            }

            let message = ImageMessage::new(
                self.clock.now(),
                geometry,
                PixelEncoding::BayerBggr8,
                frame.clone(),
            );
            sink.publish(message);
            stats.frames_published += 1;

            if !rate.sleep(&self.clock) {
                tracing::trace!("cycle overran its period");
            }
        }

        session.close();
        tracing::info!(
            iterations = stats.iterations,
            frames_published = stats.frames_published,
            capture_failures = stats.capture_failures,
            exposure_failures = stats.exposure_failures,
            gain_failures = stats.gain_failures,
            white_balance_failures = stats.white_balance_failures,
            "acquisition stopped"
        );
        Ok(stats)
    }
}
