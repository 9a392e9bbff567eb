//! Camera session lifecycle.
//!
//! A [`CameraSession`] owns one open camera from open to close. Sensor
//! geometry is probed once at open time and fixed for the session; the
//! acquisition loop sizes its frame buffer from it and never re-reads the
//! device dimensions.

use super::sdk::{CameraHandle, CameraSdk, PropertyKey, SdkError, SensorRegion, StreamCommand};

/// Sensor dimensions probed at session open.
///
/// A dimension whose probe failed stays at zero; the session reports that
/// through [`is_degenerate`](SensorGeometry::is_degenerate) and keeps
/// running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorGeometry {
    /// Sensor height in pixels.
    pub height: u32,
    /// Sensor width in pixels.
    pub width: u32,
}

impl SensorGeometry {
    /// Total pixels in one full frame. The supported mosaic formats are
    /// one byte per pixel, so this is also the frame byte count.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.height as usize * self.width as usize
    }

    /// The full sensor as a region of interest, anchored at the origin.
    #[inline]
    pub fn full_region(&self) -> SensorRegion {
        SensorRegion {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    /// True when either dimension is zero.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.height == 0 || self.width == 0
    }
}

/// One open camera, its handle, and its probed geometry.
pub struct CameraSession<S: CameraSdk> {
    sdk: S,
    handle: CameraHandle,
    geometry: SensorGeometry,
}

impl<S: CameraSdk> CameraSession<S> {
    /// Opens the camera at `device_index` (vendor indices start at 1) and
    /// probes its maximum sensor dimensions.
    ///
    /// A failed open is the only fatal outcome. A failed dimension probe
    /// is logged and the dimension left at zero, matching the degraded
    /// behavior of a camera that cannot report its sensor size.
    pub fn open(mut sdk: S, device_index: u32) -> Result<Self, SdkError> {
        let count = sdk.camera_count();
        tracing::info!(count, "enumerated vendor cameras");

        let handle = sdk.open(device_index)?;

        let mut geometry = SensorGeometry::default();
        // The vendor reports dimensions as floats; integral pixel counts
        // survive the cast exactly.
        match sdk.property(handle, PropertyKey::MaxHeight) {
            Ok(value) => {
                geometry.height = value as u32;
                tracing::info!(pixels = geometry.height, "max sensor height");
            }
            Err(error) => {
                tracing::warn!(%error, "sensor height probe failed, dimension left at zero");
            }
        }
        match sdk.property(handle, PropertyKey::MaxWidth) {
            Ok(value) => {
                geometry.width = value as u32;
                tracing::info!(pixels = geometry.width, "max sensor width");
            }
            Err(error) => {
                tracing::warn!(%error, "sensor width probe failed, dimension left at zero");
            }
        }

        Ok(Self {
            sdk,
            handle,
            geometry,
        })
    }

    /// Geometry probed when the session opened.
    #[inline]
    pub fn geometry(&self) -> SensorGeometry {
        self.geometry
    }

    /// Commands the device to begin streaming video.
    pub fn start_streaming(&mut self) -> Result<(), SdkError> {
        self.sdk.stream_control(self.handle, StreamCommand::Start)
    }

    /// Runs one-shot auto exposure toward `target` brightness over the
    /// full sensor.
    pub fn one_shot_auto_exposure(&mut self, target: u8) -> Result<(), SdkError> {
        let region = self.geometry.full_region();
        self.sdk.one_shot_auto_exposure(self.handle, target, region)
    }

    /// Runs one-shot auto gain toward `target` brightness over the full
    /// sensor.
    pub fn one_shot_auto_gain(&mut self, target: u8) -> Result<(), SdkError> {
        let region = self.geometry.full_region();
        self.sdk.one_shot_auto_gain(self.handle, target, region)
    }

    /// Runs one-shot auto white balance over the full sensor.
    pub fn one_shot_auto_white_balance(&mut self) -> Result<(), SdkError> {
        let region = self.geometry.full_region();
        self.sdk.one_shot_auto_white_balance(self.handle, region)
    }

    /// Captures one frame into `buffer`. On failure `buffer` keeps its
    /// previous contents.
    pub fn capture_into(&mut self, buffer: &mut [u8]) -> Result<(), SdkError> {
        self.sdk.take_frame(self.handle, buffer)
    }

    /// Releases the camera. A failed release is logged, not propagated;
    /// there is nothing left for the caller to do with it.
    pub fn close(mut self) {
        if let Err(error) = self.sdk.close(self.handle) {
            tracing::warn!(%error, "failed to release camera");
        }
    }
}
