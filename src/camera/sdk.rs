//! Vendor camera API seam.
//!
//! The proprietary camera library sits behind the [`CameraSdk`] trait:
//! enumeration, open/close by index, numeric property queries by enum key,
//! stream control, one-shot auto-adjustments over a region of interest, and
//! synchronous single-frame capture into a caller-owned buffer. The shape
//! mirrors handle-based vendor SDKs, so a production implementation is a
//! thin FFI wrapper while tests run against [`MockSdk`].
//!
//! [`MockSdk`]: super::MockSdk

use thiserror::Error;

/// Opaque reference to an open camera.
///
/// Issued by [`CameraSdk::open`] and valid until passed to
/// [`CameraSdk::close`]. The inner token has no meaning outside the SDK
/// implementation that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(u32);

impl CameraHandle {
    /// Wraps a raw vendor token.
    pub fn from_raw(token: u32) -> Self {
        Self(token)
    }

    /// Returns the raw vendor token.
    #[inline]
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Numeric camera properties addressable by enum key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// Maximum sensor height in pixels.
    MaxHeight,
    /// Maximum sensor width in pixels.
    MaxWidth,
}

/// Stream control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCommand {
    /// Begin delivering frames.
    Start,
    /// Stop delivering frames.
    Stop,
}

/// Region of interest for the one-shot auto-adjustments.
///
/// The acquisition loop always passes the full sensor, anchored at the
/// origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorRegion {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Region width in pixels.
    pub width: u32,
    /// Region height in pixels.
    pub height: u32,
}

/// Errors reported by SDK implementations.
///
/// Variants carry the vendor error code where the underlying library
/// reports one.
#[derive(Debug, Clone, Error)]
pub enum SdkError {
    /// The open call returned no handle.
    #[error("unable to open camera {index}: vendor error {code}")]
    OpenFailed {
        /// 1-based camera index passed to the open call.
        index: u32,
        /// Vendor error code.
        code: u32,
    },
    /// The handle does not refer to an open camera.
    #[error("camera handle is not open")]
    InvalidHandle,
    /// A numeric property query failed.
    #[error("property {key:?} unavailable: vendor error {code}")]
    PropertyUnavailable {
        /// The queried property.
        key: PropertyKey,
        /// Vendor error code.
        code: u32,
    },
    /// Stream start or stop failed.
    #[error("stream control failed: vendor error {code}")]
    StreamControl {
        /// Vendor error code.
        code: u32,
    },
    /// A one-shot auto-adjustment failed.
    #[error("one-shot auto-adjustment failed: vendor error {code}")]
    AdjustFailed {
        /// Vendor error code.
        code: u32,
    },
    /// The single-frame capture failed; the caller's buffer is untouched.
    #[error("frame capture failed: vendor error {code}")]
    CaptureFailed {
        /// Vendor error code.
        code: u32,
    },
    /// The capture buffer does not match the sensor frame size.
    #[error("capture buffer holds {actual} bytes, sensor frame is {expected}")]
    BufferMismatch {
        /// Bytes required for one full frame.
        expected: usize,
        /// Bytes the caller provided.
        actual: usize,
    },
}

/// Trait boundary to the vendor camera library.
///
/// All calls are synchronous and unguarded by timeouts; in particular
/// [`take_frame`](CameraSdk::take_frame) blocks until the device driver
/// returns.
pub trait CameraSdk {
    /// Returns the number of cameras the library currently enumerates.
    fn camera_count(&mut self) -> u32;

    /// Opens the camera at `index`. Vendor indices start at 1.
    fn open(&mut self, index: u32) -> Result<CameraHandle, SdkError>;

    /// Reads a numeric property. The vendor reports values as floats.
    fn property(&mut self, handle: CameraHandle, key: PropertyKey) -> Result<f32, SdkError>;

    /// Starts or stops the video stream.
    fn stream_control(
        &mut self,
        handle: CameraHandle,
        command: StreamCommand,
    ) -> Result<(), SdkError>;

    /// Samples the scene once and adjusts exposure toward `target`
    /// brightness over `region`.
    fn one_shot_auto_exposure(
        &mut self,
        handle: CameraHandle,
        target: u8,
        region: SensorRegion,
    ) -> Result<(), SdkError>;

    /// Samples the scene once and adjusts gain toward `target` brightness
    /// over `region`.
    fn one_shot_auto_gain(
        &mut self,
        handle: CameraHandle,
        target: u8,
        region: SensorRegion,
    ) -> Result<(), SdkError>;

    /// Samples the scene once and adjusts the white-balance channels over
    /// `region`. The vendor call takes no brightness target.
    fn one_shot_auto_white_balance(
        &mut self,
        handle: CameraHandle,
        region: SensorRegion,
    ) -> Result<(), SdkError>;

    /// Captures exactly one frame into `buffer`.
    ///
    /// `buffer` must hold exactly height × width bytes for the open
    /// sensor; implementations reject any other length with
    /// [`SdkError::BufferMismatch`] and leave the buffer untouched on any
    /// failure.
    fn take_frame(&mut self, handle: CameraHandle, buffer: &mut [u8]) -> Result<(), SdkError>;

    /// Releases the camera behind `handle`.
    fn close(&mut self, handle: CameraHandle) -> Result<(), SdkError>;
}
