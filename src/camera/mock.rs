//! Scriptable in-memory camera device.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::sdk::{CameraHandle, CameraSdk, PropertyKey, SdkError, SensorRegion, StreamCommand};

/// Vendor code the mock reports for an out-of-range open index.
const BAD_INDEX_CODE: u32 = 1;

#[derive(Debug, Default)]
struct MockState {
    next_token: u32,
    open_handles: HashSet<u32>,
    captures: u64,
    exposure_calls: u64,
    gain_calls: u64,
    white_balance_calls: u64,
    last_target: Option<u8>,
    last_region: Option<SensorRegion>,
    streaming: bool,
}

/// Simulated camera library for tests and SDK-less runs.
///
/// Failures are scripted up front with the builder methods; observation
/// counters live behind a shared handle, so a clone kept by the test sees
/// every call the consumed copy receives.
#[derive(Debug, Clone)]
pub struct MockSdk {
    camera_count: u32,
    sensor_height: u32,
    sensor_width: u32,
    fail_open: Option<u32>,
    dead_properties: HashMap<PropertyKey, u32>,
    fail_stream: Option<u32>,
    fail_adjust: Option<u32>,
    capture_failures: HashMap<u64, u32>,
    state: Arc<Mutex<MockState>>,
}

impl MockSdk {
    /// Creates a mock exposing one camera with a 480x640 sensor.
    pub fn new() -> Self {
        Self {
            camera_count: 1,
            sensor_height: 480,
            sensor_width: 640,
            fail_open: None,
            dead_properties: HashMap::new(),
            fail_stream: None,
            fail_adjust: None,
            capture_failures: HashMap::new(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Overrides the simulated sensor dimensions.
    pub fn with_geometry(mut self, height: u32, width: u32) -> Self {
        self.sensor_height = height;
        self.sensor_width = width;
        self
    }

    /// Overrides how many cameras the mock enumerates.
    pub fn with_camera_count(mut self, count: u32) -> Self {
        self.camera_count = count;
        self
    }

    /// Scripts every open call to fail with `code`.
    pub fn fail_open(mut self, code: u32) -> Self {
        self.fail_open = Some(code);
        self
    }

    /// Scripts queries for `key` to fail with `code`.
    pub fn fail_property(mut self, key: PropertyKey, code: u32) -> Self {
        self.dead_properties.insert(key, code);
        self
    }

    /// Scripts stream control to fail with `code`.
    pub fn fail_stream(mut self, code: u32) -> Self {
        self.fail_stream = Some(code);
        self
    }

    /// Scripts all three one-shot adjustments to fail with `code`.
    pub fn fail_adjustments(mut self, code: u32) -> Self {
        self.fail_adjust = Some(code);
        self
    }

    /// Scripts the `attempt`-th capture (1-based) to fail with `code`.
    pub fn fail_capture_at(mut self, attempt: u64, code: u32) -> Self {
        self.capture_failures.insert(attempt, code);
        self
    }

    /// Total capture attempts, including scripted failures.
    pub fn captures(&self) -> u64 {
        self.lock().captures
    }

    /// One-shot auto exposure calls received.
    pub fn exposure_calls(&self) -> u64 {
        self.lock().exposure_calls
    }

    /// One-shot auto gain calls received.
    pub fn gain_calls(&self) -> u64 {
        self.lock().gain_calls
    }

    /// One-shot auto white-balance calls received.
    pub fn white_balance_calls(&self) -> u64 {
        self.lock().white_balance_calls
    }

    /// Brightness target of the most recent exposure or gain call.
    pub fn last_target(&self) -> Option<u8> {
        self.lock().last_target
    }

    /// Region of the most recent one-shot adjustment.
    pub fn last_region(&self) -> Option<SensorRegion> {
        self.lock().last_region
    }

    /// Whether the stream was last commanded to start.
    pub fn is_streaming(&self) -> bool {
        self.lock().streaming
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_handle(state: &MockState, handle: CameraHandle) -> Result<(), SdkError> {
        if state.open_handles.contains(&handle.raw()) {
            Ok(())
        } else {
            Err(SdkError::InvalidHandle)
        }
    }

    fn record_adjustment(
        &mut self,
        handle: CameraHandle,
        region: SensorRegion,
    ) -> Result<(), SdkError> {
        let mut state = self.lock();
        Self::check_handle(&state, handle)?;
        state.last_region = Some(region);
        drop(state);
        match self.fail_adjust {
            Some(code) => Err(SdkError::AdjustFailed { code }),
            None => Ok(()),
        }
    }
}

impl Default for MockSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraSdk for MockSdk {
    fn camera_count(&mut self) -> u32 {
        self.camera_count
    }

    fn open(&mut self, index: u32) -> Result<CameraHandle, SdkError> {
        if let Some(code) = self.fail_open {
            return Err(SdkError::OpenFailed { index, code });
        }
        if index == 0 || index > self.camera_count {
            return Err(SdkError::OpenFailed {
                index,
                code: BAD_INDEX_CODE,
            });
        }
        let mut state = self.lock();
        state.next_token += 1;
        let token = state.next_token;
        state.open_handles.insert(token);
        tracing::info!("MockSdk opened camera {} as handle {}", index, token);
        Ok(CameraHandle::from_raw(token))
    }

    fn property(&mut self, handle: CameraHandle, key: PropertyKey) -> Result<f32, SdkError> {
        let state = self.lock();
        Self::check_handle(&state, handle)?;
        drop(state);
        if let Some(&code) = self.dead_properties.get(&key) {
            return Err(SdkError::PropertyUnavailable { key, code });
        }
        let value = match key {
            PropertyKey::MaxHeight => self.sensor_height,
            PropertyKey::MaxWidth => self.sensor_width,
        };
        Ok(value as f32)
    }

    fn stream_control(
        &mut self,
        handle: CameraHandle,
        command: StreamCommand,
    ) -> Result<(), SdkError> {
        let mut state = self.lock();
        Self::check_handle(&state, handle)?;
        if let Some(code) = self.fail_stream {
            return Err(SdkError::StreamControl { code });
        }
        state.streaming = matches!(command, StreamCommand::Start);
        Ok(())
    }

    fn one_shot_auto_exposure(
        &mut self,
        handle: CameraHandle,
        target: u8,
        region: SensorRegion,
    ) -> Result<(), SdkError> {
        {
            let mut state = self.lock();
            Self::check_handle(&state, handle)?;
            state.exposure_calls += 1;
            state.last_target = Some(target);
        }
        self.record_adjustment(handle, region)
    }

    fn one_shot_auto_gain(
        &mut self,
        handle: CameraHandle,
        target: u8,
        region: SensorRegion,
    ) -> Result<(), SdkError> {
        {
            let mut state = self.lock();
            Self::check_handle(&state, handle)?;
            state.gain_calls += 1;
            state.last_target = Some(target);
        }
        self.record_adjustment(handle, region)
    }

    fn one_shot_auto_white_balance(
        &mut self,
        handle: CameraHandle,
        region: SensorRegion,
    ) -> Result<(), SdkError> {
        {
            let mut state = self.lock();
            Self::check_handle(&state, handle)?;
            state.white_balance_calls += 1;
        }
        self.record_adjustment(handle, region)
    }

    fn take_frame(&mut self, handle: CameraHandle, buffer: &mut [u8]) -> Result<(), SdkError> {
        let mut state = self.lock();
        Self::check_handle(&state, handle)?;
        state.captures += 1;
        let attempt = state.captures;
        drop(state);
        if let Some(&code) = self.capture_failures.get(&attempt) {
            return Err(SdkError::CaptureFailed { code });
        }
        let expected = self.sensor_height as usize * self.sensor_width as usize;
        if buffer.len() != expected {
            return Err(SdkError::BufferMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = ((i as u64 ^ attempt) % 256) as u8;
        }
        Ok(())
    }

    fn close(&mut self, handle: CameraHandle) -> Result<(), SdkError> {
        let mut state = self.lock();
        if state.open_handles.remove(&handle.raw()) {
            tracing::info!("MockSdk released handle {}", handle.raw());
            Ok(())
        } else {
            Err(SdkError::InvalidHandle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_capture_close_lifecycle() {
        let mut sdk = MockSdk::new().with_geometry(2, 3);
        assert_eq!(sdk.camera_count(), 1);

        let handle = sdk.open(1).unwrap();
        let mut frame = vec![0u8; 6];
        sdk.take_frame(handle, &mut frame).unwrap();
        assert!(frame.iter().any(|&b| b != 0));
        sdk.close(handle).unwrap();
    }

    #[test]
    fn test_consecutive_frames_differ() {
        let mut sdk = MockSdk::new().with_geometry(2, 3);
        let handle = sdk.open(1).unwrap();

        let mut first = vec![0u8; 6];
        let mut second = vec![0u8; 6];
        sdk.take_frame(handle, &mut first).unwrap();
        sdk.take_frame(handle, &mut second).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut sdk = MockSdk::new();
        assert!(matches!(
            sdk.open(0),
            Err(SdkError::OpenFailed { index: 0, .. })
        ));
        assert!(matches!(
            sdk.open(2),
            Err(SdkError::OpenFailed { index: 2, .. })
        ));
    }

    #[test]
    fn test_scripted_open_failure_carries_code() {
        let mut sdk = MockSdk::new().fail_open(57);
        match sdk.open(1) {
            Err(SdkError::OpenFailed { index, code }) => {
                assert_eq!(index, 1);
                assert_eq!(code, 57);
            }
            other => panic!("expected open failure, got {:?}", other),
        }
    }

    #[test]
    fn test_dead_property_reports_vendor_code() {
        let mut sdk = MockSdk::new().fail_property(PropertyKey::MaxHeight, 12);
        let handle = sdk.open(1).unwrap();

        match sdk.property(handle, PropertyKey::MaxHeight) {
            Err(SdkError::PropertyUnavailable { key, code }) => {
                assert_eq!(key, PropertyKey::MaxHeight);
                assert_eq!(code, 12);
            }
            other => panic!("expected property failure, got {:?}", other),
        }
        assert_eq!(sdk.property(handle, PropertyKey::MaxWidth).unwrap(), 640.0);
    }

    #[test]
    fn test_failed_capture_leaves_buffer_untouched() {
        let mut sdk = MockSdk::new().with_geometry(2, 3).fail_capture_at(1, 99);
        let handle = sdk.open(1).unwrap();

        let mut frame = vec![7u8; 6];
        assert!(matches!(
            sdk.take_frame(handle, &mut frame),
            Err(SdkError::CaptureFailed { code: 99 })
        ));
        assert_eq!(frame, vec![7u8; 6]);

        sdk.take_frame(handle, &mut frame).unwrap();
        assert_ne!(frame, vec![7u8; 6]);
    }

    #[test]
    fn test_mismatched_buffer_rejected() {
        let mut sdk = MockSdk::new().with_geometry(2, 3);
        let handle = sdk.open(1).unwrap();

        let mut frame = vec![0u8; 5];
        match sdk.take_frame(handle, &mut frame) {
            Err(SdkError::BufferMismatch { expected, actual }) => {
                assert_eq!(expected, 6);
                assert_eq!(actual, 5);
            }
            other => panic!("expected buffer mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_control_toggles_state() {
        let mut sdk = MockSdk::new();
        let handle = sdk.open(1).unwrap();

        sdk.stream_control(handle, StreamCommand::Start).unwrap();
        assert!(sdk.is_streaming());
        sdk.stream_control(handle, StreamCommand::Stop).unwrap();
        assert!(!sdk.is_streaming());
    }

    #[test]
    fn test_closed_handle_invalid() {
        let mut sdk = MockSdk::new();
        let handle = sdk.open(1).unwrap();
        sdk.close(handle).unwrap();

        let mut frame = vec![0u8; 480 * 640];
        assert!(matches!(
            sdk.take_frame(handle, &mut frame),
            Err(SdkError::InvalidHandle)
        ));
        assert!(matches!(sdk.close(handle), Err(SdkError::InvalidHandle)));
    }

    #[test]
    fn test_clone_shares_observation_state() {
        let sdk = MockSdk::new();
        let mut consumed = sdk.clone();

        let handle = consumed.open(1).unwrap();
        let region = SensorRegion {
            x: 0,
            y: 0,
            width: 640,
            height: 480,
        };
        consumed.one_shot_auto_exposure(handle, 90, region).unwrap();
        consumed.one_shot_auto_gain(handle, 90, region).unwrap();
        consumed.one_shot_auto_white_balance(handle, region).unwrap();

        assert_eq!(sdk.exposure_calls(), 1);
        assert_eq!(sdk.gain_calls(), 1);
        assert_eq!(sdk.white_balance_calls(), 1);
        assert_eq!(sdk.last_target(), Some(90));
        assert_eq!(sdk.last_region(), Some(region));
    }
}
