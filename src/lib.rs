//! Lucam Camera Bridge Library
//!
//! Drives a vendor camera through a one-shot auto-adjustment and capture
//! cycle, republishing every frame as a raw Bayer image message at a
//! fixed cadence.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! camera session → acquisition loop → publish sink
//!       ↓                ↓
//!   vendor SDK     injected clock
//! ```
//!
//! # Design Principles
//!
//! - **Only the open is fatal**: every later failure is logged, counted,
//!   and survived so the output cadence holds
//! - **Fixed session geometry**: sensor dimensions are probed once at open
//!   and never re-read
//! - **Injected time and shutdown**: the loop takes a clock and a liveness
//!   flag, so tests drive both by hand
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! use lucam_bridge::{AcquisitionLoop, LoopSettings, ManualClock, MemorySink, MockSdk};
//!
//! let settings = LoopSettings {
//!     max_frames: Some(3),
//!     ..LoopSettings::default()
//! };
//! let running = Arc::new(AtomicBool::new(true));
//! let mut sink = MemorySink::new();
//!
//! let stats = AcquisitionLoop::new(MockSdk::new(), ManualClock::new(), settings, running)
//!     .run(&mut sink)
//!     .unwrap();
//!
//! assert_eq!(stats.frames_published, 3);
//! assert_eq!(sink.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod acquisition;
pub mod camera;
pub mod config;
pub mod publish;

// Re-export commonly used types at crate root
pub use acquisition::{
    AcquisitionLoop, Clock, LoopSettings, LoopStats, ManualClock, SystemClock,
};
pub use camera::{CameraSdk, CameraSession, MockSdk, SdkError, SensorGeometry};
pub use config::{BridgeConfig, ConfigError};
pub use publish::{ImageMessage, ImageSink, MemorySink, PixelEncoding, TracingSink};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
