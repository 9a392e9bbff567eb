//! Camera device access: the vendor SDK seam, a scriptable mock device,
//! and the open-to-close session built on top of them.

mod mock;
mod sdk;
mod session;

pub use mock::MockSdk;
pub use sdk::{CameraHandle, CameraSdk, PropertyKey, SdkError, SensorRegion, StreamCommand};
pub use session::{CameraSession, SensorGeometry};
