//! Fixed-cadence frame acquisition: injected clocks, loop pacing, and the
//! capture-and-publish runner.

mod clock;
mod rate;
mod runner;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rate::LoopRate;
pub use runner::{AcquisitionLoop, LoopSettings, LoopStats};
