//! Image message assembly and publication sinks.

mod message;
mod sink;

pub use message::{ImageMessage, PixelEncoding};
pub use sink::{ImageSink, MemorySink, TracingSink};
