//! Publication endpoints for image messages.

use std::sync::{Arc, Mutex};

use super::message::ImageMessage;

/// Downstream consumer of image messages.
///
/// Publication is fire-and-forget: the transport owns delivery and the
/// acquisition loop never learns whether anyone received the frame.
pub trait ImageSink {
    /// Hands one message to the transport.
    fn publish(&mut self, message: ImageMessage);
}

/// Sink that retains every message in memory, in publication order.
///
/// Clones share one store, so a test can keep a handle while the
/// acquisition loop owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    store: Arc<Mutex<Vec<ImageMessage>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages published so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of every published message, in order.
    pub fn messages(&self) -> Vec<ImageMessage> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ImageMessage>> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ImageSink for MemorySink {
    fn publish(&mut self, message: ImageMessage) {
        self.lock().push(message);
    }
}

/// Sink that logs each message instead of transporting it.
///
/// Stands in for the real transport when none is wired up; the topic is
/// carried so the logs read like the live system.
#[derive(Debug)]
pub struct TracingSink {
    topic: String,
    published: u64,
}

impl TracingSink {
    /// Creates a sink announcing messages under `topic`.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            published: 0,
        }
    }

    /// Topic the sink announces under.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Messages logged so far.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl ImageSink for TracingSink {
    fn publish(&mut self, message: ImageMessage) {
        self.published += 1;
        tracing::debug!(
            topic = %self.topic,
            stamp = %message.stamp(),
            height = message.height(),
            width = message.width(),
            encoding = %message.encoding(),
            bytes = message.data().len(),
            "published image"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::message::PixelEncoding;
    use super::*;
    use crate::camera::SensorGeometry;
    use chrono::DateTime;

    fn message(fill: u8) -> ImageMessage {
        ImageMessage::new(
            DateTime::UNIX_EPOCH,
            SensorGeometry {
                height: 2,
                width: 2,
            },
            PixelEncoding::BayerBggr8,
            vec![fill; 4],
        )
    }

    #[test]
    fn test_memory_sink_keeps_publication_order() {
        let mut sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.publish(message(1));
        sink.publish(message(2));

        let stored = sink.messages();
        assert_eq!(sink.len(), 2);
        assert_eq!(stored[0].data(), &[1u8; 4]);
        assert_eq!(stored[1].data(), &[2u8; 4]);
    }

    #[test]
    fn test_memory_sink_clones_share_store() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();

        writer.publish(message(9));

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.messages()[0].data(), &[9u8; 4]);
    }

    #[test]
    fn test_tracing_sink_counts_messages() {
        let mut sink = TracingSink::new("image_raw");
        assert_eq!(sink.topic(), "image_raw");

        sink.publish(message(1));
        sink.publish(message(2));

        assert_eq!(sink.published(), 2);
    }
}
