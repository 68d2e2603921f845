//! Event system for panel notifications.
//!
//! The panel never calls into the UI. It publishes `PanelEvent` values on a
//! `tokio::sync::broadcast` channel and the UI drains them (status line,
//! logging). Lagged receivers don't block the panel.

use std::path::PathBuf;
use tokio::sync::broadcast;

use crate::config::{FontSize, Theme};
use crate::viewport::HeightPreset;

/// Events published by the editor panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    // Buffer events
    /// An upload resolved and replaced the buffer
    BufferReplaced { file_name: String, len: usize },
    /// The buffer was cleared
    Cleared,

    // Configuration events
    ThemeChanged(Theme),
    FontSizeChanged(FontSize),
    ViewportChanged(HeightPreset),

    // File exchange events
    /// An upload was refused because of its content type
    UploadRejected { content_type: String },
    /// An accepted upload could not be read
    UploadFailed { file_name: String, reason: String },
    /// The live content was saved
    Downloaded { path: PathBuf, bytes: usize },

    // Clipboard
    Copied { len: usize },
}

/// Broadcast bus for panel events.
pub struct EventBus {
    sender: broadcast::Sender<PanelEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: PanelEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Drains every event currently queued on a receiver without waiting.
pub fn drain(receiver: &mut broadcast::Receiver<PanelEvent>) -> Vec<PanelEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                tracing::warn!("Event receiver lagged, missed {} events", n);
            }
            Err(_) => break,
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(PanelEvent::Cleared);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, PanelEvent::Cleared);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(PanelEvent::ThemeChanged(Theme::Light));

        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[test]
    fn test_drain_collects_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(PanelEvent::Cleared);
        bus.emit(PanelEvent::Copied { len: 3 });

        assert_eq!(
            drain(&mut rx),
            vec![PanelEvent::Cleared, PanelEvent::Copied { len: 3 }]
        );
        assert!(drain(&mut rx).is_empty());
    }
}
