//! User-facing alert surface.

/// Shows a blocking, user-facing message.
///
/// Only the invalid-upload path raises alerts. Everything else reports
/// through logging or the event bus.
pub trait Alert {
    fn alert(&mut self, message: &str);
}

/// Collects alerts in memory; the UI renders the front one as a modal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AlertQueue {
    pending: Vec<String>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The alert currently shown, if any.
    pub fn current(&self) -> Option<&str> {
        self.pending.first().map(String::as_str)
    }

    /// Dismisses the alert currently shown.
    pub fn dismiss(&mut self) {
        if !self.pending.is_empty() {
            self.pending.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Alert for AlertQueue {
    fn alert(&mut self, message: &str) {
        self.pending.push(message.to_string());
    }
}
