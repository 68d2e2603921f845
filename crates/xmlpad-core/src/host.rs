//! The editor widget seam.
//!
//! The panel never reaches into a widget directly. It owns one value
//! implementing `EditorHost` and talks to it through three calls: read the
//! live text, replace the live text, apply presentation options.

use crate::config::{EditorOptions, FontSize, Theme};

/// Language mode handed to the widget. The panel only edits XML.
pub const LANGUAGE: &str = "xml";

/// Everything the widget needs besides the text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBinding {
    pub language: &'static str,
    pub theme: Theme,
    pub font_size: FontSize,
    pub options: EditorOptions,
}

impl HostBinding {
    pub fn new(theme: Theme, font_size: FontSize, options: EditorOptions) -> Self {
        Self {
            language: LANGUAGE,
            theme,
            font_size,
            options,
        }
    }
}

/// An embedded editor widget.
///
/// The widget may hold transient state of its own (cursor, selection,
/// unrelayed edits). `value` always returns what the user currently sees.
pub trait EditorHost {
    /// Returns the live text.
    fn value(&self) -> String;

    /// Replaces the live text.
    fn set_value(&mut self, text: &str);

    /// Applies theme, font and options. Must not touch the text.
    fn apply(&mut self, binding: &HostBinding);
}

/// A widget-less host holding its text in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    text: String,
    binding: Option<HostBinding>,
    set_calls: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the user typing into the widget (not relayed to the panel).
    pub fn type_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// The last applied binding.
    pub fn binding(&self) -> Option<&HostBinding> {
        self.binding.as_ref()
    }

    /// How many times the text was forced with `set_value`.
    pub fn set_calls(&self) -> usize {
        self.set_calls
    }
}

impl EditorHost for MemoryHost {
    fn value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.set_calls += 1;
        self.text = text.to_string();
    }

    fn apply(&mut self, binding: &HostBinding) {
        self.binding = Some(binding.clone());
    }
}
