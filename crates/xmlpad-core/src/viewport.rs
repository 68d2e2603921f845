//! Responsive viewport sizing.
//!
//! The editor height is not user settable. It follows one of two presets
//! selected by the window width.

use crate::config::ViewportConfig;

/// Height preset of the editor area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightPreset {
    /// Narrow windows
    Compact,
    #[default]
    Default,
}

/// Viewport dimensions derived from the window size.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    policy: ViewportConfig,
    window_width: f32,
    window_height: f32,
    preset: HeightPreset,
}

impl Viewport {
    /// Creates a viewport for an initial window size.
    pub fn new(policy: ViewportConfig, width: f32, height: f32) -> Self {
        let preset = Self::preset_for(&policy, width);
        Self {
            policy,
            window_width: width,
            window_height: height,
            preset,
        }
    }

    fn preset_for(policy: &ViewportConfig, width: f32) -> HeightPreset {
        if width < policy.breakpoint {
            HeightPreset::Compact
        } else {
            HeightPreset::Default
        }
    }

    /// Records a window resize. Returns true if the preset changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.window_width = width;
        self.window_height = height;

        let preset = Self::preset_for(&self.policy, width);
        if preset == self.preset {
            return false;
        }
        self.preset = preset;
        true
    }

    pub fn preset(&self) -> HeightPreset {
        self.preset
    }

    /// Fraction of the window height given to the editor.
    pub fn height_fraction(&self) -> f32 {
        match self.preset {
            HeightPreset::Compact => self.policy.compact_height,
            HeightPreset::Default => self.policy.default_height,
        }
    }

    /// Editor height in logical pixels.
    pub fn editor_height(&self) -> f32 {
        (self.window_height * self.height_fraction()).max(0.0)
    }

    pub fn window_width(&self) -> f32 {
        self.window_width
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default(), 1280.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_preset() {
        let narrow = Viewport::new(ViewportConfig::default(), 500.0, 800.0);
        assert_eq!(narrow.preset(), HeightPreset::Compact);
        assert!((narrow.editor_height() - 400.0).abs() < 0.01);

        let wide = Viewport::new(ViewportConfig::default(), 1024.0, 1000.0);
        assert_eq!(wide.preset(), HeightPreset::Default);
        assert!((wide.editor_height() - 600.0).abs() < 0.01);
    }

    #[test]
    fn test_breakpoint_is_exclusive() {
        let mut viewport = Viewport::new(ViewportConfig::default(), 767.9, 800.0);
        assert_eq!(viewport.preset(), HeightPreset::Compact);

        assert!(viewport.resize(768.0, 800.0));
        assert_eq!(viewport.preset(), HeightPreset::Default);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut viewport = Viewport::default();

        assert!(viewport.resize(600.0, 800.0));
        assert!(!viewport.resize(600.0, 800.0));
        assert!(!viewport.resize(700.0, 800.0));
        assert_eq!(viewport.preset(), HeightPreset::Compact);

        assert!(viewport.resize(900.0, 800.0));
        assert!(!viewport.resize(900.0, 800.0));
        assert_eq!(viewport.preset(), HeightPreset::Default);
    }

    #[test]
    fn test_height_follows_window_without_preset_change() {
        let mut viewport = Viewport::default();
        assert!(!viewport.resize(1280.0, 500.0));
        assert!((viewport.editor_height() - 300.0).abs() < 0.01);
    }
}
