//! Panel configuration.
//!
//! Startup defaults are read from `config.toml`. Selections made at runtime
//! through the toolbar are never written back; `save_to` only exists to
//! produce a starter file.
//!
//! `#[serde(default)]` uses Default::default() for missing fields, so a
//! config file only needs the keys it wants to change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Main panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor presentation and behavior
    pub editor: EditorConfig,

    /// Responsive viewport policy
    pub viewport: ViewportConfig,

    /// Initial window geometry
    pub window: WindowConfig,

    /// Download (save) behavior
    pub download: DownloadConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("xmlpad").join("config.toml"))
    }

    /// Writes the config as pretty TOML, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            viewport: ViewportConfig::default(),
            window: WindowConfig::default(),
            download: DownloadConfig::default(),
        }
    }
}

/// Editor presentation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Initial color theme
    pub theme: Theme,

    /// Initial font size
    pub font_size: FontSize,

    /// Spaces per indent level used by auto-indent and formatting
    pub tab_size: usize,

    /// Options handed to the editor widget
    pub options: EditorOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: FontSize::default(),
            tab_size: 2,
            options: EditorOptions::default(),
        }
    }
}

impl EditorConfig {
    /// One indentation level as a string.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.tab_size.max(1))
    }
}

/// Color theme of the editor widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "vs-dark")]
    Dark,
    #[serde(rename = "light")]
    Light,
    #[serde(rename = "hc-black")]
    HighContrast,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::HighContrast];

    /// Identifier understood by the widget and the config file.
    pub fn id(self) -> &'static str {
        match self {
            Theme::Dark => "vs-dark",
            Theme::Light => "light",
            Theme::HighContrast => "hc-black",
        }
    }

    pub fn is_dark(self) -> bool {
        !matches!(self, Theme::Light)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.id() == s)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown theme '{}'", s)))
    }
}

/// Editor font size in pixels, restricted to the sizes offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct FontSize(u16);

impl FontSize {
    pub const ALL: [FontSize; 6] = [
        FontSize(10),
        FontSize(12),
        FontSize(14),
        FontSize(16),
        FontSize(18),
        FontSize(20),
    ];

    /// Returns the size if it is one of the supported values.
    pub fn new(px: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.0 == px)
    }

    pub fn px(self) -> u16 {
        self.0
    }

    /// Next larger supported size, saturating at the largest.
    pub fn larger(self) -> Self {
        Self::ALL
            .into_iter()
            .find(|size| size.0 > self.0)
            .unwrap_or(self)
    }

    /// Next smaller supported size, saturating at the smallest.
    pub fn smaller(self) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|size| size.0 < self.0)
            .unwrap_or(self)
    }
}

impl Default for FontSize {
    fn default() -> Self {
        FontSize(14)
    }
}

impl TryFrom<u16> for FontSize {
    type Error = ConfigError;

    fn try_from(px: u16) -> Result<Self, Self::Error> {
        Self::new(px).ok_or_else(|| ConfigError::Invalid(format!("unsupported font size {}", px)))
    }
}

impl From<FontSize> for u16 {
    fn from(size: FontSize) -> Self {
        size.0
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Options structure handed to the editor widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    pub auto_indent: AutoIndent,
    pub format_on_paste: bool,
    pub format_on_type: bool,
    pub folding: bool,
    pub line_numbers: LineNumbers,
    pub minimap: bool,
    pub render_line_highlight: LineHighlight,
    pub bracket_pair_colorization: bool,
    pub scroll_beyond_last_line: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            auto_indent: AutoIndent::Advanced,
            format_on_paste: true,
            format_on_type: true,
            folding: true,
            line_numbers: LineNumbers::On,
            minimap: false,
            render_line_highlight: LineHighlight::All,
            bracket_pair_colorization: true,
            scroll_beyond_last_line: false,
        }
    }
}

/// Auto-indent behavior on new lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoIndent {
    None,
    /// Keep the indentation of the previous line
    Keep,
    /// Keep, and indent inside unclosed elements
    #[default]
    Advanced,
}

/// Line number gutter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineNumbers {
    #[default]
    On,
    Off,
    Relative,
}

/// Current-line highlight style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineHighlight {
    None,
    Gutter,
    Line,
    #[default]
    All,
}

/// Responsive viewport policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Windows narrower than this (logical pixels) use the compact preset
    pub breakpoint: f32,

    /// Editor height as a fraction of window height, compact preset
    pub compact_height: f32,

    /// Editor height as a fraction of window height, default preset
    pub default_height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            breakpoint: 768.0,
            compact_height: 0.5,
            default_height: 0.6,
        }
    }
}

/// Initial window geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Download configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// File name used until a file has been uploaded
    pub file_name: String,

    /// Target directory (None = the platform downloads directory)
    pub directory: Option<PathBuf>,

    /// Ask for a location with a save dialog instead of using `directory`
    pub ask_location: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            file_name: "document.xml".to_string(),
            directory: None,
            ask_location: false,
        }
    }
}

impl DownloadConfig {
    /// Resolves the target directory.
    pub fn target_dir(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.theme, Theme::Dark);
        assert_eq!(config.editor.font_size.px(), 14);
        assert_eq!(config.viewport.breakpoint, 768.0);
        assert!(!config.editor.options.minimap);
        assert_eq!(config.download.file_name, "document.xml");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config() {
        let parsed: Config = toml::from_str(
            r#"
            [editor]
            theme = "hc-black"
            font_size = 18
            "#,
        )
        .unwrap();
        assert_eq!(parsed.editor.theme, Theme::HighContrast);
        assert_eq!(parsed.editor.font_size, FontSize::new(18).unwrap());
        assert_eq!(parsed.viewport, ViewportConfig::default());
    }

    #[test]
    fn test_unsupported_font_size_rejected() {
        let result: Result<Config, _> = toml::from_str("[editor]\nfont_size = 13\n");
        assert!(result.is_err());
        assert!(FontSize::new(13).is_none());
    }

    #[test]
    fn test_font_size_steps_saturate() {
        assert_eq!(FontSize::default().larger().px(), 16);
        assert_eq!(FontSize::default().smaller().px(), 12);
        assert_eq!(FontSize::ALL[5].larger(), FontSize::ALL[5]);
        assert_eq!(FontSize::ALL[0].smaller(), FontSize::ALL[0]);
    }

    #[test]
    fn test_theme_ids() {
        for theme in Theme::ALL {
            assert_eq!(theme.id().parse::<Theme>().unwrap(), theme);
        }
        assert!("monokai".parse::<Theme>().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.editor.theme = Theme::Light;
        config.download.ask_location = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
