//! Color palettes for the three editor themes.
//!
//! Each `xmlpad_core::Theme` maps to one static `Palette` covering the
//! chrome (toolbar, panels, status bar), the editor surface and the XML
//! token colors used by the highlighter.

use iced::Color;
use xmlpad_core::Theme;

/// Background colors.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundColors {
    /// Editor surface
    pub editor: Color,
    /// Toolbar and status bar
    pub chrome: Color,
    /// Side panels (structure, minimap)
    pub panel: Color,
    pub hover: Color,
    pub active: Color,
    pub selection: Color,
}

/// Foreground (text) colors.
#[derive(Debug, Clone, Copy)]
pub struct ForegroundColors {
    pub primary: Color,
    pub secondary: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
}

/// XML token colors.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxColors {
    pub tag: Color,
    pub attribute: Color,
    pub value: Color,
    pub delimiter: Color,
    pub comment: Color,
    pub cdata: Color,
    pub declaration: Color,
    pub entity: Color,
    pub text: Color,
}

/// Everything needed to paint one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    pub background: BackgroundColors,
    pub foreground: ForegroundColors,
    pub border: Color,
    pub syntax: SyntaxColors,
    /// Tag bracket colors cycled by nesting depth
    pub brackets: [Color; 3],
}

const fn rgb(hex: u32) -> Color {
    Color {
        r: ((hex >> 16) & 0xff) as f32 / 255.0,
        g: ((hex >> 8) & 0xff) as f32 / 255.0,
        b: (hex & 0xff) as f32 / 255.0,
        a: 1.0,
    }
}

const fn rgba(hex: u32, a: f32) -> Color {
    let c = rgb(hex);
    Color { a, ..c }
}

pub const DARK: Palette = Palette {
    name: "vs-dark",
    background: BackgroundColors {
        editor: rgb(0x1e1e1e),
        chrome: rgb(0x252526),
        panel: rgb(0x1b1b1c),
        hover: rgb(0x2a2d2e),
        active: rgb(0x37373d),
        selection: rgba(0x264f78, 0.9),
    },
    foreground: ForegroundColors {
        primary: rgb(0xd4d4d4),
        secondary: rgb(0xa0a0a0),
        muted: rgb(0x6e6e6e),
        accent: rgb(0x3794ff),
        error: rgb(0xf48771),
    },
    border: rgb(0x3c3c3c),
    syntax: SyntaxColors {
        tag: rgb(0x569cd6),
        attribute: rgb(0x9cdcfe),
        value: rgb(0xce9178),
        delimiter: rgb(0x808080),
        comment: rgb(0x6a9955),
        cdata: rgb(0xd7ba7d),
        declaration: rgb(0xc586c0),
        entity: rgb(0x4ec9b0),
        text: rgb(0xd4d4d4),
    },
    brackets: [rgb(0xffd700), rgb(0xda70d6), rgb(0x179fff)],
};

pub const LIGHT: Palette = Palette {
    name: "light",
    background: BackgroundColors {
        editor: rgb(0xffffff),
        chrome: rgb(0xf3f3f3),
        panel: rgb(0xf8f8f8),
        hover: rgb(0xe8e8e8),
        active: rgb(0xe4e6f1),
        selection: rgba(0xadd6ff, 0.9),
    },
    foreground: ForegroundColors {
        primary: rgb(0x000000),
        secondary: rgb(0x424242),
        muted: rgb(0x8e8e8e),
        accent: rgb(0x005fb8),
        error: rgb(0xc72e0f),
    },
    border: rgb(0xd4d4d4),
    syntax: SyntaxColors {
        tag: rgb(0x800000),
        attribute: rgb(0xe50000),
        value: rgb(0x0000ff),
        delimiter: rgb(0x800000),
        comment: rgb(0x008000),
        cdata: rgb(0x795e26),
        declaration: rgb(0xaf00db),
        entity: rgb(0x267f99),
        text: rgb(0x000000),
    },
    brackets: [rgb(0x0431fa), rgb(0x319331), rgb(0x7b3814)],
};

pub const HIGH_CONTRAST: Palette = Palette {
    name: "hc-black",
    background: BackgroundColors {
        editor: rgb(0x000000),
        chrome: rgb(0x000000),
        panel: rgb(0x000000),
        hover: rgb(0x1a1a1a),
        active: rgb(0x0f4a85),
        selection: rgba(0xffffff, 0.35),
    },
    foreground: ForegroundColors {
        primary: rgb(0xffffff),
        secondary: rgb(0xffffff),
        muted: rgb(0xc0c0c0),
        accent: rgb(0xf38518),
        error: rgb(0xf48771),
    },
    border: rgb(0x6fc3df),
    syntax: SyntaxColors {
        tag: rgb(0x569cd6),
        attribute: rgb(0x9cdcfe),
        value: rgb(0xce9178),
        delimiter: rgb(0xffffff),
        comment: rgb(0x7ca668),
        cdata: rgb(0xd7ba7d),
        declaration: rgb(0xc586c0),
        entity: rgb(0x4ec9b0),
        text: rgb(0xffffff),
    },
    brackets: [rgb(0xffd700), rgb(0xda70d6), rgb(0x87cefa)],
};

/// Returns the palette for a theme.
pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Dark => &DARK,
        Theme::Light => &LIGHT,
        Theme::HighContrast => &HIGH_CONTRAST,
    }
}

impl Palette {
    /// Builds the iced theme used for built-in widgets (pick lists, scrollbars).
    pub fn iced_theme(&self) -> iced::Theme {
        iced::Theme::custom(
            self.name.to_string(),
            iced::theme::Palette {
                background: self.background.chrome,
                text: self.foreground.primary,
                primary: self.foreground.accent,
                success: self.syntax.comment,
                danger: self.foreground.error,
            },
        )
    }

    pub fn bracket(&self, depth: usize) -> Color {
        self.brackets[depth % self.brackets.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_has_a_palette() {
        for theme in Theme::ALL {
            assert_eq!(palette(theme).name, theme.id());
        }
    }

    #[test]
    fn test_hex_conversion() {
        let c = rgb(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(rgba(0x000000, 0.5).a, 0.5);
    }

    #[test]
    fn test_bracket_colors_cycle() {
        assert_eq!(DARK.bracket(0), DARK.bracket(3));
        assert_ne!(DARK.bracket(0), DARK.bracket(1));
    }
}
