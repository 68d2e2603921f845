//! XML syntax highlighting for the text editor.
//!
//! iced highlights line by line and may restart from any line after an
//! edit. The highlighter records the lexer state at the start of every line
//! it has seen, so `change_line` resumes with the exact state instead of
//! guessing.

use iced::advanced::text::highlighter::{Format, Highlighter};
use iced::{Color, Font};
use std::ops::Range;
use xmlpad_core::Theme;

use crate::theme::{self, Palette};

/// Settings for the highlighter.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSettings {
    pub theme: Theme,
    /// Color tag brackets by nesting depth
    pub bracket_pairs: bool,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            bracket_pairs: true,
        }
    }
}

/// Format for highlighted text.
#[derive(Debug, Clone, Copy)]
pub struct HighlightFormat {
    pub color: Color,
}

impl HighlightFormat {
    pub fn to_format(self, _font: Font) -> Format<Font> {
        Format {
            color: Some(self.color),
            font: None,
        }
    }
}

/// Token kind used internally for classification.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    /// `<`, `</`, `>`, `/>` at a nesting depth
    Bracket(usize),
    TagName,
    Attribute,
    Value,
    Equals,
    Comment,
    CData,
    Declaration,
    Entity,
    Text,
}

impl TokenKind {
    fn color(self, palette: &Palette, bracket_pairs: bool) -> Color {
        let syntax = &palette.syntax;
        match self {
            Self::Bracket(depth) if bracket_pairs => palette.bracket(depth),
            Self::Bracket(_) | Self::Equals => syntax.delimiter,
            Self::TagName => syntax.tag,
            Self::Attribute => syntax.attribute,
            Self::Value => syntax.value,
            Self::Comment => syntax.comment,
            Self::CData => syntax.cdata,
            Self::Declaration => syntax.declaration,
            Self::Entity => syntax.entity,
            Self::Text => syntax.text,
        }
    }
}

/// Where the lexer is at a line boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Text,
    Comment,
    CData,
    /// `<?...?>` when `pi`, otherwise `<!...>`
    Declaration { pi: bool },
    /// Inside a tag after its name
    Tag { closing: bool },
    /// Inside a quoted attribute value
    Value { quote: u8, closing: bool },
}

/// Lexer state at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct LineState {
    mode: Mode,
    /// Number of open elements
    depth: usize,
}

#[derive(Debug, Clone)]
struct Span {
    range: Range<usize>,
    kind: TokenKind,
}

/// Syntax highlighter for the text editor.
pub struct EditorHighlighter {
    settings: HighlightSettings,
    palette: &'static Palette,
    /// `line_states[i]` is the state at the start of line `i`
    line_states: Vec<LineState>,
    state: LineState,
    spans: Vec<Span>,
    current_line_idx: usize,
}

impl Highlighter for EditorHighlighter {
    type Settings = HighlightSettings;
    type Highlight = HighlightFormat;
    type Iterator<'a> = std::vec::IntoIter<(Range<usize>, HighlightFormat)> where Self: 'a;

    fn new(settings: &Self::Settings) -> Self {
        Self {
            settings: settings.clone(),
            palette: theme::palette(settings.theme),
            line_states: vec![LineState::default()],
            state: LineState::default(),
            spans: Vec::new(),
            current_line_idx: 0,
        }
    }

    fn update(&mut self, new_settings: &Self::Settings) {
        // Colors only; lexer states stay valid
        self.settings = new_settings.clone();
        self.palette = theme::palette(new_settings.theme);
    }

    fn change_line(&mut self, line: usize) {
        let line = line.min(self.line_states.len() - 1);
        self.line_states.truncate(line + 1);
        self.state = self.line_states[line];
        self.current_line_idx = line;
    }

    fn highlight_line(&mut self, line: &str) -> Self::Iterator<'_> {
        self.spans.clear();
        self.tokenize_line(line);
        self.current_line_idx += 1;

        if self.line_states.len() == self.current_line_idx {
            self.line_states.push(self.state);
        } else if let Some(slot) = self.line_states.get_mut(self.current_line_idx) {
            *slot = self.state;
        }

        let palette = self.palette;
        let bracket_pairs = self.settings.bracket_pairs;
        self.spans
            .iter()
            .map(|s| {
                (
                    s.range.clone(),
                    HighlightFormat {
                        color: s.kind.color(palette, bracket_pairs),
                    },
                )
            })
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn current_line(&self) -> usize {
        self.current_line_idx
    }
}

impl EditorHighlighter {
    fn push(&mut self, range: Range<usize>, kind: TokenKind) {
        if !range.is_empty() {
            self.spans.push(Span { range, kind });
        }
    }

    /// Pushes a construct that ends with `terminator` starting at `start`,
    /// searching from `from`. Returns where scanning continues and whether
    /// the construct is still open at the end of the line.
    fn push_until(
        &mut self,
        line: &str,
        start: usize,
        from: usize,
        terminator: &str,
        kind: TokenKind,
    ) -> (usize, bool) {
        match line[from..].find(terminator) {
            Some(pos) => {
                let end = from + pos + terminator.len();
                self.push(start..end, kind);
                (end, false)
            }
            None => {
                self.push(start..line.len(), kind);
                (line.len(), true)
            }
        }
    }

    fn tokenize_line(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let len = bytes.len();
        let mut i = 0;

        while i < len {
            match self.state.mode {
                Mode::Comment => {
                    let (next, open) = self.push_until(line, i, i, "-->", TokenKind::Comment);
                    if !open {
                        self.state.mode = Mode::Text;
                    }
                    i = next;
                }
                Mode::CData => {
                    let (next, open) = self.push_until(line, i, i, "]]>", TokenKind::CData);
                    if !open {
                        self.state.mode = Mode::Text;
                    }
                    i = next;
                }
                Mode::Declaration { pi } => {
                    let terminator = if pi { "?>" } else { ">" };
                    let (next, open) =
                        self.push_until(line, i, i, terminator, TokenKind::Declaration);
                    if !open {
                        self.state.mode = Mode::Text;
                    }
                    i = next;
                }
                Mode::Value { quote, closing } => {
                    match bytes[i..].iter().position(|&b| b == quote) {
                        Some(pos) => {
                            self.push(i..i + pos + 1, TokenKind::Value);
                            self.state.mode = Mode::Tag { closing };
                            i += pos + 1;
                        }
                        None => {
                            self.push(i..len, TokenKind::Value);
                            i = len;
                        }
                    }
                }
                Mode::Tag { closing } => i = self.tokenize_tag(line, i, closing),
                Mode::Text => i = self.tokenize_text(line, i),
            }
        }
    }

    fn tokenize_tag(&mut self, line: &str, mut i: usize, closing: bool) -> usize {
        let bytes = line.as_bytes();
        let len = bytes.len();
        let depth = self.state.depth;

        match bytes[i] {
            b if b.is_ascii_whitespace() => {
                let start = i;
                while i < len && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                self.push(start..i, TokenKind::Text);
            }
            b'/' if line[i..].starts_with("/>") => {
                self.push(i..i + 2, TokenKind::Bracket(depth));
                self.state.mode = Mode::Text;
                i += 2;
            }
            b'>' => {
                self.push(i..i + 1, TokenKind::Bracket(depth));
                self.state.mode = Mode::Text;
                if !closing {
                    self.state.depth += 1;
                }
                i += 1;
            }
            b'=' => {
                self.push(i..i + 1, TokenKind::Equals);
                i += 1;
            }
            quote @ (b'"' | b'\'') => {
                self.push(i..i + 1, TokenKind::Value);
                self.state.mode = Mode::Value { quote, closing };
                i += 1;
            }
            // A new tag before this one closed; abandon it
            b'<' => self.state.mode = Mode::Text,
            _ => {
                let start = i;
                while i < len && !matches!(bytes[i], b' ' | b'\t' | b'\r' | b'=' | b'>' | b'/' | b'<' | b'"' | b'\'') {
                    i += 1;
                }
                if i == start {
                    // Lone '/'
                    i += 1;
                }
                self.push(start..i, TokenKind::Attribute);
            }
        }
        i
    }

    fn tokenize_text(&mut self, line: &str, mut i: usize) -> usize {
        let bytes = line.as_bytes();
        let len = bytes.len();
        let rest = &line[i..];

        if rest.starts_with("<!--") {
            let (next, open) = self.push_until(line, i, i + 4, "-->", TokenKind::Comment);
            if open {
                self.state.mode = Mode::Comment;
            }
            return next;
        }
        if rest.starts_with("<![CDATA[") {
            let (next, open) = self.push_until(line, i, i + 9, "]]>", TokenKind::CData);
            if open {
                self.state.mode = Mode::CData;
            }
            return next;
        }
        if rest.starts_with("<?") || rest.starts_with("<!") {
            let pi = rest.starts_with("<?");
            let terminator = if pi { "?>" } else { ">" };
            let (next, open) = self.push_until(line, i, i + 2, terminator, TokenKind::Declaration);
            if open {
                self.state.mode = Mode::Declaration { pi };
            }
            return next;
        }

        if bytes[i] == b'<' {
            let closing = rest.starts_with("</");
            let name_start = if closing { i + 2 } else { i + 1 };
            if name_start < len && is_name_start(bytes[name_start]) {
                if closing {
                    self.state.depth = self.state.depth.saturating_sub(1);
                }
                self.push(i..name_start, TokenKind::Bracket(self.state.depth));

                let mut end = name_start;
                while end < len && is_name_byte(bytes[end]) {
                    end += 1;
                }
                self.push(name_start..end, TokenKind::TagName);
                self.state.mode = Mode::Tag { closing };
                return end;
            }
        }

        if bytes[i] == b'&' {
            let end = rest[1..]
                .find(|c: char| c == ';' || c == '<' || c == '&' || c.is_whitespace())
                .map(|pos| i + 1 + pos);
            if let Some(end) = end.filter(|&end| bytes[end] == b';') {
                self.push(i..end + 1, TokenKind::Entity);
                return end + 1;
            }
        }

        // Plain text up to the next markup candidate
        let start = i;
        i += 1;
        while i < len && bytes[i] != b'<' && bytes[i] != b'&' {
            i += 1;
        }
        self.push(start..i, TokenKind::Text);
        i
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80
}

fn is_name_byte(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(highlighter: &mut EditorHighlighter, line: &str) -> Vec<(String, TokenKind)> {
        highlighter.spans.clear();
        highlighter.tokenize_line(line);
        highlighter
            .spans
            .iter()
            .map(|s| (line[s.range.clone()].to_string(), s.kind))
            .collect()
    }

    fn highlighter() -> EditorHighlighter {
        EditorHighlighter::new(&HighlightSettings::default())
    }

    #[test]
    fn test_tag_with_attribute() {
        let mut h = highlighter();
        let tokens = kinds(&mut h, "<item id=\"1\">");

        assert_eq!(
            tokens,
            vec![
                ("<".to_string(), TokenKind::Bracket(0)),
                ("item".to_string(), TokenKind::TagName),
                (" ".to_string(), TokenKind::Text),
                ("id".to_string(), TokenKind::Attribute),
                ("=".to_string(), TokenKind::Equals),
                ("\"".to_string(), TokenKind::Value),
                ("1\"".to_string(), TokenKind::Value),
                (">".to_string(), TokenKind::Bracket(0)),
            ]
        );
        assert_eq!(h.state.depth, 1);
    }

    #[test]
    fn test_bracket_depth_follows_nesting() {
        let mut h = highlighter();
        let tokens = kinds(&mut h, "<a><b/></a>");
        let brackets: Vec<_> = tokens
            .into_iter()
            .filter_map(|(text, kind)| match kind {
                TokenKind::Bracket(depth) => Some((text, depth)),
                _ => None,
            })
            .collect();

        assert_eq!(
            brackets,
            vec![
                ("<".to_string(), 0),
                (">".to_string(), 0),
                ("<".to_string(), 1),
                ("/>".to_string(), 1),
                ("</".to_string(), 0),
                (">".to_string(), 0),
            ]
        );
        assert_eq!(h.state.depth, 0);
    }

    #[test]
    fn test_multiline_comment_state() {
        let mut h = highlighter();
        kinds(&mut h, "<!-- start");
        assert_eq!(h.state.mode, Mode::Comment);

        let tokens = kinds(&mut h, "end --> <a>");
        assert_eq!(tokens[0], ("end -->".to_string(), TokenKind::Comment));
        assert_eq!(h.state.mode, Mode::Text);
    }

    #[test]
    fn test_entities_and_text() {
        let mut h = highlighter();
        let tokens = kinds(&mut h, "a &amp; b & c");
        assert_eq!(tokens[1], ("&amp;".to_string(), TokenKind::Entity));
        assert!(tokens.iter().all(|(_, kind)| *kind != TokenKind::TagName));
    }

    #[test]
    fn test_change_line_restores_state() {
        let mut h = highlighter();
        let _ = h.highlight_line("<root>");
        let _ = h.highlight_line("<!-- open");
        let _ = h.highlight_line("still comment");
        assert_eq!(h.current_line(), 3);

        h.change_line(1);
        assert_eq!(h.current_line(), 1);
        assert_eq!(h.state, LineState { mode: Mode::Text, depth: 1 });

        // Lines past the last known state restart from it
        h.change_line(10);
        assert_eq!(h.current_line(), 1);
    }

    #[test]
    fn test_spans_stay_on_char_boundaries() {
        let mut h = highlighter();
        let line = "<é attr='ü'>ß &x; <";
        for (text, _) in kinds(&mut h, line) {
            assert!(!text.is_empty());
        }
    }
}
