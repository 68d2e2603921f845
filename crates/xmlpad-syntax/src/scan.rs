//! Tolerant XML tokenizer.
//!
//! The scanner splits text into markup and character data. It never fails:
//! a construct missing its terminator runs to the end of the input and is
//! marked `closed: false`, and a `<` that cannot start markup is text.
//! Token spans tile the input exactly, in order.

use std::ops::Range;

/// Kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<name ...>`
    StartTag,
    /// `</name>`
    EndTag,
    /// `<name ... />`
    EmptyTag,
    /// `<!-- ... -->`
    Comment,
    /// `<![CDATA[ ... ]]>`
    CData,
    /// `<? ... ?>`
    ProcessingInstruction,
    /// `<!DOCTYPE ...>` and other `<!` declarations
    Doctype,
    /// Character data between markup
    Text,
}

/// A token with its position in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range in the scanned text
    pub span: Range<usize>,
    /// Zero-based line of the first byte
    pub line: usize,
    /// Zero-based line of the last byte
    pub end_line: usize,
    /// Element name for tags, empty otherwise
    pub name: String,
    /// False if the input ended before the terminator
    pub closed: bool,
}

/// Iterator over the tokens of a text.
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 0,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Returns the end of a construct terminated by `terminator`, searching
    /// from `from`. Unterminated constructs end at the end of the input.
    fn find_terminator(&self, from: usize, terminator: &str) -> (usize, bool) {
        match self.text[from..].find(terminator) {
            Some(i) => (from + i + terminator.len(), true),
            None => (self.text.len(), false),
        }
    }

    /// Finds the `>` closing a tag, skipping quoted attribute values. An
    /// unbalanced quote falls back to the first `>`.
    fn find_tag_end(&self, from: usize) -> (usize, bool) {
        let bytes = self.bytes();
        let mut quote: Option<u8> = None;
        let mut i = from;
        while i < bytes.len() {
            let b = bytes[i];
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b == b'>' => return (i + 1, true),
                None if b == b'<' => return (i, false),
                None => {}
            }
            i += 1;
        }
        if quote.is_some() {
            return self.find_terminator(from, ">");
        }
        (bytes.len(), false)
    }

    fn read_name(&self, from: usize) -> &'a str {
        let bytes = self.bytes();
        let mut end = from;
        while end < bytes.len() && is_name_byte(bytes[end]) {
            end += 1;
        }
        &self.text[from..end]
    }

    fn scan_markup(&self) -> Option<(TokenKind, usize, bool, &'a str)> {
        let rest = self.rest();
        let start = self.pos;

        if rest.starts_with("<!--") {
            let (end, closed) = self.find_terminator(start + 4, "-->");
            return Some((TokenKind::Comment, end, closed, ""));
        }
        if rest.starts_with("<![CDATA[") {
            let (end, closed) = self.find_terminator(start + 9, "]]>");
            return Some((TokenKind::CData, end, closed, ""));
        }
        if rest.starts_with("<?") {
            let (end, closed) = self.find_terminator(start + 2, "?>");
            return Some((TokenKind::ProcessingInstruction, end, closed, ""));
        }
        if rest.starts_with("<!") {
            let (end, closed) = self.find_tag_end(start + 2);
            return Some((TokenKind::Doctype, end, closed, ""));
        }
        if rest.starts_with("</") {
            let name = self.read_name(start + 2);
            let (end, closed) = self.find_tag_end(start + 2);
            return Some((TokenKind::EndTag, end, closed, name));
        }

        let first = *self.bytes().get(start + 1)?;
        if !is_name_start(first) {
            return None;
        }
        let name = self.read_name(start + 1);
        let (end, closed) = self.find_tag_end(start + 1);
        let kind = if closed && self.text[..end].ends_with("/>") {
            TokenKind::EmptyTag
        } else {
            TokenKind::StartTag
        };
        Some((kind, end, closed, name))
    }

    /// End of the text run starting at the current position. A leading `<`
    /// that cannot start markup belongs to the run.
    fn text_end(&self) -> usize {
        let bytes = self.bytes();
        let mut i = self.pos + 1;
        while i < bytes.len() && bytes[i] != b'<' {
            i += 1;
        }
        i
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.text.len() {
            return None;
        }

        let start = self.pos;
        let (kind, end, closed, name) = if self.bytes()[start] == b'<' {
            match self.scan_markup() {
                Some((kind, end, closed, name)) if end > start => (kind, end, closed, name),
                _ => (TokenKind::Text, self.text_end(), true, ""),
            }
        } else {
            (TokenKind::Text, self.text_end(), true, "")
        };

        let newlines = self.text[start..end].bytes().filter(|&b| b == b'\n').count();
        let end_newlines = if self.text[..end].ends_with('\n') && newlines > 0 {
            newlines - 1
        } else {
            newlines
        };
        let token = Token {
            kind,
            span: start..end,
            line: self.line,
            end_line: self.line + end_newlines,
            name: name.to_string(),
            closed,
        };

        self.pos = end;
        self.line += newlines;
        Some(token)
    }
}

/// Scans a whole text.
pub fn tokenize(text: &str) -> Vec<Token> {
    Scanner::new(text).collect()
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
    use proptest::prelude::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_document() {
        let tokens = tokenize("<?xml version=\"1.0\"?>\n<root a=\"1\"><leaf/>text</root>");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();

        assert_eq!(
            kinds,
            vec![
                TokenKind::ProcessingInstruction,
                TokenKind::Text,
                TokenKind::StartTag,
                TokenKind::EmptyTag,
                TokenKind::Text,
                TokenKind::EndTag,
            ]
        );
        assert_eq!(tokens[2].name, "root");
        assert_eq!(tokens[2].line, 1);
        assert_eq!(tokens[3].name, "leaf");
        assert_eq!(tokens[5].name, "root");
        assert!(tokens.iter().all(|t| t.closed));
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        let tokens = tokenize("<a title=\"x > y\">");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::StartTag);
        assert!(tokens[0].closed);
    }

    #[test]
    fn test_comment_cdata_doctype() {
        assert_eq!(
            kinds("<!DOCTYPE note><!-- <a> --><![CDATA[<b>]]>"),
            vec![TokenKind::Doctype, TokenKind::Comment, TokenKind::CData]
        );
    }

    #[test]
    fn test_stray_lt_is_text() {
        assert_eq!(kinds("1 < 2"), vec![TokenKind::Text]);
        assert_eq!(kinds("a <1 b"), vec![TokenKind::Text, TokenKind::Text]);
        assert_eq!(kinds("<"), vec![TokenKind::Text]);
    }

    #[test]
    fn test_unterminated_constructs() {
        let tokens = tokenize("<a><!-- never closed");
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert!(!tokens[1].closed);

        let tokens = tokenize("<root attr=\"1");
        assert_eq!(tokens[0].kind, TokenKind::StartTag);
        assert_eq!(tokens[0].name, "root");
        assert!(!tokens[0].closed);

        let tokens = tokenize("</");
        assert_eq!(tokens[0].kind, TokenKind::EndTag);
        assert_eq!(tokens[0].name, "");
        assert!(!tokens[0].closed);
    }

    #[test]
    fn test_tag_interrupted_by_new_tag() {
        let tokens = tokenize("<a <b>");
        assert_eq!(tokens[0].kind, TokenKind::StartTag);
        assert!(!tokens[0].closed);
        assert_eq!(tokens[1].name, "b");
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("<a>\n  <!--\n  -->\n</a>\n");
        let comment = tokens.iter().find(|t| t.kind == TokenKind::Comment).unwrap();
        assert_eq!(comment.line, 1);
        assert_eq!(comment.end_line, 2);
        let end = tokens.iter().find(|t| t.kind == TokenKind::EndTag).unwrap();
        assert_eq!(end.line, 3);
    }

    proptest! {
        #[test]
        fn spans_tile_the_input(text in "[<>/!?a-c \"'\\-\\[\\]\n]{0,64}") {
            let tokens = tokenize(&text);
            let mut pos = 0;
            for token in &tokens {
                prop_assert_eq!(token.span.start, pos);
                prop_assert!(token.span.end > token.span.start);
                prop_assert!(token.end_line >= token.line);
                pos = token.span.end;
            }
            prop_assert_eq!(pos, text.len());
        }

        #[test]
        fn never_panics_on_unicode(text in "\\PC{0,48}") {
            let total: usize = tokenize(&text).iter().map(|t| t.span.len()).sum();
            prop_assert_eq!(total, text.len());
        }
    }
}
