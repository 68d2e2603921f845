//! Start/end tag matching.

use std::ops::Range;

use crate::scan::{Scanner, TokenKind};

/// A matched start tag and end tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    pub name: String,
    pub open: Range<usize>,
    pub close: Range<usize>,
    /// Nesting depth of the element, 0 for the root
    pub depth: usize,
}

/// Matches start tags with end tags, ordered by end tag position.
///
/// An end tag matches the innermost open element with the same name and
/// implicitly closes anything opened after it.
pub fn tag_pairs(text: &str) -> Vec<TagPair> {
    let mut pairs = Vec::new();
    let mut open: Vec<(String, Range<usize>)> = Vec::new();

    for token in Scanner::new(text) {
        match token.kind {
            TokenKind::StartTag if token.closed => open.push((token.name, token.span)),
            TokenKind::EndTag if token.closed => {
                if let Some(index) = open.iter().rposition(|(name, _)| *name == token.name) {
                    let (name, span) = open.swap_remove(index);
                    open.truncate(index);
                    pairs.push(TagPair {
                        name,
                        open: span,
                        close: token.span,
                        depth: index,
                    });
                }
            }
            _ => {}
        }
    }

    pairs
}

/// Name of the innermost element still open at byte `offset`.
///
/// Tokens that end past `offset` or were never terminated are ignored, so
/// a half-typed `</` right before the cursor doesn't count.
pub fn enclosing_open_tag(text: &str, offset: usize) -> Option<String> {
    let offset = floor_char_boundary(text, offset);
    let mut open: Vec<String> = Vec::new();

    for token in Scanner::new(&text[..offset]) {
        if !token.closed {
            continue;
        }
        match token.kind {
            TokenKind::StartTag => open.push(token.name),
            TokenKind::EndTag => {
                if let Some(index) = open.iter().rposition(|name| *name == token.name) {
                    open.truncate(index);
                }
            }
            _ => {}
        }
    }

    open.pop().filter(|name| !name.is_empty())
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
