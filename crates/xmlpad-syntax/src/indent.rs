//! Auto-indentation.

use crate::scan::{Scanner, TokenKind};

/// Indentation for a new line inserted at the cursor.
///
/// `before_cursor` is the text up to the cursor; only its last line
/// matters. The new line keeps that line's leading whitespace and gains one
/// `unit` when the line leaves an element open (or stops inside a tag).
pub fn next_line_indent(before_cursor: &str, unit: &str) -> String {
    let line = last_line(before_cursor);
    let mut indent = leading_whitespace(line).to_string();

    if opens_element(line) {
        indent.push_str(unit);
    }
    indent
}

/// Aligns a line starting with an end tag one unit to the left.
///
/// Returns `None` if the line does not start with `</` or has no unit of
/// indentation to remove.
pub fn dedent_closing_line(line: &str, unit: &str) -> Option<String> {
    let indent = leading_whitespace(line);
    let body = &line[indent.len()..];
    if !body.starts_with("</") || unit.is_empty() {
        return None;
    }

    let reduced = indent.strip_suffix(unit)?;
    Some(format!("{}{}", reduced, body))
}

fn last_line(text: &str) -> &str {
    match text.rfind('\n') {
        Some(i) => &text[i + 1..],
        None => text,
    }
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// True if the line opens more elements than it closes, or ends inside an
/// unterminated start tag.
fn opens_element(line: &str) -> bool {
    let mut balance: i32 = 0;
    let mut inside_tag = false;

    for token in Scanner::new(line) {
        inside_tag = false;
        match token.kind {
            TokenKind::StartTag if token.closed => balance += 1,
            TokenKind::StartTag => inside_tag = true,
            TokenKind::EndTag => balance = (balance - 1).max(0),
            _ => {}
        }
    }

    balance > 0 || inside_tag
}
