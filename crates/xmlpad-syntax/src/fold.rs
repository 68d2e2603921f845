//! Folding ranges.
//!
//! A fold covers a multi-line element (start tag line to end tag line) or a
//! multi-line comment or CDATA section. Single-line constructs don't fold.

use crate::scan::{Scanner, TokenKind};

/// What a fold covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldKind {
    Element,
    Comment,
    CData,
}

/// A foldable line range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRange {
    pub kind: FoldKind,
    /// Zero-based, inclusive
    pub start_line: usize,
    /// Zero-based, inclusive
    pub end_line: usize,
    /// Element name or a short comment excerpt
    pub label: String,
    /// Number of enclosing element folds
    pub depth: usize,
}

impl FoldRange {
    /// Number of lines hidden when folded.
    pub fn hidden_lines(&self) -> usize {
        self.end_line - self.start_line
    }
}

const LABEL_LIMIT: usize = 32;

/// Computes fold ranges, ordered by start line (outer folds first).
///
/// End tags are matched against the innermost open element with the same
/// name. Unmatched end tags are ignored and elements left open never fold.
pub fn fold_ranges(text: &str) -> Vec<FoldRange> {
    let mut ranges = Vec::new();
    let mut open: Vec<(String, usize)> = Vec::new();

    for token in Scanner::new(text) {
        match token.kind {
            TokenKind::StartTag if token.closed => open.push((token.name, token.line)),
            TokenKind::EndTag => {
                let Some(index) = open.iter().rposition(|(name, _)| *name == token.name) else {
                    continue;
                };
                let (name, start_line) = open.swap_remove(index);
                open.truncate(index);
                if token.line > start_line {
                    ranges.push(FoldRange {
                        kind: FoldKind::Element,
                        start_line,
                        end_line: token.line,
                        label: name,
                        depth: index,
                    });
                }
            }
            TokenKind::Comment | TokenKind::CData if token.end_line > token.line => {
                let (kind, label) = if token.kind == TokenKind::Comment {
                    (FoldKind::Comment, comment_label(&text[token.span.clone()]))
                } else {
                    (FoldKind::CData, "CDATA".to_string())
                };
                ranges.push(FoldRange {
                    kind,
                    start_line: token.line,
                    end_line: token.end_line,
                    label,
                    depth: open.len(),
                });
            }
            _ => {}
        }
    }

    ranges.sort_by(|a, b| {
        a.start_line
            .cmp(&b.start_line)
            .then(b.end_line.cmp(&a.end_line))
    });
    ranges
}

fn comment_label(comment: &str) -> String {
    let body = comment
        .trim_start_matches("<!--")
        .trim_end_matches("-->")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if body.chars().count() > LABEL_LIMIT {
        let cut: String = body.chars().take(LABEL_LIMIT).collect();
        format!("{}...", cut.trim_end())
    } else if body.is_empty() {
        "comment".to_string()
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_nested_elements() {
        let text = "<root>\n  <a>\n    <b>x</b>\n  </a>\n</root>\n";
        let ranges = fold_ranges(text);

        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].label, "root");
        assert_eq!((ranges[0].start_line, ranges[0].end_line), (0, 4));
        assert_eq!(ranges[0].depth, 0);
        assert_eq!(ranges[1].label, "a");
        assert_eq!((ranges[1].start_line, ranges[1].end_line), (1, 3));
        assert_eq!(ranges[1].depth, 1);
        assert_eq!(ranges[1].hidden_lines(), 2);
    }

    #[test]
    fn test_single_line_elements_do_not_fold() {
        assert!(fold_ranges("<a><b/></a>").is_empty());
    }

    #[test]
    fn test_multiline_comment() {
        let ranges = fold_ranges("<!--\n  license   text\n-->\n<a/>");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].kind, FoldKind::Comment);
        assert_eq!(ranges[0].label, "license text");
        assert_eq!(ranges[0].end_line, 2);
    }

    #[test]
    fn test_mismatched_end_tag_closes_inner_elements() {
        // </a> closes the unterminated <b> along with <a>
        let text = "<a>\n<b>\n</a>\n</b>";
        let ranges = fold_ranges(text);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].label, "a");
        assert_eq!(ranges[0].end_line, 2);
    }

    #[test]
    fn test_unclosed_element_does_not_fold() {
        assert!(fold_ranges("<a>\n<b>\n</b>x").len() == 1);
        assert!(fold_ranges("<a>\n\n").is_empty());
    }

    proptest! {
        #[test]
        fn ranges_are_well_formed(text in "(<a>|</a>|<b>|</b>|<!--|-->|\n|x){0,40}") {
            let ranges = fold_ranges(&text);
            let lines = text.matches('\n').count();
            for range in &ranges {
                prop_assert!(range.start_line < range.end_line);
                prop_assert!(range.end_line <= lines);
            }
            for pair in ranges.windows(2) {
                prop_assert!(pair[0].start_line <= pair[1].start_line);
            }
        }
    }
}
