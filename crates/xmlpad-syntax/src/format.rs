//! Pretty printer.
//!
//! Re-indents a complete XML fragment: one element per line, indented by
//! nesting depth. Elements with only text content stay on one line and
//! keep their text byte for byte. Unlike the rest of this crate the
//! formatter is strict; anything quick-xml cannot read, and any element
//! mixing text with child markup, is an error and the caller keeps the
//! original text.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesText, Event};

use crate::SyntaxError;

/// What an element (or the document level) holds directly.
#[derive(Debug, Default, Clone, Copy)]
struct Holds {
    text: bool,
    markup: bool,
}

/// Formats `text` using `unit` (spaces or tabs) as one indentation level.
pub fn format_xml(text: &str, unit: &str) -> Result<String, SyntaxError> {
    let (indent_char, indent_size) = indent_style(unit)?;

    let mut reader = Reader::from_str(text);

    // Each event is tagged with the index of its container in `holds`;
    // index 0 is the document level, where only markup belongs.
    let mut events: Vec<(Event<'_>, usize)> = Vec::new();
    let mut holds = vec![Holds {
        text: false,
        markup: true,
    }];
    let mut open: Vec<(String, usize)> = Vec::new();
    let mut elements = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| SyntaxError::Malformed {
            position: reader.buffer_position(),
            message: e.to_string(),
        })?;
        let container = open.last().map_or(0, |(_, index)| *index);

        match &event {
            Event::Start(e) => {
                elements += 1;
                holds[container].markup = true;
                holds.push(Holds::default());
                open.push((
                    String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    holds.len() - 1,
                ));
            }
            Event::Empty(_) => {
                elements += 1;
                holds[container].markup = true;
            }
            Event::End(e) => {
                if open.pop().is_none() {
                    return Err(SyntaxError::Malformed {
                        position: reader.buffer_position(),
                        message: format!(
                            "unexpected </{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        ),
                    });
                }
            }
            Event::Text(e) if !is_blank(e) => holds[container].text = true,
            Event::CData(_) => holds[container].text = true,
            Event::Comment(_) | Event::PI(_) => holds[container].markup = true,
            Event::Eof => break,
            _ => {}
        }

        events.push((event, container));
    }

    if let Some((name, _)) = open.pop() {
        return Err(SyntaxError::Unclosed(name));
    }
    if elements == 0 {
        return Err(SyntaxError::NoElement);
    }
    if holds.iter().any(|h| h.text && h.markup) {
        return Err(SyntaxError::MixedContent);
    }

    let mut writer = Writer::new_with_indent(Vec::new(), indent_char, indent_size);
    for (event, container) in events {
        // Blank text between markup is layout, the writer supplies its own
        if let Event::Text(e) = &event {
            if is_blank(e) && holds[container].markup {
                continue;
            }
        }
        writer
            .write_event(event)
            .map_err(|e| SyntaxError::Malformed {
                position: text.len(),
                message: e.to_string(),
            })?;
    }

    let mut formatted =
        String::from_utf8(writer.into_inner()).map_err(|e| SyntaxError::Malformed {
            position: e.utf8_error().valid_up_to(),
            message: e.to_string(),
        })?;
    if text.ends_with('\n') {
        formatted.push('\n');
    }

    tracing::trace!("Formatted {} elements", elements);
    Ok(formatted)
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn indent_style(unit: &str) -> Result<(u8, usize), SyntaxError> {
    match unit.as_bytes().first() {
        Some(&c) if (c == b' ' || c == b'\t') && unit.bytes().all(|b| b == c) => {
            Ok((c, unit.len()))
        }
        _ => Err(SyntaxError::InvalidIndent(unit.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reindents_nested_elements() {
        let formatted = format_xml("<a><b>x</b><c/></a>", "  ").unwrap();
        assert_eq!(formatted, "<a>\n  <b>x</b>\n  <c/>\n</a>");
    }

    #[test]
    fn test_normalizes_existing_whitespace() {
        let text = "<root>\n        <item id=\"1\">one</item>\n<item id=\"2\"/>\n</root>\n";
        let formatted = format_xml(text, "\t").unwrap();
        assert_eq!(
            formatted,
            "<root>\n\t<item id=\"1\">one</item>\n\t<item id=\"2\"/>\n</root>\n"
        );
    }

    #[test]
    fn test_keeps_declaration_and_comments() {
        let formatted = format_xml("<?xml version=\"1.0\"?><a><!-- note --><b/></a>", "  ").unwrap();
        assert_eq!(
            formatted,
            "<?xml version=\"1.0\"?>\n<a>\n  <!-- note -->\n  <b/>\n</a>"
        );
    }

    #[test]
    fn test_text_content_is_kept_verbatim() {
        let formatted = format_xml("<a><b>  two  spaces </b><c> </c></a>", "  ").unwrap();
        assert_eq!(formatted, "<a>\n  <b>  two  spaces </b>\n  <c> </c>\n</a>");
    }

    #[test]
    fn test_rejects_mixed_content() {
        assert_eq!(
            format_xml("<doc><p>Hello <b>world</b> again</p></doc>", "  "),
            Err(SyntaxError::MixedContent)
        );
        assert_eq!(
            format_xml("<p>note<!-- c --></p>", "  "),
            Err(SyntaxError::MixedContent)
        );
        assert_eq!(
            format_xml("text before <a/>", "  "),
            Err(SyntaxError::MixedContent)
        );
    }

    #[test]
    fn test_rejects_mismatched_end_tag() {
        assert!(matches!(
            format_xml("<a><b></a>", "  "),
            Err(SyntaxError::Malformed { .. })
        ));
    }

    #[test]
    fn test_rejects_unclosed_element() {
        assert_eq!(
            format_xml("<a><b></b>", "  "),
            Err(SyntaxError::Unclosed("a".to_string()))
        );
    }

    #[test]
    fn test_rejects_plain_text() {
        assert_eq!(format_xml("just some text", "  "), Err(SyntaxError::NoElement));
        assert_eq!(format_xml("", "  "), Err(SyntaxError::NoElement));
    }

    #[test]
    fn test_rejects_bad_indent_unit() {
        assert!(matches!(
            format_xml("<a/>", ""),
            Err(SyntaxError::InvalidIndent(_))
        ));
        assert!(matches!(
            format_xml("<a/>", " \t"),
            Err(SyntaxError::InvalidIndent(_))
        ));
    }
}
