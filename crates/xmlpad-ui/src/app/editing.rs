//! Editing assists: auto-indent, format on paste, closing tag completion.
//!
//! These decide what to insert; `update` turns the decision into widget
//! actions.

use xmlpad_core::config::AutoIndent;
use xmlpad_syntax::{dedent_closing_line, enclosing_open_tag, format_xml, next_line_indent};

/// What Enter should insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterPlan {
    /// A bare line break
    Plain,
    /// A line break followed by this indentation
    Indent(String),
    /// Cursor between `<a>` and `</a>`: an indented empty line for the
    /// cursor, then the end tag on its own line at `outer`
    Split { inner: String, outer: String },
}

/// Plans an Enter keypress.
///
/// `before` is the document text up to the cursor, `after` the rest of the
/// cursor line.
pub fn plan_enter(mode: AutoIndent, before: &str, after: &str, unit: &str) -> EnterPlan {
    let line = before.rsplit('\n').next().unwrap_or(before);
    let base: String = line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();

    let indent = match mode {
        AutoIndent::None => return EnterPlan::Plain,
        AutoIndent::Keep => base.clone(),
        AutoIndent::Advanced => next_line_indent(before, unit),
    };

    let after = after.trim_start();
    if mode == AutoIndent::Advanced && after.starts_with("</") && indent.len() > base.len() {
        return EnterPlan::Split {
            inner: indent,
            outer: base,
        };
    }
    if mode == AutoIndent::Advanced && after.starts_with("</") {
        let dedented = dedent_closing_line(&format!("{}{}", indent, after), unit)
            .map(|line| line[..line.len() - after.len()].to_string());
        if let Some(dedented) = dedented {
            return to_plan(dedented);
        }
    }
    to_plan(indent)
}

fn to_plan(indent: String) -> EnterPlan {
    if indent.is_empty() {
        EnterPlan::Plain
    } else {
        EnterPlan::Indent(indent)
    }
}

/// Reformats pasted XML.
///
/// Returns `None` (paste verbatim) unless the text is a complete XML
/// fragment spanning or producing several lines. Continuation lines are
/// shifted to the indentation of the line being pasted into.
pub fn format_paste(pasted: &str, line_before: &str, unit: &str) -> Option<String> {
    if !pasted.contains('<') {
        return None;
    }
    let formatted = format_xml(pasted, unit).ok()?;
    if !formatted.trim_end().contains('\n') {
        return None;
    }

    let base: String = line_before
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();

    let mut lines = formatted.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&base);
        }
        out.push_str(line);
    }
    if formatted.ends_with('\n') {
        out.push('\n');
    }
    Some(out)
}

/// Text completing an end tag right after the user typed `</`.
pub fn complete_closing_tag(before: &str) -> Option<String> {
    if !before.ends_with("</") {
        return None;
    }
    enclosing_open_tag(before, before.len()).map(|name| format!("{}>", name))
}
