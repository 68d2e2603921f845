//! # xmlpad Syntax
//!
//! XML editing support for the editor panel. Everything here works on plain
//! `&str` and knows nothing about widgets.
//!
//! ## Tolerant vs. strict
//!
//! The text being edited is malformed most of the time (the user is typing).
//! [`scan`], [`fold`], [`pairs`] and [`indent`] never fail: they do their
//! best with whatever they are given. Only [`format`] is strict, because
//! reformatting broken markup would corrupt it.

pub mod fold;
pub mod format;
pub mod indent;
pub mod pairs;
pub mod scan;

pub use fold::{FoldKind, FoldRange, fold_ranges};
pub use format::format_xml;
pub use indent::{dedent_closing_line, next_line_indent};
pub use pairs::{TagPair, enclosing_open_tag, tag_pairs};
pub use scan::{Scanner, Token, TokenKind};

/// Errors that can occur while formatting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Malformed XML at byte {position}: {message}")]
    Malformed { position: usize, message: String },

    #[error("Unclosed element <{0}>")]
    Unclosed(String),

    #[error("No element found")]
    NoElement,

    #[error("Element mixes text with child markup")]
    MixedContent,

    #[error("Invalid indent unit {0:?}")]
    InvalidIndent(String),
}
