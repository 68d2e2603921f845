//! # XML Pad UI
//!
//! Desktop front end for the XML editor panel, built on iced.
//!
//! ## Architecture
//!
//! The UI follows the Elm architecture:
//! - **Model**: `App`, which owns the `EditorPanel` and the iced widget host
//! - **Message**: toolbar, editor and async results
//! - **Update**: routes messages into panel operations
//! - **View**: toolbar, editor, structure panel, status bar, alert modal
//!
//! Panel events come back over a broadcast channel and end up in the
//! status bar.

pub mod app;
pub mod highlighter;
pub mod theme;

pub use app::{App, Flags, run};
