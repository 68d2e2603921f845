//! # xmlpad Core
//!
//! State and behavior of the XML editor panel, independent of any GUI toolkit.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      EditorPanel                          │
//! │  ┌──────────┐  ┌──────────────────┐  ┌────────────────┐  │
//! │  │  Buffer  │  │  EditorSettings  │  │    EventBus    │  │
//! │  └──────────┘  └──────────────────┘  └────────────────┘  │
//! │        │                │                                 │
//! │  ┌─────┴────────────────┴─────┐                           │
//! │  │   EditorHost (the widget)  │                           │
//! │  └────────────────────────────┘                           │
//! └──────────────────────────────────────────────────────────┘
//!        ▲ upload (PendingFile)      │ download (DownloadSink)
//!        │                           ▼ copy (ClipboardWriter)
//! ```
//!
//! Collaborators that talk to the outside world (file picker, clipboard,
//! download target, alert surface) are traits. The panel owns its host and
//! borrows every other collaborator for the duration of one operation.

pub mod alert;
pub mod clipboard;
pub mod config;
pub mod event;
pub mod exchange;
pub mod host;
pub mod panel;
pub mod viewport;

pub use alert::{Alert, AlertQueue};
pub use clipboard::{ClipboardError, ClipboardWriter};
pub use config::{Config, EditorOptions, FontSize, Theme};
pub use event::{EventBus, PanelEvent};
pub use exchange::{
    DiskFile, DownloadPayload, DownloadReceipt, DownloadSink, ExchangeError, PendingFile, PendingUpload,
    UploadOutcome, UploadResolution, UploadState, UploadTicket, XML_CONTENT_TYPE,
};
pub use host::{EditorHost, HostBinding, MemoryHost};
pub use panel::{EditorPanel, EditorSettings};
pub use viewport::{HeightPreset, Viewport};

