use iced::keyboard;
use iced::widget::text_editor;
use std::path::PathBuf;

use xmlpad_core::{DiskFile, FontSize, Theme, UploadOutcome};

#[derive(Debug, Clone)]
pub enum Message {
    // Editor
    EditorAction(text_editor::Action),

    // Toolbar selectors
    ThemeSelected(Theme),
    FontSizeSelected(FontSize),

    // Upload
    Upload,
    UploadPicked(Option<DiskFile>),
    UploadRead(UploadOutcome),

    // Download
    Download,
    DownloadLocationPicked(Option<PathBuf>),
    DownloadNameChanged(String),

    // Buffer
    Clear,
    CopyAll,

    // Alert modal
    DismissAlert,

    // Structure panel
    ToggleStructure,
    JumpToLine(usize),

    // Window
    WindowResized(iced::Size),
    KeyPressed(keyboard::Key, keyboard::Modifiers),
}
