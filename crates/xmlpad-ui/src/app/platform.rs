//! Desktop implementations of the panel's collaborator traits.

use std::io::Write;
use std::path::{Path, PathBuf};

use iced::widget::text_editor;
use tempfile::NamedTempFile;
use xmlpad_core::{
    ClipboardError, ClipboardWriter, DiskFile, DownloadPayload, DownloadSink, EditorHost,
    ExchangeError, HostBinding,
};

// ==================== Editor host ====================

/// The iced text editor as seen by the panel.
pub struct IcedHost {
    content: text_editor::Content,
    /// The widget drops the final line break, so it is tracked here
    trailing_newline: bool,
    binding: Option<HostBinding>,
}

impl IcedHost {
    pub fn new() -> Self {
        Self {
            content: text_editor::Content::new(),
            trailing_newline: false,
            binding: None,
        }
    }

    pub fn content(&self) -> &text_editor::Content {
        &self.content
    }

    /// Applies a widget action (typing, cursor movement, paste...).
    pub fn perform(&mut self, action: text_editor::Action) {
        self.content.perform(action);
    }

    /// The last binding applied by the panel.
    pub fn binding(&self) -> Option<&HostBinding> {
        self.binding.as_ref()
    }

    /// Zero-based cursor line and column.
    pub fn cursor(&self) -> (usize, usize) {
        self.content.cursor_position()
    }

    /// Text of one line, without its line break.
    pub fn line(&self, index: usize) -> Option<String> {
        self.content.line(index).map(|l| {
            let s: &str = &l;
            s.to_string()
        })
    }

    pub fn line_count(&self) -> usize {
        self.content.line_count()
    }

    /// Splits the cursor line into the parts before and after the cursor.
    pub fn cursor_line_split(&self) -> (String, String) {
        let (line, column) = self.cursor();
        let text = self.line(line).unwrap_or_default();
        let at = floor_char_boundary(&text, column);
        (text[..at].to_string(), text[at..].to_string())
    }

    /// Byte offset of the cursor in `value()`.
    pub fn cursor_offset(&self) -> usize {
        let (line, column) = self.cursor();
        let before: usize = self.content.lines().take(line).map(|l| l.len() + 1).sum();
        let at = self
            .content
            .line(line)
            .map_or(0, |text| floor_char_boundary(&text, column));
        before + at
    }

    /// Whole text up to the cursor.
    pub fn text_before_cursor(&self) -> String {
        let (line, _) = self.cursor();
        let mut before = String::new();
        for index in 0..line {
            before.push_str(&self.line(index).unwrap_or_default());
            before.push('\n');
        }
        before.push_str(&self.cursor_line_split().0);
        before
    }
}

impl Default for IcedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHost for IcedHost {
    fn value(&self) -> String {
        // Content::text() always ends in '\n', even for an empty document
        let mut text = String::new();
        for (index, line) in self.content.lines().enumerate() {
            if index > 0 {
                text.push('\n');
            }
            text.push_str(&line);
        }
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }

    fn set_value(&mut self, text: &str) {
        self.content = text_editor::Content::with_text(text);
        self.trailing_newline = text.ends_with('\n');
    }

    fn apply(&mut self, binding: &HostBinding) {
        // Theme and font are read back by the view on the next frame
        self.binding = Some(binding.clone());
    }
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

// ==================== Clipboard ====================

/// System clipboard. The handle is opened on first use and kept, since on
/// X11 the copied text disappears when the owning handle is dropped.
#[derive(Default)]
pub struct ArboardClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardWriter for ArboardClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }

        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Write(e.to_string())),
            None => Err(ClipboardError::Unavailable("no clipboard".to_string())),
        }
    }
}

// ==================== Downloads ====================

/// Where a `FileDownloadSink` puts files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadTarget {
    /// Save as `<dir>/<file name>`
    Directory(PathBuf),
    /// Save at a path chosen by the user
    File(PathBuf),
}

/// Writes downloads to disk. The bytes are staged in a temporary file that
/// is copied to the target and then deleted.
#[derive(Debug, Clone)]
pub struct FileDownloadSink {
    target: DownloadTarget,
}

impl FileDownloadSink {
    pub fn new(target: DownloadTarget) -> Self {
        Self { target }
    }

    fn destination(&self, file_name: &str) -> Result<PathBuf, ExchangeError> {
        match &self.target {
            DownloadTarget::File(path) => Ok(path.clone()),
            DownloadTarget::Directory(dir) => {
                // Never let a file name escape the directory
                let name = Path::new(file_name)
                    .file_name()
                    .ok_or_else(|| ExchangeError::Save {
                        file_name: file_name.to_string(),
                        reason: "not a file name".to_string(),
                    })?;
                Ok(dir.join(name))
            }
        }
    }
}

impl DownloadSink for FileDownloadSink {
    type Resource = NamedTempFile;

    fn create(&mut self, payload: &DownloadPayload) -> Result<NamedTempFile, ExchangeError> {
        let stage = |e: std::io::Error| ExchangeError::Stage(e.to_string());

        let mut file = NamedTempFile::new().map_err(stage)?;
        file.write_all(&payload.bytes).map_err(stage)?;
        file.flush().map_err(stage)?;
        tracing::trace!("Staged {} bytes at {}", payload.bytes.len(), file.path().display());
        Ok(file)
    }

    fn trigger_save(
        &mut self,
        resource: &NamedTempFile,
        file_name: &str,
    ) -> Result<PathBuf, ExchangeError> {
        let destination = self.destination(file_name)?;
        let save = |e: std::io::Error| ExchangeError::Save {
            file_name: file_name.to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(save)?;
        }
        std::fs::copy(resource.path(), &destination).map_err(save)?;
        Ok(destination)
    }

    fn release(&mut self, resource: NamedTempFile) {
        if let Err(e) = resource.close() {
            tracing::warn!("Failed to remove staged download: {}", e);
        }
    }
}

// ==================== Dialogs ====================

/// Asks the user for an XML file to upload.
pub async fn pick_xml_file() -> Option<DiskFile> {
    rfd::AsyncFileDialog::new()
        .add_filter("XML", &["xml"])
        .pick_file()
        .await
        .map(|handle| DiskFile::new(handle.path()))
}

/// Asks the user where to save a download.
pub async fn pick_save_path(file_name: String) -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .add_filter("XML", &["xml"])
        .set_file_name(&file_name)
        .save_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xmlpad_core::exchange::save_download;
    use xmlpad_core::{AlertQueue, Config, EditorPanel, UploadResolution};

    fn iced_panel() -> EditorPanel<IcedHost> {
        EditorPanel::new(IcedHost::new(), &Config::default())
    }

    async fn upload_text(panel: &mut EditorPanel<IcedHost>, dir: &Path, text: &str) {
        let path = dir.join("doc.xml");
        std::fs::write(&path, text).unwrap();
        let mut alerts = AlertQueue::new();
        let pending = panel.begin_upload(DiskFile::new(path), &mut alerts).unwrap();
        assert_eq!(panel.finish_upload(pending.read().await), UploadResolution::Applied);
    }

    #[test]
    fn test_download_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileDownloadSink::new(DownloadTarget::Directory(dir.path().join("out")));

        let receipt =
            save_download(&mut sink, &DownloadPayload::xml("<a/>"), "doc.xml").unwrap();

        assert_eq!(receipt.path, dir.path().join("out").join("doc.xml"));
        assert_eq!(std::fs::read_to_string(&receipt.path).unwrap(), "<a/>");
    }

    #[test]
    fn test_download_to_chosen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picked.xml");
        let mut sink = FileDownloadSink::new(DownloadTarget::File(path.clone()));

        let receipt =
            save_download(&mut sink, &DownloadPayload::xml("<b/>"), "ignored.xml").unwrap();

        assert_eq!(receipt.path, path);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<b/>");
    }

    #[test]
    fn test_file_name_cannot_escape_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileDownloadSink::new(DownloadTarget::Directory(dir.path().to_path_buf()));

        let receipt =
            save_download(&mut sink, &DownloadPayload::xml("<c/>"), "../../evil.xml").unwrap();
        assert_eq!(receipt.path, dir.path().join("evil.xml"));

        let result = save_download(&mut sink, &DownloadPayload::xml("<c/>"), "..");
        assert!(matches!(result, Err(ExchangeError::Save { .. })));
    }

    #[test]
    fn test_editor_host_round_trip() {
        let mut host = IcedHost::new();
        host.set_value("<a>\n  <b/>\n</a>");

        assert_eq!(host.line_count(), 3);
        assert_eq!(host.line(1).as_deref(), Some("  <b/>"));
        assert_eq!(host.value(), "<a>\n  <b/>\n</a>");
    }

    #[test]
    fn test_editor_host_value_is_exact() {
        let mut host = IcedHost::new();
        assert_eq!(host.value(), "");

        for text in ["<a/>", "<a/>\n", "<a>\n</a>\n\n", "\n", ""] {
            host.set_value(text);
            assert_eq!(host.value(), text);
        }
    }

    #[test]
    fn test_cursor_offset_counts_bytes_before_cursor() {
        let typed = "<a>\n  <é/>";
        let mut host = IcedHost::new();
        host.perform(text_editor::Action::Edit(text_editor::Edit::Paste(
            std::sync::Arc::new(typed.to_string()),
        )));

        assert_eq!(host.cursor_offset(), typed.len());
        assert_eq!(host.cursor_offset(), host.text_before_cursor().len());

        host.perform(text_editor::Action::Move(text_editor::Motion::DocumentStart));
        assert_eq!(host.cursor_offset(), 0);
    }

    #[tokio::test]
    async fn test_panel_upload_keeps_exact_content() {
        for text in ["<a/>", "<root>\n  <b/>\n</root>\n"] {
            let dir = tempfile::tempdir().unwrap();
            let mut panel = iced_panel();

            upload_text(&mut panel, dir.path(), text).await;
            assert_eq!(panel.buffer(), text);
            assert_eq!(panel.live_content(), text);

            panel.relay_edit();
            assert_eq!(panel.buffer(), text);
        }
    }

    #[test]
    fn test_panel_typed_text_reaches_buffer_unchanged() {
        let mut panel = iced_panel();
        panel
            .host_mut()
            .perform(text_editor::Action::Edit(text_editor::Edit::Paste(Arc::new(
                "<a>\n</a>".to_string(),
            ))));
        panel.relay_edit();

        assert_eq!(panel.buffer(), "<a>\n</a>");
        assert_eq!(panel.live_content(), "<a>\n</a>");
    }

    #[tokio::test]
    async fn test_panel_clear_empties_live_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = iced_panel();
        upload_text(&mut panel, dir.path(), "<a>text</a>\n").await;

        panel.clear();

        assert_eq!(panel.live_content(), "");
        assert_eq!(panel.buffer(), "");
        panel.relay_edit();
        assert_eq!(panel.buffer(), "");
    }

    #[tokio::test]
    async fn test_panel_download_writes_exact_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = iced_panel();
        upload_text(&mut panel, dir.path(), "<a>x</a>").await;

        let out = dir.path().join("out");
        let mut sink = FileDownloadSink::new(DownloadTarget::Directory(out.clone()));
        let receipt = panel.download(&mut sink).unwrap();

        assert_eq!(receipt.path, out.join("doc.xml"));
        assert_eq!(std::fs::read(&receipt.path).unwrap(), b"<a>x</a>");
    }
}
