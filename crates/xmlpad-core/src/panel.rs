//! The editor panel.
//!
//! `EditorPanel` is a facade over the buffer, the editor configuration, the
//! widget host and file exchange. The UI only talks to the panel.
//!
//! ## Buffer vs. live content
//!
//! The panel keeps its own copy of the text (the buffer). The widget holds the
//! live text, which can run ahead of the buffer until the UI relays an edit.
//! Operations that read "what the user sees" (copy, download) read the live
//! text. Operations that replace the text (upload, clear) write both.
//!
//! ## Overlapping uploads
//!
//! Every `begin_upload` and every `clear` advances a sequence number. An
//! upload only applies if its ticket is still the latest; anything older is
//! dropped. A slow read can therefore never overwrite a newer file or
//! resurrect cleared content.

use tokio::sync::broadcast;

use crate::alert::Alert;
use crate::clipboard::ClipboardWriter;
use crate::config::{Config, EditorOptions, FontSize, Theme};
use crate::event::{EventBus, PanelEvent};
use crate::exchange::{
    self, DownloadPayload, DownloadReceipt, DownloadSink, ExchangeError, PendingFile,
    PendingUpload, UploadOutcome, UploadResolution, UploadState, UploadTicket,
};
use crate::host::{EditorHost, HostBinding};
use crate::viewport::{HeightPreset, Viewport};

/// User-adjustable presentation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    pub theme: Theme,
    pub font_size: FontSize,
    pub viewport: Viewport,
}

/// A single-document XML editor panel.
pub struct EditorPanel<H: EditorHost> {
    /// Application-level copy of the document
    buffer: String,

    /// The widget, owned for the panel's lifetime
    host: H,

    settings: EditorSettings,

    /// Widget options (fixed for the panel's lifetime)
    options: EditorOptions,

    /// Name used for the next download
    download_name: String,

    /// Last issued upload/clear sequence number
    sequence: u64,

    upload_state: UploadState,

    event_bus: EventBus,
}

impl<H: EditorHost> EditorPanel<H> {
    /// Creates a panel and binds the initial buffer and configuration into
    /// the host.
    pub fn new(host: H, config: &Config) -> Self {
        let settings = EditorSettings {
            theme: config.editor.theme,
            font_size: config.editor.font_size,
            viewport: Viewport::new(
                config.viewport.clone(),
                config.window.width,
                config.window.height,
            ),
        };

        let mut panel = Self {
            buffer: String::new(),
            host,
            settings,
            options: config.editor.options.clone(),
            download_name: config.download.file_name.clone(),
            sequence: 0,
            upload_state: UploadState::Idle,
            event_bus: EventBus::new(),
        };

        panel.host.set_value(&panel.buffer);
        panel.rebind();
        panel
    }

    // ==================== Getters ====================

    /// Returns the application-level buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Returns the text currently shown by the widget.
    pub fn live_content(&self) -> String {
        self.host.value()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the widget. Call `relay_edit` after editing through it.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// The binding currently applied to the host.
    pub fn binding(&self) -> HostBinding {
        HostBinding::new(
            self.settings.theme,
            self.settings.font_size,
            self.options.clone(),
        )
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload_state
    }

    /// File name the next download will use.
    pub fn download_file_name(&self) -> &str {
        &self.download_name
    }

    /// Subscribes to panel events.
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.event_bus.subscribe()
    }

    // ==================== Editing ====================

    /// Copies the live widget text into the buffer after a user edit.
    pub fn relay_edit(&mut self) {
        self.buffer = self.host.value();
    }

    /// Empties the buffer and the widget. Any upload still reading is
    /// invalidated.
    pub fn clear(&mut self) {
        self.next_sequence();
        self.buffer.clear();
        self.host.set_value("");
        if matches!(self.upload_state, UploadState::Reading(_)) {
            self.upload_state = UploadState::Idle;
        }
        tracing::info!("Editor cleared");
        self.emit(PanelEvent::Cleared);
    }

    // ==================== Configuration ====================

    pub fn set_theme(&mut self, theme: Theme) {
        if self.settings.theme == theme {
            return;
        }
        self.settings.theme = theme;
        self.rebind();
        tracing::debug!("Theme set to {}", theme);
        self.emit(PanelEvent::ThemeChanged(theme));
    }

    pub fn set_font_size(&mut self, font_size: FontSize) {
        if self.settings.font_size == font_size {
            return;
        }
        self.settings.font_size = font_size;
        self.rebind();
        tracing::debug!("Font size set to {}", font_size);
        self.emit(PanelEvent::FontSizeChanged(font_size));
    }

    /// Records a window resize. Returns true if the height preset changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let changed = self.settings.viewport.resize(width, height);
        if changed {
            let preset = self.settings.viewport.preset();
            tracing::debug!("Viewport preset {:?} at width {}", preset, width);
            self.emit(PanelEvent::ViewportChanged(preset));
        }
        changed
    }

    pub fn height_preset(&self) -> HeightPreset {
        self.settings.viewport.preset()
    }

    /// Overrides the name used for downloads.
    pub fn set_download_file_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !name.trim().is_empty() {
            self.download_name = name;
        }
    }

    fn rebind(&mut self) {
        let binding = self.binding();
        self.host.apply(&binding);
    }

    // ==================== Clipboard ====================

    /// Writes the live widget text to the clipboard. Failures are logged only.
    pub fn copy_to_clipboard(&self, clipboard: &mut impl ClipboardWriter) {
        let text = self.host.value();
        match clipboard.write_text(&text) {
            Ok(()) => {
                tracing::info!("Copied {} bytes to clipboard", text.len());
                self.emit(PanelEvent::Copied { len: text.len() });
            }
            Err(e) => tracing::error!("Error copying text: {}", e),
        }
    }

    // ==================== File Exchange ====================

    /// Starts an upload. Files that are not `text/xml` raise an alert and are
    /// refused without touching the buffer.
    pub fn begin_upload<F: PendingFile>(
        &mut self,
        file: F,
        alert: &mut impl Alert,
    ) -> Option<PendingUpload<F>> {
        if !exchange::accepts(file.content_type()) {
            let content_type = file.content_type().to_string();
            let error = ExchangeError::InvalidContentType {
                content_type: content_type.clone(),
            };
            tracing::warn!("Rejected upload of {}: {:?}", file.name(), error);
            // A read already in flight keeps its ticket
            if !matches!(self.upload_state, UploadState::Reading(_)) {
                self.upload_state = UploadState::Rejected;
            }
            alert.alert(&error.to_string());
            self.emit(PanelEvent::UploadRejected { content_type });
            return None;
        }

        let ticket = UploadTicket(self.next_sequence());
        tracing::info!("Reading {} (upload {})", file.name(), ticket);
        self.upload_state = UploadState::Reading(ticket);
        Some(PendingUpload::new(ticket, file))
    }

    /// Applies the result of a pending upload.
    pub fn finish_upload(&mut self, outcome: UploadOutcome) -> UploadResolution {
        if outcome.ticket.0 != self.sequence {
            tracing::debug!(
                "Dropping stale upload {} of {}",
                outcome.ticket,
                outcome.file_name
            );
            return UploadResolution::Stale;
        }

        match outcome.result {
            Ok(text) => {
                self.buffer = text;
                self.host.set_value(&self.buffer);
                self.download_name = outcome.file_name.clone();
                self.upload_state = UploadState::Resolved;
                tracing::info!("Loaded {} ({} bytes)", outcome.file_name, self.buffer.len());
                self.emit(PanelEvent::BufferReplaced {
                    file_name: outcome.file_name,
                    len: self.buffer.len(),
                });
                UploadResolution::Applied
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.upload_state = UploadState::Failed;
                self.emit(PanelEvent::UploadFailed {
                    file_name: outcome.file_name,
                    reason: e.to_string(),
                });
                UploadResolution::Failed(e)
            }
        }
    }

    /// Abandons any upload still reading. Its result will be dropped.
    pub fn cancel_upload(&mut self) {
        if let UploadState::Reading(ticket) = self.upload_state {
            self.next_sequence();
            self.upload_state = UploadState::Idle;
            tracing::debug!("Cancelled upload {}", ticket);
        }
    }

    /// Saves the live widget text through `sink` as an XML file.
    pub fn download<S: DownloadSink>(
        &self,
        sink: &mut S,
    ) -> Result<DownloadReceipt, ExchangeError> {
        let payload = DownloadPayload::xml(&self.host.value());
        let receipt = exchange::save_download(sink, &payload, &self.download_name)?;
        tracing::info!("Saved {} bytes to {}", receipt.bytes, receipt.path.display());
        self.emit(PanelEvent::Downloaded {
            path: receipt.path.clone(),
            bytes: receipt.bytes,
        });
        Ok(receipt)
    }

    // ==================== Internals ====================

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    fn emit(&self, event: PanelEvent) {
        self.event_bus.emit(event);
    }
}
