//! File exchange: moving text between the panel and the local filesystem.
//!
//! ## Upload
//!
//! ```text
//! begin_upload ──type ok──▶ PendingUpload::read().await ──▶ finish_upload
//!      │                                                        │
//!      └──bad type──▶ alert, Rejected         stale ticket ──▶ dropped
//! ```
//!
//! The read future owns its `PendingFile` and never borrows the panel, so the
//! UI can run it as a background task while the panel keeps handling events.
//!
//! ## Download
//!
//! A download creates a temporary resource in a `DownloadSink`, triggers the
//! save flow once, then releases the resource. Release happens in a guard's
//! `Drop`, so it also runs when the save fails.

use std::future::Future;
use std::path::{Path, PathBuf};

/// The only content type accepted by uploads and declared by downloads.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Alert text shown when an upload has the wrong content type.
pub const INVALID_UPLOAD_MESSAGE: &str = "Please upload a valid XML file.";

/// File exchange errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    #[error("{}", INVALID_UPLOAD_MESSAGE)]
    InvalidContentType { content_type: String },

    #[error("Failed to read {file_name}: {reason}")]
    Read { file_name: String, reason: String },

    #[error("Failed to prepare download: {0}")]
    Stage(String),

    #[error("Failed to save {file_name}: {reason}")]
    Save { file_name: String, reason: String },
}

// ==================== Upload ====================

/// A user-selected file waiting to be read.
pub trait PendingFile: Send {
    /// File name without directories.
    fn name(&self) -> &str;

    /// Declared content type (empty when unknown).
    fn content_type(&self) -> &str;

    /// Reads the whole file as text. Single shot.
    fn read_text(self) -> impl Future<Output = std::io::Result<String>> + Send;
}

/// Returns true if a declared content type is accepted for upload.
pub fn accepts(content_type: &str) -> bool {
    content_type == XML_CONTENT_TYPE
}

/// Declared content type of a file on disk, derived from its extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xml" => XML_CONTENT_TYPE,
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        _ => "",
    }
}

/// A file on the local disk.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    content_type: &'static str,
}

impl DiskFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let content_type = content_type_for_path(&path);
        Self {
            path,
            name,
            content_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PendingFile for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        self.content_type
    }

    async fn read_text(self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }
}

/// Identifies one upload. Later uploads have larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTicket(pub(crate) u64);

impl std::fmt::Display for UploadTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the most recent upload stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Reading(UploadTicket),
    Resolved,
    Failed,
    Rejected,
}

/// An accepted upload whose content has not been read yet.
#[derive(Debug)]
pub struct PendingUpload<F> {
    ticket: UploadTicket,
    file: F,
}

impl<F: PendingFile> PendingUpload<F> {
    pub(crate) fn new(ticket: UploadTicket, file: F) -> Self {
        Self { ticket, file }
    }

    pub fn ticket(&self) -> UploadTicket {
        self.ticket
    }

    pub fn file_name(&self) -> &str {
        self.file.name()
    }

    /// Reads the file, consuming the handle.
    pub async fn read(self) -> UploadOutcome {
        let file_name = self.file.name().to_string();
        let result = self.file.read_text().await.map_err(|e| ExchangeError::Read {
            file_name: file_name.clone(),
            reason: e.to_string(),
        });
        UploadOutcome {
            ticket: self.ticket,
            file_name,
            result,
        }
    }
}

/// Result of reading a pending upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub ticket: UploadTicket,
    pub file_name: String,
    pub result: Result<String, ExchangeError>,
}

/// What `finish_upload` did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResolution {
    /// The buffer now holds the file content
    Applied,
    /// A newer upload or a clear superseded this one
    Stale,
    /// The read failed; the buffer is unchanged
    Failed(ExchangeError),
}

// ==================== Download ====================

/// Bytes handed to a download sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPayload {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl DownloadPayload {
    pub fn xml(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            content_type: XML_CONTENT_TYPE,
        }
    }
}

/// Where a finished download ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReceipt {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: usize,
}

/// Produces downloadable files from bytes.
///
/// `create` acquires a temporary resource, `trigger_save` follows it once,
/// `release` frees it. Callers go through `save_download`, which always
/// releases.
pub trait DownloadSink {
    type Resource;

    fn create(&mut self, payload: &DownloadPayload) -> Result<Self::Resource, ExchangeError>;

    fn trigger_save(
        &mut self,
        resource: &Self::Resource,
        file_name: &str,
    ) -> Result<PathBuf, ExchangeError>;

    fn release(&mut self, resource: Self::Resource);
}

/// A created resource that is released when dropped.
struct Staged<'s, S: DownloadSink> {
    sink: &'s mut S,
    resource: Option<S::Resource>,
}

impl<'s, S: DownloadSink> Staged<'s, S> {
    fn acquire(sink: &'s mut S, payload: &DownloadPayload) -> Result<Self, ExchangeError> {
        let resource = sink.create(payload)?;
        Ok(Self {
            sink,
            resource: Some(resource),
        })
    }

    fn trigger(&mut self, file_name: &str) -> Result<PathBuf, ExchangeError> {
        match &self.resource {
            Some(resource) => self.sink.trigger_save(resource, file_name),
            None => Err(ExchangeError::Stage("resource already released".to_string())),
        }
    }
}

impl<S: DownloadSink> Drop for Staged<'_, S> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.sink.release(resource);
        }
    }
}

/// Packages `payload` through `sink` and saves it as `file_name`.
pub fn save_download<S: DownloadSink>(
    sink: &mut S,
    payload: &DownloadPayload,
    file_name: &str,
) -> Result<DownloadReceipt, ExchangeError> {
    let mut staged = Staged::acquire(sink, payload)?;
    let path = staged.trigger(file_name)?;
    Ok(DownloadReceipt {
        path,
        file_name: file_name.to_string(),
        bytes: payload.bytes.len(),
    })
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_only_text_xml_is_accepted() {
        assert!(accepts("text/xml"));
        assert!(!accepts("application/xml"));
        assert!(!accepts("text/plain"));
        assert!(!accepts(""));
    }

    #[test]
    fn test_content_type_for_path() {
        assert_eq!(content_type_for_path(Path::new("a/b/data.xml")), "text/xml");
        assert_eq!(content_type_for_path(Path::new("DATA.XML")), "text/xml");
        assert_eq!(content_type_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(content_type_for_path(Path::new("Makefile")), "");
    }

    #[tokio::test]
    async fn test_disk_file_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        std::fs::write(&path, "<a/>").unwrap();

        let file = DiskFile::new(&path);
        assert_eq!(file.name(), "doc.xml");
        assert_eq!(file.content_type(), XML_CONTENT_TYPE);
        assert_eq!(file.read_text().await.unwrap(), "<a/>");
    }

    #[tokio::test]
    async fn test_pending_upload_reports_read_error() {
        let pending = PendingUpload::new(UploadTicket(7), MemoryFile::unreadable("locked.xml"));
        let outcome = pending.read().await;

        assert_eq!(outcome.ticket, UploadTicket(7));
        assert_eq!(outcome.file_name, "locked.xml");
        assert!(matches!(outcome.result, Err(ExchangeError::Read { .. })));
    }

    #[test]
    fn test_save_download_releases_resource() {
        let mut sink = RecordingSink::default();
        let payload = DownloadPayload::xml("<root/>");

        let receipt = save_download(&mut sink, &payload, "out.xml").unwrap();

        assert_eq!(receipt.path, PathBuf::from("/downloads/out.xml"));
        assert_eq!(receipt.bytes, 7);
        assert_eq!(sink.created[0].content_type, "text/xml");
        assert_eq!(sink.released, 1);
        assert_eq!(sink.live, 0);
    }

    #[test]
    fn test_save_download_releases_on_failed_trigger() {
        let mut sink = RecordingSink {
            fail_trigger: true,
            ..Default::default()
        };

        let result = save_download(&mut sink, &DownloadPayload::xml("x"), "out.xml");

        assert!(matches!(result, Err(ExchangeError::Save { .. })));
        assert_eq!(sink.released, 1);
        assert_eq!(sink.live, 0);
    }

    #[test]
    fn test_failed_create_has_nothing_to_release() {
        let mut sink = RecordingSink {
            fail_create: true,
            ..Default::default()
        };

        let result = save_download(&mut sink, &DownloadPayload::xml("x"), "out.xml");

        assert!(matches!(result, Err(ExchangeError::Stage(_))));
        assert_eq!(sink.released, 0);
        assert!(sink.saved.is_empty());
    }
}
