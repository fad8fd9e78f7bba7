//! Editor Host
//!
//! The editor side of printing: where the active document, its workspace and
//! the print settings come from.

pub mod file;

pub use file::FileHost;

use std::path::PathBuf;

use crate::config::PrintConfiguration;

/// URI scheme of documents backed by a file on disk
pub const FILE_SCHEME: &str = "file";
/// URI scheme of buffers that were never saved
pub const UNTITLED_SCHEME: &str = "untitled";

/// Location of a document as the editor reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUri {
    pub scheme: String,
    /// Empty when the document has no file-system path
    pub fs_path: String,
}

impl DocumentUri {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            scheme: FILE_SCHEME.to_string(),
            fs_path: path.into(),
        }
    }

    pub fn untitled() -> Self {
        Self {
            scheme: UNTITLED_SCHEME.to_string(),
            fs_path: String::new(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.scheme == FILE_SCHEME
    }
}

/// Document contents captured at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub text: String,
    pub language_id: String,
    pub uri: DocumentUri,
}

/// Source of the active document and print settings.
///
/// Every call reads live state; nothing is cached between prints or page
/// requests.
pub trait EditorHost: Send + Sync {
    /// The document currently open, if any
    fn active_document(&self) -> Option<DocumentSnapshot>;

    /// Workspace folder containing a `file` document
    fn workspace_folder(&self, uri: &DocumentUri) -> Option<PathBuf>;

    /// Current print settings
    fn configuration(&self) -> PrintConfiguration;
}
