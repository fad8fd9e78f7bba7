//! Command-line host: the active document is a file on disk or a stdin buffer.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{DocumentSnapshot, DocumentUri, EditorHost};
use crate::config::{Config, ConfigLoader, PrintConfiguration};

/// Where the document text comes from
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Re-read on every request
    File(PathBuf),
    /// Captured once, never saved
    Buffer(String),
}

/// [`EditorHost`] backed by the command line
#[derive(Debug, Clone)]
pub struct FileHost {
    source: DocumentSource,
    language: Option<String>,
    workspace: Option<PathBuf>,
    settings: ConfigLoader,
}

impl FileHost {
    pub fn new(
        source: DocumentSource,
        language: Option<String>,
        workspace: Option<PathBuf>,
        settings: ConfigLoader,
    ) -> Self {
        Self {
            source,
            language,
            workspace,
            settings,
        }
    }

    /// Build the host described by the command line.
    ///
    /// A `-` document drains stdin immediately.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = if config.reads_stdin() {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read document from stdin")?;
            DocumentSource::Buffer(text)
        } else {
            let path = config
                .document
                .as_ref()
                .context("No document given")?;
            let path = path
                .canonicalize()
                .with_context(|| format!("Document not found: {}", path.display()))?;
            DocumentSource::File(path)
        };

        Ok(Self::new(
            source,
            config.language.clone(),
            Some(config.workspace.clone()),
            config.print_settings.clone(),
        ))
    }

    /// Path of the document, when it lives on disk
    pub fn document_path(&self) -> Option<&Path> {
        match &self.source {
            DocumentSource::File(path) => Some(path),
            DocumentSource::Buffer(_) => None,
        }
    }

    fn language_for(&self, path: Option<&Path>) -> String {
        if let Some(language) = &self.language {
            return language.clone();
        }
        path.map(language_from_path).unwrap_or_default()
    }
}

/// Extension if there is one, otherwise the file name.
///
/// Both forms are registry keys (`rs`, `Dockerfile`).
pub fn language_from_path(path: &Path) -> String {
    path.extension()
        .or_else(|| path.file_name())
        .map(|label| label.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl EditorHost for FileHost {
    fn active_document(&self) -> Option<DocumentSnapshot> {
        match &self.source {
            DocumentSource::File(path) => match std::fs::read_to_string(path) {
                Ok(text) => Some(DocumentSnapshot {
                    text,
                    language_id: self.language_for(Some(path)),
                    uri: DocumentUri::file(path.to_string_lossy()),
                }),
                Err(e) => {
                    log::warn!("Failed to read {}: {}", path.display(), e);
                    None
                }
            },
            DocumentSource::Buffer(text) => Some(DocumentSnapshot {
                text: text.clone(),
                language_id: self.language_for(None),
                uri: DocumentUri::untitled(),
            }),
        }
    }

    fn workspace_folder(&self, uri: &DocumentUri) -> Option<PathBuf> {
        if !uri.is_file() {
            return None;
        }
        self.workspace
            .as_ref()
            .filter(|workspace| Path::new(&uri.fs_path).starts_with(workspace))
            .cloned()
    }

    fn configuration(&self) -> PrintConfiguration {
        self.settings.load()
    }
}
