//! In-memory editor host shared by the integration tests
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use printcode::{DocumentSnapshot, DocumentUri, EditorHost, PrintConfiguration};

pub struct StaticHost {
    document: Mutex<Option<DocumentSnapshot>>,
    workspace: Option<PathBuf>,
    config: Mutex<PrintConfiguration>,
}

impl StaticHost {
    pub fn new(document: Option<DocumentSnapshot>) -> Self {
        Self {
            document: Mutex::new(document),
            workspace: None,
            config: Mutex::new(PrintConfiguration::default()),
        }
    }

    pub fn with_workspace(mut self, workspace: &str) -> Self {
        self.workspace = Some(PathBuf::from(workspace));
        self
    }

    pub fn with_config(self, config: PrintConfiguration) -> Self {
        *self.config.lock().unwrap() = config;
        self
    }

    /// Simulate the user switching to another editor tab
    pub fn switch_to(&self, document: Option<DocumentSnapshot>) {
        *self.document.lock().unwrap() = document;
    }

    pub fn update_config(&self, update: impl FnOnce(&mut PrintConfiguration)) {
        update(&mut self.config.lock().unwrap());
    }
}

impl EditorHost for StaticHost {
    fn active_document(&self) -> Option<DocumentSnapshot> {
        self.document.lock().unwrap().clone()
    }

    fn workspace_folder(&self, uri: &DocumentUri) -> Option<PathBuf> {
        if !uri.is_file() {
            return None;
        }
        self.workspace
            .as_ref()
            .filter(|workspace| std::path::Path::new(&uri.fs_path).starts_with(workspace))
            .cloned()
    }

    fn configuration(&self) -> PrintConfiguration {
        self.config.lock().unwrap().clone()
    }
}

pub fn document(text: &str, language_id: &str, path: &str) -> DocumentSnapshot {
    DocumentSnapshot {
        text: text.to_string(),
        language_id: language_id.to_string(),
        uri: DocumentUri::file(path),
    }
}

/// The string literal handed to `cm.doc.setValue`
pub fn embedded_literal(page: &str) -> &str {
    let start = page.find("setValue(\"").expect("setValue call") + "setValue(\"".len();
    let end = start + page[start..].find('"').expect("closing quote");
    &page[start..end]
}
