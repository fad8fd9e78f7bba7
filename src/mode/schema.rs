//! Mode Schema Types
//!
//! Descriptor types as they appear in `modes.toml` files.

use serde::Deserialize;

/// Root mode file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModeFile {
    #[serde(default)]
    pub meta: Option<ModeFileMeta>,
    #[serde(default)]
    pub modes: Vec<ModeDescriptor>,
}

/// Which highlighting engine release the descriptors were taken from
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModeFileMeta {
    pub engine: String,
    pub version: Option<String>,
}

/// One language known to the highlighting engine
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModeDescriptor {
    pub display_name: String,
    pub mode_id: String,
    #[serde(default, rename = "extensions")]
    pub file_extensions: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ModeDescriptor {
    pub fn new(display_name: &str, mode_id: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            mode_id: mode_id.to_string(),
            file_extensions: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.file_extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Every lookup key this descriptor registers, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        [
            self.display_name.clone(),
            self.display_name.to_lowercase(),
            self.mode_id.clone(),
        ]
        .into_iter()
        .chain(self.file_extensions.iter().cloned())
        .chain(self.aliases.iter().cloned())
    }

    /// Mode ids end up in asset paths, so only plain path segments are accepted.
    pub fn has_valid_mode_id(&self) -> bool {
        let id = &self.mode_id;
        !id.is_empty()
            && !id.starts_with('.')
            && !id.contains("..")
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    }
}
