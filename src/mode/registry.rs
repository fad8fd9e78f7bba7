//! Mode Registry
//!
//! Flat key index over the descriptor table. Built once, read-only afterwards.

use super::schema::{ModeDescriptor, ModeFile};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Index from every descriptor key to its mode id
#[derive(Debug, Clone, Default)]
pub struct ModeRegistry {
    descriptors: Vec<ModeDescriptor>,
    index: HashMap<String, String>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors in table order
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ModeDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.add_descriptor(descriptor);
        }
        registry
    }

    /// Parse a `modes.toml` document into a registry
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ModeFile = toml::from_str(content).context("Failed to parse mode table TOML")?;
        Ok(Self::from_descriptors(file.modes))
    }

    /// Registry over the embedded CodeMirror language table
    pub fn builtin() -> Self {
        let embedded_toml = include_str!("../../resources/modes.toml");

        match toml::from_str::<ModeFile>(embedded_toml) {
            Ok(file) => {
                if let Some(meta) = &file.meta {
                    log::debug!(
                        "Embedded mode table: {} {}",
                        meta.engine,
                        meta.version.as_deref().unwrap_or("(unversioned)")
                    );
                }
                Self::from_descriptors(file.modes)
            }
            Err(e) => {
                log::warn!("Failed to load embedded mode table: {:#}", e);
                Self::new()
            }
        }
    }

    /// Add a descriptor; its keys override any earlier owner.
    ///
    /// Descriptors whose mode id could not be used as a path segment are
    /// rejected and `false` is returned.
    pub fn add_descriptor(&mut self, descriptor: ModeDescriptor) -> bool {
        if !descriptor.has_valid_mode_id() {
            log::warn!(
                "Ignoring mode '{}': invalid mode id '{}'",
                descriptor.display_name,
                descriptor.mode_id
            );
            return false;
        }

        for key in descriptor.keys() {
            self.index.insert(key, descriptor.mode_id.clone());
        }
        self.descriptors.push(descriptor);
        true
    }

    /// Layer the descriptors of a user-supplied mode file on top
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mode file: {}", path.display()))?;
        let file: ModeFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse mode file: {}", path.display()))?;

        let added = file
            .modes
            .into_iter()
            .map(|descriptor| self.add_descriptor(descriptor))
            .filter(|added| *added)
            .count();
        log::info!("Loaded {} modes from {}", added, path.display());
        Ok(added)
    }

    /// Resolve an editor language label to a mode id.
    ///
    /// Exactly one lookup; the only case folding is the lowercase display
    /// name registered by each descriptor.
    pub fn resolve(&self, language: &str) -> Option<&str> {
        self.index.get(language).map(String::as_str)
    }

    pub fn descriptors(&self) -> &[ModeDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
