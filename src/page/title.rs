//! Print title selection.

use serde::Deserialize;
use std::path::Path;

/// Title shown when the user opts out of printing the file path
pub const DEFAULT_TITLE: &str = "printcode";

/// How much of the document path goes into the printed title
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TitlePolicy {
    None,
    Full,
    Relative,
    Pretty,
    #[default]
    Filename,
}

impl From<&str> for TitlePolicy {
    /// Unknown policies fall back to the file name, like the default does.
    fn from(value: &str) -> Self {
        match value {
            "none" => TitlePolicy::None,
            "full" => TitlePolicy::Full,
            "relative" => TitlePolicy::Relative,
            "pretty" => TitlePolicy::Pretty,
            _ => TitlePolicy::Filename,
        }
    }
}

impl From<String> for TitlePolicy {
    fn from(value: String) -> Self {
        TitlePolicy::from(value.as_str())
    }
}

/// Pick the display title for a document.
///
/// `workspace_folder` is only honoured when it is a path prefix of
/// `file_path`. An empty `file_path` (unsaved buffer) gives an empty title
/// for every policy that shows the path.
pub fn resolve_title(
    file_path: &str,
    workspace_folder: Option<&str>,
    policy: TitlePolicy,
) -> String {
    match policy {
        TitlePolicy::None => DEFAULT_TITLE.to_string(),
        TitlePolicy::Full => file_path.to_string(),
        TitlePolicy::Relative | TitlePolicy::Pretty => workspace_folder
            .and_then(|folder| Path::new(file_path).strip_prefix(folder).ok())
            .map(|relative| relative.to_string_lossy().into_owned())
            .filter(|relative| !relative.is_empty())
            .unwrap_or_else(|| base_name(file_path)),
        TitlePolicy::Filename => base_name(file_path),
    }
}

fn base_name(file_path: &str) -> String {
    Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
