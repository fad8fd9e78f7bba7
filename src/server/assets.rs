//! Static highlighting assets, confined to one directory.

use std::io;
use std::path::{Path, PathBuf};

/// File contents ready to be served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub contents: Vec<u8>,
    pub content_type: &'static str,
}

/// Directory the `/_node_modules` route maps onto
#[derive(Debug, Clone)]
pub struct AssetRoot {
    root: PathBuf,
}

impl AssetRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a request path onto a file below the root.
    ///
    /// Both sides are canonicalized, so `..`, absolute paths and symlinks
    /// pointing outside the root are refused with `PermissionDenied`.
    pub async fn resolve(&self, relative: &str) -> io::Result<PathBuf> {
        let root = tokio::fs::canonicalize(&self.root).await?;
        let candidate = tokio::fs::canonicalize(root.join(relative)).await?;

        if !candidate.starts_with(&root) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("'{}' is outside the asset directory", relative),
            ));
        }
        Ok(candidate)
    }

    pub async fn read(&self, relative: &str) -> io::Result<Asset> {
        let path = self.resolve(relative).await?;
        let contents = tokio::fs::read(&path).await?;
        Ok(Asset {
            contents,
            content_type: guess_content_type(&path),
        })
    }
}

/// Short errno-style name for an I/O failure
pub fn error_code(error: &io::Error) -> &'static str {
    match error.kind() {
        io::ErrorKind::NotFound => "ENOENT",
        io::ErrorKind::PermissionDenied => "EACCES",
        io::ErrorKind::IsADirectory => "EISDIR",
        io::ErrorKind::NotADirectory => "ENOTDIR",
        io::ErrorKind::InvalidInput => "EINVAL",
        _ => "EIO",
    }
}

pub fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("md") | Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
