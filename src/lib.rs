//! printcode
//!
//! Prints the document open in an editor through the browser, with syntax
//! highlighting done by CodeMirror on the page.
//!
//! This library provides:
//! - Language label to highlighting mode resolution
//! - Print page generation (escaping, titles, page layout)
//! - The local HTTP server that serves the page and its assets
//! - The print command that ties them to a browser

pub mod app;
pub mod config;
pub mod host;
pub mod invoke;
pub mod mode;
pub mod page;
pub mod server;
pub mod watch;

pub use config::{Config, PrintConfiguration};
pub use host::{DocumentSnapshot, DocumentUri, EditorHost, FileHost};
pub use invoke::{BrowserLauncher, PrintCommand, SystemBrowser};
pub use mode::{ModeDescriptor, ModeRegistry};
pub use page::{TitlePolicy, build_page, escape_for_embedding, resolve_title};
pub use server::{AssetRoot, PrintServer};
