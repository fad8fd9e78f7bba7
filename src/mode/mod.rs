//! Highlighting Modes
//!
//! Language descriptors and the alias resolver that maps editor language
//! labels to CodeMirror mode identifiers.

pub mod registry;
pub mod schema;

pub use registry::ModeRegistry;
pub use schema::{ModeDescriptor, ModeFile};
