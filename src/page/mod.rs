//! Print Page
//!
//! Everything that turns a document snapshot into the HTML the browser prints.

pub mod builder;
pub mod escape;
pub mod title;

pub use builder::{ASSET_ROUTE_PREFIX, build_page};
pub use escape::escape_for_embedding;
pub use title::{TitlePolicy, resolve_title};
