//! Print Server
//!
//! Local HTTP endpoint serving the print page and the highlighting assets.

pub mod assets;
pub mod endpoint;
pub mod routes;

pub use assets::AssetRoot;
pub use endpoint::PrintServer;
pub use routes::{AppState, build_router};
