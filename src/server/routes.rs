//! Request routing for the print server.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::any,
};
use serde::Deserialize;

use super::assets::{AssetRoot, error_code};
use crate::host::EditorHost;
use crate::mode::ModeRegistry;
use crate::page::build_page;

/// Everything a request handler needs
#[derive(Clone)]
pub struct AppState {
    pub host: Arc<dyn EditorHost>,
    pub registry: Arc<ModeRegistry>,
    pub assets: Arc<AssetRoot>,
}

/// Query string of the print page
#[derive(Debug, Default, Deserialize)]
pub struct PrintQuery {
    /// Mode the invoking side resolved; only compared, never trusted
    pub mode: Option<String>,
}

/// Routes match on path alone, whatever the method.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(print_page))
        .route("/_node_modules/{*path}", any(static_asset))
        .fallback(empty)
        .with_state(state)
}

/// Renders whatever document is active *now*, not the one that was active
/// when printing was triggered.
async fn print_page(
    State(state): State<AppState>,
    query: Result<Query<PrintQuery>, QueryRejection>,
) -> Response {
    // Host reads may touch the disk; keep them off the runtime thread
    let host = state.host.clone();
    let captured = tokio::task::spawn_blocking(move || {
        let document = host.active_document()?;
        let config = host.configuration();
        let workspace = host.workspace_folder(&document.uri);
        Some((document, config, workspace))
    })
    .await;

    let (document, config, workspace) = match captured {
        Ok(Some(captured)) => captured,
        Ok(None) => {
            log::debug!("Print page requested without an active document");
            return StatusCode::NO_CONTENT.into_response();
        }
        Err(e) => {
            log::error!("Reading the active document failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // The mode parameter is advisory, the document decides
    let requested = match query {
        Ok(Query(query)) => query.mode,
        Err(e) => {
            log::debug!("Ignoring malformed print query: {}", e);
            None
        }
    };
    let resolved = state.registry.resolve(&document.language_id);
    if let Some(requested) = requested.as_deref()
        && Some(requested) != resolved
    {
        log::debug!(
            "Requested mode '{}' but the active document resolves to {:?}",
            requested,
            resolved
        );
    }

    match build_page(&document, &config, workspace.as_deref(), &state.registry) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            log::error!("{:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response()
        }
    }
}

/// Read failures are reported in the body, the exchange itself succeeds.
async fn static_asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match state.assets.read(&path).await {
        Ok(asset) => {
            ([(header::CONTENT_TYPE, asset.content_type)], asset.contents).into_response()
        }
        Err(e) => {
            log::warn!("Failed to serve asset '{}': {}", path, e);
            format!("{}: {}", error_code(&e), e).into_response()
        }
    }
}

async fn empty() {}
