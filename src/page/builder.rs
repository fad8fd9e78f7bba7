//! Print page assembly.

use anyhow::{Context, Result};
use askama::Template;
use std::path::Path;

use super::escape::escape_for_embedding;
use super::title::resolve_title;
use crate::config::{
    DEFAULT_FONT_FAMILY, PrintConfiguration, is_valid_analytics_id, is_valid_font_family,
};
use crate::host::DocumentSnapshot;
use crate::mode::ModeRegistry;

/// URL prefix of the static-asset proxy
pub const ASSET_ROUTE_PREFIX: &str = "/_node_modules";

const CORE_SCRIPT: &str = "/_node_modules/codemirror/lib/codemirror.js";
const CORE_STYLESHEET: &str = "/_node_modules/codemirror/lib/codemirror.css";

// Sub-modes of the HTML composite modes
const XML_MODE: &str = "/_node_modules/codemirror/mode/xml/xml.js";
const JAVASCRIPT_MODE: &str = "/_node_modules/codemirror/mode/javascript/javascript.js";
const CSS_MODE: &str = "/_node_modules/codemirror/mode/css/css.js";

// Not part of the bundled package, fetched from the CDN
const MULTIPLEX_ADDON: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/codemirror/5.31.0/addon/mode/multiplex.min.js";
const HTMLMIXED_MODE_CDN: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/codemirror/5.31.0/mode/htmlmixed/htmlmixed.js";

/// CodeMirror's plain-text mode, built into the core script
pub const PLAIN_TEXT_MODE: &str = "null";

#[derive(Template)]
#[template(path = "print.html")]
struct PrintPage<'a> {
    title: &'a str,
    core_script: &'a str,
    core_stylesheet: &'a str,
    mode_script: Option<String>,
    aux_scripts: Vec<&'static str>,
    font_size: i64,
    font_family: &'a str,
    tab_size: i64,
    analytics_id: Option<&'a str>,
    mode: &'a str,
    body: &'a str,
}

/// Asset URL of a mode's script, `None` for the built-in plain-text mode
pub fn mode_script_path(mode_id: &str) -> Option<String> {
    if mode_id == PLAIN_TEXT_MODE {
        return None;
    }
    Some(format!(
        "{}/codemirror/mode/{}/{}.js",
        ASSET_ROUTE_PREFIX, mode_id, mode_id
    ))
}

/// Scripts a composite mode needs before the widget is created
pub fn auxiliary_scripts(mode_id: &str) -> Vec<&'static str> {
    match mode_id {
        "htmlmixed" => vec![XML_MODE, JAVASCRIPT_MODE, CSS_MODE],
        "htmlembedded" => vec![
            XML_MODE,
            JAVASCRIPT_MODE,
            CSS_MODE,
            MULTIPLEX_ADDON,
            HTMLMIXED_MODE_CDN,
        ],
        _ => Vec::new(),
    }
}

/// Render the print page for a document.
///
/// `workspace_folder` is the folder containing the document, if the host
/// knows one. An unknown language renders as plain text.
pub fn build_page(
    document: &DocumentSnapshot,
    config: &PrintConfiguration,
    workspace_folder: Option<&Path>,
    registry: &ModeRegistry,
) -> Result<String> {
    let mode = registry.resolve(&document.language_id);
    if mode.is_none() {
        log::debug!(
            "No highlighting mode for language '{}'",
            document.language_id
        );
    }

    let body = escape_for_embedding(&document.text);
    let workspace = workspace_folder.map(|folder| folder.to_string_lossy().into_owned());
    let title = resolve_title(
        &document.uri.fs_path,
        workspace.as_deref(),
        config.print_file_path,
    );

    let analytics_id = (!config.disable_telemetry
        && !config.analytics_id.is_empty()
        && is_valid_analytics_id(&config.analytics_id))
    .then_some(config.analytics_id.as_str());
    let font_family = if is_valid_font_family(&config.font_family) {
        config.font_family.as_str()
    } else {
        DEFAULT_FONT_FAMILY
    };

    let page = PrintPage {
        title: &title,
        core_script: CORE_SCRIPT,
        core_stylesheet: CORE_STYLESHEET,
        mode_script: mode.and_then(mode_script_path),
        aux_scripts: mode.map(auxiliary_scripts).unwrap_or_default(),
        font_size: config.font_size,
        font_family,
        tab_size: config.tab_size,
        analytics_id,
        mode: mode.unwrap_or(PLAIN_TEXT_MODE),
        body: &body,
    };

    page.render().context("Failed to render print page")
}
