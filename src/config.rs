//! Configuration management for printcode.
//!
//! Handles:
//! - Command-line argument parsing
//! - Layered print settings (defaults < user-global < workspace < explicit file < CLI)
//!
//! Print settings are re-read from disk on every invocation so edits take
//! effect on the next print without restarting.

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::page::title::TitlePolicy;

/// Name of the per-workspace settings file
pub const WORKSPACE_CONFIG_FILE: &str = ".printcode.toml";

/// Tracking id of the analytics snippet emitted when telemetry is enabled
pub const DEFAULT_ANALYTICS_ID: &str = "UA-112594767-1";

/// Font stack used when none is configured
pub const DEFAULT_FONT_FAMILY: &str = "Menlo, Monaco, 'Courier New', monospace";

/// Command-line arguments for printcode
#[derive(Debug, Parser)]
#[command(name = "printcode")]
#[command(about = "Print source files with syntax highlighting through the browser")]
#[command(version)]
pub struct Args {
    /// Document to print, `-` reads an unsaved buffer from stdin
    #[arg(required_unless_present = "list_modes")]
    pub file: Option<PathBuf>,

    /// Language label used to pick the highlighting mode
    #[arg(long, short, help = "Language label (e.g. 'rust', 'ts', 'C++')")]
    pub language: Option<String>,

    /// Workspace root used for relative titles and workspace settings
    #[arg(long, help = "Workspace root (defaults to the current directory)")]
    pub workspace: Option<PathBuf>,

    /// Explicit settings file, layered above the user and workspace files
    #[arg(long, help = "Settings TOML file")]
    pub config: Option<PathBuf>,

    /// Directory holding the `codemirror` package
    #[arg(long, help = "Directory served under /_node_modules")]
    pub asset_dir: Option<PathBuf>,

    /// Additional mode descriptors
    #[arg(long, help = "TOML file with extra [[modes]] entries")]
    pub modes: Option<PathBuf>,

    /// Print again every time the document is saved
    #[arg(long)]
    pub watch: bool,

    /// List known highlighting modes and exit
    #[arg(long)]
    pub list_modes: bool,

    #[arg(long, help = "Port of the local print server")]
    pub port: Option<u16>,

    #[arg(long, help = "Browser executable (empty uses the system default)")]
    pub browser: Option<String>,

    #[arg(long)]
    pub tab_size: Option<i64>,

    #[arg(long, help = "Font size in points")]
    pub font_size: Option<i64>,

    #[arg(long)]
    pub font_family: Option<String>,

    #[arg(long)]
    pub disable_telemetry: bool,

    #[arg(long, help = "Title policy (none, full, relative, pretty, filename)")]
    pub print_file_path: Option<String>,

    /// Log level for printcode
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Settings consumed by a single print
#[derive(Debug, Clone, PartialEq)]
pub struct PrintConfiguration {
    pub web_server_port: u16,
    /// Empty means the platform default opener
    pub browser_path: String,
    pub tab_size: i64,
    /// Points
    pub font_size: i64,
    pub font_family: String,
    pub disable_telemetry: bool,
    pub print_file_path: TitlePolicy,
    pub analytics_id: String,
}

impl Default for PrintConfiguration {
    fn default() -> Self {
        Self {
            web_server_port: 4649,
            browser_path: String::new(),
            tab_size: 2,
            font_size: 12,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            disable_telemetry: false,
            print_file_path: TitlePolicy::Filename,
            analytics_id: DEFAULT_ANALYTICS_ID.to_string(),
        }
    }
}

impl PrintConfiguration {
    /// Overwrite every setting the layer defines
    pub fn apply(&mut self, layer: PrintConfigurationLayer) {
        if let Some(port) = layer.web_server_port {
            self.web_server_port = port;
        }
        if let Some(browser_path) = layer.browser_path {
            self.browser_path = browser_path;
        }
        if let Some(tab_size) = layer.tab_size {
            self.tab_size = tab_size;
        }
        if let Some(font_size) = layer.font_size {
            self.font_size = font_size;
        }
        if let Some(font_family) = layer.font_family {
            if is_valid_font_family(&font_family) {
                self.font_family = font_family;
            } else {
                log::warn!("Ignoring fontFamily '{}': not a plain font list", font_family);
            }
        }
        if let Some(disable_telemetry) = layer.disable_telemetry {
            self.disable_telemetry = disable_telemetry;
        }
        if let Some(policy) = layer.print_file_path {
            self.print_file_path = policy;
        }
        if let Some(analytics_id) = layer.analytics_id {
            if is_valid_analytics_id(&analytics_id) {
                self.analytics_id = analytics_id;
            } else {
                log::warn!("Ignoring analyticsId '{}': invalid characters", analytics_id);
            }
        }
    }
}

/// A font list lands inside a `<style>` rule verbatim, so it must not be
/// able to end the rule or the element.
pub fn is_valid_font_family(font_family: &str) -> bool {
    !font_family.contains(['<', '>', '{', '}', ';'])
}

/// Tracking ids are `[A-Za-z0-9-]`; empty disables the snippet.
pub fn is_valid_analytics_id(analytics_id: &str) -> bool {
    analytics_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// One settings source; unset keys leave lower layers untouched
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintConfigurationLayer {
    pub web_server_port: Option<u16>,
    pub browser_path: Option<String>,
    pub tab_size: Option<i64>,
    pub font_size: Option<i64>,
    pub font_family: Option<String>,
    pub disable_telemetry: Option<bool>,
    pub print_file_path: Option<TitlePolicy>,
    pub analytics_id: Option<String>,
}

impl PrintConfigurationLayer {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse print settings TOML")
    }
}

/// Reads [`PrintConfiguration`] from its sources on demand
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Settings files, lowest priority first
    files: Vec<PathBuf>,
    /// Command-line values, applied last
    overrides: PrintConfigurationLayer,
}

impl ConfigLoader {
    pub fn new(files: Vec<PathBuf>, overrides: PrintConfigurationLayer) -> Self {
        Self { files, overrides }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Read every layer fresh. Missing files are skipped, broken ones logged
    /// and skipped.
    pub fn load(&self) -> PrintConfiguration {
        let mut config = PrintConfiguration::default();

        for path in &self.files {
            match read_layer(path) {
                Ok(Some(layer)) => config.apply(layer),
                Ok(None) => {}
                Err(e) => log::warn!("Skipping settings file: {:#}", e),
            }
        }

        config.apply(self.overrides.clone());
        config
    }
}

fn read_layer(path: &Path) -> Result<Option<PrintConfigurationLayer>> {
    if !path.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let layer = PrintConfigurationLayer::from_toml(&content)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    log::debug!("Loaded print settings from {}", path.display());
    Ok(Some(layer))
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Document path, `-` for stdin
    pub document: Option<PathBuf>,
    /// Explicit language label
    pub language: Option<String>,
    /// Canonical workspace root
    pub workspace: PathBuf,
    /// Root of the static highlighting assets
    pub asset_dir: PathBuf,
    /// Extra mode descriptors
    pub modes_file: Option<PathBuf>,
    pub watch: bool,
    pub list_modes: bool,
    /// Log level
    pub log_level: String,
    /// Source of per-print settings
    pub print_settings: ConfigLoader,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        Self::from_args_with_user_config(args, user_config_file())
    }

    /// Like [`Config::from_args`], with the user-global settings file given
    /// explicitly (`None` skips that layer).
    pub fn from_args_with_user_config(args: Args, user_config: Option<PathBuf>) -> Result<Self> {
        let workspace = match args.workspace {
            Some(dir) => dir
                .canonicalize()
                .with_context(|| format!("Workspace not found: {}", dir.display()))?,
            None => std::env::current_dir()?.canonicalize()?,
        };

        // Settings files, lowest priority first
        let mut files: Vec<PathBuf> = user_config.into_iter().collect();
        files.push(workspace.join(WORKSPACE_CONFIG_FILE));
        if let Some(explicit) = args.config {
            if !explicit.is_file() {
                bail!("Settings file not found: {}", explicit.display());
            }
            files.push(explicit);
        }

        let overrides = PrintConfigurationLayer {
            web_server_port: args.port,
            browser_path: args.browser,
            tab_size: args.tab_size,
            font_size: args.font_size,
            font_family: args.font_family,
            disable_telemetry: args.disable_telemetry.then_some(true),
            print_file_path: args.print_file_path.map(TitlePolicy::from),
            analytics_id: None,
        };

        let asset_dir = args.asset_dir.unwrap_or_else(default_asset_dir);

        Ok(Config {
            document: args.file,
            language: args.language,
            workspace,
            asset_dir,
            modes_file: args.modes,
            watch: args.watch,
            list_modes: args.list_modes,
            log_level: args.log_level,
            print_settings: ConfigLoader::new(files, overrides),
        })
    }

    /// Whether the document comes from stdin rather than a file
    pub fn reads_stdin(&self) -> bool {
        self.document.as_deref() == Some(Path::new("-"))
    }
}

/// `<config dir>/printcode/config.toml`
pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("printcode").join("config.toml"))
}

fn default_asset_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("printcode").join("node_modules"))
        .unwrap_or_else(|| PathBuf::from("node_modules"))
}
