//! Command-line entry point.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use tokio::signal;

use crate::config::Config;
use crate::host::FileHost;
use crate::invoke::{PrintCommand, SystemBrowser};
use crate::mode::ModeRegistry;
use crate::server::{AssetRoot, PrintServer};
use crate::watch::DocumentWatcher;

/// Print the document named on the command line, then keep serving until
/// interrupted (re-printing on save with `--watch`).
pub async fn run() -> Result<()> {
    let config = Config::from_args_and_env()?;
    init_logging(&config.log_level);

    let mut registry = ModeRegistry::builtin();
    if let Some(modes_file) = &config.modes_file {
        registry.extend_from_file(modes_file)?;
    }

    if config.list_modes {
        list_modes(&registry);
        return Ok(());
    }

    let host = FileHost::from_config(&config)?;
    let watch_path = match host.document_path() {
        Some(path) if config.watch => Some(path.to_path_buf()),
        None if config.watch => {
            log::warn!("--watch has no effect on a document read from stdin");
            None
        }
        _ => None,
    };

    let assets = AssetRoot::new(&config.asset_dir);
    if !assets.root().is_dir() {
        log::warn!(
            "Asset directory {} does not exist, pages will render without highlighting",
            assets.root().display()
        );
    }

    let server = Arc::new(PrintServer::new(Arc::new(host), Arc::new(registry), assets));
    let command = PrintCommand::new(server.clone(), SystemBrowser);

    command.invoke().await;
    if server.local_addr().await.is_none() && watch_path.is_none() {
        bail!("Print server could not be started");
    }

    match watch_path {
        Some(path) => watch_and_print(&command, &path).await?,
        None => signal::ctrl_c().await?,
    }

    log::info!("Shutting down");
    Ok(())
}

async fn watch_and_print(command: &PrintCommand, path: &Path) -> Result<()> {
    let mut watcher = DocumentWatcher::new(path)?;
    log::info!("Watching {} for changes", path.display());

    loop {
        tokio::select! {
            changed = watcher.changed() => {
                if changed.is_none() {
                    break;
                }
                command.invoke().await;
            }
            result = signal::ctrl_c() => {
                result?;
                break;
            }
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn list_modes(registry: &ModeRegistry) {
    for descriptor in registry.descriptors() {
        println!("{:<28} {}", descriptor.display_name, descriptor.mode_id);
    }
}
