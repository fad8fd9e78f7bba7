//! The print command: start the server if needed and open the page.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::server::PrintServer;

/// Opens URLs for the user. Best effort, failures are not reported back.
pub trait BrowserLauncher: Send + Sync {
    /// `browser_path` empty means the platform's default handler
    fn launch(&self, url: &str, browser_path: &str);
}

/// Launches through the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn launch(&self, url: &str, browser_path: &str) {
        let result = if browser_path.is_empty() {
            open::that_detached(url)
        } else {
            open::with_detached(url, browser_path)
        };

        if let Err(e) = result {
            log::warn!("Failed to open {} in the browser: {}", url, e);
        }
    }
}

/// URL of the print page; the mode query is omitted when unresolved
pub fn print_url(addr: SocketAddr, mode: Option<&str>) -> String {
    match mode {
        Some(mode) => format!("http://{}/?mode={}", addr, mode),
        None => format!("http://{}/", addr),
    }
}

pub struct PrintCommand {
    server: Arc<PrintServer>,
    launcher: Box<dyn BrowserLauncher>,
}

impl PrintCommand {
    pub fn new(server: Arc<PrintServer>, launcher: impl BrowserLauncher + 'static) -> Self {
        Self {
            server,
            launcher: Box::new(launcher),
        }
    }

    /// Run one print. Returns the URL handed to the browser, or `None` when
    /// the server could not start or there is nothing to print.
    pub async fn invoke(&self) -> Option<String> {
        let config = self.server.host().configuration();
        let addr = self.server.ensure_started(config.web_server_port).await?;

        let Some(document) = self.server.host().active_document() else {
            log::warn!("Nothing to print: no active document");
            return None;
        };

        // Only for the URL; the page handler resolves the mode again
        let mode = self.server.registry().resolve(&document.language_id);
        let url = print_url(addr, mode);

        log::info!("Opening {}", url);
        self.launcher.launch(&url, &config.browser_path);
        Some(url)
    }
}
