//! Start-once lifecycle of the local print server.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::assets::AssetRoot;
use super::routes::{AppState, build_router};
use crate::host::EditorHost;
use crate::mode::ModeRegistry;

struct RunningServer {
    addr: SocketAddr,
    _task: JoinHandle<()>,
}

/// The local print server.
///
/// Binds at most one socket over its lifetime and never stops serving. A
/// port change after the first successful start is ignored until the
/// process restarts.
pub struct PrintServer {
    state: AppState,
    running: Mutex<Option<RunningServer>>,
}

impl PrintServer {
    pub fn new(host: Arc<dyn EditorHost>, registry: Arc<ModeRegistry>, assets: AssetRoot) -> Self {
        Self {
            state: AppState {
                host,
                registry,
                assets: Arc::new(assets),
            },
            running: Mutex::new(None),
        }
    }

    pub fn host(&self) -> &dyn EditorHost {
        self.state.host.as_ref()
    }

    pub fn registry(&self) -> &ModeRegistry {
        &self.state.registry
    }

    /// Router over this server's state, without a socket
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Address of the listening socket, if started
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|running| running.addr)
    }

    /// Start listening on `127.0.0.1:port` unless already listening.
    ///
    /// Returns the address actually serving. Bind failures are logged and
    /// return `None`; the next call tries again.
    pub async fn ensure_started(&self, port: u16) -> Option<SocketAddr> {
        let mut running = self.running.lock().await;

        if let Some(server) = running.as_ref() {
            if server.addr.port() != port {
                log::debug!(
                    "Print server already listening on {}, ignoring port {}",
                    server.addr,
                    port
                );
            }
            return Some(server.addr);
        }

        let bind_addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        let listener = match TcpListener::bind(bind_addr).await {
            Ok(listener) => listener,
            Err(e) => {
                log::error!("Failed to bind print server to {}: {}", bind_addr, e);
                return None;
            }
        };
        let addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                log::error!("Print server socket has no local address: {}", e);
                return None;
            }
        };

        let router = self.router();
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                log::error!("Print server on {} stopped: {}", addr, e);
            }
        });

        log::info!("Print server listening on http://{}", addr);
        *running = Some(RunningServer { addr, _task: task });
        Some(addr)
    }
}
