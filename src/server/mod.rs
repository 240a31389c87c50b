//! Mock server lifecycle
//!
//! [`MockServer`] wraps one HTTP/HTTPS listener: bind on `start()`, track
//! live connections, drain and forcibly close them on `stop()`. Provider
//! routes are supplied as a route-installer closure at construction, so the
//! OAuth2 and OpenID variants are plain compositions over the same lifecycle.
//!
//! The state machine is `Stopped -> start -> Running -> stop -> Stopped`.
//! `start()` on a running server is an error and leaves the listener
//! undisturbed; `stop()` on a stopped server is a no-op. Neither call
//! returns before its transition is complete.

use crate::config::ServerConfig;
use crate::error::{AppError, Result};
use crate::jwt::SigningKeyProvider;
use crate::middleware::trace::SanitizedMakeSpan;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info};

/// Pause after closing the listener (in-flight response flush) and again
/// after the connection set is empty (socket teardown races).
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

/// Shared state available to every request handler.
#[derive(Clone)]
pub struct MockState {
    pub config: Arc<ServerConfig>,
    pub signer: Arc<SigningKeyProvider>,
}

/// Installs the provider-specific routes onto a fresh router.
pub type RouteInstaller = Arc<dyn Fn(Router<MockState>) -> Router<MockState> + Send + Sync>;

struct RunningServer {
    handle: Handle,
    task: JoinHandle<io::Result<()>>,
}

/// A managed, disposable identity-provider mock.
pub struct MockServer {
    config: Arc<ServerConfig>,
    state: MockState,
    install_routes: RouteInstaller,
    running: Option<RunningServer>,
}

impl MockServer {
    pub fn new(
        config: ServerConfig,
        signer: SigningKeyProvider,
        install_routes: RouteInstaller,
    ) -> Self {
        let config = Arc::new(config);
        let state = MockState {
            config: config.clone(),
            signer: Arc::new(signer),
        };
        Self {
            config,
            state,
            install_routes,
            running: None,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Absolute URL of an endpoint below the server's base URL.
    pub fn url_for(&self, path: &str) -> String {
        self.config.url_for(path)
    }

    /// Number of currently open client connections.
    pub fn connection_count(&self) -> usize {
        self.running
            .as_ref()
            .map(|r| r.handle.connection_count())
            .unwrap_or(0)
    }

    /// Bind the configured port and begin accepting connections.
    ///
    /// Does not return until the listener is actually serving. Fails with
    /// [`AppError::AlreadyRunning`] when called twice without an intervening
    /// [`stop`](Self::stop); bind failures surface as I/O errors here.
    pub async fn start(&mut self) -> Result<()> {
        if self.running.is_some() {
            return Err(AppError::AlreadyRunning);
        }

        let name = self.config.name.clone();
        debug!(server = %name, "starting mock server");

        let router = self.build_router();
        let addr = self.config.socket_addr()?;
        let listener = std::net::TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;

        let handle = Handle::new();
        let task = match &self.config.tls {
            Some(tls) => {
                debug!(server = %name, "TLS enabled");
                // axum-server leaves provider selection to the application
                let _ = rustls::crypto::ring::default_provider().install_default();
                let tls_config = RustlsConfig::from_pem(
                    tls.cert_pem.clone().into_bytes(),
                    tls.key_pem.clone().into_bytes(),
                )
                .await?;
                tokio::spawn(
                    axum_server::from_tcp_rustls(listener, tls_config)
                        .handle(handle.clone())
                        .serve(router.into_make_service()),
                )
            }
            None => tokio::spawn(
                axum_server::from_tcp(listener)
                    .handle(handle.clone())
                    .serve(router.into_make_service()),
            ),
        };

        match handle.listening().await {
            Some(bound) => {
                info!(server = %name, %bound, base_url = %self.config.base_url, "mock server started");
                self.running = Some(RunningServer { handle, task });
                Ok(())
            }
            None => {
                // serve() bailed before listening; the join error carries why
                let err = match task.await {
                    Ok(Err(e)) => AppError::Io(e),
                    Ok(Ok(())) => AppError::Internal(anyhow::anyhow!(
                        "listener exited before accepting connections"
                    )),
                    Err(e) => AppError::Internal(e.into()),
                };
                Err(err)
            }
        }
    }

    /// Stop accepting connections, give in-flight responses a short grace
    /// period, forcibly close every remaining socket, then settle.
    ///
    /// Safe to call on an already-stopped server.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let name = &self.config.name;
        debug!(server = %name, open = running.handle.connection_count(), "stopping mock server");

        // Closes the listener immediately; connections still open after the
        // grace period are terminated unconditionally.
        running.handle.graceful_shutdown(Some(SHUTDOWN_GRACE));

        match running.task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(server = %name, "server task ended with error: {e}"),
            Err(e) => error!(server = %name, "server task panicked: {e}"),
        }

        tokio::time::sleep(SHUTDOWN_GRACE).await;
        info!(server = %name, "mock server stopped");
    }

    fn build_router(&self) -> Router {
        let routes = (self.install_routes)(Router::new());

        // The base URL path becomes the route prefix (e.g. /oauth2/token).
        let base_path = self.config.base_path().trim_end_matches('/');
        let router = if base_path.is_empty() {
            routes
        } else {
            Router::new().nest(base_path, routes)
        };

        router
            .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(self.state.clone())
    }
}
