//! Construction-time configuration for a mock server
//!
//! There is no environment or file based configuration: every server starts
//! from an explicit, in-memory [`ServerConfig`] and leaves nothing behind
//! after it stops.

use crate::error::{AppError, Result};
use std::net::{SocketAddr, ToSocketAddrs};
use url::Url;

/// Audience placed in every minted token; the relying party under test is
/// expected to accept this fixed client id.
pub const TEST_CLIENT_ID: &str = "someClientId";

/// Lifetime of minted tokens, in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// PEM encoded certificate + private key for HTTPS listeners.
#[derive(Debug, Clone)]
pub struct TlsMaterial {
    pub cert_pem: String,
    pub key_pem: String,
}

/// Immutable configuration of one mock server instance.
///
/// The base URL's scheme, host, port and path all matter: the port is bound,
/// the path becomes the route prefix, and the full URL is the token issuer.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Provider name, used in log spans (e.g. "oauth2", "openid")
    pub name: String,
    /// Base URL of the mock; the port is mandatory
    pub base_url: Url,
    /// Serve HTTPS when present, plain HTTP otherwise
    pub tls: Option<TlsMaterial>,
}

impl ServerConfig {
    /// Validates and builds a config. A base URL without an explicit,
    /// non-zero port is a fatal configuration error, raised here before any
    /// socket is opened.
    pub fn new(name: impl Into<String>, base_url: Url, tls: Option<TlsMaterial>) -> Result<Self> {
        match base_url.port() {
            Some(port) if port != 0 => Ok(Self {
                name: name.into(),
                base_url,
                tls,
            }),
            _ => Err(AppError::Config(format!(
                "port is not defined in the base url ({base_url})"
            ))),
        }
    }

    pub fn port(&self) -> u16 {
        // new() guarantees presence
        self.base_url.port().unwrap_or_default()
    }

    /// The route prefix derived from the base URL path ("/" means none).
    pub fn base_path(&self) -> &str {
        self.base_url.path()
    }

    /// Issuer string placed in minted tokens and discovery metadata.
    pub fn issuer(&self) -> String {
        self.base_url.to_string()
    }

    /// Absolute URL of an endpoint below the base URL.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// Socket address the listener binds to. IPv4 is preferred so that the
    /// listener and the clients of a test agree on an address family for
    /// names like `localhost`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let host = self
            .base_url
            .host_str()
            .ok_or_else(|| AppError::Config(format!("no host in base url ({})", self.base_url)))?;
        let addrs: Vec<SocketAddr> = (host, self.port()).to_socket_addrs()?.collect();
        addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| AppError::Config(format!("cannot resolve host '{host}'")))
    }
}
