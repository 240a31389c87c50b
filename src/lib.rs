//! Mock external identity providers for integration tests.
//!
//! This crate provides disposable test-double HTTP(S) servers that emulate an
//! OAuth2 authorization server and an OpenID Connect provider well enough to
//! drive login flows of a real identity service under test: authorization-code
//! exchange, signed ID/access tokens, discovery metadata and a JWKS document.
//!
//! A server is constructed per test, [`server::MockServer::start`]ed,
//! exercised over real HTTP, then stopped in a teardown hook. Stopping
//! forcibly drains every live connection so test runs never hang on an idle
//! keep-alive socket.

pub mod api;
pub mod code;
pub mod config;
pub mod error;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod provider;
pub mod server;

// Re-export commonly used types
pub use config::{ServerConfig, TlsMaterial};
pub use error::{AppError, Result};
pub use identity::{ExternalIdentity, Provider};
pub use jwt::SigningKeyProvider;
pub use server::MockServer;
