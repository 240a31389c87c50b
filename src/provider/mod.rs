//! Ready-made provider mocks
//!
//! The OAuth2 and OpenID variants are the same [`MockServer`] with different
//! route sets and defaults. Defaults mirror the providers the test suites
//! have always used: `http://localhost:8090/oauth2` and
//! `http://localhost:8091/openid`, signed with the embedded test key.
//! Anything can be overridden through [`ProviderOptions`]; tests that run
//! concurrently are expected to coordinate ports themselves.

use crate::api;
use crate::config::{ServerConfig, TlsMaterial};
use crate::error::Result;
use crate::jwt::SigningKeyProvider;
use crate::server::{MockServer, MockState};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_OAUTH2_URL: &str = "http://localhost:8090/oauth2";
pub const DEFAULT_OPENID_URL: &str = "http://localhost:8091/openid";

/// Construction-time overrides for a provider preset.
#[derive(Default)]
pub struct ProviderOptions {
    /// Base URL override; the default depends on the preset
    pub base_url: Option<Url>,
    /// Serve HTTPS with this material
    pub tls: Option<TlsMaterial>,
    /// Signing key override; the embedded test key otherwise
    pub signing_key: Option<SigningKeyProvider>,
}

/// An OAuth2 authorization-server mock: authorize + token + the legacy
/// `/users` userinfo route.
pub fn oauth2(options: ProviderOptions) -> Result<MockServer> {
    build("oauth2", DEFAULT_OAUTH2_URL, options, Arc::new(oauth2_routes))
}

/// An OpenID Connect provider mock: discovery + JWKS on top of the
/// authorize/token/userinfo set.
pub fn openid(options: ProviderOptions) -> Result<MockServer> {
    build("openid", DEFAULT_OPENID_URL, options, Arc::new(openid_routes))
}

fn build(
    name: &str,
    default_url: &str,
    options: ProviderOptions,
    install_routes: Arc<dyn Fn(Router<MockState>) -> Router<MockState> + Send + Sync>,
) -> Result<MockServer> {
    let base_url = match options.base_url {
        Some(url) => url,
        None => Url::parse(default_url).expect("default provider url is valid"),
    };
    let config = ServerConfig::new(name, base_url, options.tls)?;
    let signer = options
        .signing_key
        .unwrap_or_else(SigningKeyProvider::test_default);
    Ok(MockServer::new(config, signer, install_routes))
}

fn oauth2_routes(router: Router<MockState>) -> Router<MockState> {
    router
        .route("/authorize", get(api::authorize::authorize))
        .route("/token", post(api::token::token))
        .route("/users", get(api::userinfo::userinfo))
}

fn openid_routes(router: Router<MockState>) -> Router<MockState> {
    router
        .route(
            "/.well-known/openid-configuration",
            get(api::discovery::openid_configuration),
        )
        .route("/jwks", get(api::discovery::jwks))
        .route("/authorize", get(api::authorize::authorize))
        .route("/token", post(api::token::token))
        .route("/userinfo", get(api::userinfo::userinfo))
}
