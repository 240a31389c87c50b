//! Common test utilities
//!
//! Each test spawns its own mock on a test-local port; the fixed default
//! ports (8090/8091) are left to suites that run the providers exclusively.

#![allow(dead_code)]

use idp_mock::provider::{self, ProviderOptions};
use idp_mock::{MockServer, TlsMaterial};
use url::Url;

pub const TLS_CERT_PEM: &str = include_str!("../fixtures/tls_cert.pem");
pub const TLS_KEY_PEM: &str = include_str!("../fixtures/tls_key.pem");

pub struct TestApp {
    pub server: MockServer,
}

impl TestApp {
    pub async fn spawn_oauth2(port: u16) -> Self {
        let options = ProviderOptions {
            base_url: Some(base_url("http", port, "oauth2")),
            ..Default::default()
        };
        let mut server = provider::oauth2(options).expect("valid oauth2 config");
        server.start().await.expect("oauth2 mock failed to start");
        Self { server }
    }

    pub async fn spawn_openid(port: u16) -> Self {
        let options = ProviderOptions {
            base_url: Some(base_url("http", port, "openid")),
            ..Default::default()
        };
        let mut server = provider::openid(options).expect("valid openid config");
        server.start().await.expect("openid mock failed to start");
        Self { server }
    }

    pub async fn spawn_openid_tls(port: u16) -> Self {
        let options = ProviderOptions {
            base_url: Some(base_url("https", port, "openid")),
            tls: Some(TlsMaterial {
                cert_pem: TLS_CERT_PEM.to_string(),
                key_pem: TLS_KEY_PEM.to_string(),
            }),
            ..Default::default()
        };
        let mut server = provider::openid(options).expect("valid openid tls config");
        server.start().await.expect("openid tls mock failed to start");
        Self { server }
    }

    pub fn url(&self, path: &str) -> String {
        self.server.url_for(path)
    }

    pub fn issuer(&self) -> String {
        self.server.config().issuer()
    }

    pub async fn stop(mut self) {
        self.server.stop().await;
    }
}

fn base_url(scheme: &str, port: u16, path: &str) -> Url {
    Url::parse(&format!("{scheme}://localhost:{port}/{path}")).unwrap()
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Client that tolerates the self-signed test certificate.
pub fn https_client() -> reqwest::Client {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .unwrap()
}

/// Form body for a well-formed token exchange request.
pub fn exchange_form(code: &str) -> Vec<(&'static str, String)> {
    vec![
        ("code", code.to_string()),
        ("grant_type", "authorization_code".to_string()),
        ("redirect_uri", "http://rp/cb".to_string()),
        ("code_verifier", "v".to_string()),
    ]
}
