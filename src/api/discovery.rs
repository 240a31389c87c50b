//! Discovery endpoints
//!
//! Serves `/.well-known/openid-configuration` and `/jwks`. Every URL in the
//! metadata document is derived from the server's base URL, and the
//! advertised signing algorithm always matches what the token endpoint uses.

use crate::jwt::JwkSet;
use crate::server::MockState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// OpenID Connect provider metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenIdConfiguration {
    pub issuer: String,
    pub jwks_uri: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    pub response_types_supported: Vec<String>,
    pub subject_types_supported: Vec<String>,
    pub id_token_signing_alg_values_supported: Vec<String>,
}

pub async fn openid_configuration(State(state): State<MockState>) -> Json<OpenIdConfiguration> {
    let config = &state.config;
    Json(OpenIdConfiguration {
        issuer: config.issuer(),
        jwks_uri: config.url_for("/jwks"),
        authorization_endpoint: config.url_for("/authorize"),
        token_endpoint: config.url_for("/token"),
        userinfo_endpoint: config.url_for("/userinfo"),
        response_types_supported: vec!["id_token".to_string()],
        subject_types_supported: vec!["public".to_string()],
        id_token_signing_alg_values_supported: vec![state.signer.algorithm_name().to_string()],
    })
}

pub async fn jwks(State(state): State<MockState>) -> Json<JwkSet> {
    Json(state.signer.jwks())
}
