//! Token endpoint
//!
//! `POST /token` exchanges an authorization code for a signed token pair.
//! Validation order matters and is part of the contract:
//!
//! 1. content type must be `application/x-www-form-urlencoded` — anything
//!    else is a bug in the relying party and surfaces as a 500;
//! 2. `code`, `grant_type`, `redirect_uri` and `code_verifier` must be
//!    present and non-empty — violations return 400 listing exactly the
//!    offending fields;
//! 3. the code must decode to an identity with a non-empty id — 400.
//!
//! `grant_type` and `redirect_uri` are deliberately not cross-checked
//! against the original authorization request; this mock does not enforce
//! redirect-URI binding.

use crate::code;
use crate::error::{AppError, FieldError, Result};
use crate::jwt::IdTokenClaims;
use crate::server::MockState;
use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::form_urlencoded;

const REQUIRED_FIELDS: &[&str] = &["code", "grant_type", "redirect_uri", "code_verifier"];

/// Successful token exchange response. The mock does not distinguish token
/// types: `access_token` and `id_token` are the same JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub id_token: String,
    pub token_type: String,
}

pub async fn token(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<TokenResponse>> {
    require_form_content_type(&headers)?;

    let form = parse_form(&body);
    let code = validate_exchange_request(&form)?;

    let (identity, nonce) = code::decode(code)?;
    let claims = IdTokenClaims::for_identity(&identity, nonce, &state.config.issuer());
    let token = state.signer.sign(&claims)?;

    Ok(Json(TokenResponse {
        access_token: token.clone(),
        id_token: token,
        token_type: "Bearer".to_string(),
    }))
}

fn require_form_content_type(headers: &HeaderMap) -> Result<()> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        Ok(())
    } else {
        Err(AppError::Protocol(format!(
            "unexpected content type '{content_type}' on token endpoint"
        )))
    }
}

fn parse_form(body: &str) -> HashMap<String, String> {
    form_urlencoded::parse(body.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Check the four required fields, collecting one problem per offending
/// field, and hand back the code on success.
fn validate_exchange_request(form: &HashMap<String, String>) -> Result<&str> {
    let problems: Vec<FieldError> = REQUIRED_FIELDS
        .iter()
        .filter(|field| form.get(**field).is_none_or(|value| value.is_empty()))
        .map(|field| FieldError::new(*field, "must be a non-empty string"))
        .collect();

    if !problems.is_empty() {
        return Err(AppError::Validation(problems));
    }

    Ok(form["code"].as_str())
}
