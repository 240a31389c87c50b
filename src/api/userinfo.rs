//! Userinfo endpoint
//!
//! The bearer "access token" a relying party presents here is the
//! authorization code itself; decoding it recovers the identity. The code
//! blob contains characters outside the RFC 6750 token68 set, so the header
//! is split by hand rather than through a typed Bearer header.

use crate::code;
use crate::error::Result;
use crate::identity::ExternalIdentity;
use axum::{
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};

pub async fn userinfo(headers: HeaderMap) -> Result<Json<ExternalIdentity>> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default();

    let (identity, _nonce) = code::decode(bearer)?;
    Ok(Json(identity))
}
