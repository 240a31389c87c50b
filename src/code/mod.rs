//! Authorization code codec
//!
//! The mock's authorization codes are not a security boundary: a code is the
//! identity itself, serialized as a percent-encoded `key=value` blob that is
//! safe to place in a URL query parameter or a form field. The token and
//! userinfo endpoints decode it back; nothing is looked up server-side.

use crate::error::{AppError, Result};
use crate::identity::{ExternalIdentity, Provider};
use std::collections::HashMap;
use url::form_urlencoded;

/// Serialize an identity plus an optional nonce into an opaque code string.
///
/// The encoding is deterministic: fields are always written in the same
/// order, absent options are omitted entirely.
pub fn encode(identity: &ExternalIdentity, nonce: Option<&str>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer
        .append_pair("provider", identity.provider.as_str())
        .append_pair("id", &identity.id)
        .append_pair("name", &identity.name);
    if let Some(email) = &identity.email {
        serializer.append_pair("email", email);
    }
    if let Some(nonce) = nonce {
        serializer.append_pair("nonce", nonce);
    }
    serializer.finish()
}

/// Inverse of [`encode`].
///
/// Fails with [`AppError::MalformedCode`] when the string is not a parsable
/// query blob, and with [`AppError::MissingIdentity`] when it parses but
/// carries no `id` — the token endpoint maps both to a 400, with stable,
/// distinguishable error bodies.
///
/// A blob without a `provider` key decodes as [`Provider::OAuth2`]; codes
/// hand-built by test drivers predate that key.
pub fn decode(code: &str) -> Result<(ExternalIdentity, Option<String>)> {
    let fields = parse_query_blob(code)?;

    let id = match fields.get("id") {
        Some(id) if !id.is_empty() => id.clone(),
        _ => return Err(AppError::MissingIdentity),
    };

    let provider = match fields.get("provider") {
        Some(value) => Provider::from_name(value)
            .ok_or_else(|| AppError::MalformedCode(format!("unknown provider '{value}'")))?,
        None => Provider::OAuth2,
    };

    let identity = ExternalIdentity {
        provider,
        id,
        name: fields.get("name").cloned().unwrap_or_default(),
        email: fields.get("email").cloned(),
    };
    let nonce = fields.get("nonce").cloned();

    Ok((identity, nonce))
}

/// Strict `key=value&...` parser. `form_urlencoded::parse` alone never
/// rejects anything, so the pair shape is checked first to keep garbage like
/// `invalid` out.
fn parse_query_blob(code: &str) -> Result<HashMap<String, String>> {
    if code.is_empty() {
        return Err(AppError::MalformedCode("empty code".to_string()));
    }
    for pair in code.split('&') {
        if !pair.contains('=') {
            return Err(AppError::MalformedCode(format!(
                "'{pair}' is not a key=value pair"
            )));
        }
    }

    Ok(form_urlencoded::parse(code.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect())
}
