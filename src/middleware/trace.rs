//! Request-span maker that keeps codes and tokens out of the logs.
//!
//! The mock's authorization codes carry the whole identity in clear text, so
//! a plain URI log line would leak every synthetic credential a test uses.

use axum::http::Request;
use tower_http::trace::MakeSpan;
use tracing::Span;

/// Query parameter names whose values are redacted in logged URIs.
const SENSITIVE_PARAMS: &[&str] = &["code", "access_token", "id_token", "code_verifier"];

/// A `MakeSpan` implementation producing one span per request with a
/// sanitized URI.
#[derive(Clone, Debug)]
pub struct SanitizedMakeSpan;

impl<B> MakeSpan<B> for SanitizedMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %sanitize_uri(request.uri()),
        )
    }
}

fn sanitize_uri(uri: &axum::http::Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let sanitized = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive(key) => format!("{key}=[REDACTED]"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", uri.path(), sanitized)
}

fn is_sensitive(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_PARAMS.iter().any(|s| key == *s)
}
