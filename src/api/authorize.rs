//! Interactive authorization endpoint
//!
//! `GET /authorize` renders the provider's "login" page. The page never
//! invents an identity: the test driver fills in the inputs (or scripts the
//! page) and the embedded script builds the redirect
//! `{redirect_uri}?state={state}&code={encoded identity}`. `state` is opaque
//! here and echoed byte-for-byte.

use crate::server::MockState;
use axum::{
    extract::{Query, State},
    response::Html,
};
use std::collections::HashMap;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Mock __NAME__ sign-in</title>
</head>
<body>
    <h1>Mock __NAME__ sign-in</h1>
    <form id="login-form">
        <label>User id <input id="id" name="id"></label>
        <label>Name <input id="name" name="name"></label>
        <label>Email <input id="email" name="email" type="email"></label>
        <button type="submit">Login</button>
    </form>
    <script>
        const params = __PARAMS__;
        document.getElementById('login-form').addEventListener('submit', (event) => {
            event.preventDefault();
            const code = new URLSearchParams();
            code.set('provider', params.provider);
            code.set('id', document.getElementById('id').value);
            code.set('name', document.getElementById('name').value);
            const email = document.getElementById('email').value;
            if (email) {
                code.set('email', email);
            }
            if (params.nonce) {
                code.set('nonce', params.nonce);
            }
            const target = new URL(params.redirect_uri);
            target.searchParams.set('state', params.state ?? '');
            target.searchParams.set('code', code.toString());
            window.location.assign(target.toString());
        });
    </script>
</body>
</html>
"#;

/// Serve the consent/login page for an authorization request.
///
/// All query parameters (`state`, `redirect_uri`, and `nonce` for OpenID)
/// are passed through to the page verbatim.
pub async fn authorize(
    State(state): State<MockState>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Html<String> {
    params.insert("provider".to_string(), state.config.name.clone());
    Html(render_page(&state.config.name, &params))
}

fn render_page(name: &str, params: &HashMap<String, String>) -> String {
    let params_json = serde_json::to_string(params)
        .unwrap_or_else(|_| "{}".to_string())
        // keep an embedded "</script>" from ending the script block
        .replace("</", "<\\/");
    PAGE_TEMPLATE
        .replace("__NAME__", name)
        .replace("__PARAMS__", &params_json)
}
