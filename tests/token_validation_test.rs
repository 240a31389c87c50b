//! Token endpoint validation tests

use crate::common::{exchange_form, http_client, TestApp};

mod common;

#[tokio::test]
async fn test_missing_fields_are_listed_exactly() {
    let app = TestApp::spawn_openid(18290).await;
    let client = http_client();

    let response = client
        .post(app.url("/token"))
        .form(&[("grant_type", "authorization_code")])
        .send()
        .await
        .expect("token request failed");
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "validation");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|problem| problem["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["code", "redirect_uri", "code_verifier"]);

    app.stop().await;
}

#[tokio::test]
async fn test_empty_fields_count_as_missing() {
    let app = TestApp::spawn_openid(18291).await;
    let client = http_client();

    let mut form = exchange_form("some-code");
    form[3].1 = String::new(); // code_verifier

    let response = client
        .post(app.url("/token"))
        .form(&form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|problem| problem["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["code_verifier"]);

    app.stop().await;
}

#[tokio::test]
async fn test_unparsable_code_is_rejected_with_400() {
    let app = TestApp::spawn_openid(18292).await;
    let client = http_client();

    let response = client
        .post(app.url("/token"))
        .form(&exchange_form("invalid"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "malformed_code");

    app.stop().await;
}

#[tokio::test]
async fn test_code_without_identity_is_rejected_with_400() {
    let app = TestApp::spawn_openid(18293).await;
    let client = http_client();

    let response = client
        .post(app.url("/token"))
        .form(&exchange_form("name=Ann&email=ann%40x.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "missing_identity");

    app.stop().await;
}

#[tokio::test]
async fn test_wrong_content_type_is_a_server_error() {
    let app = TestApp::spawn_openid(18294).await;
    let client = http_client();

    let response = client
        .post(app.url("/token"))
        .json(&serde_json::json!({
            "code": "whatever",
            "grant_type": "authorization_code",
            "redirect_uri": "http://rp/cb",
            "code_verifier": "v"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);

    app.stop().await;
}
