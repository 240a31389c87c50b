//! HTTPS listener tests

use crate::common::{https_client, TestApp};

mod common;

#[tokio::test]
async fn test_tls_mock_serves_discovery_over_https() {
    let app = TestApp::spawn_openid_tls(18490).await;

    let response = https_client()
        .get(app.url("/.well-known/openid-configuration"))
        .send()
        .await
        .expect("https discovery request failed");
    assert_eq!(response.status(), 200);

    let doc: serde_json::Value = response.json().await.unwrap();
    assert_eq!(doc["issuer"], app.issuer());
    assert!(doc["issuer"].as_str().unwrap().starts_with("https://"));

    app.stop().await;
}

#[tokio::test]
async fn test_tls_token_exchange_works_end_to_end() {
    let app = TestApp::spawn_openid_tls(18491).await;

    let identity = idp_mock::identity::ExternalIdentity::new(
        idp_mock::identity::Provider::OpenId,
        "u1",
        "Ann",
    );
    let code = idp_mock::code::encode(&identity, None);

    let response = https_client()
        .post(app.url("/token"))
        .form(&crate::common::exchange_form(&code))
        .send()
        .await
        .expect("https token request failed");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["token_type"], "Bearer");

    app.stop().await;
}
