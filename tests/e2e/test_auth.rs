use crate::e2e::helpers;

use helpers::{api_client::encode, assertions::assert_error_body, TestContext, TestOptions};
use hyper::StatusCode;
use naija_tts_backend::infrastructure::auth::api_key::MAX_KEY_BODY_BYTES;
use serde_json::json;
use test_context::test_context;

const API_KEY: &str = "naija-test-key";

async fn gated_context() -> TestContext {
    TestContext::with_options(TestOptions {
        api_keys: vec![API_KEY.to_string(), "second-key".to_string()],
        ..TestOptions::default()
    })
    .await
    .unwrap()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_allow_anonymous_requests_when_no_keys_configured(ctx: &TestContext) {
    let response = ctx.client.get("/speak?text=Hello").await.unwrap();
    response.assert_status(StatusCode::OK);

    let response = ctx.client.get("/stats").await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["tier"], "demo");
}

#[tokio::test]
async fn it_should_reject_requests_without_a_key() {
    let ctx = gated_context().await;

    let response = ctx.client.get("/speak?text=Hello").await.unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_error_body(response.body.as_ref().unwrap(), "Unauthorized");
    assert_eq!(ctx.engines[0].calls(), 0);
}

#[tokio::test]
async fn it_should_reject_unknown_keys() {
    let ctx = gated_context().await;

    let response = ctx
        .client
        .get_with_key("/speak?text=Hello", "not-a-real-key")
        .await
        .unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = ctx
        .client
        .get_with_key("/stats", "not-a-real-key")
        .await
        .unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn it_should_accept_key_from_header() {
    let ctx = gated_context().await;

    let response = ctx
        .client
        .get_with_key("/speak?text=Hello", API_KEY)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("x-engine-used", "fake-neural");
}

#[tokio::test]
async fn it_should_accept_key_from_query() {
    let ctx = gated_context().await;

    let path = format!("/speak?text=Hello&api_key={}", encode("second-key"));
    let response = ctx.client.get(&path).await.unwrap();

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_accept_key_from_json_body() {
    let ctx = gated_context().await;

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Hello", "api_key": API_KEY }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("x-characters-processed", "5");
}

#[tokio::test]
async fn it_should_accept_key_from_form_body() {
    let ctx = gated_context().await;

    let response = ctx
        .client
        .post_form("/speak", &[("text", "Hello"), ("api_key", API_KEY)])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn it_should_keep_discovery_endpoints_public() {
    let ctx = gated_context().await;

    ctx.client
        .get("/health")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    ctx.client
        .get("/voices")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx.client.get("/").await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["features"]["api_key_required"],
        true
    );
}

#[tokio::test]
async fn it_should_report_paid_tier_for_keyed_callers() {
    let ctx = gated_context().await;

    let response = ctx.client.get_with_key("/stats", API_KEY).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["tier"], "paid");
}

#[tokio::test]
async fn it_should_treat_unreadable_key_header_as_missing() {
    let ctx = gated_context().await;

    let response = ctx
        .client
        .get_with_raw_key("/speak?text=hello", b"\xff")
        .await
        .unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.engines[0].calls(), 0);
}

#[tokio::test]
async fn it_should_reject_oversized_bodies_instead_of_skipping_the_key_check() {
    let ctx = gated_context().await;
    // Just over the limit, so the upload completes before the early response
    let huge = "a".repeat(MAX_KEY_BODY_BYTES + 1024);

    let response = ctx
        .client
        .post_form("/speak?text=hello", &[("text", huge.as_str())])
        .await
        .unwrap();

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(ctx.engines[0].calls(), 0);

    let response = ctx
        .client
        .post_form("/speak?text=hello", &[("text", "hi")])
        .await
        .unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);
}
