use crate::e2e::helpers;

use helpers::{
    api_client::encode,
    assertions::{assert_audio_headers, assert_error_body},
    engines::FakeEngine,
    TestContext, TestOptions,
};
use hyper::StatusCode;
use naija_tts_backend::infrastructure::audio::validate_wav;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_repeat_requests_from_cache(ctx: &TestContext) {
    let body = json!({ "text": "Hello Nigeria", "voice": "nigerian-female" });

    let cold = ctx.client.post("/speak", &body).await.unwrap();
    cold.assert_status(StatusCode::OK);
    cold.assert_header("x-cached", "False")
        .assert_header("cache-control", "no-cache")
        .assert_header("x-voice-used", "nigerian-female")
        .assert_header("x-engine-used", "fake-neural")
        .assert_header("content-type", "audio/mpeg");
    assert_audio_headers(&cold.headers, cold.body_bytes.len());
    assert!(!cold.body_bytes.is_empty());

    let warm = ctx.client.post("/speak", &body).await.unwrap();
    warm.assert_status(StatusCode::OK);
    warm.assert_header("x-cached", "True")
        .assert_header("cache-control", "public, max-age=3600");
    assert_eq!(cold.body_bytes, warm.body_bytes);
    assert_eq!(ctx.engines[0].calls(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_query_parameters(ctx: &TestContext) {
    let path = format!(
        "/speak?text={}&voice=pidgin-female&language=pcm",
        encode("How you dey?")
    );
    let response = ctx.client.get(&path).await.unwrap();

    response.assert_status(StatusCode::OK);
    response
        .assert_header("x-voice-used", "pidgin-female")
        .assert_header("x-characters-processed", "12")
        .assert_header(
            "content-disposition",
            "inline; filename=\"tts_pidgin-female.mp3\"",
        );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_form_bodies(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/speak", &[("text", "Kedu"), ("voice", "igbo-accent")])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("x-voice-used", "igbo-accent");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fall_back_to_default_voice_for_unknown_ids(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Hello", "voice": "robot-9000" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("x-voice-used", "nigerian-female");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/speak", &json!({ "voice": "nigerian-male" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_error_body(response.body.as_ref().unwrap(), "Text parameter is required");

    let response = ctx.client.get("/speak?text=%20%20").await.unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.engines[0].calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_formats(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Hello", "format": "ogg" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Unsupported format");
    assert_eq!(
        response.body.as_ref().unwrap()["details"]["kind"],
        "bad_request"
    );
}

#[tokio::test]
async fn it_should_reject_oversized_text_before_synthesis() {
    let ctx = TestContext::with_options(TestOptions {
        max_text_length: 20,
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "a".repeat(21) }))
        .await
        .unwrap();

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body = response.body.as_ref().unwrap();
    assert_error_body(body, "Text too long");
    assert_eq!(body["details"]["length"], 21);
    assert_eq!(body["details"]["max"], 20);
    assert_eq!(body["details"]["tier"], "demo");
    assert_eq!(ctx.engines[0].calls(), 0);

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "a".repeat(20) }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_bypass_cache_when_asked(ctx: &TestContext) {
    let body = json!({ "text": "No cache please", "cache": false });

    let first = ctx.client.post("/speak", &body).await.unwrap();
    let second = ctx.client.post("/speak", &body).await.unwrap();

    first.assert_status(StatusCode::OK);
    second.assert_status(StatusCode::OK);
    second.assert_header("x-cached", "False");
    assert_ne!(first.body_bytes, second.body_bytes);
    assert_eq!(ctx.engines[0].calls(), 2);
}

#[tokio::test]
async fn it_should_fall_through_to_the_next_engine() {
    let ctx = TestContext::with_options(TestOptions {
        engines: vec![
            Arc::new(FakeEngine::failing("fake-cloud")),
            Arc::new(FakeEngine::wav_only("fake-offline")),
        ],
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Sannu", "voice": "hausa-accent" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response
        .assert_header("x-engine-used", "fake-offline")
        .assert_header("x-fallback", "False")
        .assert_header("content-type", "audio/wav")
        .assert_header(
            "content-disposition",
            "inline; filename=\"tts_hausa-accent.wav\"",
        );
    assert!(validate_wav(&response.body_bytes).is_ok());
    assert_eq!(ctx.engines[0].calls(), 1);
}

#[tokio::test]
async fn it_should_return_placeholder_audio_when_every_engine_fails() {
    let ctx = TestContext::with_options(TestOptions {
        engines: vec![
            Arc::new(FakeEngine::failing("fake-cloud")),
            Arc::new(FakeEngine::failing("fake-offline")),
        ],
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Hello Nigeria" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response
        .assert_header("x-engine-used", "placeholder")
        .assert_header("x-fallback", "True")
        .assert_header("content-type", "audio/wav");
    assert!(!response.body_bytes.is_empty());
    assert!(validate_wav(&response.body_bytes).is_ok());

    // Placeholder audio is not cached
    let again = ctx
        .client
        .post("/speak", &json!({ "text": "Hello Nigeria" }))
        .await
        .unwrap();
    again.assert_header("x-cached", "False");
}

#[tokio::test]
async fn it_should_list_attempted_engines_when_no_placeholder() {
    let ctx = TestContext::with_options(TestOptions {
        engines: vec![
            Arc::new(FakeEngine::failing("fake-cloud")),
            Arc::new(FakeEngine::failing("fake-offline")),
        ],
        placeholder_enabled: false,
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/speak", &json!({ "text": "Hello Nigeria" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body = response.body.as_ref().unwrap();
    assert_error_body(body, "TTS generation failed");

    let attempted = body["details"]["attempted_engines"].as_array().unwrap();
    assert_eq!(attempted.len(), 2);
    assert_eq!(attempted[0]["engine"], "fake-cloud");
    assert_eq!(attempted[0]["reason"], "fake-cloud is down");
    assert_eq!(attempted[1]["engine"], "fake-offline");
}

#[tokio::test]
async fn it_should_skip_cloning_engines_for_voices_without_samples() {
    let ctx = TestContext::with_options(TestOptions {
        engines: vec![
            Arc::new(FakeEngine::cloning("fake-clone")),
            Arc::new(FakeEngine::working("fake-neural")),
        ],
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx.client.get("/speak?text=Hello").await.unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("x-engine-used", "fake-neural");
    assert_eq!(ctx.engines[0].calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_count_cache_hits_in_stats(ctx: &TestContext) {
    let body = json!({ "text": "Ẹ kú àárọ̀", "voice": "yoruba-accent" });
    ctx.client.post("/speak", &body).await.unwrap();
    ctx.client.post("/speak", &body).await.unwrap();

    let response = ctx.client.get("/stats").await.unwrap();
    response.assert_status(StatusCode::OK);

    let stats = response.body.as_ref().unwrap();
    assert_eq!(stats["usage"]["total_requests"], 2);
    assert_eq!(stats["usage"]["cache_hits"], 1);
    assert_eq!(stats["usage"]["cache_misses"], 1);
    assert_eq!(stats["usage"]["engines"]["fake-neural"]["successes"], 1);
    assert_eq!(stats["cache"]["enabled"], true);
    assert_eq!(stats["cache"]["entries"], 1);
    assert_eq!(stats["tier"], "demo");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_the_test_sentence_without_cache(ctx: &TestContext) {
    let first = ctx.client.get("/test").await.unwrap();
    let second = ctx.client.get("/test").await.unwrap();

    first.assert_status(StatusCode::OK);
    first.assert_header("x-voice-used", "nigerian-female");
    second.assert_header("x-cached", "False");
    assert_eq!(ctx.engines[0].calls(), 2);
}

#[tokio::test]
async fn it_should_apply_text_limits_by_tier() {
    let ctx = TestContext::with_options(TestOptions {
        api_keys: vec!["demo".to_string(), "paid-key".to_string()],
        ..TestOptions::default()
    })
    .await
    .unwrap();
    let body = json!({ "text": "a".repeat(501) });

    let demo = ctx.client.post_with_key("/speak", &body, "demo").await.unwrap();
    demo.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    demo.assert_error_message("500 characters for the demo tier");
    assert_eq!(ctx.engines[0].calls(), 0);

    let paid = ctx
        .client
        .post_with_key("/speak", &body, "paid-key")
        .await
        .unwrap();
    paid.assert_status(StatusCode::OK);
    paid.assert_header("x-api-tier", "paid");

    let short = ctx
        .client
        .post_with_key("/speak", &json!({ "text": "Hello" }), "demo")
        .await
        .unwrap();
    short.assert_header("x-api-tier", "demo");

    let stats = ctx.client.get_with_key("/stats", "demo").await.unwrap();
    assert_eq!(
        stats.body.as_ref().unwrap()["limits"]["characters_per_request"],
        500
    );
    let stats = ctx.client.get_with_key("/stats", "paid-key").await.unwrap();
    assert_eq!(
        stats.body.as_ref().unwrap()["limits"]["characters_per_request"],
        5000
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_flag_cached_audio_in_another_format(ctx: &TestContext) {
    let mp3 = ctx
        .client
        .post("/speak", &json!({ "text": "Good morning", "format": "mp3" }))
        .await
        .unwrap();
    mp3.assert_header("x-format-requested", "mp3")
        .assert_header("content-type", "audio/mpeg");

    let wav = ctx
        .client
        .post("/speak", &json!({ "text": "Good morning", "format": "wav" }))
        .await
        .unwrap();

    wav.assert_status(StatusCode::OK);
    wav.assert_header("x-cached", "True")
        .assert_header("x-format-requested", "wav")
        .assert_header("content-type", "audio/mpeg");
    assert_eq!(mp3.body_bytes, wav.body_bytes);
}
