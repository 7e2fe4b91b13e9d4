use serde_json::Value;
use std::collections::HashMap;

#[allow(dead_code)]
pub fn assert_error_body(response: &Value, expected_error: &str) {
    let error = response
        .get("error")
        .and_then(|v| v.as_str())
        .expect("Missing error field");
    assert!(
        error.contains(expected_error),
        "Expected error to contain '{}', got '{}'",
        expected_error,
        error
    );
    assert!(
        response.get("request_id").and_then(|v| v.as_str()).is_some(),
        "Missing request_id"
    );
}

#[allow(dead_code)]
pub fn assert_audio_headers(headers: &HashMap<String, String>, body_len: usize) {
    for name in [
        "content-type",
        "content-disposition",
        "content-length",
        "x-voice-used",
        "x-engine-used",
        "x-cached",
        "x-characters-processed",
        "x-audio-size",
        "x-generated-at",
        "x-fallback",
        "x-format-requested",
        "x-api-tier",
        "cache-control",
        "x-request-id",
    ] {
        assert!(headers.contains_key(name), "Missing {} header", name);
    }

    assert!(headers["content-type"].starts_with("audio/"));
    assert!(headers["content-disposition"].starts_with("inline; filename=\"tts_"));
    assert_eq!(headers["content-length"], body_len.to_string());
    assert_eq!(headers["x-audio-size"], body_len.to_string());
}

#[allow(dead_code)]
pub fn assert_voice_summary(voice: &Value) {
    for field in ["id", "name", "description", "language", "sample_text"] {
        assert!(
            voice.get(field).and_then(|v| v.as_str()).is_some(),
            "Missing voice field '{}'",
            field
        );
    }
    assert!(voice.get("cloned").and_then(|v| v.as_bool()).is_some());
}
