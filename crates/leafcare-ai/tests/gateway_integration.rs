//! Integration tests for the chat and vision gateways using wiremock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{TimeZone, Utc};
use leafcare_ai::{
    AiError, ChatGateway, HealthStatus, Identification, VisionGateway, EMPTY_REPLY,
};
use leafcare_care::AlertKind;
use leafcare_core::{ChatConfig, VisionConfig};
use leafcare_weather::WeatherSnapshot;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_config(server: &MockServer) -> ChatConfig {
    ChatConfig {
        api_key: "groq-key".to_string(),
        base_url: format!("{}/openai/v1", server.uri()),
        timeout_secs: 2,
        ..ChatConfig::default()
    }
}

fn vision_config(server: &MockServer) -> VisionConfig {
    VisionConfig {
        api_key: "hf-key".to_string(),
        base_url: format!("{}/models", server.uri()),
        timeout_secs: 2,
        ..VisionConfig::default()
    }
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

fn weather() -> WeatherSnapshot {
    let t = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
    WeatherSnapshot {
        temperature: 24.0,
        feels_like: 24.0,
        humidity: 90,
        cloud_cover: 100,
        wind_speed: 9.0,
        condition: "Thunderstorm".into(),
        description: "thunderstorm with heavy rain".into(),
        sunrise: t,
        sunset: t,
        city: "Sialkot".into(),
        country: "PK".into(),
        fetched_at: t,
    }
}

#[tokio::test]
async fn test_chat_sends_prompt_and_returns_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("authorization", "Bearer groq-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama-3.3-70b-versatile",
            "max_tokens": 500
        })))
        .and(body_string_contains("Why are my leaves curling?"))
        .and(body_string_contains("Plant context: Tomato on the roof"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Check for aphids.  ")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = ChatGateway::new(&chat_config(&server)).unwrap();
    let reply = gateway.ask("Why are my leaves curling?", Some("Tomato on the roof")).await;
    assert_eq!(reply, "Check for aphids.");
}

#[tokio::test]
async fn test_chat_empty_reply_asks_to_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
        .mount(&server)
        .await;

    let gateway = ChatGateway::new(&chat_config(&server)).unwrap();
    assert_eq!(gateway.ask("hello", None).await, EMPTY_REPLY);
}

#[tokio::test]
async fn test_chat_errors_are_classified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Invalid API Key", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let gateway = ChatGateway::new(&chat_config(&server)).unwrap();
    let reply = gateway.ask("hello", None).await;
    assert!(reply.starts_with("API Key Error"));

    let err = gateway.complete("system", "user", 10).await.unwrap_err();
    assert!(matches!(err, AiError::Auth(message) if message == "Invalid API Key"));
}

#[tokio::test]
async fn test_chat_rate_limit_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let gateway = ChatGateway::new(&chat_config(&server)).unwrap();
    assert!(gateway.ask("hello", None).await.starts_with("Rate Limit"));
}

#[tokio::test]
async fn test_alert_message_generated_then_template_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({ "max_tokens": 200 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Bring the basil inside now!")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = ChatGateway::new(&chat_config(&server)).unwrap();
    let generated = gateway.alert_message(AlertKind::Storm, "Basil", &weather()).await;
    assert_eq!(generated, "Bring the basil inside now!");

    let fallback = gateway.alert_message(AlertKind::Storm, "Basil", &weather()).await;
    assert!(fallback.starts_with("Storm Alert: Severe weather is approaching Sialkot"));
}

#[tokio::test]
async fn test_identify_posts_raw_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/Salesforce/blip-image-captioning-large"))
        .and(header("authorization", "Bearer hf-key"))
        .and(header("content-type", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "generated_text": "a small cactus in a clay pot" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = VisionGateway::new(&vision_config(&server)).unwrap();
    let result = gateway.identify(&[0xFF, 0xD8, 0xFF]).await;
    let plant = result.plant().unwrap();
    assert_eq!(plant.common_name, "Cactus");
    assert_eq!(plant.raw, "a small cactus in a clay pot");
}

#[tokio::test]
async fn test_identify_unrecognized_text_and_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "generated_text": "a cat sitting on a couch" }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "error": "Model is loading"
        })))
        .mount(&server)
        .await;

    let gateway = VisionGateway::new(&vision_config(&server)).unwrap();
    assert_eq!(
        gateway.identify(b"img").await,
        Identification::unrecognized("a cat sitting on a couch")
    );
    assert_eq!(gateway.identify(b"img").await, Identification::unrecognized(""));
}

#[tokio::test]
async fn test_assess_health_from_caption() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "generated_text": "a plant with wilting yellow leaves" }
        ])))
        .mount(&server)
        .await;

    let gateway = VisionGateway::new(&vision_config(&server)).unwrap();
    let assessment = gateway
        .assess_health(b"img", Some("What is wrong?"))
        .await
        .unwrap();
    assert_eq!(assessment.status, HealthStatus::NeedsAttention);
    assert_eq!(assessment.question.as_deref(), Some("What is wrong?"));
    assert_eq!(assessment.findings.len(), 1);
}

#[tokio::test]
async fn test_vision_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = VisionConfig {
        timeout_secs: 1,
        ..vision_config(&server)
    };
    let gateway = VisionGateway::new(&config).unwrap();
    let err = gateway.assess_health(b"img", None).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(err.user_message(), "Request timeout. Please try again.");
}
