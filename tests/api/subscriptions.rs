use wiremock::{
    matchers::{any, body_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{TestApp, TEST_API_KEY, TEST_USERNAME};

const VALID_BODY: &str = r#"{"email": "ursula_le_guin@gmail.com"}"#;

#[tokio::test]
async fn subscribe_returns_a_201_for_a_valid_email() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;
    Mock::given(method("POST"))
        .and(path("/v1/subscribers"))
        .and(header("Authorization", format!("Token {}", TEST_API_KEY).as_str()))
        .and(body_json(serde_json::json!({ "email_address": "a@b.com" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&test_app.provider_server)
        .await;

    // 실행
    let response = test_app.post_subscribe(r#"{"email": "a@b.com"}"#).await?;

    // 확인
    assert_eq!(response.status(), http::StatusCode::CREATED);
    let body: serde_json::Value = response.json().await?;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(!message.is_empty());
    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_400_for_a_malformed_body() -> Result<(), anyhow::Error> {
    let test_app = TestApp::spawn_app().await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&test_app.provider_server)
        .await;

    let response = test_app.post_subscribe("email=ursula").await?;

    assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "Request body must be valid JSON.");
    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_400_when_the_email_is_missing_or_invalid() -> Result<(), anyhow::Error>
{
    // 테스트 데이터
    let test_cases = vec![
        (r#"{}"#, "Email is required.", "missing email"),
        (r#"{"email": "   "}"#, "Email is required.", "blank email"),
        (
            r#"{"email": "ursuladomain.com"}"#,
            "Please enter a valid email address.",
            "missing @",
        ),
        (
            r#"{"email": "ursula@domain"}"#,
            "Please enter a valid email address.",
            "missing domain dot",
        ),
        (
            r#"{"email": "ursula le@domain.com"}"#,
            "Please enter a valid email address.",
            "contains whitespace",
        ),
    ];

    // 준비
    let test_app = TestApp::spawn_app().await?;
    // 검증에 실패하면 제공자를 호출하지 않는다.
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&test_app.provider_server)
        .await;

    for (body, error, description) in test_cases {
        // 실행
        let response = test_app.post_subscribe(body).await?;

        // 확인
        assert_eq!(
            response.status(),
            http::StatusCode::BAD_REQUEST,
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"], error, "{}", description);
        assert_eq!(
            body["fallbackUrl"],
            format!("https://buttondown.com/{}", TEST_USERNAME)
        );
    }

    Ok(())
}

#[tokio::test]
async fn provider_errors_are_mapped_to_client_statuses() -> Result<(), anyhow::Error> {
    // (제공자 상태, 제공자 본문, 기대하는 상태)
    let test_cases = vec![
        (409, serde_json::json!({"detail": "duplicate"}), 409),
        (400, serde_json::json!({"error": "already subscribed"}), 409),
        (400, serde_json::json!({"error": "email is weird"}), 400),
        (422, serde_json::json!({"detail": [{"msg": "bad"}]}), 400),
        (401, serde_json::json!({"detail": "Invalid token"}), 503),
        (403, serde_json::json!({}), 503),
        (429, serde_json::json!({}), 429),
        (500, serde_json::json!({"message": "boom"}), 502),
    ];

    for (provider_status, provider_body, expected) in test_cases {
        let test_app = TestApp::spawn_app().await?;
        Mock::given(method("POST"))
            .and(path("/v1/subscribers"))
            .respond_with(ResponseTemplate::new(provider_status).set_body_json(provider_body))
            .expect(1)
            .mount(&test_app.provider_server)
            .await;

        let response = test_app.post_subscribe(VALID_BODY).await?;

        assert_eq!(
            response.status().as_u16(),
            expected,
            "provider status was {}",
            provider_status
        );
        let body: serde_json::Value = response.json().await?;
        assert!(body["error"].is_string());
        assert!(body["fallbackUrl"].is_string());
    }

    Ok(())
}

#[tokio::test]
async fn rejected_credentials_do_not_leak_the_provider_message() -> Result<(), anyhow::Error> {
    let test_app = TestApp::spawn_app().await?;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"detail": "Invalid token: test-api-key"})),
        )
        .expect(1)
        .mount(&test_app.provider_server)
        .await;

    let response = test_app.post_subscribe(VALID_BODY).await?;

    assert_eq!(response.status(), http::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await?;
    let error = body["error"].as_str().unwrap_or_default();
    assert!(error.contains("temporarily unavailable"));
    assert!(!error.contains("Invalid token"));
    Ok(())
}

#[tokio::test]
async fn subscribe_uses_the_embed_form_without_an_api_key() -> Result<(), anyhow::Error> {
    let test_app = TestApp::spawn_embed_app().await?;
    Mock::given(method("POST"))
        .and(path(format!("/embed-subscribe/{}", TEST_USERNAME)))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><script id="subscriber_facing_authentication" type="application/json">{"status": "email_address_confirmed"}</script></html>"#,
        ))
        .expect(1)
        .mount(&test_app.provider_server)
        .await;
    Mock::given(path("/v1/subscribers"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&test_app.provider_server)
        .await;

    let response = test_app.post_subscribe(VALID_BODY).await?;

    assert_eq!(response.status(), http::StatusCode::CREATED);
    let request = &test_app.provider_server.received_requests().await.unwrap()[0];
    assert_eq!(
        String::from_utf8_lossy(&request.body),
        "email=ursula_le_guin%40gmail.com"
    );
    Ok(())
}

#[tokio::test]
async fn embed_failure_returns_a_502() -> Result<(), anyhow::Error> {
    let test_app = TestApp::spawn_embed_app().await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
        .expect(1)
        .mount(&test_app.provider_server)
        .await;

    let response = test_app.post_subscribe(VALID_BODY).await?;

    assert_eq!(response.status(), http::StatusCode::BAD_GATEWAY);
    Ok(())
}

// 알려진 한계: 임베드 응답으로는 실패를 구분할 수 없어서 제출된 것으로 본다.
#[tokio::test]
async fn embed_response_without_status_is_reported_as_submitted() -> Result<(), anyhow::Error> {
    let test_app = TestApp::spawn_embed_app().await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Thanks?</html>"))
        .expect(1)
        .mount(&test_app.provider_server)
        .await;

    let response = test_app.post_subscribe(VALID_BODY).await?;

    assert_eq!(response.status(), http::StatusCode::CREATED);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(
        body["message"],
        "Subscription request submitted. Please check your inbox to confirm."
    );
    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_503_when_the_provider_is_disabled() -> Result<(), anyhow::Error> {
    let test_app = TestApp::spawn_app_with(|newsletter| newsletter.provider = None).await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&test_app.provider_server)
        .await;

    let response = test_app.post_subscribe(VALID_BODY).await?;

    assert_eq!(response.status(), http::StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "Newsletter provider is disabled.");
    Ok(())
}

#[tokio::test]
async fn blog_form_path_accepts_subscriptions() -> Result<(), anyhow::Error> {
    let test_app = TestApp::spawn_app().await?;
    Mock::given(method("POST"))
        .and(path("/v1/subscribers"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&test_app.provider_server)
        .await;

    let response = reqwest::Client::new()
        .post(test_app.uri()?.join("api/newsletter")?)
        .json(&serde_json::json!({ "email": "a@b.com" }))
        .send()
        .await?;

    assert_eq!(response.status(), http::StatusCode::CREATED);
    Ok(())
}
