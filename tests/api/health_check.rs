use crate::helpers::TestApp;

// `tokio::test`는 테스팅에 있어서 `tokio::main`과 동등하다.
#[tokio::test]
async fn health_check_works() -> Result<(), anyhow::Error> {
    // 준비
    let test_app = TestApp::spawn_app().await?;
    let client = reqwest::Client::new();

    // 실행
    let response = client
        .get(test_app.uri()?.join("health_check")?)
        .send()
        .await?;

    // 확인
    assert_eq!(response.status(), http::StatusCode::OK);
    assert_eq!(Some(0), response.content_length());

    Ok(())
}

#[tokio::test]
async fn health_check_works_without_newsletter_configuration() -> Result<(), anyhow::Error> {
    let test_app = TestApp::spawn_app_with(|newsletter| newsletter.provider = None).await?;

    let response = reqwest::get(test_app.uri()?.join("health_check")?).await?;

    assert_eq!(response.status(), http::StatusCode::OK);
    Ok(())
}
