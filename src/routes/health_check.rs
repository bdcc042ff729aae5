use axum::response::{IntoResponse, Response};

// curl -v http://127.0.0.1:8000/health_check => 200 OK
// 뉴스레터 구성과 관계없이 서버가 살아 있는지만 확인한다.
pub async fn health_check() -> Response {
    http::StatusCode::OK.into_response()
}
