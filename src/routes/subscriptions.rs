use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::startup::AppState;

// `curl --request POST --data '{"email": "ursula@example.com"}' --verbose http://127.0.0.1:8000/subscribe`
// => 201 Created 구독 요청 성공
// => 400 Bad Request JSON이 아니거나 이메일이 유효하지 않음
// => 409 Conflict 이미 구독함
// => 503 Service Unavailable 뉴스레터 구성이 없음
// `Content-Type`과 관계없이 본문을 JSON으로 해석한다.
#[tracing::instrument(name = "Adding a new newsletter subscriber.", skip_all)]
pub async fn subscribe(State(gateway): State<AppState>, body: Bytes) -> Response {
    gateway.subscribe(&body).await.into_response()
}
