use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;

use crate::{
    domain::{ErrorCategory, SubscriptionFailure},
    startup::AppState,
};

#[derive(serde::Serialize)]
struct StatusBody<'a> {
    message: &'static str,
    provider: &'a str,
    mode: &'static str,
    #[serde(rename = "fallbackUrl", skip_serializing_if = "Option::is_none")]
    fallback_url: Option<&'a str>,
}

// curl -v http://127.0.0.1:8000/subscription-status
// => 200 OK 구독을 받을 수 있음
// => 503 Service Unavailable 구성이 없거나 지원하지 않는 제공자
#[tracing::instrument(name = "Checking the newsletter configuration.", skip_all)]
pub async fn subscription_status(State(gateway): State<AppState>) -> Response {
    match gateway.check_configuration() {
        Ok(mode) => (
            StatusCode::OK,
            Json(StatusBody {
                message: "Newsletter service is ready.",
                provider: gateway.config().provider.as_str(),
                mode: mode.as_str(),
                fallback_url: gateway.fallback_url(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Newsletter provider is not usable.");
            SubscriptionFailure::new(
                ErrorCategory::ConfigMissing,
                e.to_string(),
                gateway.fallback_url(),
            )
            .into_response()
        }
    }
}
