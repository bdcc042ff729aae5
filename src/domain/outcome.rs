use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;

pub const SUBSCRIBED_MESSAGE: &str =
    "Subscription successful. Please check your inbox to confirm.";
pub const SUBMITTED_MESSAGE: &str =
    "Subscription request submitted. Please check your inbox to confirm.";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const RETRY_LATER_MESSAGE: &str = "Unable to subscribe right now. Please try again later.";

/// 클라이언트에게 돌려주는 실패의 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ConfigMissing,
    InvalidInput,
    AlreadySubscribed,
    ProviderRejected,
    ProviderUnavailable,
    RateLimited,
    UpstreamError,
    NetworkError,
    MalformedResponse,
}

impl ErrorCategory {
    /// 분류마다 고정된 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCategory::InvalidInput
            | ErrorCategory::MalformedResponse
            | ErrorCategory::ProviderRejected => StatusCode::BAD_REQUEST,
            ErrorCategory::AlreadySubscribed => StatusCode::CONFLICT,
            ErrorCategory::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCategory::UpstreamError | ErrorCategory::NetworkError => StatusCode::BAD_GATEWAY,
            ErrorCategory::ConfigMissing | ErrorCategory::ProviderUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFailure {
    pub category: ErrorCategory,
    pub message: String,
    pub fallback_url: Option<String>,
}

impl SubscriptionFailure {
    pub fn new(
        category: ErrorCategory,
        message: impl Into<String>,
        fallback_url: Option<&str>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            fallback_url: fallback_url.map(str::to_string),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.category.status()
    }
}

/// 구독 시도 한번의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    Success { message: String },
    Failure(SubscriptionFailure),
}

impl SubscriptionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    pub fn failure(
        category: ErrorCategory,
        message: impl Into<String>,
        fallback_url: Option<&str>,
    ) -> Self {
        Self::Failure(SubscriptionFailure::new(category, message, fallback_url))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            SubscriptionOutcome::Success { .. } => StatusCode::CREATED,
            SubscriptionOutcome::Failure(failure) => failure.status(),
        }
    }
}

#[derive(serde::Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(rename = "fallbackUrl", skip_serializing_if = "Option::is_none")]
    fallback_url: Option<&'a str>,
}

impl IntoResponse for SubscriptionFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.message,
            fallback_url: self.fallback_url.as_deref(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl IntoResponse for SubscriptionOutcome {
    fn into_response(self) -> Response {
        match self {
            SubscriptionOutcome::Success { message } => (
                StatusCode::CREATED,
                Json(MessageBody { message: &message }),
            )
                .into_response(),
            SubscriptionOutcome::Failure(failure) => failure.into_response(),
        }
    }
}
