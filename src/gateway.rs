use http::StatusCode;
use secrecy::Secret;
use tracing::field;

use crate::{
    buttondown_client::{
        extract_embed_status, extract_provider_message, ButtondownClient, ProviderError,
        ProviderResponse,
    },
    domain::{
        ConfigurationError, DeliveryMode, ErrorCategory, InvalidSubscriberEmail, ProviderConfig,
        SubscriberEmail, SubscriptionFailure, SubscriptionOutcome, INVALID_EMAIL_MESSAGE,
        RETRY_LATER_MESSAGE, SUBMITTED_MESSAGE, SUBSCRIBED_MESSAGE,
    },
    utils::error_chain_fmt,
};

const ALREADY_SUBSCRIBED_MESSAGE: &str = "You are already subscribed.";
const UNAVAILABLE_MESSAGE: &str =
    "Newsletter service is temporarily unavailable. Please use the fallback link.";
const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again in a minute.";

#[derive(thiserror::Error)]
pub enum SubscriptionRequestError {
    #[error("Request body must be valid JSON.")]
    MalformedBody(#[source] serde_json::Error),
    #[error(transparent)]
    InvalidEmail(#[from] InvalidSubscriberEmail),
}

impl std::fmt::Debug for SubscriptionRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl SubscriptionRequestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SubscriptionRequestError::MalformedBody(_) => ErrorCategory::MalformedResponse,
            SubscriptionRequestError::InvalidEmail(_) => ErrorCategory::InvalidInput,
        }
    }
}

/// 신뢰할 수 없는 요청 본문에서 구독할 이메일을 꺼낸다.
///
/// `email`이 없거나 문자열이 아니면 빈 값으로 취급한다.
pub fn parse_subscription_request(
    raw_input: &[u8],
) -> Result<SubscriberEmail, SubscriptionRequestError> {
    let payload: serde_json::Value =
        serde_json::from_slice(raw_input).map_err(SubscriptionRequestError::MalformedBody)?;
    let email = payload
        .get("email")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    Ok(SubscriberEmail::try_from(email.to_string())?)
}

/// 뉴스레터 구독 요청을 받아서 제공자에게 전달하고 결과를 정규화한다.
///
/// 구성과 HTTP 클라이언트는 시작할 때 한번 만들어지고 요청 사이에 공유된다.
pub struct SubscriptionGateway {
    config: ProviderConfig,
    client: ButtondownClient,
}

impl SubscriptionGateway {
    pub fn new(config: ProviderConfig, client: ButtondownClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn fallback_url(&self) -> Option<&str> {
        self.config.fallback_url.as_deref()
    }

    pub fn check_configuration(&self) -> Result<DeliveryMode<'_>, ConfigurationError> {
        self.config.check()
    }

    /// 요청 하나를 처리한다. 검증에 실패하면 제공자를 호출하지 않고,
    /// 그렇지 않으면 정확히 한번 호출한다. 재시도는 하지 않는다.
    #[tracing::instrument(
        name = "Subscribing to the newsletter.",
        skip_all,
        fields(subscriber_email = field::Empty, delivery_mode = field::Empty)
    )]
    pub async fn subscribe(&self, raw_input: &[u8]) -> SubscriptionOutcome {
        let email = match parse_subscription_request(raw_input) {
            Ok(email) => email,
            Err(e) => {
                tracing::info!(error = %e, "Rejected a subscription request.");
                return SubscriptionOutcome::failure(
                    e.category(),
                    e.to_string(),
                    self.fallback_url(),
                );
            }
        };
        tracing::Span::current().record("subscriber_email", field::display(&email));

        let mode = match self.check_configuration() {
            Ok(mode) => mode,
            Err(e) => {
                tracing::warn!(error = %e, "Newsletter provider is not usable.");
                return SubscriptionOutcome::failure(
                    ErrorCategory::ConfigMissing,
                    e.to_string(),
                    self.fallback_url(),
                );
            }
        };
        tracing::Span::current().record("delivery_mode", mode.as_str());

        let outcome = match mode {
            DeliveryMode::Api { api_key } => self.subscribe_via_api(&email, api_key).await,
            DeliveryMode::Embed { username } => self.subscribe_via_embed(&email, username).await,
        };
        if let SubscriptionOutcome::Failure(failure) = &outcome {
            tracing::warn!(
                category = ?failure.category,
                error = %failure.message,
                "Newsletter provider did not accept the subscription."
            );
        }
        outcome
    }

    async fn subscribe_via_api(
        &self,
        email: &SubscriberEmail,
        api_key: &Secret<String>,
    ) -> SubscriptionOutcome {
        let response = self.client.create_subscriber(email, api_key).await;
        interpret_api_response(response, self.fallback_url())
    }

    async fn subscribe_via_embed(
        &self,
        email: &SubscriberEmail,
        username: &str,
    ) -> SubscriptionOutcome {
        let response = self.client.embed_subscribe(email, username).await;
        interpret_embed_response(response, self.fallback_url())
    }
}

/// 구독자 생성 API의 응답을 결과로 바꾼다.
pub fn interpret_api_response(
    response: Result<ProviderResponse, ProviderError>,
    fallback_url: Option<&str>,
) -> SubscriptionOutcome {
    let response = match response {
        Ok(response) => response,
        Err(e) => return network_failure(e, fallback_url),
    };

    if response.status.is_success() {
        return SubscriptionOutcome::success(SUBSCRIBED_MESSAGE);
    }

    let provider_message = extract_provider_message(&response.body);
    SubscriptionOutcome::Failure(map_provider_error(
        response.status,
        &provider_message,
        fallback_url,
    ))
}

/// 제공자의 실패 응답을 클라이언트용 오류로 바꾼다.
pub fn map_provider_error(
    status: StatusCode,
    provider_message: &str,
    fallback_url: Option<&str>,
) -> SubscriptionFailure {
    let already_subscribed = provider_message.to_lowercase().contains("already");
    let or_default = |default: &str| {
        if provider_message.is_empty() {
            default.to_string()
        } else {
            provider_message.to_string()
        }
    };

    let (category, message) = match status {
        StatusCode::CONFLICT => (
            ErrorCategory::AlreadySubscribed,
            ALREADY_SUBSCRIBED_MESSAGE.to_string(),
        ),
        StatusCode::BAD_REQUEST if already_subscribed => (
            ErrorCategory::AlreadySubscribed,
            ALREADY_SUBSCRIBED_MESSAGE.to_string(),
        ),
        StatusCode::BAD_REQUEST => (
            ErrorCategory::InvalidInput,
            INVALID_EMAIL_MESSAGE.to_string(),
        ),
        StatusCode::UNPROCESSABLE_ENTITY => {
            (ErrorCategory::InvalidInput, or_default(INVALID_EMAIL_MESSAGE))
        }
        // 인증 실패는 사용자에게 서비스 중단으로 보인다.
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => (
            ErrorCategory::ProviderUnavailable,
            UNAVAILABLE_MESSAGE.to_string(),
        ),
        StatusCode::TOO_MANY_REQUESTS => {
            (ErrorCategory::RateLimited, RATE_LIMITED_MESSAGE.to_string())
        }
        _ => (ErrorCategory::UpstreamError, or_default(RETRY_LATER_MESSAGE)),
    };

    SubscriptionFailure::new(category, message, fallback_url)
}

/// 임베드 폼 응답을 결과로 바꾼다.
///
/// 임베드 응답만으로는 구독 결과를 확실히 알 수 없다.
/// 상태 블록이 없거나 알 수 없는 상태면 제출된 것으로 보고 성공을 반환하므로
/// 실제 실패가 가려질 수 있다.
pub fn interpret_embed_response(
    response: Result<ProviderResponse, ProviderError>,
    fallback_url: Option<&str>,
) -> SubscriptionOutcome {
    let response = match response {
        Ok(response) => response,
        Err(e) => return network_failure(e, fallback_url),
    };

    if !response.status.is_success() {
        return SubscriptionOutcome::failure(
            ErrorCategory::UpstreamError,
            RETRY_LATER_MESSAGE,
            fallback_url,
        );
    }

    match extract_embed_status(&response.text()) {
        Some(status) if status.is_subscribed() => SubscriptionOutcome::success(SUBSCRIBED_MESSAGE),
        status => {
            tracing::warn!(
                embed_status = ?status,
                "Embed response did not confirm the subscription. Assuming it was submitted."
            );
            SubscriptionOutcome::success(SUBMITTED_MESSAGE)
        }
    }
}

fn network_failure(error: ProviderError, fallback_url: Option<&str>) -> SubscriptionOutcome {
    tracing::error!(
        error = %error,
        error_detail = ?error,
        "Failed to reach the newsletter provider."
    );
    SubscriptionOutcome::failure(ErrorCategory::NetworkError, RETRY_LATER_MESSAGE, fallback_url)
}
