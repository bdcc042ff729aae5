use crate::{buttondown_client::ProviderError, utils::error_chain_fmt};

// 애플리케이션을 구동할 때 발생하는 오류를 모은 래퍼 타입
// 요청 처리 중의 오류는 `SubscriptionOutcome`으로 바뀌므로 여기에 포함되지 않는다.
#[derive(thiserror::Error)]
pub enum NewsletterGatewayError {
    #[error("IO Error")]
    IOError(#[from] std::io::Error),

    #[error("Config Error")]
    ConfigError(#[from] config::ConfigError),

    #[error("Provider Client Error")]
    ProviderError(#[from] ProviderError),
}

impl std::fmt::Debug for NewsletterGatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
