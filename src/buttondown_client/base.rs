use axum::body::Bytes;
use http::StatusCode;

use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum ProviderError {
    #[error("ButtondownClient: Url Error")]
    UrlParseError(#[from] url::ParseError),
    #[error("ButtondownClient: Reqwest Error")]
    ReqwestError(#[from] reqwest::Error),
}

impl std::fmt::Debug for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// 구독자 생성 API의 요청 본문
#[derive(serde::Serialize)]
pub struct CreateSubscriberBody<'a> {
    pub email_address: &'a str,
}

/// 제공자가 돌려준 응답
/// 본문은 해석하지 않고 그대로 보관한다.
#[derive(Debug)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ProviderResponse {
    pub async fn read(response: reqwest::Response) -> Result<Self, ProviderError> {
        let status = response.status();
        let body = response.bytes().await?;
        Ok(Self { status, body })
    }

    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
