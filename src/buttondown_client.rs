mod base;
mod embed;
mod provider_message;

use std::time::Duration;

pub use base::{CreateSubscriberBody, ProviderError, ProviderResponse};
pub use embed::{extract_embed_status, EmbedStatus};
pub use provider_message::extract_provider_message;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use url::Url;

use crate::{domain::SubscriberEmail, settings::ButtondownSettings};

/// Buttondown으로 구독 요청을 보내는 HTTP 클라이언트
///
/// 요청마다 한번만 호출하고 재시도하지 않는다.
pub struct ButtondownClient {
    http_client: Client,
    api_base_url: Url,
    embed_base_url: Url,
}

impl ButtondownClient {
    /// `timeout`이 `None`이면 `reqwest`의 기본값(제한 없음)을 사용한다.
    pub fn new(
        api_base_url: &str,
        embed_base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
            api_base_url: Url::parse(api_base_url)?,
            embed_base_url: Url::parse(embed_base_url)?,
        })
    }

    pub fn from_buttondown_settings(settings: &ButtondownSettings) -> Result<Self, ProviderError> {
        Self::new(
            &settings.api_base_url,
            &settings.embed_base_url,
            settings.timeout_milliseconds.map(Duration::from_millis),
        )
    }

    /// `POST {api_base_url}/v1/subscribers`
    #[tracing::instrument(name = "Creating a subscriber through the Buttondown API.", skip_all)]
    pub async fn create_subscriber(
        &self,
        email: &SubscriberEmail,
        api_key: &Secret<String>,
    ) -> Result<ProviderResponse, ProviderError> {
        let url = endpoint(&self.api_base_url, "v1/subscribers")?;
        let response = self
            .http_client
            .post(url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", api_key.expose_secret()),
            )
            .json(&CreateSubscriberBody {
                email_address: email.as_ref(),
            })
            .send()
            .await?;
        ProviderResponse::read(response).await
    }

    /// `POST {embed_base_url}/embed-subscribe/{username}`
    /// 인증 없이 폼 데이터로 제출한다.
    #[tracing::instrument(name = "Submitting the Buttondown embed form.", skip(self, email))]
    pub async fn embed_subscribe(
        &self,
        email: &SubscriberEmail,
        username: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let url = endpoint(
            &self.embed_base_url,
            &format!("embed-subscribe/{}", urlencoding::encode(username)),
        )?;
        let response = self
            .http_client
            .post(url)
            .form(&[("email", email.as_ref())])
            .send()
            .await?;
        ProviderResponse::read(response).await
    }
}

// `Url::join`은 마지막 경로 조각을 대체하므로 기준 URL이 `/`로 끝나게 만든다.
fn endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path_with_slash = format!("{}/", base.path());
        base.set_path(&path_with_slash);
    }
    base.join(path)
}
