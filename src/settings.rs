use secrecy::{ExposeSecret, Secret};
use serde_aux::prelude::deserialize_number_from_string;
use tokio::net::TcpListener;

use crate::{
    buttondown_client::{ButtondownClient, ProviderError},
    domain::{derive_fallback_url, NewsletterProvider, ProviderConfig},
    startup::Server,
};

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub newsletter: NewsletterSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct NewsletterSettings {
    // 비어 있으면 뉴스레터를 사용하지 않는다.
    pub provider: Option<String>,
    pub contact_email: Option<String>,
    pub fallback_url: Option<String>,
    pub buttondown: ButtondownSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ButtondownSettings {
    pub api_base_url: String,
    pub embed_base_url: String,
    pub hosted_base_url: String,
    pub api_key: Option<Secret<String>>,
    pub username: Option<String>,
    pub timeout_milliseconds: Option<u64>,
}

/// 애플리케이션이 사용할 수 있는 런타임 환경
pub enum Environment {
    Local,
    Production,
}

// `Settings`를 이용해서 필요한 타입을 생성한다.
// 복잡함을 피하기 위해서 `get_settings`를 제외하고는 되도록이면 래퍼 함수로 작성한다.
impl Settings {
    pub fn get_settings() -> Result<Self, config::ConfigError> {
        let base_path =
            std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
        let settings_directory = base_path.join("settings");

        // 실행 환경을 식별한다.
        // 지정되지 않았으면 `local`로 기본 설정한다.
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or("local".into())
            .as_str()
            .try_into()
            .map_err(config::ConfigError::Message)?;
        let environment_filename = format!("{}.json", environment.as_str());

        let settings = config::Config::builder()
            .add_source(config::File::from(settings_directory.join("base.json")))
            .add_source(config::File::from(
                settings_directory.join(environment_filename),
            ))
            // 환경 변수로부터 설정에 추가한다.
            // `APP_APPLICATION__PORT=5001` => `Settings.application.port`
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            // Buttondown 문서에 나오는 이름의 환경 변수가 가장 우선한다.
            .set_override_option(
                "newsletter.buttondown.api_key",
                non_blank_env("BUTTONDOWN_API_KEY"),
            )?
            .set_override_option(
                "newsletter.buttondown.username",
                non_blank_env("BUTTONDOWN_USERNAME"),
            )?
            .set_override_option(
                "newsletter.fallback_url",
                non_blank_env("NEWSLETTER_FALLBACK_URL"),
            )?
            .build()?;
        settings.try_deserialize::<Settings>()
    }

    pub async fn build_server(&self) -> Result<Server, crate::error::NewsletterGatewayError> {
        Server::build(self).await
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl ApplicationSettings {
    pub fn get_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub async fn get_listener(&self) -> Result<TcpListener, std::io::Error> {
        TcpListener::bind(self.get_address()).await
    }
}

impl NewsletterSettings {
    /// 요청 처리 중에는 바뀌지 않는 제공자 구성을 만든다.
    /// 문자열은 앞뒤 공백을 제거하고, 빈 문자열은 지정하지 않은 것으로 본다.
    pub fn get_provider_config(&self) -> ProviderConfig {
        let username = non_blank(self.buttondown.username.as_deref());
        let api_key = self
            .buttondown
            .api_key
            .as_ref()
            .and_then(|key| non_blank(Some(key.expose_secret().as_str())))
            .map(Secret::new);
        let fallback_url = derive_fallback_url(
            self.fallback_url.as_deref(),
            &self.buttondown.hosted_base_url,
            username.as_deref(),
            self.contact_email.as_deref(),
        );

        ProviderConfig {
            provider: NewsletterProvider::from(self.provider.as_deref()),
            api_key,
            embed_username: username,
            fallback_url,
        }
    }

    pub fn get_buttondown_client(&self) -> Result<ButtondownClient, ProviderError> {
        ButtondownClient::from_buttondown_settings(&self.buttondown)
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<&str> for Environment {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
