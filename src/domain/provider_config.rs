use secrecy::Secret;

use crate::utils::error_chain_fmt;

/// 설정에서 선택한 뉴스레터 제공자
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsletterProvider {
    Disabled,
    Buttondown,
    Unsupported(String),
}

impl NewsletterProvider {
    pub fn as_str(&self) -> &str {
        match self {
            NewsletterProvider::Disabled => "disabled",
            NewsletterProvider::Buttondown => "buttondown",
            NewsletterProvider::Unsupported(name) => name,
        }
    }
}

impl From<Option<&str>> for NewsletterProvider {
    fn from(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            None | Some("") => Self::Disabled,
            Some("buttondown") => Self::Buttondown,
            Some(other) => Self::Unsupported(other.to_string()),
        }
    }
}

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Newsletter provider is disabled.")]
    Disabled,
    #[error("Newsletter provider \"{0}\" is not supported by this route.")]
    UnsupportedProvider(String),
    #[error(
        "Newsletter is not configured yet. Missing BUTTONDOWN_API_KEY or BUTTONDOWN_USERNAME."
    )]
    MissingCredentials,
}

impl std::fmt::Debug for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// 구독 요청을 제공자에게 전달하는 방법
///
/// 요청마다 `ProviderConfig::check`로 한번 선택한다.
#[derive(Debug)]
pub enum DeliveryMode<'a> {
    /// API 키로 인증해서 구독자를 생성한다.
    Api { api_key: &'a Secret<String> },
    /// 인증 없이 공개 임베드 폼으로 제출한다.
    Embed { username: &'a str },
}

impl DeliveryMode<'_> {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::Api { .. } => "api",
            DeliveryMode::Embed { .. } => "embed",
        }
    }
}

/// 시작할 때 한번 만들어지고 이후로는 읽기만 하는 제공자 구성
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: NewsletterProvider,
    pub api_key: Option<Secret<String>>,
    pub embed_username: Option<String>,
    pub fallback_url: Option<String>,
}

impl ProviderConfig {
    /// 구성이 구독을 처리할 수 있는지 확인하고 사용할 전달 방법을 고른다.
    /// API 키가 있으면 언제나 API 방식을 사용한다.
    pub fn check(&self) -> Result<DeliveryMode<'_>, ConfigurationError> {
        match &self.provider {
            NewsletterProvider::Disabled => return Err(ConfigurationError::Disabled),
            NewsletterProvider::Unsupported(name) => {
                return Err(ConfigurationError::UnsupportedProvider(name.clone()))
            }
            NewsletterProvider::Buttondown => {}
        }

        match (&self.api_key, &self.embed_username) {
            (Some(api_key), _) => Ok(DeliveryMode::Api { api_key }),
            (None, Some(username)) => Ok(DeliveryMode::Embed { username }),
            (None, None) => Err(ConfigurationError::MissingCredentials),
        }
    }
}

/// 자동 구독이 불가능할 때 사용자에게 보여줄 대체 연락 링크를 정한다.
///
/// 명시적으로 지정한 URL, 제공자의 구독 페이지, `mailto:` 링크 순서로 고른다.
/// 공백 문자열은 지정하지 않은 것으로 취급한다.
pub fn derive_fallback_url(
    explicit: Option<&str>,
    hosted_base_url: &str,
    username: Option<&str>,
    contact_email: Option<&str>,
) -> Option<String> {
    fn non_blank(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }

    if let Some(url) = non_blank(explicit) {
        return Some(url.to_string());
    }
    if let Some(username) = non_blank(username) {
        return Some(format!(
            "{}/{}",
            hosted_base_url.trim_end_matches('/'),
            username
        ));
    }
    non_blank(contact_email).map(|email| {
        format!(
            "mailto:{}?subject={}",
            email,
            urlencoding::encode("Newsletter Subscription")
        )
    })
}
