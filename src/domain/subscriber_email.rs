/// 구독 요청에 포함된 이메일 주소
///
/// `local-part@domain.tld` 형태만 허용한다.
/// 생성할 때 한번 검증하므로 `SubscriberEmail`을 갖고 있다면 언제나 유효한 주소다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum InvalidSubscriberEmail {
    #[error("Email is required.")]
    Empty,
    #[error("Please enter a valid email address.")]
    Malformed(String),
}

/// 정규식 `\s`가 공백으로 보는 문자인지 확인한다.
/// `char::is_whitespace`와 달리 U+FEFF를 포함하고 U+0085는 제외한다.
fn is_pattern_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{0085}') || c == '\u{FEFF}'
}

impl SubscriberEmail {
    /// `^[^\s@]+@[^\s@]+\.[^\s@]+$` 패턴과 같은 검사를 수행한다.
    pub fn is_valid(s: &str) -> bool {
        // `@`는 정확히 한개여야 한다.
        let Some((local_part, domain)) = s.split_once('@') else {
            return false;
        };
        if local_part.is_empty() || domain.contains('@') {
            return false;
        }
        if s.chars().any(is_pattern_whitespace) {
            return false;
        }
        // 도메인의 첫 글자나 마지막 글자가 아닌 곳에 `.`이 있어야 한다.
        domain
            .char_indices()
            .skip(1)
            .any(|(i, c)| c == '.' && i + c.len_utf8() < domain.len())
    }
}

impl TryFrom<String> for SubscriberEmail {
    type Error = InvalidSubscriberEmail;
    /// 앞뒤 공백을 제거한 뒤 검증한다.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let trimmed = s.trim_matches(is_pattern_whitespace);
        if trimmed.is_empty() {
            return Err(InvalidSubscriberEmail::Empty);
        }
        if Self::is_valid(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidSubscriberEmail::Malformed(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
