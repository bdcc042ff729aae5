// 제공자 임베드 페이지의 마크업에 의존하는 코드는 이 파일에만 둔다.

const STATUS_BLOCK_OPEN: &str =
    r#"<script id="subscriber_facing_authentication" type="application/json">"#;
const SCRIPT_CLOSE: &str = "</script>";

/// 임베드 폼 응답에 포함된 구독 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedStatus {
    Confirmed,
    Unconfirmed,
    Other(String),
}

impl EmbedStatus {
    /// 제공자가 구독을 받아들였음을 나타내는 상태인지 확인한다.
    pub fn is_subscribed(&self) -> bool {
        matches!(self, EmbedStatus::Confirmed | EmbedStatus::Unconfirmed)
    }
}

impl From<&str> for EmbedStatus {
    fn from(status: &str) -> Self {
        match status {
            "email_address_confirmed" => Self::Confirmed,
            "email_address_unconfirmed" => Self::Unconfirmed,
            other => Self::Other(other.to_string()),
        }
    }
}

/// HTML 안의 `subscriber_facing_authentication` JSON 블록에서 `status`를 읽는다.
/// 블록이 없거나 JSON이 깨졌거나 `status`가 문자열이 아니면 `None`이다.
pub fn extract_embed_status(html: &str) -> Option<EmbedStatus> {
    // ASCII 소문자 변환은 바이트 위치를 바꾸지 않는다.
    let lowered = html.to_ascii_lowercase();
    let start = lowered.find(STATUS_BLOCK_OPEN)? + STATUS_BLOCK_OPEN.len();
    let end = start + lowered[start..].find(SCRIPT_CLOSE)?;

    let payload: serde_json::Value = serde_json::from_str(&html[start..end]).ok()?;
    payload
        .get("status")
        .and_then(serde_json::Value::as_str)
        .map(EmbedStatus::from)
}
