use serde_json::Value;

/// 제공자의 오류 응답 본문에서 사람이 읽을 수 있는 메시지를 꺼낸다.
///
/// 다음 형태를 순서대로 시도한다.
/// - JSON 문자열
/// - `detail`이 목록인 객체 (`"; "`로 이어 붙인다.)
/// - `detail`, `error`, `message` 중 문자열인 필드
///
/// 어떤 형태와도 맞지 않거나 JSON이 아니면 빈 문자열을 반환한다.
pub fn extract_provider_message(body: &[u8]) -> String {
    let Ok(payload) = serde_json::from_slice::<Value>(body) else {
        return String::new();
    };

    if let Value::String(message) = &payload {
        return message.clone();
    }

    if let Some(Value::Array(items)) = payload.get("detail") {
        return items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.as_str()),
                Value::Object(_) => item.get("msg").and_then(Value::as_str),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
    }

    ["detail", "error", "message"]
        .iter()
        .find_map(|key| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_default()
        .to_string()
}
