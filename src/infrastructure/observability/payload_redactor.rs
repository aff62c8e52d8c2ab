const MAX_VISIBLE_CHARS: usize = 100;

const SENSITIVE_PARAMS: [&str; 5] = ["token=", "sig=", "signature=", "key=", "x-amz-signature="];

/// Renders a message payload for log output.
///
/// Text is cut to a bounded length and signed-URL query parameters are
/// redacted so blob store credentials never reach the logs.
pub fn redact_payload(payload: &str) -> String {
    let trimmed = payload.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let visible = if trimmed.chars().count() > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", head, trimmed.chars().count())
    } else {
        trimmed.to_string()
    };

    redact_query_params(&visible)
}

fn redact_query_params(text: &str) -> String {
    let mut result = text.to_string();
    for param in SENSITIVE_PARAMS {
        let mut search_from = 0;
        while let Some(offset) = result[search_from..].to_ascii_lowercase().find(param) {
            let start = search_from + offset + param.len();
            let end = result[start..]
                .find(|c: char| c == '&' || c.is_whitespace())
                .map(|i| start + i)
                .unwrap_or(result.len());
            result.replace_range(start..end, "[REDACTED]");
            search_from = start + "[REDACTED]".len();
        }
    }

    result
}
