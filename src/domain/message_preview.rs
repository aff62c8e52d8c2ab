use std::fmt;

use super::Message;

const MAX_PREVIEW_CHARS: usize = 80;
const EMPTY_CONVERSATION: &str = "Start conversation...";

/// One-line rendering of a conversation's latest message for list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePreview(String);

impl MessagePreview {
    pub fn from_last_message(message: Option<&Message>) -> Self {
        match message {
            Some(m) => match m.kind.placeholder() {
                Some(placeholder) => Self(placeholder.to_string()),
                None => Self(truncate(m.payload.trim())),
            },
            None => Self(EMPTY_CONVERSATION.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessagePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_PREVIEW_CHARS {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(MAX_PREVIEW_CHARS).collect();
    truncated.push('…');
    truncated
}
