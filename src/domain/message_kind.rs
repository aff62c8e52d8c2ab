use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Text,
    Voice,
    Image,
    Video,
    File,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Voice => "voice",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::File => "file",
        }
    }

    /// Binary kinds carry a blob store reference instead of literal text.
    pub fn is_attachment(&self) -> bool {
        !matches!(self, MessageKind::Text)
    }

    /// List-view placeholder shown instead of an attachment reference.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            MessageKind::Text => None,
            MessageKind::Voice => Some("🎵 Voice message"),
            MessageKind::Image => Some("📷 Image"),
            MessageKind::Video => Some("🎥 Video"),
            MessageKind::File => Some("📎 File"),
        }
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(MessageKind::Text),
            "voice" => Ok(MessageKind::Voice),
            "image" => Ok(MessageKind::Image),
            "video" => Ok(MessageKind::Video),
            "file" => Ok(MessageKind::File),
            _ => Err(format!("Invalid message kind: {}", s)),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
