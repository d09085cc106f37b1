use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DateTime;

pub type Extension = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: Uuid,
    pub conversation_id: String,
    // User id of the sender.
    pub from: String,
    pub direction: MessageDirection,
    pub status: MessageStatus,
    pub body: MessageBody,
    pub timestamp: DateTime,
    // Custom payload attached by the sender (shared contact metadata and such).
    #[serde(default)]
    pub ext: Extension,
}

impl Message {
    /// Text content of the message, if the body is text.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.direction == MessageDirection::Send
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    Send,
    Receive,
}

impl MessageDirection {
    pub fn classify(from: &str, current_user_id: &str) -> Self {
        if from == current_user_id {
            Self::Send
        } else {
            Self::Receive
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageBody {
    Text {
        text: String,
    },
    Image {
        path: String,
        file_size: u64,
    },
    Video {
        path: String,
        file_size: u64,
    },
    File {
        path: String,
        display_name: String,
        file_size: u64,
    },
    Audio {
        path: String,
        duration_secs: u32,
    },
    Contact {
        user_id: String,
        nickname: String,
        avatar_url: Option<String>,
    },
    Custom {
        event: String,
        #[serde(default)]
        params: Extension,
    },
}

impl MessageBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::File { .. } => "file",
            Self::Audio { .. } => "audio",
            Self::Contact { .. } => "contact",
            Self::Custom { .. } => "custom",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }
}

/// Message body plus extension fields handed to the conversation service for sending.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub body: MessageBody,
    pub ext: Extension,
}

impl OutgoingMessage {
    pub fn new(body: MessageBody) -> Self {
        Self {
            body,
            ext: Extension::new(),
        }
    }

    pub fn with_ext(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.ext.insert(key.into(), value.into());
        self
    }
}
