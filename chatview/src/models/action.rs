use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Message;

/// Handler attached to a custom action; built-in kinds ignore it.
pub type ActionHandler = Arc<dyn Fn(&ActionItem, &Message) + Send + Sync>;

/// Long-press action, identified by its tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Copy,
    Edit,
    Reply,
    Recall,
    Delete,
    Report,
    Custom(String),
}

impl ActionKind {
    pub fn tag(&self) -> &str {
        match self {
            Self::Copy => "Copy",
            Self::Edit => "Edit",
            Self::Reply => "Reply",
            Self::Recall => "Recall",
            Self::Delete => "Delete",
            Self::Report => "Report",
            Self::Custom(tag) => tag,
        }
    }

    /// Unknown tags become `Custom`.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "Copy" => Self::Copy,
            "Edit" => Self::Edit,
            "Reply" => Self::Reply,
            "Recall" => Self::Recall,
            "Delete" => Self::Delete,
            "Report" => Self::Report,
            _ => Self::Custom(tag.to_string()),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for ActionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

#[derive(Clone)]
pub struct ActionItem {
    pub kind: ActionKind,
    pub label: String,
    handler: Option<ActionHandler>,
}

impl ActionItem {
    pub fn new(kind: ActionKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            handler: None,
        }
    }

    pub fn with_handler(mut self, handler: ActionHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn tag(&self) -> &str {
        self.kind.tag()
    }

    pub fn handler(&self) -> Option<&ActionHandler> {
        self.handler.as_ref()
    }
}

impl Debug for ActionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionItem")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
