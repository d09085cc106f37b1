/// Peer of the conversation shown in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationInfo {
    Single {
        user_id: String,
        nickname: Option<String>,
        // Local alias set by the current user, overrides the nickname.
        remark: Option<String>,
    },
    Group {
        group_id: String,
        name: Option<String>,
    },
}

impl ConversationInfo {
    pub fn conversation_id(&self) -> &str {
        match self {
            Self::Single { user_id, .. } => user_id,
            Self::Group { group_id, .. } => group_id,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Single {
                user_id,
                nickname,
                remark,
            } => non_empty(remark)
                .or(non_empty(nickname))
                .unwrap_or(user_id)
                .to_string(),
            Self::Group { group_id, name } => non_empty(name).unwrap_or(group_id).to_string(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub title: String,
    pub subtitle: Option<String>,
    pub loading: bool,
}

impl NavigationState {
    pub const TYPING_SUBTITLE: &'static str = "typing...";

    pub fn new(info: &ConversationInfo) -> Self {
        Self {
            title: info.title(),
            subtitle: None,
            loading: false,
        }
    }

    /// Returns true if the state changed.
    pub fn set_typing(&mut self, typing: bool) -> bool {
        let subtitle = typing.then(|| Self::TYPING_SUBTITLE.to_string());
        if self.subtitle == subtitle {
            return false;
        }
        self.subtitle = subtitle;
        true
    }

    /// Returns true if the state changed.
    pub fn set_loading(&mut self, loading: bool) -> bool {
        if self.loading == loading {
            return false;
        }
        self.loading = loading;
        true
    }
}
