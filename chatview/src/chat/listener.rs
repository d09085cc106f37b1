use async_trait::async_trait;
use uuid::Uuid;

use crate::attachment::AttachmentSource;
use crate::models::{ActionItem, Message};

use super::{NavigationState, ThemePreference};

/// Receives state changes of a chat screen. Implemented by the host UI.
#[async_trait]
pub trait ChatViewListener: Send + Sync {
    async fn on_loading(&self, loading: bool);

    async fn on_navigation_changed(&self, state: NavigationState);

    async fn on_messages_changed(&self, messages: Vec<Message>);

    async fn on_action_menu(&self, message_id: Uuid, actions: Vec<ActionItem>);

    async fn on_theme_changed(&self, theme: ThemePreference);

    /// Entries of the attachment menu, sent once when the screen starts.
    async fn on_attachment_menu(&self, sources: Vec<AttachmentSource>);

    async fn on_error(&self, error: String);

    async fn on_report_finished(&self, message_id: Uuid, outcome: Result<(), String>);
}

pub(super) struct StubListener;

#[async_trait]
impl ChatViewListener for StubListener {
    async fn on_loading(&self, _loading: bool) {}

    async fn on_navigation_changed(&self, _state: NavigationState) {}

    async fn on_messages_changed(&self, _messages: Vec<Message>) {}

    async fn on_action_menu(&self, _message_id: Uuid, _actions: Vec<ActionItem>) {}

    async fn on_theme_changed(&self, _theme: ThemePreference) {}

    async fn on_attachment_menu(&self, _sources: Vec<AttachmentSource>) {}

    async fn on_error(&self, _error: String) {}

    async fn on_report_finished(&self, _message_id: Uuid, _outcome: Result<(), String>) {}
}
