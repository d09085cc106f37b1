use std::collections::HashMap;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::action::{
    ActionDispatcher, ActionPolicy, DispatchResult, MessageEditor, MessageService, ReportFlow,
    ReportHook, ReportOutcome,
};
use crate::attachment::AttachmentSource;
use crate::config::ChatConfig;
use crate::models::{
    ActionHandler, ActionItem, ActionKind, Clock, Message, MessageBody, MessageDirection,
    OutgoingMessage, SystemClock,
};

use super::{
    ChatViewListener, ConversationInfo, ConversationService, NavigationState, SessionContext,
    StubListener, ThemePreference,
};

/// Collaborators a chat screen forwards its work to.
#[derive(Clone)]
pub struct ChatCollaborators {
    pub session: Arc<dyn SessionContext>,
    pub conversation: Arc<dyn ConversationService>,
    pub service: Arc<dyn MessageService>,
    pub editor: Arc<dyn MessageEditor>,
    pub report: Arc<dyn ReportFlow>,
    /// Handlers for custom tags of the master action list.
    pub custom_actions: HashMap<String, ActionHandler>,
    pub clock: Arc<dyn Clock>,
}

impl ChatCollaborators {
    pub fn new(
        session: Arc<dyn SessionContext>,
        conversation: Arc<dyn ConversationService>,
        service: Arc<dyn MessageService>,
        editor: Arc<dyn MessageEditor>,
        report: Arc<dyn ReportFlow>,
    ) -> Self {
        Self {
            session,
            conversation,
            service,
            editor,
            report,
            custom_actions: HashMap::new(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_custom_action(mut self, tag: impl Into<String>, handler: ActionHandler) -> Self {
        self.custom_actions.insert(tag.into(), handler);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[derive(Debug)]
pub enum ChatCommand {
    LoadHistory,
    SendText(String),
    SendAttachment(OutgoingMessage),
    LongPress(Uuid),
    SelectAction(Uuid, ActionKind),
    ConfirmEdit(Uuid, String),
    MessageReceived(Message),
    MessageUpdated(Message),
    MessageRemoved(Uuid),
    PeerTyping(bool),
    SetTheme(ThemePreference),
    ReportFinished(Uuid, Result<(), String>),
}

/// Handle to the task driving a single chat screen.
#[derive(Clone)]
pub struct ChatController {
    inner: Arc<ChatControllerInner>,
}

impl ChatController {
    const MAX_COMMANDS: usize = 32;

    pub fn new(
        info: ConversationInfo,
        collaborators: ChatCollaborators,
        config: ChatConfig,
    ) -> Self {
        Self::with_listener(info, collaborators, config, Arc::new(StubListener))
    }

    pub fn with_listener<L>(
        info: ConversationInfo,
        collaborators: ChatCollaborators,
        config: ChatConfig,
        listener: Arc<L>,
    ) -> Self
    where
        L: ChatViewListener + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(Self::MAX_COMMANDS);
        // Report completions bypass the bounded command queue so none is lost.
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let report_hook: ReportHook = Arc::new(move |message_id: Uuid, outcome: ReportOutcome| {
            let outcome = outcome.map_err(|err| err.to_string());
            if report_tx.send((message_id, outcome)).is_err() {
                tracing::debug!(?message_id, "Chat screen closed before report finished");
            }
        });
        let dispatcher = ActionDispatcher::new(
            collaborators.service.clone(),
            collaborators.editor.clone(),
            collaborators.report.clone(),
        )
        .with_report_hook(report_hook);
        let policy = ActionPolicy::new(
            Self::master_actions(&config, &collaborators.custom_actions),
            config.recall_expiry(),
        );
        let state = ChatState {
            navigation: NavigationState::new(&info),
            info,
            theme: config.theme,
            attachment_menu: config.attachment_menu(),
            history_page_size: config.history_page_size,
            messages: Vec::new(),
            menu: None,
            pending_edit: None,
            policy,
            dispatcher,
            collaborators,
            listener,
        };
        let main_task = tokio::spawn(state.main_loop(command_rx, report_rx));
        Self {
            inner: Arc::new(ChatControllerInner {
                command_tx,
                main_task,
            }),
        }
    }

    pub async fn send(&self, command: ChatCommand) -> Result<(), anyhow::Error> {
        self.inner
            .command_tx
            .send(command)
            .await
            .map_err(|_| anyhow!("Controller is broken"))
    }

    pub async fn load_history(&self) -> Result<(), anyhow::Error> {
        self.send(ChatCommand::LoadHistory).await
    }

    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), anyhow::Error> {
        self.send(ChatCommand::SendText(text.into())).await
    }

    pub async fn send_attachment(&self, message: OutgoingMessage) -> Result<(), anyhow::Error> {
        self.send(ChatCommand::SendAttachment(message)).await
    }

    pub async fn long_press(&self, message_id: Uuid) -> Result<(), anyhow::Error> {
        self.send(ChatCommand::LongPress(message_id)).await
    }

    pub async fn select_action(
        &self,
        message_id: Uuid,
        kind: ActionKind,
    ) -> Result<(), anyhow::Error> {
        self.send(ChatCommand::SelectAction(message_id, kind)).await
    }

    pub async fn confirm_edit(
        &self,
        message_id: Uuid,
        text: impl Into<String>,
    ) -> Result<(), anyhow::Error> {
        self.send(ChatCommand::ConfirmEdit(message_id, text.into()))
            .await
    }

    fn master_actions(
        config: &ChatConfig,
        custom_actions: &HashMap<String, ActionHandler>,
    ) -> Vec<ActionItem> {
        config
            .master_actions()
            .into_iter()
            .map(|item| {
                let handler = match &item.kind {
                    ActionKind::Custom(tag) => custom_actions.get(tag).cloned(),
                    _ => None,
                };
                match handler {
                    Some(handler) => item.with_handler(handler),
                    None => item,
                }
            })
            .collect()
    }
}

struct ChatControllerInner {
    command_tx: mpsc::Sender<ChatCommand>,
    main_task: JoinHandle<()>,
}

impl Drop for ChatControllerInner {
    fn drop(&mut self) {
        self.main_task.abort();
    }
}

struct ChatState<L> {
    info: ConversationInfo,
    navigation: NavigationState,
    theme: ThemePreference,
    attachment_menu: Vec<AttachmentSource>,
    history_page_size: usize,
    // Loaded messages, oldest first.
    messages: Vec<Message>,
    // Action menu currently shown, if any.
    menu: Option<(Uuid, Vec<ActionItem>)>,
    // Message whose editor is open, set only when Edit was offered and selected.
    pending_edit: Option<Uuid>,
    policy: ActionPolicy,
    dispatcher: ActionDispatcher,
    collaborators: ChatCollaborators,
    listener: Arc<L>,
}

impl<L> ChatState<L>
where
    L: ChatViewListener + 'static,
{
    async fn main_loop(
        mut self,
        mut command_rx: mpsc::Receiver<ChatCommand>,
        mut report_rx: mpsc::UnboundedReceiver<(Uuid, Result<(), String>)>,
    ) {
        tracing::debug!(conversation_id = self.info.conversation_id(), "Chat screen started");
        self.listener
            .on_navigation_changed(self.navigation.clone())
            .await;
        self.listener.on_theme_changed(self.theme).await;
        tracing::trace!(
            sources = ?self.attachment_menu.iter().map(|v| v.label()).collect::<Vec<_>>(),
            "Attachment menu"
        );
        self.listener
            .on_attachment_menu(self.attachment_menu.clone())
            .await;
        loop {
            tokio::select! {
                command = command_rx.recv() => {
                    let command = match command {
                        Some(v) => v,
                        None => break,
                    };
                    tracing::trace!(?command, "Handling chat command");
                    self.handle_command(command).await;
                }
                Some((message_id, outcome)) = report_rx.recv() => {
                    self.handle_command(ChatCommand::ReportFinished(message_id, outcome))
                        .await;
                }
            }
        }
        tracing::debug!(conversation_id = self.info.conversation_id(), "Chat screen stopped");
    }

    async fn handle_command(&mut self, command: ChatCommand) {
        match command {
            ChatCommand::LoadHistory => self.load_history().await,
            ChatCommand::SendText(text) => {
                if text.trim().is_empty() {
                    tracing::debug!("Ignoring empty text");
                    return;
                }
                self.send_message(OutgoingMessage::new(MessageBody::Text { text }))
                    .await;
            }
            ChatCommand::SendAttachment(message) => self.send_message(message).await,
            ChatCommand::LongPress(message_id) => self.show_action_menu(message_id).await,
            ChatCommand::SelectAction(message_id, kind) => {
                self.select_action(message_id, kind).await
            }
            ChatCommand::ConfirmEdit(message_id, text) => {
                if self.pending_edit != Some(message_id) {
                    tracing::warn!(?message_id, "Edit confirmed without an open editor");
                    self.listener
                        .on_error(format!("Message {message_id} is not being edited"))
                        .await;
                    return;
                }
                self.pending_edit = None;
                let Some(message) = self.find_message(message_id) else {
                    tracing::warn!(?message_id, "Edited message not found");
                    return;
                };
                if let Err(err) = self.dispatcher.confirm_edit(message, &text) {
                    tracing::debug!(?err, ?message_id, "Edit rejected");
                    self.listener.on_error(err.to_string()).await;
                }
            }
            ChatCommand::MessageReceived(mut message) => {
                if self.find_message(message.message_id).is_some() {
                    tracing::debug!(message_id = ?message.message_id, "Duplicate message");
                    return;
                }
                let current_user_id = self.collaborators.session.current_user_id();
                message.direction = MessageDirection::classify(&message.from, &current_user_id);
                if message.direction == MessageDirection::Receive
                    && self.navigation.set_typing(false)
                {
                    self.listener
                        .on_navigation_changed(self.navigation.clone())
                        .await;
                }
                self.insert_messages(vec![message]);
                self.notify_messages().await;
            }
            ChatCommand::MessageUpdated(mut message) => {
                let message_id = message.message_id;
                let current_user_id = self.collaborators.session.current_user_id();
                message.direction = MessageDirection::classify(&message.from, &current_user_id);
                match self.messages.iter_mut().find(|v| v.message_id == message_id) {
                    Some(existing) => *existing = message,
                    None => {
                        tracing::debug!(?message_id, "Updated message is not loaded");
                        return;
                    }
                }
                self.messages.sort_by_key(|v| v.timestamp);
                self.forget_message(message_id);
                self.notify_messages().await;
            }
            ChatCommand::MessageRemoved(message_id) => {
                let len = self.messages.len();
                self.messages.retain(|v| v.message_id != message_id);
                if self.messages.len() == len {
                    return;
                }
                self.forget_message(message_id);
                self.notify_messages().await;
            }
            ChatCommand::PeerTyping(typing) => {
                if self.navigation.set_typing(typing) {
                    self.listener
                        .on_navigation_changed(self.navigation.clone())
                        .await;
                }
            }
            ChatCommand::SetTheme(theme) => {
                if self.theme != theme {
                    tracing::debug!(theme = theme.name(), "Theme changed");
                    self.theme = theme;
                    self.listener.on_theme_changed(theme).await;
                }
            }
            ChatCommand::ReportFinished(message_id, outcome) => {
                self.listener.on_report_finished(message_id, outcome).await;
            }
        }
    }

    async fn load_history(&mut self) {
        if self.navigation.set_loading(true) {
            self.listener.on_loading(true).await;
            self.listener
                .on_navigation_changed(self.navigation.clone())
                .await;
        }
        let result = self
            .collaborators
            .conversation
            .load_history(self.messages.first(), self.history_page_size)
            .await;
        match result {
            Ok(messages) => {
                tracing::debug!(count = messages.len(), "Loaded history");
                self.insert_messages(messages);
                self.notify_messages().await;
            }
            Err(err) => {
                tracing::error!(?err, "Failed to load history");
                self.listener.on_error(err.to_string()).await;
            }
        }
        if self.navigation.set_loading(false) {
            self.listener.on_loading(false).await;
            self.listener
                .on_navigation_changed(self.navigation.clone())
                .await;
        }
    }

    async fn send_message(&mut self, message: OutgoingMessage) {
        tracing::debug!(body = message.body.name(), "Sending message");
        match self.collaborators.conversation.send_message(message).await {
            Ok(message) => {
                self.insert_messages(vec![message]);
                self.notify_messages().await;
            }
            Err(err) => {
                tracing::error!(?err, "Failed to send message");
                self.listener.on_error(err.to_string()).await;
            }
        }
    }

    async fn show_action_menu(&mut self, message_id: Uuid) {
        let Some(message) = self.find_message(message_id) else {
            tracing::warn!(?message_id, "Long-pressed message not found");
            return;
        };
        let now = self.collaborators.clock.now();
        let actions = self.policy.allowed_actions(message, now);
        self.menu = Some((message_id, actions.clone()));
        self.listener.on_action_menu(message_id, actions).await;
    }

    async fn select_action(&mut self, message_id: Uuid, kind: ActionKind) {
        let item = match self.menu.take() {
            Some((id, actions)) if id == message_id => {
                actions.into_iter().find(|item| item.kind == kind)
            }
            _ => None,
        };
        let Some(item) = item else {
            tracing::warn!(?message_id, action = %kind, "Action was not offered");
            return;
        };
        let Some(message) = self.find_message(message_id) else {
            tracing::warn!(?message_id, "Selected message not found");
            return;
        };
        match self.dispatcher.dispatch(&item, message) {
            DispatchResult::EditorOpened => self.pending_edit = Some(message_id),
            DispatchResult::Ignored => {
                tracing::debug!(?message_id, action = %kind, "Action had no effect");
            }
            _ => {}
        }
    }

    /// Drops the menu and the open editor of a message that changed or went away.
    fn forget_message(&mut self, message_id: Uuid) {
        if self.menu.as_ref().is_some_and(|(id, _)| *id == message_id) {
            self.menu = None;
        }
        if self.pending_edit == Some(message_id) {
            self.pending_edit = None;
        }
    }

    fn find_message(&self, message_id: Uuid) -> Option<&Message> {
        self.messages.iter().find(|v| v.message_id == message_id)
    }

    fn insert_messages(&mut self, messages: Vec<Message>) {
        for message in messages {
            if self.find_message(message.message_id).is_none() {
                self.messages.push(message);
            }
        }
        self.messages.sort_by_key(|v| v.timestamp);
    }

    async fn notify_messages(&self) {
        self.listener
            .on_messages_changed(self.messages.clone())
            .await;
    }
}
