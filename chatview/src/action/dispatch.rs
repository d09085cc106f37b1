use std::sync::Arc;

use anyhow::anyhow;
use uuid::Uuid;

use crate::models::{ActionItem, ActionKind, Message};

/// Outcome of a report flow, delivered once the host closes it.
pub type ReportOutcome = Result<(), anyhow::Error>;

pub type ReportCallback = Box<dyn FnOnce(ReportOutcome) + Send>;

/// Observer notified of every finished report, keyed by message id.
pub type ReportHook = Arc<dyn Fn(Uuid, ReportOutcome) + Send + Sync>;

/// Mutations forwarded to the chat SDK. Calls return immediately and any
/// failure is surfaced by the implementation itself.
pub trait MessageService: Send + Sync {
    fn copy_text(&self, message: &Message);

    fn edit_text(&self, message: &Message, text: &str);

    fn reply(&self, message: &Message);

    fn recall(&self, message: &Message);

    fn delete(&self, message: &Message);
}

pub trait MessageEditor: Send + Sync {
    /// Presents an editor pre-filled with `text`.
    fn open_editor(&self, message: &Message, text: &str);
}

pub trait ReportFlow: Send + Sync {
    fn open_report(&self, message: &Message, on_complete: ReportCallback);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// Forwarded to the message service.
    Forwarded(ActionKind),
    EditorOpened,
    ReportOpened,
    CustomHandled,
    /// Nothing was called.
    Ignored,
}

pub struct ActionDispatcher {
    service: Arc<dyn MessageService>,
    editor: Arc<dyn MessageEditor>,
    report: Arc<dyn ReportFlow>,
    report_hook: Option<ReportHook>,
}

impl ActionDispatcher {
    pub fn new(
        service: Arc<dyn MessageService>,
        editor: Arc<dyn MessageEditor>,
        report: Arc<dyn ReportFlow>,
    ) -> Self {
        Self {
            service,
            editor,
            report,
            report_hook: None,
        }
    }

    pub fn with_report_hook(mut self, hook: ReportHook) -> Self {
        self.report_hook = Some(hook);
        self
    }

    /// Routes `action` to exactly one collaborator.
    ///
    /// The action is expected to come from the allowed set computed for
    /// `message`; it is not validated again here.
    pub fn dispatch(&self, action: &ActionItem, message: &Message) -> DispatchResult {
        tracing::debug!(
            message_id = ?message.message_id,
            action = %action.kind,
            "Dispatching message action"
        );
        match &action.kind {
            ActionKind::Copy => self.service.copy_text(message),
            ActionKind::Edit => {
                let Some(text) = message.text() else {
                    tracing::warn!(
                        message_id = ?message.message_id,
                        body = message.body.name(),
                        "Edit requested for non-text message"
                    );
                    return DispatchResult::Ignored;
                };
                self.editor.open_editor(message, text);
                return DispatchResult::EditorOpened;
            }
            ActionKind::Reply => self.service.reply(message),
            ActionKind::Recall => self.service.recall(message),
            ActionKind::Delete => self.service.delete(message),
            ActionKind::Report => {
                let on_complete = self.report_callback(message.message_id);
                self.report.open_report(message, on_complete);
                return DispatchResult::ReportOpened;
            }
            ActionKind::Custom(tag) => {
                return match action.handler() {
                    Some(handler) => {
                        handler(action, message);
                        DispatchResult::CustomHandled
                    }
                    None => {
                        tracing::debug!(%tag, "No handler attached to custom action");
                        DispatchResult::Ignored
                    }
                };
            }
        }
        DispatchResult::Forwarded(action.kind.clone())
    }

    /// Applies text confirmed in the editor.
    pub fn confirm_edit(&self, message: &Message, text: &str) -> Result<(), anyhow::Error> {
        let current = message
            .text()
            .ok_or(anyhow!("Cannot edit {} message", message.body.name()))?;
        if text.trim().is_empty() {
            return Err(anyhow!("Edited text is empty"));
        }
        if current == text {
            return Err(anyhow!("Edited text is unchanged"));
        }
        self.service.edit_text(message, text);
        Ok(())
    }

    fn report_callback(&self, message_id: Uuid) -> ReportCallback {
        let hook = self.report_hook.clone();
        Box::new(move |outcome: ReportOutcome| {
            match &outcome {
                Ok(()) => tracing::debug!(?message_id, "Report submitted"),
                Err(err) => tracing::warn!(?err, ?message_id, "Report failed"),
            }
            if let Some(hook) = hook {
                hook(message_id, outcome);
            }
        })
    }
}
