use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chatview::action::{
    ActionDispatcher, DispatchResult, MessageEditor, MessageService, ReportCallback, ReportFlow,
};
use chatview::models::{
    ActionItem, ActionKind, DateTime, Message, MessageBody, MessageDirection, MessageStatus,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Copy(Uuid),
    Edit(Uuid, String),
    Reply(Uuid),
    Recall(Uuid),
    Delete(Uuid),
    OpenEditor(Uuid, String),
    OpenReport(Uuid),
}

/// Records every collaborator call and completes reports immediately.
struct Recorder {
    calls: Mutex<Vec<Call>>,
    report_fails: bool,
}

impl Recorder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            report_fails: false,
        })
    }

    fn failing_report() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            report_fails: true,
        })
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl MessageService for Recorder {
    fn copy_text(&self, message: &Message) {
        self.record(Call::Copy(message.message_id));
    }

    fn edit_text(&self, message: &Message, text: &str) {
        self.record(Call::Edit(message.message_id, text.to_string()));
    }

    fn reply(&self, message: &Message) {
        self.record(Call::Reply(message.message_id));
    }

    fn recall(&self, message: &Message) {
        self.record(Call::Recall(message.message_id));
    }

    fn delete(&self, message: &Message) {
        self.record(Call::Delete(message.message_id));
    }
}

impl MessageEditor for Recorder {
    fn open_editor(&self, message: &Message, text: &str) {
        self.record(Call::OpenEditor(message.message_id, text.to_string()));
    }
}

impl ReportFlow for Recorder {
    fn open_report(&self, message: &Message, on_complete: ReportCallback) {
        self.record(Call::OpenReport(message.message_id));
        if self.report_fails {
            on_complete(Err(anyhow!("report service unavailable")));
        } else {
            on_complete(Ok(()));
        }
    }
}

fn dispatcher(recorder: &Arc<Recorder>) -> ActionDispatcher {
    ActionDispatcher::new(recorder.clone(), recorder.clone(), recorder.clone())
}

fn text_message(text: &str) -> Message {
    Message {
        message_id: Uuid::now_v7(),
        conversation_id: "bob".into(),
        from: "alice".into(),
        direction: MessageDirection::Send,
        status: MessageStatus::Succeeded,
        body: MessageBody::text(text),
        timestamp: DateTime::now(),
        ext: Default::default(),
    }
}

fn file_message() -> Message {
    Message {
        body: MessageBody::File {
            path: "/tmp/report.pdf".into(),
            display_name: "report.pdf".into(),
            file_size: 2048,
        },
        ..text_message("")
    }
}

fn item(kind: ActionKind) -> ActionItem {
    let label = kind.tag().to_string();
    ActionItem::new(kind, label)
}

#[test]
fn test_copy_calls_only_copy() {
    let recorder = Recorder::new();
    let message = text_message("hello");
    let result = dispatcher(&recorder).dispatch(&item(ActionKind::Copy), &message);
    assert_eq!(result, DispatchResult::Forwarded(ActionKind::Copy));
    assert_eq!(recorder.calls(), vec![Call::Copy(message.message_id)]);
}

#[test]
fn test_service_actions_are_forwarded() {
    let message = text_message("hello");
    let cases = [
        (ActionKind::Reply, Call::Reply(message.message_id)),
        (ActionKind::Recall, Call::Recall(message.message_id)),
        (ActionKind::Delete, Call::Delete(message.message_id)),
    ];
    for (kind, expected) in cases {
        let recorder = Recorder::new();
        let result = dispatcher(&recorder).dispatch(&item(kind.clone()), &message);
        assert_eq!(result, DispatchResult::Forwarded(kind));
        assert_eq!(recorder.calls(), vec![expected]);
    }
}

#[test]
fn test_edit_opens_editor_with_current_text() {
    let recorder = Recorder::new();
    let message = text_message("hello");
    let result = dispatcher(&recorder).dispatch(&item(ActionKind::Edit), &message);
    assert_eq!(result, DispatchResult::EditorOpened);
    assert_eq!(
        recorder.calls(),
        vec![Call::OpenEditor(message.message_id, "hello".into())]
    );
}

#[test]
fn test_confirm_edit_replaces_text() {
    let recorder = Recorder::new();
    let message = text_message("hello");
    dispatcher(&recorder)
        .confirm_edit(&message, "hello there")
        .expect("confirm_edit failed");
    assert_eq!(
        recorder.calls(),
        vec![Call::Edit(message.message_id, "hello there".into())]
    );
}

#[test]
fn test_confirm_edit_rejects_invalid_text() {
    let recorder = Recorder::new();
    let dispatcher = dispatcher(&recorder);
    let message = text_message("hello");
    assert!(dispatcher.confirm_edit(&message, "hello").is_err());
    assert!(dispatcher.confirm_edit(&message, "   ").is_err());
    assert!(dispatcher.confirm_edit(&file_message(), "text").is_err());
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_edit_on_non_text_does_nothing() {
    let recorder = Recorder::new();
    let result = dispatcher(&recorder).dispatch(&item(ActionKind::Edit), &file_message());
    assert_eq!(result, DispatchResult::Ignored);
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_report_completion_reaches_hook() {
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    for recorder in [Recorder::new(), Recorder::failing_report()] {
        let hook_outcomes = outcomes.clone();
        let dispatcher = dispatcher(&recorder).with_report_hook(Arc::new(
            move |message_id: Uuid, outcome: Result<(), anyhow::Error>| {
                hook_outcomes
                    .lock()
                    .unwrap()
                    .push((message_id, outcome.is_ok()));
            },
        ));
        let message = text_message("spam");
        let result = dispatcher.dispatch(&item(ActionKind::Report), &message);
        assert_eq!(result, DispatchResult::ReportOpened);
        assert_eq!(recorder.calls(), vec![Call::OpenReport(message.message_id)]);
        let last = outcomes.lock().unwrap().last().cloned();
        assert_eq!(last, Some((message.message_id, !recorder.report_fails)));
    }
    assert_eq!(outcomes.lock().unwrap().len(), 2);
}

#[test]
fn test_custom_action_invokes_handler() {
    let recorder = Recorder::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let handler_seen = seen.clone();
    let action = ActionItem::new(ActionKind::Custom("Translate".into()), "Translate")
        .with_handler(Arc::new(move |item: &ActionItem, message: &Message| {
            handler_seen
                .lock()
                .unwrap()
                .push((item.tag().to_string(), message.message_id));
        }));
    let message = text_message("bonjour");
    let result = dispatcher(&recorder).dispatch(&action, &message);
    assert_eq!(result, DispatchResult::CustomHandled);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![("Translate".to_string(), message.message_id)]
    );
    assert!(recorder.calls().is_empty());
}

#[test]
fn test_custom_action_without_handler_has_no_effect() {
    let recorder = Recorder::new();
    let action = item(ActionKind::Custom("Pin".into()));
    let result = dispatcher(&recorder).dispatch(&action, &text_message("hello"));
    assert_eq!(result, DispatchResult::Ignored);
    assert!(recorder.calls().is_empty());
}
