use chatview::models::{
    ActionItem, ActionKind, DateTime, Message, MessageBody, MessageDirection, MessageStatus,
    OutgoingMessage,
};
use uuid::Uuid;

#[test]
fn test_action_kind_parse_known_tags() {
    for (tag, kind) in [
        ("Copy", ActionKind::Copy),
        ("Edit", ActionKind::Edit),
        ("Reply", ActionKind::Reply),
        ("Recall", ActionKind::Recall),
        ("Delete", ActionKind::Delete),
        ("Report", ActionKind::Report),
    ] {
        assert_eq!(ActionKind::parse(tag), kind);
        assert_eq!(kind.tag(), tag);
    }
}

#[test]
fn test_action_kind_unknown_tag_is_custom() {
    // Tags are case-sensitive.
    assert_eq!(
        ActionKind::parse("copy"),
        ActionKind::Custom("copy".to_string())
    );
    let kind: ActionKind = serde_json::from_str("\"Translate\"").unwrap();
    assert_eq!(kind, ActionKind::Custom("Translate".to_string()));
    assert_eq!(serde_json::to_string(&kind).unwrap(), "\"Translate\"");
    assert_eq!(kind.to_string(), "Translate");
}

#[test]
fn test_action_item_debug_hides_handler() {
    let item = ActionItem::new(ActionKind::Reply, "Reply")
        .with_handler(std::sync::Arc::new(|_: &ActionItem, _: &Message| {}));
    let debug = format!("{item:?}");
    assert!(debug.contains("Reply"));
    assert!(debug.contains("handler: true"));
    assert_eq!(item.tag(), "Reply");
}

#[test]
fn test_message_from_json() {
    let id = Uuid::now_v7();
    let json = serde_json::json!({
        "message_id": id.to_string(),
        "conversation_id": "bob",
        "from": "alice",
        "direction": "send",
        "status": "succeeded",
        "body": {"type": "text", "text": "hi"},
        "timestamp": 1_700_000_000_123i64,
    });
    let message: Message = serde_json::from_value(json).expect("failed to parse message");
    assert_eq!(message.message_id, id);
    assert_eq!(message.direction, MessageDirection::Send);
    assert_eq!(message.status, MessageStatus::Succeeded);
    assert_eq!(message.text(), Some("hi"));
    assert_eq!(message.timestamp.timestamp_millis(), 1_700_000_000_123);
    assert!(message.ext.is_empty());
}

#[test]
fn test_contact_body_json_shape() {
    let body = MessageBody::Contact {
        user_id: "carol".into(),
        nickname: "Carol".into(),
        avatar_url: None,
    };
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value["type"], "contact");
    assert_eq!(value["user_id"], "carol");
    assert_eq!(body.name(), "contact");
    assert!(!body.is_text());
}

#[test]
fn test_direction_classify() {
    assert_eq!(
        MessageDirection::classify("alice", "alice"),
        MessageDirection::Send
    );
    assert_eq!(
        MessageDirection::classify("bob", "alice"),
        MessageDirection::Receive
    );
}

#[test]
fn test_datetime_millis() {
    let a = DateTime::from_millis(1_000).unwrap();
    let b = DateTime::from_millis(4_500).unwrap();
    assert_eq!(a.abs_diff_millis(b), 3_500);
    assert_eq!(b.abs_diff_millis(a), 3_500);
    assert_eq!(serde_json::to_string(&b).unwrap(), "4500");
    let decoded: DateTime = serde_json::from_str("4500").unwrap();
    assert_eq!(decoded, b);
}

#[test]
fn test_outgoing_message_ext() {
    let message = OutgoingMessage::new(MessageBody::text("hi")).with_ext("priority", 2);
    assert_eq!(message.ext["priority"], 2);
}
