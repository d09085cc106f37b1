use std::time::Duration;

use crate::models::{ActionItem, ActionKind, DateTime, Message, MessageStatus};

/// Filters the master action list down to the actions allowed for `message`.
///
/// The result is a subsequence of `master` in the same order. Items are only
/// ever removed by exact kind, so custom actions always pass through.
pub fn compute_allowed_actions(
    message: &Message,
    now: DateTime,
    recall_expiry: Duration,
    master: &[ActionItem],
) -> Vec<ActionItem> {
    let mut actions = master.to_vec();
    if !message.body.is_text() {
        actions.retain(|item| !matches!(item.kind, ActionKind::Copy | ActionKind::Edit));
    } else if !message.is_sent() || message.status != MessageStatus::Succeeded {
        actions.retain(|item| item.kind != ActionKind::Edit);
    }
    if !message.is_sent() || !within_recall_window(message.timestamp, now, recall_expiry) {
        actions.retain(|item| item.kind != ActionKind::Recall);
    }
    actions
}

/// Reports whether a message sent at `sent` can still be recalled at `now`.
///
/// The distance is absolute, so a message stamped in the future by a skewed
/// clock counts as recent.
pub fn within_recall_window(sent: DateTime, now: DateTime, recall_expiry: Duration) -> bool {
    u128::from(sent.abs_diff_millis(now)) <= recall_expiry.as_millis()
}

/// Master action list bound to a recall expiry.
#[derive(Clone, Debug)]
pub struct ActionPolicy {
    master: Vec<ActionItem>,
    recall_expiry: Duration,
}

impl ActionPolicy {
    pub fn new(master: Vec<ActionItem>, recall_expiry: Duration) -> Self {
        Self {
            master,
            recall_expiry,
        }
    }

    pub fn master(&self) -> &[ActionItem] {
        &self.master
    }

    pub fn allowed_actions(&self, message: &Message, now: DateTime) -> Vec<ActionItem> {
        let actions = compute_allowed_actions(message, now, self.recall_expiry, &self.master);
        tracing::trace!(
            message_id = ?message.message_id,
            count = actions.len(),
            "Computed allowed actions"
        );
        actions
    }
}
