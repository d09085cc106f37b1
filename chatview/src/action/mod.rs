mod dispatch;
mod policy;

pub use dispatch::{
    ActionDispatcher, DispatchResult, MessageEditor, MessageService, ReportCallback, ReportFlow,
    ReportHook, ReportOutcome,
};
pub use policy::{ActionPolicy, compute_allowed_actions, within_recall_window};
