mod controller;
mod listener;
mod navigation;
mod service;
mod theme;

pub use controller::{ChatCollaborators, ChatCommand, ChatController};
pub use listener::ChatViewListener;
use listener::StubListener;
pub use navigation::{ConversationInfo, NavigationState};
pub use service::{ConversationService, SessionContext};
pub use theme::ThemePreference;
