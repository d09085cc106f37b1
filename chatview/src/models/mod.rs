mod action;
mod message;
mod types;

pub use action::*;
pub use message::*;
pub use types::*;
