//! The `session` module is the chat view's state: one role, one message
//! store, one connection manager.

pub mod chat_session;

pub use chat_session::{ChatSession, SessionEvent};
