//! The `message` module defines the chat message exchanged between the doctor
//! and pharmacist views, and its JSON frame encoding.

pub mod chat_message;

pub use chat_message::{ChatMessage, Role, next_message_id};
