//! The `store` module holds the messages a chat session currently knows about.

pub mod message_store;

pub use message_store::MessageStore;
