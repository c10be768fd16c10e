//! In-memory message store
//!
//! Messages are kept in arrival order. The store never holds two messages
//! with the same id: a later message whose id is already present is ignored,
//! so delivering the same frame twice is harmless. There is no edit or
//! removal; the store lives exactly as long as its session.

use std::collections::HashMap;

use crate::message::ChatMessage;

#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
    index: HashMap<String, usize>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` unless its id is already stored.
    ///
    /// Returns `true` when the message was inserted.
    pub fn append(&mut self, message: ChatMessage) -> bool {
        if self.index.contains_key(&message.id) {
            return false;
        }
        self.index.insert(message.id.clone(), self.messages.len());
        self.messages.push(message);
        true
    }

    /// All messages in insertion order.
    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.index.get(id).map(|&i| &self.messages[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
