//! Chat message
//!
//! One `ChatMessage` travels as one text frame holding a JSON object:
//! `{"id": "...", "sender": "doctor", "text": "...", "timestamp": "10:01"}`.
//!
//! - `id` is assigned by the sender at creation time from the wall clock in
//!   milliseconds, formatted as decimal text. Ids handed out by one process
//!   strictly increase.
//! - `timestamp` is display-only local time and is not synchronized between
//!   clients.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

/// The roles that take part in chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pharmacist,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pharmacist => "pharmacist",
            Role::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pharmacist" => Ok(Role::Pharmacist),
            "doctor" => Ok(Role::Doctor),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Role,
    pub text: String,
    pub timestamp: String,
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Next message id: current epoch millis, bumped past the last id issued.
pub fn next_message_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}

impl ChatMessage {
    /// Create a message authored locally, stamping id and display time now.
    pub fn compose(sender: Role, text: impl Into<String>) -> Self {
        Self {
            id: next_message_id(),
            sender,
            text: text.into(),
            timestamp: Local::now().format("%H:%M").to_string(),
        }
    }

    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_frame(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}
