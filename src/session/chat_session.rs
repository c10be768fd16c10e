//! Chat session
//!
//! Local messages are appended to the store before they are handed to the
//! connection manager, so the author always sees what they wrote even if
//! the link is down. Inbound frames are decoded and appended unless their id
//! is already known; malformed frames are logged and dropped.
//!
//! All store mutation happens on the task that owns the session, which keeps
//! the dedup check free of locking.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::ChatSettings;
use crate::connection::{ConnectionEvent, ConnectionManager, ConnectionState, SendOutcome};
use crate::message::{ChatMessage, Role};
use crate::store::MessageStore;
use crate::transport::{Connector, WsConnector};
use crate::utils::ChatError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connection(ConnectionState),
    /// A message from the link that was not in the store yet.
    Message(ChatMessage),
}

pub struct ChatSession {
    role: Role,
    store: MessageStore,
    manager: ConnectionManager,
    events: mpsc::UnboundedReceiver<ConnectionEvent>,
}

impl ChatSession {
    pub fn open<C: Connector>(connector: C, settings: &ChatSettings, role: Role) -> Self {
        let (manager, events) = ConnectionManager::spawn(connector, settings);
        Self {
            role,
            store: MessageStore::new(),
            manager,
            events,
        }
    }

    /// Open a session against the configured WebSocket endpoint.
    pub fn connect(settings: &ChatSettings, role: Role) -> Self {
        Self::open(WsConnector::new(settings.endpoint.clone()), settings, role)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.manager.state()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.store.all()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Compose a message as this session's role and post it.
    pub fn submit(
        &mut self,
        text: impl Into<String>,
    ) -> Result<(ChatMessage, SendOutcome), ChatError> {
        let message = ChatMessage::compose(self.role, text);
        let outcome = self.post(message.clone())?;
        Ok((message, outcome))
    }

    /// Append `message` locally, then hand its frame to the link.
    pub fn post(&mut self, message: ChatMessage) -> Result<SendOutcome, ChatError> {
        let frame = message.to_frame()?;
        self.store.append(message);
        Ok(self.manager.send(frame))
    }

    /// Wait for the next thing worth rendering.
    ///
    /// Returns `None` once the connection manager has stopped and every
    /// buffered event was consumed.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        loop {
            match self.events.recv().await? {
                ConnectionEvent::State(state) => return Some(SessionEvent::Connection(state)),
                ConnectionEvent::Frame(frame) => {
                    if let Some(message) = self.apply_frame(&frame) {
                        return Some(SessionEvent::Message(message));
                    }
                }
            }
        }
    }

    /// Wait until the link is open. `false` if the manager stopped first.
    pub async fn wait_until_open(&self) -> bool {
        self.manager.wait_for(ConnectionState::Open).await
    }

    /// Tear the connection down. The store goes with the session.
    pub async fn close(self) {
        self.manager.shutdown().await;
    }

    fn apply_frame(&mut self, frame: &str) -> Option<ChatMessage> {
        let message = match ChatMessage::from_frame(frame) {
            Ok(message) => message,
            Err(e) => {
                warn!(
                    "Dropping malformed frame: {e} | {}",
                    frame.chars().take(100).collect::<String>()
                );
                return None;
            }
        };

        if self.store.append(message.clone()) {
            Some(message)
        } else {
            debug!(id = %message.id, "duplicate message ignored");
            None
        }
    }
}
