use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake in progress. Initial state.
    Connecting,
    /// Link ready; frames are transmitted.
    Open,
    /// Link gone; a reconnect is scheduled unless the manager was torn down.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    State(ConnectionState),
    Frame(String),
}

/// What happened to a frame handed to `ConnectionManager::send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Handed to the open link.
    Sent,
    /// Held until the next time the link opens.
    Queued,
    /// Not transmitted; the link was not open.
    Dropped,
}
