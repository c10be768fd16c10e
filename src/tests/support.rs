//! Scripted in-memory transport for driving the connection manager and the
//! chat session without sockets.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::config::{ChatSettings, OutboundPolicy};
use crate::connection::ConnectionEvent;
use crate::transport::{Connection, Connector};
use crate::utils::ChatError;

pub(crate) fn chat_settings(outbound: OutboundPolicy) -> ChatSettings {
    ChatSettings {
        endpoint: "ws://mock".to_string(),
        reconnect_delay_ms: 3000,
        outbound,
    }
}

pub(crate) struct MockConnector {
    attempts: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    hang: Arc<AtomicBool>,
    remotes: mpsc::UnboundedSender<MockRemote>,
}

/// Test-side view of the connector: counters, switches, and the far end of
/// every link it opened.
pub(crate) struct MockControl {
    attempts: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    hang: Arc<AtomicBool>,
    pub remotes: mpsc::UnboundedReceiver<MockRemote>,
}

pub(crate) fn mock_connector() -> (MockConnector, MockControl) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let fail = Arc::new(AtomicBool::new(false));
    let hang = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::unbounded_channel();
    (
        MockConnector {
            attempts: attempts.clone(),
            fail: fail.clone(),
            hang: hang.clone(),
            remotes: tx,
        },
        MockControl {
            attempts,
            fail,
            hang,
            remotes: rx,
        },
    )
}

impl MockControl {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn set_hanging(&self, hanging: bool) {
        self.hang.store(hanging, Ordering::SeqCst);
    }

    pub async fn next_remote(&mut self) -> MockRemote {
        self.remotes.recv().await.expect("connector dropped")
    }
}

/// The server end of one mock link.
pub(crate) struct MockRemote {
    inbound: mpsc::UnboundedSender<Option<String>>,
    pub outbound: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
}

impl MockRemote {
    pub fn push(&self, frame: impl Into<String>) {
        self.inbound.send(Some(frame.into())).expect("link gone");
    }

    pub fn close(&self) {
        let _ = self.inbound.send(None);
    }

    pub fn was_closed_by_client(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct MockConnection {
    inbound: mpsc::UnboundedReceiver<Option<String>>,
    outbound: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self) -> Result<Box<dyn Connection>, ChatError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ChatError::Closed);
        }

        let (in_tx, in_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        let _ = self.remotes.send(MockRemote {
            inbound: in_tx,
            outbound: out_rx,
            closed: closed.clone(),
        });
        Ok(Box::new(MockConnection {
            inbound: in_rx,
            outbound: out_tx,
            closed,
        }))
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn send(&mut self, frame: String) -> Result<(), ChatError> {
        self.outbound.send(frame).map_err(|_| ChatError::Closed)
    }

    async fn recv(&mut self) -> Option<Result<String, ChatError>> {
        match self.inbound.recv().await {
            Some(Some(frame)) => Some(Ok(frame)),
            Some(None) | None => None,
        }
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Every event currently buffered, without waiting.
pub(crate) fn drain(events: &mut mpsc::UnboundedReceiver<ConnectionEvent>) -> Vec<ConnectionEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}
