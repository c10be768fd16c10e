//! Connection manager
//!
//! Holds at most one link at a time. Lifecycle:
//! - `Connecting -> Open` when the connector's handshake succeeds
//! - `Connecting -> Closed` when it fails
//! - `Open -> Closed` on a transport error or a remote close
//! - `Closed -> Connecting` after `reconnect_delay`, once per `Closed` entry,
//!   unless the manager has been torn down
//!
//! Transport errors are logged at debug level and otherwise only drive the
//! state machine; callers never see them. Reconnects continue at a fixed
//! interval with no cap.
//!
//! Frames sent while the link is not open follow the configured
//! [`OutboundPolicy`]: dropped, or held and flushed in order on the next
//! `Open`.
//!
//! Teardown (`shutdown`, or dropping the manager) cancels the pending
//! reconnect timer and closes the link if it is open.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::config::{ChatSettings, OutboundPolicy};
use crate::connection::cancel::{CancelHandle, CancelToken};
use crate::connection::state::{ConnectionEvent, ConnectionState, SendOutcome};
use crate::transport::{Connection, Connector};

#[derive(Debug)]
pub struct ConnectionManager {
    state: watch::Receiver<ConnectionState>,
    outbound: mpsc::UnboundedSender<String>,
    policy: OutboundPolicy,
    cancel: CancelHandle,
    driver: Option<JoinHandle<()>>,
}

impl ConnectionManager {
    /// Start the driver task. Must be called inside a tokio runtime.
    pub fn spawn<C: Connector>(
        connector: C,
        settings: &ChatSettings,
    ) -> (Self, mpsc::UnboundedReceiver<ConnectionEvent>) {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (cancel, token) = CancelHandle::pair();

        let driver = Driver {
            connector,
            state: state_tx,
            events: event_tx,
            outbound: outbound_rx,
            backlog: VecDeque::new(),
            policy: settings.outbound,
            delay: settings.reconnect_delay(),
            cancel: token,
        };

        let manager = Self {
            state: state_rx,
            outbound: outbound_tx,
            policy: settings.outbound,
            cancel,
            driver: Some(tokio::spawn(driver.run())),
        };
        (manager, event_rx)
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Hand a frame to the link. Never fails and never changes state.
    pub fn send(&self, frame: String) -> SendOutcome {
        let state = self.state();
        let outcome = match (state, self.policy) {
            (ConnectionState::Open, _) => SendOutcome::Sent,
            (_, OutboundPolicy::Buffer) => SendOutcome::Queued,
            (_, OutboundPolicy::Drop) => {
                debug!(%state, "link not open, frame not transmitted");
                return SendOutcome::Dropped;
            }
        };

        match self.outbound.send(frame) {
            Ok(()) => outcome,
            Err(_) => SendOutcome::Dropped,
        }
    }

    /// Wait until the manager reaches `target`. Returns `false` if the driver
    /// stopped first.
    pub async fn wait_for(&self, target: ConnectionState) -> bool {
        let mut state = self.state.clone();
        state.wait_for(|s| *s == target).await.is_ok()
    }

    /// Tear down and wait for the driver to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.await {
                debug!(error = %e, "connection driver ended abnormally");
            }
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Driver<C> {
    connector: C,
    state: watch::Sender<ConnectionState>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    outbound: mpsc::UnboundedReceiver<String>,
    backlog: VecDeque<String>,
    policy: OutboundPolicy,
    delay: Duration,
    cancel: CancelToken,
}

impl<C: Connector> Driver<C> {
    async fn run(mut self) {
        loop {
            self.set_state(ConnectionState::Connecting);

            let attempt = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                attempt = self.connector.connect() => attempt,
            };

            match attempt {
                Ok(mut link) => {
                    if self.cancel.is_cancelled() {
                        link.close().await;
                        break;
                    }
                    self.set_state(ConnectionState::Open);
                    if self.pump(&mut *link).await {
                        link.close().await;
                        break;
                    }
                }
                Err(e) => debug!(error = %e, "connect attempt failed"),
            }

            self.set_state(ConnectionState::Closed);
            self.discard_unsent();

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.delay) => {}
            }
            if self.cancel.is_cancelled() {
                break;
            }
        }

        self.set_state(ConnectionState::Closed);
        debug!("connection manager stopped");
    }

    /// Move frames between the link and the manager until the link drops.
    ///
    /// Returns `true` if the manager was torn down while the link was open.
    async fn pump(&mut self, link: &mut dyn Connection) -> bool {
        while let Some(frame) = self.backlog.pop_front() {
            if let Err(e) = link.send(frame.clone()).await {
                debug!(error = %e, "flush failed");
                self.backlog.push_front(frame);
                return self.cancel.is_cancelled();
            }
        }

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return true,
                inbound = link.recv() => match inbound {
                    Some(Ok(frame)) => {
                        if self.cancel.is_cancelled() {
                            return true;
                        }
                        trace!(len = frame.len(), "inbound frame");
                        let _ = self.events.send(ConnectionEvent::Frame(frame));
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "transport error");
                        return false;
                    }
                    None => {
                        debug!("remote closed the link");
                        return false;
                    }
                },
                Some(frame) = self.outbound.recv() => {
                    if let Err(e) = link.send(frame.clone()).await {
                        debug!(error = %e, "send failed");
                        self.keep_unsent(frame);
                        return false;
                    }
                }
            }
        }
    }

    fn set_state(&self, next: ConnectionState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            debug!(state = %next, "connection state");
            let _ = self.events.send(ConnectionEvent::State(next));
        }
    }

    fn keep_unsent(&mut self, frame: String) {
        if self.policy == OutboundPolicy::Buffer {
            self.backlog.push_back(frame);
        }
    }

    /// Frames accepted while `Open` but not yet written are lost on close
    /// under the drop policy.
    fn discard_unsent(&mut self) {
        if self.policy == OutboundPolicy::Drop {
            while let Ok(frame) = self.outbound.try_recv() {
                debug!(len = frame.len(), "discarding unsent frame");
            }
        }
    }
}
