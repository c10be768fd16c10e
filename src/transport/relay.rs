//! Chat relay server
//!
//! The local endpoint chat sessions connect to. Responsibilities:
//! - accept TCP/WebSocket connections and give each peer an id
//! - forward every text frame a peer sends to all other connected peers,
//!   unchanged (the sender does not get an echo)
//! - forget a peer once either its read or its write side ends
//!
//! There is no authentication, heartbeat or framing negotiation.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::utils::ChatError;

type PeerMap = HashMap<String, mpsc::UnboundedSender<WsMessage>>;

#[derive(Debug, Clone, Default)]
pub struct Relay {
    peers: Arc<Mutex<PeerMap>>,
}

pub async fn start_relay_server(addr: &str) -> Result<(), ChatError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Relay listening on ws://{addr}");
    Relay::new().serve(listener).await;
    Ok(())
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peer_count(&self) -> usize {
        self.peers().len()
    }

    /// Accept connections until the listener fails.
    pub async fn serve(self, listener: TcpListener) {
        while let Ok((stream, remote)) = listener.accept().await {
            let relay = self.clone();
            tokio::spawn(async move { relay.handle_peer(stream, remote).await });
        }
    }

    fn peers(&self) -> MutexGuard<'_, PeerMap> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn broadcast(&self, from: &str, frame: WsMessage) {
        for (peer_id, sender) in self.peers().iter() {
            if peer_id == from {
                continue;
            }
            if let Err(e) = sender.send(frame.clone()) {
                debug!("Failed to queue frame for {peer_id}: {e}");
            }
        }
    }

    async fn handle_peer(self, stream: TcpStream, remote: SocketAddr) {
        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                warn!("WebSocket handshake error from {remote}: {e}");
                return;
            }
        };
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
        let peer_id = format!("peer-{}", Uuid::new_v4());

        self.peers().insert(peer_id.clone(), tx);
        info!("{peer_id} connected from {remote}");

        let writer = {
            let peer_id = peer_id.clone();
            tokio::spawn(async move {
                while let Some(msg) = rx.recv().await {
                    if let Err(e) = ws_sender.send(msg).await {
                        debug!("Failed to send frame to {peer_id}: {e}");
                        break;
                    }
                }
                let _ = ws_sender.close().await;
            })
        };

        while let Some(Ok(msg)) = ws_receiver.next().await {
            match msg {
                WsMessage::Text(_) => {
                    debug!("{peer_id} relayed {} bytes", msg.len());
                    self.broadcast(&peer_id, msg);
                }
                WsMessage::Close(_) => break,
                _ => {}
            }
        }

        self.peers().remove(&peer_id);
        writer.abort();
        info!("{peer_id} disconnected");
    }
}
