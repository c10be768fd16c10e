//! The `transport` module owns everything that touches the wire.
//!
//! - `connector`: the `Connector`/`Connection` seam the connection manager
//!   drives. Anything that can open a bidirectional, message-framed link can
//!   sit behind it.
//! - `websocket`: the client side over tokio-tungstenite.
//! - `relay`: a small WebSocket server acting as the local messaging
//!   endpoint; it forwards each frame to every other connected peer.

pub mod connector;
pub mod relay;
pub mod websocket;

pub use connector::{Connection, Connector};
pub use relay::{Relay, start_relay_server};
pub use websocket::{WsConnection, WsConnector};
