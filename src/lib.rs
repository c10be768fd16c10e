//! # medlink
//!
//! `medlink` is the real-time side of a hospital-management client: the live
//! chat between doctors and pharmacists, plus a thin typed client for the
//! hospital REST API that every other dashboard talks to.
//!
//! ## Core Modules
//!
//! - `message`: the chat message and its JSON frame encoding.
//! - `store`: the ordered, id-deduplicated message store of a chat view.
//! - `connection`: a connection manager that keeps one link open and
//!   reconnects at a fixed interval until torn down.
//! - `session`: a chat view's state, tying a store to a connection manager.
//! - `transport`: the connector seam, the WebSocket client, and the local
//!   relay server.
//! - `api`: REST client with injected credentials.
//! - `config`: settings from file and environment.
//! - `utils`: error types and logging setup.

pub mod api;
pub mod config;
pub mod connection;
pub mod message;
pub mod session;
pub mod store;
pub mod transport;
pub mod utils;

#[cfg(test)]
pub(crate) mod tests;
