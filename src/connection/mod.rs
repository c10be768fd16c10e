//! The `connection` module keeps a single live link to the messaging
//! endpoint and re-establishes it when it drops.
//!
//! `ConnectionManager::spawn` starts a driver task that owns the link. The
//! driver walks `Connecting -> Open -> Closed -> Connecting ...` for as long as
//! the manager lives, waiting a fixed delay in `Closed` before each new attempt.
//! Everything the driver observes (state changes and inbound frames) is
//! reported in order on one event channel.

pub mod cancel;
pub mod manager;
pub mod state;

pub use cancel::{CancelHandle, CancelToken};
pub use manager::ConnectionManager;
pub use state::{ConnectionEvent, ConnectionState, SendOutcome};
