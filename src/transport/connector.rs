use async_trait::async_trait;

use crate::utils::ChatError;

/// Opens links to the messaging endpoint.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Perform the handshake. `Ok` means the link is ready for traffic.
    async fn connect(&self) -> Result<Box<dyn Connection>, ChatError>;
}

/// One open, message-framed link. Each frame carries one UTF-8 text payload.
#[async_trait]
pub trait Connection: Send {
    async fn send(&mut self, frame: String) -> Result<(), ChatError>;

    /// Next inbound frame. `None` once the remote side has closed the link.
    ///
    /// Must be cancel-safe: the manager polls it inside `select!`.
    async fn recv(&mut self) -> Option<Result<String, ChatError>>;

    /// Close the link. Errors are ignored; the link is unusable afterwards.
    async fn close(&mut self);
}
