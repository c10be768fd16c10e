//! WebSocket client transport
//!
//! `WsConnector` dials the configured endpoint with `connect_async`. Text
//! frames are passed through as-is; binary frames are accepted when they are
//! valid UTF-8. Ping/pong are handled by tungstenite and never surface.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;
use tungstenite::protocol::Message as WsMessage;

use crate::transport::connector::{Connection, Connector};
use crate::utils::ChatError;

#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<Box<dyn Connection>, ChatError> {
        let (stream, _response) = connect_async(self.url.as_str()).await?;
        debug!(url = %self.url, "websocket handshake complete");
        Ok(Box::new(WsConnection { stream }))
    }
}

pub struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connection for WsConnection {
    async fn send(&mut self, frame: String) -> Result<(), ChatError> {
        self.stream.send(WsMessage::Text(frame.into())).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String, ChatError>> {
        loop {
            match self.stream.next().await? {
                Ok(WsMessage::Text(text)) => return Some(Ok(text.as_str().to_owned())),
                Ok(WsMessage::Binary(bytes)) => match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => debug!(len = bytes.len(), "skipping non-UTF-8 binary frame"),
                },
                Ok(WsMessage::Close(_)) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "error while closing websocket");
        }
    }
}
