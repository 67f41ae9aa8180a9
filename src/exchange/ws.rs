//! Websocket feed collaborator interface (spec §6) and a
//! `tokio-tungstenite`-backed implementation.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

/// The subscribe frame sent immediately after connecting (spec §6).
fn subscribe_frame(product_id: &str) -> String {
    format!(r#"{{"type":"subscribe","product_id":"{product_id}"}}"#)
}

/// The websocket surface the synchronizer depends on: connect, subscribe,
/// and read frames one at a time. A session is single-use — once
/// `recv_message` returns `None` or errors, the caller reconnects via a
/// fresh [`ExchangeFeed`].
#[async_trait]
pub trait ExchangeFeed: Send {
    /// Errors returned by this feed.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Opens the connection and sends the subscribe frame.
    async fn connect_and_subscribe(&mut self, product_id: &str) -> Result<(), Self::Error>;

    /// Reads the next text frame, or `None` on a clean close.
    async fn recv_message(&mut self) -> Result<Option<String>, Self::Error>;
}

/// [`ExchangeFeed`] implementation backed by [`tokio_tungstenite`].
pub struct TungsteniteFeed {
    url: String,
    stream: Option<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
    >,
}

impl TungsteniteFeed {
    /// Creates a feed that will connect to `url` (e.g.
    /// `wss://ws-feed.exchange.coinbase.com`) when `connect_and_subscribe`
    /// is called.
    pub fn new(url: impl Into<String>) -> Self {
        TungsteniteFeed {
            url: url.into(),
            stream: None,
        }
    }
}

#[async_trait]
impl ExchangeFeed for TungsteniteFeed {
    type Error = tokio_tungstenite::tungstenite::Error;

    async fn connect_and_subscribe(&mut self, product_id: &str) -> Result<(), Self::Error> {
        let (mut stream, _response) = tokio_tungstenite::connect_async(&self.url).await?;
        stream.send(Message::Text(subscribe_frame(product_id).into())).await?;
        self.stream = Some(stream);
        Ok(())
    }

    async fn recv_message(&mut self) -> Result<Option<String>, Self::Error> {
        let stream = self
            .stream
            .as_mut()
            .expect("connect_and_subscribe must be called before recv_message");
        loop {
            match stream.next().await {
                None => return Ok(None),
                Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(err),
            }
        }
    }
}
