//! Stream Client — a thin, connection-owning wrapper around one
//! `tokio-tungstenite` WebSocket, shared by both the public market-data
//! connection and the private order-management connection. Both carry the
//! same JSON text-frame wire format, so one generic type replaces what
//! would otherwise be two near-duplicate stream wrappers.

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::{KrakenError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = futures_util::stream::SplitSink<WsStream, Message>;
type WsSource = futures_util::stream::SplitStream<WsStream>;

/// One text frame's worth of progress on a connection, as returned by
/// [`StreamClient::recv`].
pub enum Frame {
    /// A text frame arrived.
    Text(String),
    /// The peer closed the connection cleanly.
    Closed,
}

/// One full-duplex WebSocket connection to either the public or the
/// private endpoint.
///
/// `send` and `recv` are the only operations exposed — there is no
/// reconnection logic here: a transport failure is a terminal event the
/// caller is expected to observe and react to. `recv` resolves one frame
/// at a time so two connections can be driven concurrently with
/// `tokio::select!` without either one starving the other.
pub struct StreamClient {
    sink: Option<WsSink>,
    source: Option<WsSource>,
    label: &'static str,
}

impl StreamClient {
    /// Connect to `url`. `label` is used only for log lines
    /// (`"public"` / `"private"`).
    pub async fn connect(url: &str, label: &'static str) -> Result<Self> {
        tracing::info!(%url, %label, "connecting");
        let (ws, _response) = tokio_tungstenite::connect_async(url).await?;
        let (sink, source) = ws.split();
        Ok(Self {
            sink: Some(sink),
            source: Some(source),
            label,
        })
    }

    /// Send one text frame. Returns [`KrakenError::NotConnected`] if this
    /// client was never connected.
    pub async fn send(&mut self, text: String) -> Result<()> {
        let sink = self.sink.as_mut().ok_or(KrakenError::NotConnected)?;
        tracing::debug!(label = self.label, %text, "send");
        sink.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Wait for and return the next text frame, transparently absorbing
    /// protocol-level ping/pong and binary frames along the way.
    ///
    /// Returns `Ok(Frame::Closed)` on a clean server-initiated close, and
    /// `Err(KrakenError::TransportFailure)` on any transport error or
    /// unexpected stream termination — both are treated by the dispatcher
    /// as the same "this connection is done" signal, per the no-reconnect
    /// policy.
    pub async fn recv(&mut self) -> Result<Frame> {
        let source = self.source.as_mut().ok_or(KrakenError::NotConnected)?;
        loop {
            match source.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Frame::Text(text.to_string())),
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(label = self.label, ?frame, "connection closed by peer");
                    return Ok(Frame::Closed);
                }
                Some(Ok(Message::Binary(_) | Message::Frame(_))) => {
                    tracing::warn!(label = self.label, "ignoring unexpected binary frame");
                    continue;
                }
                Some(Err(e)) => {
                    tracing::warn!(label = self.label, error = %e, "transport error");
                    return Err(KrakenError::TransportFailure(e.to_string()));
                }
                None => {
                    tracing::warn!(label = self.label, "stream ended without a close frame");
                    return Err(KrakenError::TransportFailure(
                        "stream ended without a close frame".into(),
                    ));
                }
            }
        }
    }
}
