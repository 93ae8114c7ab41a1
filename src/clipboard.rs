//! Clipboard bridge: a websocket client of [`crate::relay`] that forwards
//! local "copy just happened" events to the session and writes incoming
//! `CLIPBOARD_SET` payloads to the host clipboard. Host clipboard access
//! is a `ClipboardAccess` trait backed by `arboard`, keeping
//! platform-specific clipboard utilities at the boundary per §1's
//! Out-of-scope list.

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_tungstenite::tungstenite::Message;

use crate::error::NetError;

/// Host clipboard read/write, independent of any one platform's API.
pub trait ClipboardAccess: Send {
    fn get_text(&mut self) -> Result<String, BackendClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), BackendClipboardError>;
}

#[derive(Debug, thiserror::Error)]
#[error("clipboard access failed: {0}")]
pub struct BackendClipboardError(pub String);

#[cfg(feature = "local-backend")]
pub struct ArboardClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "local-backend")]
impl ArboardClipboard {
    pub fn new() -> Result<Self, BackendClipboardError> {
        Ok(Self {
            inner: arboard::Clipboard::new().map_err(|e| BackendClipboardError(e.to_string()))?,
        })
    }
}

#[cfg(feature = "local-backend")]
impl ClipboardAccess for ArboardClipboard {
    fn get_text(&mut self) -> Result<String, BackendClipboardError> {
        self.inner.get_text().map_err(|e| BackendClipboardError(e.to_string()))
    }

    fn set_text(&mut self, text: &str) -> Result<(), BackendClipboardError> {
        self.inner.set_text(text.to_string()).map_err(|e| BackendClipboardError(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum OutgoingMessage<'a> {
    #[serde(rename = "JOIN")]
    Join { session_id: &'a str },
    #[serde(rename = "CLIPBOARD_SET")]
    ClipboardSet { from: &'a str, text: &'a str },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum IncomingMessage {
    #[serde(rename = "CLIPBOARD_SET")]
    ClipboardSet { text: String },
    #[serde(other)]
    Other,
}

pub struct ClipboardConfig {
    pub relay_uri: String,
    pub session_id: String,
    pub name: String,
}

/// Runs the clipboard bridge until the websocket connection closes. Reads
/// `send_trigger` for "copy just happened" notifications (fed by the
/// dispatcher's `Copy` handling) and the relay socket for remote
/// `CLIPBOARD_SET` frames, writing the latter straight to `clipboard`.
/// The relay's broadcast semantics already exclude the sender, so no
/// explicit local-echo suppression is needed here.
pub async fn run(
    config: ClipboardConfig,
    mut clipboard: Box<dyn ClipboardAccess>,
    mut send_trigger: UnboundedReceiver<()>,
) -> Result<(), NetError> {
    let (ws, _) = tokio_tungstenite::connect_async(config.relay_uri.as_str()).await?;
    let (mut write, mut read) = ws.split();

    let join = serde_json::to_string(&OutgoingMessage::Join { session_id: &config.session_id })?;
    write.send(Message::Text(join)).await?;
    // Consume the JOINED acknowledgement before entering the main loop.
    let _ = read.next().await;

    loop {
        tokio::select! {
            trigger = send_trigger.recv() => {
                let Some(()) = trigger else { break };
                let text = clipboard
                    .get_text()
                    .unwrap_or_default();
                let msg = serde_json::to_string(&OutgoingMessage::ClipboardSet {
                    from: &config.name,
                    text: &text,
                })?;
                write.send(Message::Text(msg)).await?;
            }
            incoming = read.next() => {
                let Some(incoming) = incoming else { break };
                let Message::Text(text) = incoming? else { continue };
                match serde_json::from_str::<IncomingMessage>(&text) {
                    Ok(IncomingMessage::ClipboardSet { text }) => {
                        if let Err(e) = clipboard.set_text(&text) {
                            log::warn!("failed to write incoming clipboard payload: {e}");
                        }
                    }
                    Ok(IncomingMessage::Other) => {}
                    Err(e) => log::warn!("malformed relay frame: {e}"),
                }
            }
        }
    }

    Ok(())
}
