//! Session-keyed websocket relay: peers that JOIN the same session id
//! receive every other peer's messages in that session. Grounded on
//! `backend/server/relay.py`; the wire protocol (JOIN/JOINED/PING/PONG/
//! ERROR, forward-everything-else) is unchanged, translated into a
//! `tokio`+`tokio-tungstenite` server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

use crate::error::NetError;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Incoming {
    #[serde(rename = "JOIN")]
    Join { session_id: String },
    #[serde(rename = "PING")]
    Ping,
    #[serde(other)]
    Other,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum Outgoing<'a> {
    #[serde(rename = "JOINED")]
    Joined { session_id: &'a str },
    #[serde(rename = "PONG")]
    Pong,
    #[serde(rename = "ERROR")]
    Error { message: &'a str },
}

type PeerId = u64;
type PeerMap = HashMap<PeerId, UnboundedSender<Message>>;

/// Shared session table: session id -> connected peers. Cloned cheaply
/// (an `Arc`) into each connection task.
#[derive(Clone, Default)]
pub struct SessionTable {
    sessions: Arc<Mutex<HashMap<String, PeerMap>>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    async fn join(&self, session_id: &str, peer: PeerId, sender: UnboundedSender<Message>) {
        let mut sessions = self.sessions.lock().await;
        sessions.entry(session_id.to_string()).or_default().insert(peer, sender);
    }

    async fn leave(&self, session_id: &str, peer: PeerId) {
        let mut sessions = self.sessions.lock().await;
        if let Some(peers) = sessions.get_mut(session_id) {
            peers.remove(&peer);
            if peers.is_empty() {
                sessions.remove(session_id);
            }
        }
    }

    /// Forwards `payload` to every peer in `session_id` except `sender`.
    async fn broadcast(&self, session_id: &str, sender: PeerId, payload: String) {
        let sessions = self.sessions.lock().await;
        let Some(peers) = sessions.get(session_id) else { return };
        for (&peer, tx) in peers.iter() {
            if peer == sender {
                continue;
            }
            // A closed receiver means that peer's connection task is
            // already tearing down; its own `leave` call will clean up
            // the table entry, so a failed send here is not an error.
            let _ = tx.send(Message::Text(payload.clone()));
        }
    }
}

/// Runs the relay server until the listener errors, accepting connections
/// and spawning one task per peer.
pub async fn serve(bind_addr: SocketAddr) -> Result<(), NetError> {
    let listener = TcpListener::bind(bind_addr).await?;
    log::info!("relay listening on {bind_addr}");
    let table = SessionTable::new();
    let next_peer_id = Arc::new(AtomicU64::new(1));

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let table = table.clone();
        let peer_id = next_peer_id.fetch_add(1, Ordering::Relaxed);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, peer_id, table).await {
                log::warn!("relay connection {peer_addr} ended: {e}");
            }
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    peer_id: PeerId,
    table: SessionTable,
) -> Result<(), NetError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws.split();

    let first = match read.next().await {
        Some(msg) => msg?,
        None => return Ok(()),
    };

    let session_id = match first {
        Message::Text(text) => match serde_json::from_str::<Incoming>(&text) {
            Ok(Incoming::Join { session_id }) => session_id,
            _ => {
                let err = serde_json::to_string(&Outgoing::Error {
                    message: "First message must be JOIN with session_id",
                })?;
                write.send(Message::Text(err)).await?;
                return Ok(());
            }
        },
        _ => {
            let err = serde_json::to_string(&Outgoing::Error {
                message: "First message must be JOIN with session_id",
            })?;
            write.send(Message::Text(err)).await?;
            return Ok(());
        }
    };

    let (tx, mut rx) = unbounded_channel::<Message>();
    table.join(&session_id, peer_id, tx.clone()).await;
    log::info!("peer {peer_id} joined session {session_id} from {peer_addr}");

    let joined = serde_json::to_string(&Outgoing::Joined { session_id: &session_id })?;
    write.send(Message::Text(joined)).await?;

    let outbound = async {
        while let Some(msg) = rx.recv().await {
            if write.send(msg).await.is_err() {
                break;
            }
        }
    };

    let inbound_table = table.clone();
    let inbound_session = session_id.clone();
    let inbound = async {
        while let Some(Ok(msg)) = read.next().await {
            let Message::Text(text) = msg else { continue };
            match serde_json::from_str::<Incoming>(&text) {
                Ok(Incoming::Ping) => {
                    let pong = serde_json::to_string(&Outgoing::Pong).unwrap_or_default();
                    let _ = tx.send(Message::Text(pong));
                }
                Ok(_) => {
                    inbound_table.broadcast(&inbound_session, peer_id, text).await;
                }
                Err(_) => {
                    log::warn!("peer {peer_id} sent malformed JSON");
                }
            }
        }
    };

    tokio::select! {
        _ = outbound => {}
        _ = inbound => {}
    }

    table.leave(&session_id, peer_id).await;
    log::info!("peer {peer_id} left session {session_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_tungstenite::connect_async;

    async fn spawn_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let table = SessionTable::new();
        let next_peer_id = Arc::new(AtomicU64::new(1));
        tokio::spawn(async move {
            loop {
                let (stream, peer_addr) = match listener.accept().await {
                    Ok(v) => v,
                    Err(_) => return,
                };
                let table = table.clone();
                let peer_id = next_peer_id.fetch_add(1, Ordering::Relaxed);
                tokio::spawn(handle_connection(stream, peer_addr, peer_id, table));
            }
        });
        addr
    }

    #[tokio::test]
    async fn join_yields_joined_ack() {
        let addr = spawn_server().await;
        let (mut ws, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        ws.send(Message::Text(r#"{"type":"JOIN","session_id":"abc"}"#.into()))
            .await
            .unwrap();
        let reply = ws.next().await.unwrap().unwrap();
        assert!(reply.to_text().unwrap().contains("JOINED"));
    }

    #[tokio::test]
    async fn broadcast_reaches_other_session_member_only() {
        let addr = spawn_server().await;
        let (mut a, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        let (mut b, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        let (mut c, _) = connect_async(format!("ws://{addr}")).await.unwrap();

        a.send(Message::Text(r#"{"type":"JOIN","session_id":"room1"}"#.into())).await.unwrap();
        a.next().await.unwrap().unwrap();
        b.send(Message::Text(r#"{"type":"JOIN","session_id":"room1"}"#.into())).await.unwrap();
        b.next().await.unwrap().unwrap();
        c.send(Message::Text(r#"{"type":"JOIN","session_id":"room2"}"#.into())).await.unwrap();
        c.next().await.unwrap().unwrap();

        a.send(Message::Text(r#"{"type":"CLIPBOARD_SET","text":"hi"}"#.into())).await.unwrap();

        let received = b.next().await.unwrap().unwrap();
        assert!(received.to_text().unwrap().contains("hi"));
    }

    #[tokio::test]
    async fn non_join_first_message_gets_error() {
        let addr = spawn_server().await;
        let (mut ws, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        ws.send(Message::Text(r#"{"type":"PING"}"#.into())).await.unwrap();
        let reply = ws.next().await.unwrap().unwrap();
        assert!(reply.to_text().unwrap().contains("ERROR"));
    }
}
