//! Mock stream server for integration tests.
//!
//! A scripted WebSocket server: the test pushes frames to send and can
//! drop the live connection to exercise the reconnect path. Commands
//! queue until a connection is available, so a command pushed while the
//! client is reconnecting is delivered on the next connection.

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Command executed by the connection that currently holds the queue.
pub enum ServerCmd {
    /// Send a text frame to the client.
    Send(String),
    /// Close the connection abruptly.
    Drop,
}

/// A scripted mock stream server.
pub struct MockStreamServer {
    addr: SocketAddr,
    cmd_tx: mpsc::Sender<ServerCmd>,
    connections: Arc<AtomicU32>,
    shutdown_tx: mpsc::Sender<()>,
}

impl MockStreamServer {
    /// Start on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (cmd_tx, cmd_rx) = mpsc::channel::<ServerCmd>(32);
        let cmd_rx = Arc::new(Mutex::new(cmd_rx));
        let connections = Arc::new(AtomicU32::new(0));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let conn_counter = connections.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accepted = listener.accept() => {
                        let Ok((stream, _)) = accepted else { break };
                        conn_counter.fetch_add(1, Ordering::SeqCst);
                        let cmd_rx = cmd_rx.clone();
                        tokio::spawn(handle_connection(stream, cmd_rx));
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
        });

        Self {
            addr,
            cmd_tx,
            connections,
            shutdown_tx,
        }
    }

    /// Base URL for the subscriber config.
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Total connections accepted so far.
    pub fn connection_count(&self) -> u32 {
        self.connections.load(Ordering::SeqCst)
    }

    /// Queue a text frame for the live (or next) connection.
    pub async fn send_frame(&self, text: impl Into<String>) {
        self.cmd_tx.send(ServerCmd::Send(text.into())).await.unwrap();
    }

    /// Abruptly close the live (or next) connection.
    pub async fn drop_connection(&self) {
        self.cmd_tx.send(ServerCmd::Drop).await.unwrap();
    }

    /// Stop accepting connections.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(stream: TcpStream, cmd_rx: Arc<Mutex<mpsc::Receiver<ServerCmd>>>) {
    let Ok(ws) = accept_async(stream).await else {
        return;
    };
    let (mut write, mut read) = ws.split();
    let mut cmd_rx = cmd_rx.lock().await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(ServerCmd::Send(text)) => {
                    if write.send(Message::Text(text)).await.is_err() {
                        return;
                    }
                }
                // Returning drops the socket without a Close handshake.
                Some(ServerCmd::Drop) | None => return,
            },
            msg = read.next() => match msg {
                Some(Ok(_)) => {}
                _ => return,
            },
        }
    }
}
