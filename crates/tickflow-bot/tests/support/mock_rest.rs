//! Mock REST server for integration tests.
//!
//! A minimal scripted HTTP/1.1 responder on a raw TCP listener: records
//! each request head, answers with the next queued (status, body) pair,
//! and closes the connection. Enough HTTP for a reqwest client.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};

type ResponseQueue = Arc<Mutex<VecDeque<(u16, String)>>>;
type RequestLog = Arc<Mutex<Vec<String>>>;

/// A scripted mock REST server.
pub struct MockRestServer {
    addr: SocketAddr,
    requests: RequestLog,
    responses: ResponseQueue,
    shutdown_tx: mpsc::Sender<()>,
}

impl MockRestServer {
    /// Start on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
        let responses: ResponseQueue = Arc::new(Mutex::new(VecDeque::new()));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let requests_clone = requests.clone();
        let responses_clone = responses.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    accepted = listener.accept() => {
                        let Ok((stream, _)) = accepted else { break };
                        let requests = requests_clone.clone();
                        let responses = responses_clone.clone();
                        tokio::spawn(handle_connection(stream, requests, responses));
                    }
                    _ = shutdown_rx.recv() => break,
                }
            }
        });

        Self {
            addr,
            requests,
            responses,
            shutdown_tx,
        }
    }

    /// Base URL for the REST client.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queue the response for the next request.
    pub async fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses.lock().await.push_back((status, body.into()));
    }

    /// Raw request heads received so far, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }

    /// Stop accepting connections.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(mut stream: TcpStream, requests: RequestLog, responses: ResponseQueue) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    // Read until the header block is complete.
    let head_end = loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 65_536 {
            return;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();

    // Drain any request body so the client never blocks on writes.
    let content_length = content_length(&head);
    while buf.len() < head_end + content_length {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
    }

    requests.lock().await.push(head);

    let (status, body) = responses
        .lock()
        .await
        .pop_front()
        .unwrap_or((200, "{}".to_string()));
    let reason = if status < 400 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn content_length(head: &str) -> usize {
    for line in head.lines() {
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                return value.trim().parse().unwrap_or(0);
            }
        }
    }
    0
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
