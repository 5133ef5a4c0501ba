//! Minimal HTTP/1.1 stub for transport tests.
//!
//! Serves one scripted response per accepted connection and closes it
//! afterwards, so the client never reuses a pooled connection.

use reqwest::StatusCode;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

pub(crate) enum StubResponse {
    Json { status: u16, body: String },
    Text { status: u16, body: String },
    Empty { status: u16 },
    /// Close-delimited body written chunk by chunk. With `hold_open` the
    /// connection stays up after the last chunk until the client drops it.
    Stream {
        chunks: Vec<&'static str>,
        hold_open: bool,
    },
}

impl StubResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        StubResponse::Json {
            status,
            body: body.to_string(),
        }
    }

    pub fn stream(chunks: Vec<&'static str>) -> Self {
        StubResponse::Stream {
            chunks,
            hold_open: false,
        }
    }
}

pub(crate) struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    client_disconnected: Arc<AtomicBool>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let client_disconnected = Arc::new(AtomicBool::new(false));

        let recorded = Arc::clone(&requests);
        let disconnected = Arc::clone(&client_disconnected);
        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                recorded.lock().unwrap().push(request);
                write_response(&mut socket, response, &disconnected).await;
            }
        });

        Self {
            addr,
            requests,
            client_disconnected,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn wait_for_disconnect(&self) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !self.client_disconnected.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("client never closed the connection");
    }
}

/// Address nothing is listening on.
pub(crate) async fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn read_request(socket: &mut TcpStream) -> RecordedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending a full request");
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    RecordedRequest {
        method,
        path,
        body: String::from_utf8_lossy(&body).to_string(),
    }
}

async fn write_response(socket: &mut TcpStream, response: StubResponse, disconnected: &AtomicBool) {
    match response {
        StubResponse::Json { status, body } => {
            write_full(socket, status, "application/json", &body).await
        }
        StubResponse::Text { status, body } => write_full(socket, status, "text/html", &body).await,
        StubResponse::Empty { status } => {
            let length = if status == 204 { "" } else { "Content-Length: 0\r\n" };
            let head = format!(
                "HTTP/1.1 {} {}\r\n{}Connection: close\r\n\r\n",
                status,
                reason(status),
                length
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
        StubResponse::Stream { chunks, hold_open } => {
            let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n";
            if socket.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            for chunk in chunks {
                if socket.write_all(chunk.as_bytes()).await.is_err() {
                    return;
                }
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
            if hold_open {
                let mut scratch = [0u8; 64];
                loop {
                    match socket.read(&mut scratch).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    }
                }
                disconnected.store(true, Ordering::SeqCst);
            } else {
                let _ = socket.shutdown().await;
            }
        }
    }
}

async fn write_full(socket: &mut TcpStream, status: u16, content_type: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        content_type,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}
