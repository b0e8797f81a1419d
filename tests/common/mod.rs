#![allow(dead_code)]

use satload::{Publisher, TelemetryEvent, TransportError};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Publisher that accepts everything and keeps a copy of each event.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Publisher for RecordingPublisher {
    async fn publish(&self, event: &TelemetryEvent) -> Result<String, TransportError> {
        self.events.lock().unwrap().push(event.clone());
        Ok("accepted".to_string())
    }
}

/// Publisher whose endpoint never answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachablePublisher;

impl Publisher for UnreachablePublisher {
    async fn publish(&self, _event: &TelemetryEvent) -> Result<String, TransportError> {
        Err(TransportError::Timeout)
    }
}

/// Publisher that takes `delay` to answer each request.
#[derive(Debug, Clone, Copy)]
pub struct SlowPublisher {
    pub delay: Duration,
}

impl Publisher for SlowPublisher {
    async fn publish(&self, _event: &TelemetryEvent) -> Result<String, TransportError> {
        tokio::time::sleep(self.delay).await;
        Ok(String::new())
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Minimal HTTP/1.1 endpoint that answers every request with a fixed status
/// and records what it received.
pub struct TelemetrySink {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    server: JoinHandle<()>,
}

impl TelemetrySink {
    pub async fn start() -> Self {
        Self::start_with_status("200 OK").await
    }

    pub async fn start_with_status(status: &'static str) -> Self {
        Self::start_with_response(status, b"ok").await
    }

    pub async fn start_with_response(status: &'static str, body: &'static [u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let server_requests = Arc::clone(&requests);
        let server = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let client_requests = Arc::clone(&server_requests);
                tokio::spawn(async move {
                    let _ = handle_client(stream, client_requests, status, body).await;
                });
            }
        });

        Self {
            addr,
            requests,
            server,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for TelemetrySink {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle_client(
    stream: TcpStream,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    status: &'static str,
    response_body: &'static [u8],
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    // Keep-alive: serve requests until the client closes the connection
    loop {
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).await? == 0 {
            return Ok(());
        }

        let mut content_length = 0usize;
        let mut content_type = None;
        loop {
            let mut header = String::new();
            if reader.read_line(&mut header).await? == 0 {
                return Ok(());
            }
            let header = header.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                let value = value.trim();
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.parse().unwrap_or(0);
                } else if name.eq_ignore_ascii_case("content-type") {
                    content_type = Some(value.to_string());
                }
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await?;

        requests.lock().unwrap().push(CapturedRequest {
            request_line: request_line.trim_end().to_string(),
            content_type,
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\n\r\n",
            response_body.len()
        );
        let stream = reader.get_mut();
        stream.write_all(head.as_bytes()).await?;
        stream.write_all(response_body).await?;
    }
}

/// Address nothing is listening on.
pub async fn unused_local_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Accepts connections and never answers them.
pub async fn start_black_hole() -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    (addr, handle)
}
