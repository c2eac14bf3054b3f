//! Shared mock dependencies for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use fetch_gate::health::{DependencySpec, Probe, ProbeError};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Start a mock Splash answering every request with `status`/`body`.
pub async fn start_mock_splash(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let status_text = match status {
                    200 => "200 OK",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a mock Redis answering every command with `reply` (a full RESP line).
pub async fn start_mock_redis(reply: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut conn = BufReader::new(socket);
                loop {
                    let mut header = String::new();
                    if conn.read_line(&mut header).await.unwrap_or(0) == 0 {
                        break;
                    }
                    let argc: usize = header.trim_start_matches('*').trim().parse().unwrap_or(0);
                    for _ in 0..argc * 2 {
                        let mut skip = String::new();
                        let _ = conn.read_line(&mut skip).await;
                    }
                    if conn.get_mut().write_all(reply.as_bytes()).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Probe with a fixed outcome that counts its invocations.
#[derive(Clone)]
pub struct FixedProbe {
    failure: Option<&'static str>,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl FixedProbe {
    pub fn ok() -> Self {
        Self {
            failure: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(detail: &'static str) -> Self {
        Self {
            failure: Some(detail),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for FixedProbe {
    async fn check(&self, _spec: &DependencySpec) -> Result<(), ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            Some(detail) => Err(ProbeError::Io(std::io::Error::other(detail))),
            None => Ok(()),
        }
    }
}
