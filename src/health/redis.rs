//! Redis cache probe.
//!
//! # Responsibilities
//! - Dial Redis over TCP or a Unix socket
//! - Authenticate and select the database when configured
//! - Require `+PONG` in answer to `PING`
//!
//! # Design Decisions
//! - Speaks the minimal subset of RESP needed for the handshake
//! - Error replies (`-ERR ...`) become the probe detail verbatim

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time;

use super::probe::Probe;
use super::types::{DependencySpec, ProbeError, RedisParams};
use crate::config::schema::RedisNetwork;

pub struct RedisProbe {
    timeout: Duration,
}

impl RedisProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn dial_and_ping(&self, address: &str, params: &RedisParams) -> Result<(), ProbeError> {
        match params.network {
            RedisNetwork::Tcp => {
                let stream = TcpStream::connect(address).await?;
                handshake(stream, params).await
            }
            #[cfg(unix)]
            RedisNetwork::Unix => {
                let stream = tokio::net::UnixStream::connect(address).await?;
                handshake(stream, params).await
            }
            #[cfg(not(unix))]
            RedisNetwork::Unix => Err(ProbeError::Unsupported(
                "unix sockets are not available on this platform".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Probe for RedisProbe {
    async fn check(&self, spec: &DependencySpec) -> Result<(), ProbeError> {
        let params = spec.redis.clone().unwrap_or_default();
        tracing::debug!(address = %spec.address, network = %params.network, "Probing Redis");

        match time::timeout(self.timeout, self.dial_and_ping(&spec.address, &params)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        }
    }
}

async fn handshake<S>(stream: S, params: &RedisParams) -> Result<(), ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut conn = BufReader::new(stream);

    if let Some(password) = &params.password {
        command(&mut conn, &["AUTH", password.as_str()], "OK").await?;
    }
    if params.db != 0 {
        let db = params.db.to_string();
        command(&mut conn, &["SELECT", db.as_str()], "OK").await?;
    }
    command(&mut conn, &["PING"], "PONG").await
}

async fn command<S>(conn: &mut BufReader<S>, args: &[&str], expected: &str) -> Result<(), ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    conn.get_mut().write_all(&encode(args)).await?;
    conn.get_mut().flush().await?;

    let mut line = String::new();
    if conn.read_line(&mut line).await? == 0 {
        return Err(ProbeError::UnexpectedResponse("connection closed by server".to_string()));
    }
    parse_simple_reply(line.trim_end_matches(['\r', '\n']), expected)
}

/// Encode a command as a RESP array of bulk strings.
fn encode(args: &[&str]) -> Vec<u8> {
    let mut out = format!("*{}\r\n", args.len()).into_bytes();
    for arg in args {
        out.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        out.extend_from_slice(arg.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out
}

fn parse_simple_reply(line: &str, expected: &str) -> Result<(), ProbeError> {
    if let Some(value) = line.strip_prefix('+') {
        if value == expected {
            return Ok(());
        }
        return Err(ProbeError::UnexpectedResponse(format!(
            "expected {}, got {}",
            expected, value
        )));
    }
    if let Some(message) = line.strip_prefix('-') {
        return Err(ProbeError::Redis(message.to_string()));
    }
    Err(ProbeError::UnexpectedResponse(format!("not a redis reply: {:?}", line)))
}
