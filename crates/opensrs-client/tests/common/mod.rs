/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for opensrs-client tests

#![allow(dead_code)]

use opensrs_client::{ClientConfig, Direction, ExchangeLogger};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::MockServer;

pub const USERNAME: &str = "u";
pub const KEY: &str = "k";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client configuration pointing at `server`
pub fn test_config(server: &str) -> ClientConfig {
    ClientConfig::new(server, USERNAME, KEY)
}

/// Successful domain lookup reply
pub fn lookup_reply() -> String {
    r#"<?xml version='1.0' encoding='UTF-8' standalone='no' ?>
<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>
<OPS_envelope>
 <header>
  <version>0.9</version>
 </header>
 <body>
  <data_block>
   <dt_assoc>
    <item key="protocol">XCP</item>
    <item key="action">REPLY</item>
    <item key="object">DOMAIN</item>
    <item key="is_success">1</item>
    <item key="response_code">210</item>
    <item key="response_text">Domain available</item>
    <item key="attributes">
     <dt_assoc>
      <item key="status">available</item>
     </dt_assoc>
    </item>
   </dt_assoc>
  </data_block>
 </body>
</OPS_envelope>
"#
    .to_string()
}

/// Logger capturing every exchange line
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Direction, Option<String>, String)>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<(Direction, Option<String>, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl ExchangeLogger for RecordingLogger {
    fn log(&self, direction: Direction, label: Option<&str>, xml: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((direction, label.map(str::to_string), xml.to_string()));
    }
}

/// Server that answers every request with bytes that are not HTTP
pub async fn spawn_malformed_http_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut stream).await;
                let _ = stream.write_all(b"GARBAGE\r\n\r\n").await;
                let _ = stream.shutdown().await;
            });
        }
    });

    addr
}

/// Server that reads each request and aborts the connection with a reset
pub async fn spawn_resetting_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut stream).await;
                // zero linger turns the close into an RST
                #[allow(deprecated)]
                let _ = stream.set_linger(Some(Duration::ZERO));
                drop(stream);
            });
        }
    });

    addr
}

/// Server that reads each request and closes cleanly without answering
pub async fn spawn_silent_closing_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut stream).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    addr
}

/// Read a full request (headers plus Content-Length body) off the socket
async fn read_request(stream: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let Ok(read) = stream.read(&mut chunk).await else {
            return;
        };
        if read == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..read]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + content_length {
            return;
        }
    }
}

/// Address with nothing listening on it
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
