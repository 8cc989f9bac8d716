//! Local HTTP server answering every request with one canned response.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use gold_dashboard_lib::config::SourceConfig;

pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// Request lines ("GET /path?query HTTP/1.1") seen so far.
    pub fn requests(&self) -> Vec<String> {
        self.heads()
            .iter()
            .filter_map(|head| head.lines().next().map(str::to_string))
            .collect()
    }

    /// Full request heads, request line plus header lines.
    pub fn heads(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Value of `name` in the `index`th request, matched case-insensitively.
    pub fn header(&self, index: usize, name: &str) -> Option<String> {
        let heads = self.heads();
        heads.get(index)?.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    pub fn source(&self, path: &str) -> SourceConfig {
        SourceConfig::new(&format!("{}{}", self.url, path)).with_timeout(Duration::from_secs(5))
    }
}

pub async fn serve(status: u16, content_type: &'static str, body: impl Into<String>) -> MockServer {
    let body: String = body.into();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));

    let seen = requests.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let body = body.clone();
            let seen = seen.clone();
            tokio::spawn(async move {
                respond(socket, status, content_type, &body, seen).await;
            });
        }
    });

    MockServer { url, requests }
}

/// URL that accepts connections and never answers.
pub async fn silent_source(timeout: Duration) -> SourceConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    SourceConfig::new(&format!("http://{}/", addr)).with_timeout(timeout)
}

/// URL nothing listens on.
pub async fn unreachable_source() -> SourceConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    SourceConfig::new(&format!("http://{}/", addr)).with_timeout(Duration::from_secs(2))
}

async fn respond(
    mut socket: TcpStream,
    status: u16,
    content_type: &str,
    body: &str,
    seen: Arc<Mutex<Vec<String>>>,
) {
    let request = read_request(&mut socket).await;
    let head = request.split("\r\n\r\n").next().unwrap_or_default();
    if !head.is_empty() {
        seen.lock().unwrap().push(head.replace("\r\n", "\n"));
    }

    let reason = match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        content_type,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Reads the head and, if announced, the body so the client is never reset.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);

        if let Some(head_end) = find(&data, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..head_end]).to_string();
            let length = head
                .lines()
                .filter_map(|l| l.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= head_end + 4 + length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&data).to_string()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
