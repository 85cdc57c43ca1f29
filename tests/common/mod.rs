//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A mock upstream host that records the request targets it receives and
/// answers every request with a fixed body.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    /// Bind to an ephemeral port and start serving.
    pub async fn start(response_body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((mut socket, _)) => {
                        let recorded = recorded.clone();
                        tokio::spawn(async move {
                            let mut buf = vec![0u8; 8192];
                            let mut read = 0;
                            // Read until end of headers; bodies are empty in these tests.
                            loop {
                                match socket.read(&mut buf[read..]).await {
                                    Ok(0) => break,
                                    Ok(n) => {
                                        read += n;
                                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                                            break;
                                        }
                                    }
                                    Err(_) => return,
                                }
                            }

                            if let Some(target) = request_target(&buf[..read]) {
                                recorded.lock().unwrap().push(target);
                            }

                            let response = format!(
                                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                response_body.len(),
                                response_body
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        Self { addr, requests }
    }

    /// Base URL for pointing the proxy at this mock.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request targets received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Extract the request target from the request line.
fn request_target(raw: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(raw).ok()?;
    let line = text.lines().next()?;
    line.split_whitespace().nth(1).map(str::to_string)
}
