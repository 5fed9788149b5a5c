//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cert_console::config::{ApiConfig, RetryConfig};
use cert_console::ApiClient;

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request target (path and query) and returns status and JSON body.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]);
                        let target = request
                            .lines()
                            .next()
                            .and_then(|line| line.split_whitespace().nth(1))
                            .unwrap_or("/")
                            .to_string();

                        let (status, body) = f(target).await;
                        let status_text = match status {
                            200 => "200 OK",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Wrap items in a single-page list envelope.
#[allow(dead_code)]
pub fn page(items: serde_json::Value, page: u32, total_pages: u32) -> String {
    let count = items.as_array().map(|a| a.len()).unwrap_or(0);
    serde_json::json!({
        "page": page,
        "perPage": 500,
        "totalItems": count,
        "totalPages": total_pages,
        "items": items,
    })
    .to_string()
}

/// Client pointed at `addr` with fast retries.
#[allow(dead_code)]
pub fn client_for(addr: SocketAddr) -> ApiClient {
    let api = ApiConfig {
        base_url: format!("http://{}", addr),
        auth_token: Some("test-token".to_string()),
        timeout_secs: 2,
        page_size: 500,
    };
    let retries = RetryConfig {
        enabled: true,
        max_attempts: 3,
        base_delay_ms: 10,
        max_delay_ms: 50,
    };
    ApiClient::new(api, retries).unwrap()
}
