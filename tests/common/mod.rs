//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

use service_client::client::{HttpTransport, ManualClock, ServiceClient};
use service_client::config::{ClientConfig, TEMPLATE_SERVICE, USER_SERVICE};
use service_client::resilience::{BreakerPolicy, CircuitRegistry};

/// A running mock backend.
#[allow(dead_code)]
pub struct MockBackend {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
    paths: Arc<std::sync::Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockBackend {
    /// Requests received so far.
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request paths received so far.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api/v1", self.addr)).unwrap()
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` is called once per request and returns the status and body to send.
pub async fn start_programmable_backend<F, Fut>(f: F) -> MockBackend
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let paths = Arc::new(std::sync::Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let (hits_task, paths_task) = (hits.clone(), paths.clone());
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let hits = hits_task.clone();
                    let paths = paths_task.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 4096];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]);
                        if let Some(path) = head.split_whitespace().nth(1) {
                            paths.lock().unwrap().push(path.to_string());
                        }
                        hits.fetch_add(1, Ordering::SeqCst);

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
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
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend { addr, hits, paths }
}

/// A client using the real HTTP transport and a manual clock.
#[allow(dead_code)]
pub fn client_for(
    base_url: Url,
    max_failures: u32,
    timeout: Duration,
) -> (ServiceClient<HttpTransport, ManualClock>, ManualClock) {
    let registry = Arc::new(CircuitRegistry::new(
        BreakerPolicy {
            max_failures,
            reset_timeout: Duration::from_secs(60),
        },
        [USER_SERVICE, TEMPLATE_SERVICE],
    ));
    let clock = ManualClock::new();
    let transport = HttpTransport::new(&ClientConfig::default().http).unwrap();
    let client = ServiceClient::new(registry, transport, clock.clone(), base_url, timeout).unwrap();
    (client, clock)
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/api/v1", addr)).unwrap()
}
