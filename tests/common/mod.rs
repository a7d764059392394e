//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use axum_server::tls_rustls::RustlsConfig;
use rcgen::{generate_simple_self_signed, CertifiedKey};
use tokio::net::{TcpListener, TcpStream};

use portal_server::config::{BackendConfig, PortalConfig};
use portal_server::upstream::FixedUserAgent;
use portal_server::{HttpServer, Shutdown};

pub const TEST_USER_AGENT: &str = "portal-integration-test/1.0";

/// What the mock backend saw.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    /// e.g. "GET /x/y?a=1 HTTP/1.1"
    pub request_line: String,
    pub head: String,
}

impl SeenRequest {
    pub fn target(&self) -> &str {
        self.request_line.split(' ').nth(1).unwrap_or("")
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

/// A canned upstream reply.
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Start a programmable mock backend; returns its address and a request log.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Arc<Mutex<Vec<SeenRequest>>>)
where
    F: Fn(SeenRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = seen.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let request = SeenRequest {
                            request_line: head.lines().next().unwrap_or("").to_string(),
                            head,
                        };
                        log.lock().unwrap().push(request.clone());

                        let reply = f(request).await;
                        let mut response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
                            reply.status,
                            reason(reply.status),
                            reply.body.len()
                        );
                        for (name, value) in &reply.headers {
                            response.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        response.push_str("\r\n");
                        response.push_str(&reply.body);

                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, seen)
}

/// Start a mock backend that always returns the same reply.
pub async fn start_mock_backend(status: u16, body: &'static str) -> (SocketAddr, Arc<Mutex<Vec<SeenRequest>>>) {
    start_programmable_backend(move |_| async move { Reply::new(status, body) }).await
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// Start an HTTPS backend with a self-signed certificate for a host name
/// that does not match its address.
pub async fn start_tls_backend(body: &'static str) -> SocketAddr {
    let CertifiedKey { cert, signing_key } =
        generate_simple_self_signed(vec!["upstream.invalid".to_string()]).unwrap();
    let tls = RustlsConfig::from_pem(
        cert.pem().into_bytes(),
        signing_key.serialize_pem().into_bytes(),
    )
    .await
    .unwrap();

    let app = axum::Router::new().fallback(move || async move { body });
    let handle = axum_server::Handle::new();
    let server_handle = handle.clone();
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    tokio::spawn(async move {
        let _ = axum_server::bind_rustls(addr, tls)
            .handle(server_handle)
            .serve(app.into_make_service())
            .await;
    });

    handle.listening().await.expect("tls backend bound")
}

/// Config pointing one backend at `addr`, with the given asset root.
pub fn config_for(addr: SocketAddr, assets: &Path) -> PortalConfig {
    let mut config = PortalConfig::default();
    config.backends = vec![BackendConfig::new(
        "mock",
        "/api/mock",
        &format!("http://{}", addr),
    )];
    config.assets.root = Some(assets.to_path_buf());
    config.upstream.system_proxy = false;
    config
}

/// Like [`config_for`], but the backend is reached over HTTPS.
pub fn tls_config_for(addr: SocketAddr, assets: &Path) -> PortalConfig {
    let mut config = config_for(addr, assets);
    config.backends = vec![BackendConfig::new(
        "mock",
        "/api/mock",
        &format!("https://{}", addr),
    )];
    config
}

/// Write a minimal SPA build into `dir`.
pub fn write_site(dir: &Path) {
    std::fs::write(dir.join("index.html"), "<!doctype html><div id=root></div>").unwrap();
    std::fs::create_dir_all(dir.join("assets")).unwrap();
    std::fs::write(dir.join("assets/app.js"), "console.log('portal')").unwrap();
}

/// Start the portal on an ephemeral port.
pub async fn start_portal(config: PortalConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::with_identity(&config, Arc::new(FixedUserAgent(TEST_USER_AGENT.into())))
        .expect("server builds");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Listener is already bound; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// Client that bypasses environment proxies and keeps no idle connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Assert the fixed CORS header set.
pub fn assert_cors(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type, User-Agent");
}
