//! Shared utilities for integration tests: a TLS capsule and a gateway.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rustls::ServerConfig;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use gemini_gateway::config::GatewayConfig;
use gemini_gateway::http::HttpServer;
use gemini_gateway::lifecycle::Shutdown;

const CERT_PEM: &str = include_str!("../fixtures/cert.pem");
const KEY_PEM: &str = include_str!("../fixtures/key.pem");

/// A mock capsule serving a self-signed certificate.
pub struct MockCapsule {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockCapsule {
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Request lines received so far, CRLF included.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn server_config() -> Arc<ServerConfig> {
    let certs = rustls_pemfile::certs(&mut CERT_PEM.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let key = rustls_pemfile::private_key(&mut KEY_PEM.as_bytes())
        .unwrap()
        .expect("fixture has a private key");
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .unwrap();
    Arc::new(config)
}

/// Start a capsule that answers every request line with `respond(line)`
/// and then closes the connection with close_notify.
pub async fn start_capsule<F>(respond: F) -> MockCapsule
where
    F: Fn(&str) -> Vec<u8> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let acceptor = TlsAcceptor::from(server_config());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let recorded = requests.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            let recorded = recorded.clone();
            let respond = respond.clone();
            tokio::spawn(async move {
                let Ok(stream) = acceptor.accept(socket).await else {
                    return;
                };
                let mut reader = BufReader::new(stream);
                let mut line = Vec::new();
                if (&mut reader).take(2048).read_until(b'\n', &mut line).await.is_err() {
                    return;
                }
                let line = String::from_utf8_lossy(&line).into_owned();
                recorded.lock().unwrap().push(line.clone());

                let mut stream = reader.into_inner();
                let _ = stream.write_all(&respond(&line)).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    MockCapsule { addr, requests }
}

/// Capsule that always answers with the same bytes.
pub async fn start_fixed_capsule(response: &'static [u8]) -> MockCapsule {
    start_capsule(move |_| response.to_vec()).await
}

/// A TCP endpoint that accepts connections and never speaks.
pub async fn start_stalled_endpoint() -> SocketAddr {
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

/// A local port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Start the gateway on an ephemeral port.
pub async fn start_gateway(mut config: GatewayConfig) -> (SocketAddr, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".into();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

/// HTTP client that reports redirects instead of following them.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
