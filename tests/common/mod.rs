//! Shared harness for end-to-end tests: a relay backed by a memory store and
//! an HTTP front-end pointed at it, both on ephemeral ports.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use form_relay::config::{FormRelayConfig, RelayConfig};
use form_relay::lifecycle::Shutdown;
use form_relay::relay::RelayListener;
use form_relay::store::{MemoryStore, PersistenceSink};
use form_relay::HttpServer;
use mockable::DefaultClock;
use tokio::net::TcpListener;

#[allow(dead_code)]
pub const ERROR_PAGE: &str = "<html><body><h1>Not found</h1></body></html>";

#[allow(dead_code)]
pub struct Harness {
    pub http_addr: SocketAddr,
    pub relay_addr: SocketAddr,
    pub store: MemoryStore,
    pub shutdown: Shutdown,
    _web_root: tempfile::TempDir,
}

fn web_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html><body>index</body></html>").unwrap();
    std::fs::write(dir.path().join("message.html"), "<html><body><form method=\"post\"></form></body></html>").unwrap();
    std::fs::write(dir.path().join("error.html"), ERROR_PAGE).unwrap();
    std::fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
    dir
}

/// Start both listeners and return once they are bound.
pub async fn start() -> Harness {
    let store = MemoryStore::new();
    let shutdown = Shutdown::new();

    let relay_config = RelayConfig {
        bind_address: "127.0.0.1:0".into(),
        buffer_size: 1024,
    };
    let sink = PersistenceSink::new(Arc::new(store.clone()), "messages");
    let relay = RelayListener::bind(&relay_config, sink, Arc::new(DefaultClock))
        .await
        .unwrap();
    let relay_addr = relay.local_addr().unwrap();
    tokio::spawn(relay.run(shutdown.subscribe()));

    let web = web_root();
    let mut config = FormRelayConfig::default();
    config.http.web_root = web.path().to_string_lossy().into_owned();
    config.relay.bind_address = relay_addr.to_string();

    let server = HttpServer::new(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let http_addr = listener.local_addr().unwrap();
    tokio::spawn(server.run(listener, shutdown.subscribe()));

    Harness {
        http_addr,
        relay_addr,
        store,
        shutdown,
        _web_root: web,
    }
}

/// HTTP client that reports redirects instead of following them.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Poll until the store holds `count` documents or two seconds pass.
#[allow(dead_code)]
pub async fn wait_for_documents(store: &MemoryStore, count: usize) {
    for _ in 0..100 {
        if store.len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
