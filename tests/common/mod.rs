//! Shared harness for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use semfind::embedding::Embedder;
use semfind::gateway::{HandlerState, create_router_with_state};
use semfind::service::MatchService;
use semfind::{EncoderConfig, SentenceEmbedder};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const FOX_DOC: &str = "быстрая лиса прыгает";

pub fn stub_embedder() -> SentenceEmbedder {
    SentenceEmbedder::load(EncoderConfig::stub()).expect("stub embedder should load")
}

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serves the gateway on an ephemeral port.
pub async fn spawn_test_server<E>(embedder: E, default_threshold: f32) -> TestServer
where
    E: Embedder + 'static,
{
    let service = Arc::new(MatchService::with_embedder(embedder));
    let app = create_router_with_state(
        HandlerState::new(service, default_threshold),
        semfind::constants::DEFAULT_MAX_BODY_BYTES,
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });

    TestServer { addr, handle }
}
