//! Shared helpers for the core integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fursight_core::{
    ClientConfig, FurSightClient, HttpRequest, HttpResponse, ManualClock, RequestExecutor,
    Transport, TransportError,
};
use mock_server::MockState;

pub const API_KEY: &str = mock_server::DEFAULT_API_KEY;

/// One scripted result for `ScriptedTransport`.
pub type Reply = Result<HttpResponse, TransportError>;

/// Transport that replays queued replies and records every request it sees.
///
/// When the queue runs dry it answers `200 {}`.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    sent: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            sent: Arc::default(),
        }
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json_response(200, "{}")))
    }
}

pub fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}

pub fn rate_limited(retry_after: Option<&str>) -> HttpResponse {
    let mut response = json_response(429, r#"{"detail":"Rate limit exceeded"}"#);
    if let Some(value) = retry_after {
        response
            .headers
            .push(("Retry-After".to_string(), value.to_string()));
    }
    response
}

pub fn timeout() -> Reply {
    Err(TransportError::Timeout(Duration::from_secs(30)))
}

pub fn test_config() -> ClientConfig {
    ClientConfig::new(API_KEY).with_base_url("http://fursight.test")
}

/// Executor over a scripted transport and a virtual clock.
pub fn scripted_executor(
    config: &ClientConfig,
    replies: impl IntoIterator<Item = Reply>,
) -> (RequestExecutor, ScriptedTransport, ManualClock) {
    let transport = ScriptedTransport::new(replies);
    let clock = ManualClock::new();
    let executor =
        RequestExecutor::with_transport(config, Box::new(transport.clone()), Arc::new(clock.clone()));
    (executor, transport, clock)
}

pub fn scripted_client(
    replies: impl IntoIterator<Item = Reply>,
) -> (FurSightClient, ScriptedTransport, ManualClock) {
    let (executor, transport, clock) = scripted_executor(&test_config(), replies);
    (FurSightClient::with_executor(executor), transport, clock)
}

/// Start the mock server on a random port in a background thread.
pub fn spawn_mock_server(state: MockState) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, state).await
        })
        .unwrap();
    });

    addr
}
