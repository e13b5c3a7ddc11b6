//! Scripted test doubles for the transport and session seams.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cercle_core::error::Result;
use cercle_core::http::{ApiRequest, ApiResponse, HttpTransport};
use cercle_core::session::SessionListener;

type Handler = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

/// Transport answering every request through a handler and recording it.
pub struct ScriptedTransport {
    handler: Handler,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Duration,
}

impl ScriptedTransport {
    pub fn new(handler: impl Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Sleeps before answering, so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.path == path)
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.handler)(&request)
    }
}

/// Counts session expiry notifications.
#[derive(Default)]
pub struct RecordingListener {
    expired: AtomicUsize,
}

impl RecordingListener {
    pub fn expired_count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionListener for RecordingListener {
    async fn session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}
