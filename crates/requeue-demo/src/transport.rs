//! Simulated request execution: no sockets, just scripted failures.
use std::{collections::HashMap, time::Duration};

use requeue_core::Dispatcher;
use requeue_model::Request;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::warn;

/// Sends (re)submitted requests back into the submission queue.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: mpsc::UnboundedSender<Request>,
}

impl ChannelDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<Request>) -> Self {
        Self { tx }
    }
}

impl Dispatcher for ChannelDispatcher {
    fn dispatch(&self, request: Request) {
        if let Err(err) = self.tx.send(request) {
            warn!(path = %err.0.innermost().path, "submission queue closed, request dropped");
        }
    }
}

/// Endpoint behaviour keyed by path.
#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Fails the first `n` attempts, then succeeds.
    FailTimes(u32),
    /// Never succeeds.
    AlwaysFail,
}

/// Fake transport answering from a per-path [`Script`].
#[derive(Debug, Default)]
pub struct FlakyTransport {
    scripts: HashMap<String, Script>,
    latency: Duration,
}

impl FlakyTransport {
    pub fn new(latency: Duration) -> Self {
        Self {
            scripts: HashMap::new(),
            latency,
        }
    }

    pub fn with_script(mut self, path: impl Into<String>, script: Script) -> Self {
        self.scripts.insert(path.into(), script);
        self
    }

    /// Runs one attempt; `Ok` carries response data, `Err` the failure payload.
    pub async fn execute(&self, request: &Request) -> Result<Value, Value> {
        tokio::time::sleep(self.latency).await;

        let http = request.innermost();
        let attempt = request.retry_count();
        let failing = match self.scripts.get(&http.path) {
            Some(Script::FailTimes(n)) => attempt < *n,
            Some(Script::AlwaysFail) => true,
            None => false,
        };

        if failing {
            Err(json!({ "status": 503, "path": http.path, "attempt": attempt }))
        } else {
            Ok(json!({ "status": 200, "path": http.path, "attempt": attempt }))
        }
    }
}

#[cfg(test)]
mod tests {
    use requeue_model::HttpRequest;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fails_scripted_number_of_times() {
        let transport = FlakyTransport::new(Duration::from_millis(10))
            .with_script("/sites", Script::FailTimes(2));
        let first: Request = HttpRequest::get("/sites").into();
        let third = first
            .map_innermost(|r| r.next_attempt())
            .map_innermost(|r| r.next_attempt());

        assert!(transport.execute(&first).await.is_err());
        assert!(transport.execute(&third).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_paths_succeed() {
        let transport = FlakyTransport::new(Duration::ZERO).with_script("/x", Script::AlwaysFail);
        let req: Request = HttpRequest::get("/health").into();
        assert!(transport.execute(&req).await.is_ok());
    }

    #[tokio::test]
    async fn channel_dispatcher_enqueues() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        ChannelDispatcher::new(tx).dispatch(HttpRequest::get("/sites").into());

        let got = rx.recv().await.unwrap();
        assert_eq!(got.innermost().path, "/sites");
    }
}
