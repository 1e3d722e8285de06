//! Shared test harness: a scripted fake remote end.
//!
//! Binds a real `BridgeServer`, connects a WebSocket client standing in
//! for the companion extension, answers the READY handshake, and routes
//! every subsequent request through a test-supplied handler. Every call
//! the engine makes is recorded so tests can assert on traffic, most
//! importantly that `tabs.close` arrived on every teardown path.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use clipship::transport::BridgeServer;
use clipship::{Browser, EnginePolicy, Format, PageData, UploadData};

// ============================================================================
// Script markers
// ============================================================================

/// Substrings identifying each engine script, used to route fake replies.
pub mod markers {
    /// Landing-page listing script.
    pub const LIST: &str = "project-button-title";
    /// Editor-shell readiness probe.
    pub const SHELL: &str = "editor-container";
    /// Add-note control press.
    pub const ADD: &str = "Add note";
    /// Text injection script.
    pub const INJECT: &str = "HTMLTextAreaElement";
    /// Save control press.
    pub const SAVE: &str = "\"Save\"";
    /// File synthesis script.
    pub const ATTACH: &str = "DataTransfer";
}

// ============================================================================
// RecordedCall
// ============================================================================

/// One request the engine sent to the fake remote end.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// `module.methodName` of the request.
    pub method: String,
    /// Target tab, when tab-scoped.
    pub tab_id: Option<u64>,
    /// Raw command params.
    pub params: Value,
}

impl RecordedCall {
    /// The evaluated script, empty for non-script commands.
    pub fn script(&self) -> &str {
        self.params
            .get("script")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// True if this is a script evaluation containing `marker`.
    pub fn is_script_with(&self, marker: &str) -> bool {
        self.method == "script.evaluate" && self.script().contains(marker)
    }
}

// ============================================================================
// CallLog
// ============================================================================

/// Shared record of everything the fake remote end received.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl CallLog {
    /// Number of requests with the given method.
    pub fn count_method(&self, method: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Number of script evaluations containing the given marker.
    pub fn count_scripts_with(&self, marker: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.is_script_with(marker))
            .count()
    }

    /// All recorded method names, in order.
    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.method.clone()).collect()
    }

    /// Snapshot of every recorded call.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    fn push(&self, call: RecordedCall) {
        self.calls.lock().push(call);
    }
}

// ============================================================================
// FakeResponse
// ============================================================================

/// What the fake remote end answers for one request.
pub enum FakeResponse {
    /// Success with the given result payload.
    Success(Value),
    /// Error response.
    Failure {
        /// Error code string.
        code: String,
        /// Error message.
        message: String,
    },
}

impl FakeResponse {
    /// Success carrying a result object.
    pub fn ok(result: Value) -> Self {
        Self::Success(result)
    }

    /// Success carrying an empty result.
    pub fn empty() -> Self {
        Self::Success(json!({}))
    }

    /// Success carrying a script `value`.
    pub fn value(value: Value) -> Self {
        Self::Success(json!({ "value": value }))
    }

    /// Error response.
    pub fn error(code: &str, message: &str) -> Self {
        Self::Failure {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Installs a tracing subscriber honoring `RUST_LOG` (once per binary).
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Binds a bridge, connects a scripted fake extension, and returns the
/// browser handle plus the traffic log.
pub async fn connect_fake<F>(mut handler: F) -> (Browser, CallLog)
where
    F: FnMut(&RecordedCall) -> FakeResponse + Send + 'static,
{
    init_tracing();

    let server = BridgeServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
        .await
        .expect("bind bridge server");
    let url = server.ws_url();

    let log = CallLog::default();
    let task_log = log.clone();

    tokio::spawn(async move {
        let (ws, _) = connect_async(url).await.expect("fake extension connect");
        let (mut write, mut read) = ws.split();

        // READY handshake: nil UUID, session id 1
        let ready = json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "type": "success",
            "result": { "sessionId": 1 },
        });
        write
            .send(Message::Text(ready.to_string().into()))
            .await
            .expect("send READY");

        while let Some(Ok(message)) = read.next().await {
            let Message::Text(text) = message else {
                if matches!(message, Message::Close(_)) {
                    break;
                }
                continue;
            };

            let request: Value = serde_json::from_str(&text).expect("parse request");
            let call = RecordedCall {
                method: request
                    .get("method")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                tab_id: request.get("tabId").and_then(|v| v.as_u64()),
                params: request.get("params").cloned().unwrap_or(Value::Null),
            };

            let response = handler(&call);
            task_log.push(call);

            let id = request.get("id").cloned().unwrap_or(Value::Null);
            let body = match response {
                FakeResponse::Success(result) => json!({
                    "id": id,
                    "type": "success",
                    "result": result,
                }),
                FakeResponse::Failure { code, message } => json!({
                    "id": id,
                    "type": "error",
                    "error": code,
                    "message": message,
                }),
            };

            if write
                .send(Message::Text(body.to_string().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    let (connection, ready) = server.accept().await.expect("accept fake extension");
    (Browser::new(connection, ready.session_id), log)
}

// ============================================================================
// Fixtures
// ============================================================================

/// Engine policy with test-speed timings.
pub fn fast_policy() -> EnginePolicy {
    let mut policy = EnginePolicy::default();
    policy.poll_interval = Duration::from_millis(5);
    policy.load_attempts = 5;
    policy.list_attempts = 3;
    policy.shell_attempts = 4;
    policy.settle_delay = Duration::from_millis(1);
    policy.editor_delay = Duration::from_millis(1);
    policy.save_delay = Duration::from_millis(1);
    policy.submit_delay = Duration::from_millis(1);
    policy
}

/// Fixed page snapshot used across tests.
pub fn sample_page() -> PageData {
    PageData {
        title: "T".to_string(),
        url: "https://x".to_string(),
        content: "hello".to_string(),
        entire_html: "<html><body><p>hello</p></body></html>".to_string(),
        body_html: "<p>hello</p>".to_string(),
        paper_width: 8.5,
        paper_height: 11.0,
    }
}

/// Text payload over the sample page.
pub fn text_upload() -> UploadData {
    Format::Text.transform(&sample_page())
}

/// Binary payload over the sample page (stand-in PDF bytes).
pub fn binary_upload() -> UploadData {
    UploadData {
        page_data: sample_page(),
        data: b"%PDF-1.4 fake".to_vec(),
        mime_type: "application/pdf".to_string(),
        file_extension: "pdf".to_string(),
    }
}
