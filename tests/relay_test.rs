//! Message relay contract.
//!
//! Covers the tagged request/response bridge: one asynchronous response
//! per recognized request, silence for unrecognized actions, structured
//! errors for malformed requests, and the round-trip envelope naming the
//! notebook.

mod common;

use common::{FakeResponse, RecordedCall, connect_fake, fast_policy, markers, text_upload};

use serde_json::json;

use clipship::{Error, Relay};

// ============================================================================
// Handler
// ============================================================================

/// Fake covering both the landing page and a notebook editor, all green.
fn full_application() -> impl FnMut(&RecordedCall) -> FakeResponse + Send + 'static {
    let mut next_tab = 10;
    move |call| match call.method.as_str() {
        "tabs.create" => {
            next_tab += 1;
            FakeResponse::ok(json!({ "tabId": next_tab }))
        }
        "tabs.status" => FakeResponse::ok(json!({
            "status": "complete",
            "url": "https://notebooklm.google.com/notebook/abc",
        })),
        "script.evaluate" if call.is_script_with(markers::LIST) => FakeResponse::value(json!([
            { "id": "abc-title", "name": "Research" },
            { "id": "def-title", "name": "Notes" },
        ])),
        "script.evaluate" => FakeResponse::value(json!(true)),
        _ => FakeResponse::empty(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn fetch_notebooks_through_relay() {
    let (browser, _log) = connect_fake(full_application()).await;
    let relay = Relay::spawn(browser, fast_policy());

    let notebooks = relay.fetch_notebooks().await.expect("fetch succeeds");

    assert_eq!(notebooks.len(), 2);
    assert_eq!(notebooks[0].id, "abc");
    assert_eq!(notebooks[1].name, "Notes");
}

#[tokio::test]
async fn unrecognized_action_gets_no_response() {
    let (browser, log) = connect_fake(full_application()).await;
    let relay = Relay::spawn(browser, fast_policy());

    let response = relay
        .request(json!({ "action": "somethingElse" }))
        .await
        .expect("request completes");

    assert!(response.is_none(), "unknown actions must stay unanswered");
    // And no automation happened for it
    assert_eq!(log.count_method("tabs.create"), 0);
}

#[tokio::test]
async fn malformed_upload_request_gets_structured_error() {
    let (browser, log) = connect_fake(full_application()).await;
    let relay = Relay::spawn(browser, fast_policy());

    let response = relay
        .request(json!({ "action": "uploadToNotebook" }))
        .await
        .expect("request completes")
        .expect("recognized action gets a response");

    assert_eq!(response["success"], false);
    assert_eq!(response["error"], "Missing notebookId or uploadData");
    assert_eq!(log.count_method("tabs.create"), 0);
}

#[tokio::test]
async fn upload_round_trip_envelope_names_the_notebook() {
    let (browser, _log) = connect_fake(full_application()).await;
    let relay = Relay::spawn(browser, fast_policy());

    let envelope = relay
        .upload_to_notebook("abc", &text_upload())
        .await
        .expect("upload succeeds");

    let parsed: serde_json::Value = serde_json::from_str(&envelope).expect("valid JSON envelope");
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["notebookId"], "abc");
    assert!(
        parsed["message"].as_str().is_some_and(|m| !m.is_empty()),
        "envelope carries a message"
    );
}

#[tokio::test]
async fn upload_failure_crosses_relay_with_failed_in_message() {
    // Editor shell never renders
    let (browser, _log) = connect_fake(|call| match call.method.as_str() {
        "tabs.create" => FakeResponse::ok(json!({ "tabId": 3 })),
        "tabs.status" => FakeResponse::ok(json!({ "status": "complete", "url": "" })),
        "script.evaluate" => FakeResponse::value(json!(false)),
        _ => FakeResponse::empty(),
    })
    .await;
    let relay = Relay::spawn(browser, fast_policy());

    let err = relay
        .upload_to_notebook("abc", &text_upload())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Relay { .. }), "got: {err}");
    assert!(err.to_string().contains("Failed"), "got: {err}");
}

#[tokio::test]
async fn listing_failure_crosses_relay_verbatim() {
    // Landing page never renders tiles: SignInRequired, stringified
    let (browser, _log) = connect_fake(|call| match call.method.as_str() {
        "tabs.create" => FakeResponse::ok(json!({ "tabId": 3 })),
        "tabs.status" => FakeResponse::ok(json!({ "status": "complete", "url": "" })),
        "script.evaluate" => FakeResponse::value(json!([])),
        _ => FakeResponse::empty(),
    })
    .await;
    let relay = Relay::spawn(browser, fast_policy());

    let err = relay.fetch_notebooks().await.unwrap_err();

    assert!(matches!(err, Error::Relay { .. }), "got: {err}");
    assert!(err.to_string().contains("Sign-in required"), "got: {err}");
}

#[tokio::test]
async fn concurrent_requests_each_get_their_own_tab() {
    let (browser, log) = connect_fake(full_application()).await;
    let relay = Relay::spawn(browser, fast_policy());

    let (a, b) = tokio::join!(relay.fetch_notebooks(), relay.fetch_notebooks());
    a.expect("first fetch");
    b.expect("second fetch");

    assert_eq!(log.count_method("tabs.create"), 2, "no tab pooling");
    assert_eq!(log.count_method("tabs.close"), 2);
}
