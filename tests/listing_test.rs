//! Notebook listing against a scripted fake remote end.
//!
//! Covers the listing contract: suffix-stripped ids on success,
//! `SignInRequired` after exactly the configured number of polls, and
//! tab closure on every exit path.

mod common;

use common::{CallLog, FakeResponse, connect_fake, fast_policy, markers};

use serde_json::json;

use clipship::{Error, list_notebooks};

// ============================================================================
// Handlers
// ============================================================================

/// Landing page that renders the given notebook tiles.
fn landing_page(
    tiles: serde_json::Value,
) -> impl FnMut(&common::RecordedCall) -> FakeResponse + Send + 'static {
    move |call| match call.method.as_str() {
        "tabs.create" => FakeResponse::ok(json!({ "tabId": 7 })),
        "tabs.status" => FakeResponse::ok(json!({
            "status": "complete",
            "url": "https://notebooklm.google.com/",
        })),
        "script.evaluate" if call.is_script_with(markers::LIST) => {
            FakeResponse::value(tiles.clone())
        }
        _ => FakeResponse::empty(),
    }
}

fn assert_tab_closed(log: &CallLog) {
    assert_eq!(log.count_method("tabs.close"), 1, "tab must be closed");
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn listing_strips_title_suffix_and_closes_tab() {
    let tiles = json!([
        { "id": "abc123-title", "name": "Research" },
        { "id": "def456-title", "name": "Reading list" },
    ]);
    let (browser, log) = connect_fake(landing_page(tiles)).await;

    let notebooks = list_notebooks(&browser, &fast_policy())
        .await
        .expect("listing succeeds");

    assert_eq!(notebooks.len(), 2);
    assert_eq!(notebooks[0].id, "abc123");
    assert_eq!(notebooks[0].name, "Research");
    assert_eq!(notebooks[1].id, "def456");
    for notebook in &notebooks {
        assert!(!notebook.id.contains("-title"));
    }

    assert_tab_closed(&log);
}

#[tokio::test]
async fn listing_opens_background_tab() {
    let tiles = json!([{ "id": "abc-title", "name": "A" }]);
    let (browser, log) = connect_fake(landing_page(tiles)).await;

    list_notebooks(&browser, &fast_policy())
        .await
        .expect("listing succeeds");

    let create = log
        .calls()
        .into_iter()
        .find(|c| c.method == "tabs.create")
        .expect("tabs.create sent");
    assert_eq!(create.params["active"], false);
    assert_eq!(
        create.params["url"],
        "https://notebooklm.google.com/"
    );
}

#[tokio::test]
async fn empty_landing_page_fails_sign_in_after_exact_attempts() {
    let (browser, log) = connect_fake(landing_page(json!([]))).await;
    let policy = fast_policy();

    let err = list_notebooks(&browser, &policy).await.unwrap_err();

    assert!(
        matches!(err, Error::SignInRequired { attempts } if attempts == policy.list_attempts),
        "unexpected error: {err}"
    );
    // Exactly list_attempts polls: not fewer, not more
    assert_eq!(
        log.count_scripts_with(markers::LIST),
        policy.list_attempts as usize
    );
    assert_tab_closed(&log);
}

#[tokio::test]
async fn script_failure_mid_poll_still_closes_tab() {
    let (browser, log) = connect_fake(|call| match call.method.as_str() {
        "tabs.create" => FakeResponse::ok(json!({ "tabId": 7 })),
        "tabs.status" => FakeResponse::ok(json!({ "status": "complete", "url": "" })),
        "script.evaluate" => FakeResponse::error("script error", "evaluation failed"),
        _ => FakeResponse::empty(),
    })
    .await;

    let err = list_notebooks(&browser, &fast_policy()).await.unwrap_err();

    assert!(matches!(err, Error::ScriptError { .. }), "got: {err}");
    assert_tab_closed(&log);
}

#[tokio::test]
async fn landing_page_that_never_loads_times_out_and_closes_tab() {
    let (browser, log) = connect_fake(|call| match call.method.as_str() {
        "tabs.create" => FakeResponse::ok(json!({ "tabId": 7 })),
        "tabs.status" => FakeResponse::ok(json!({ "status": "loading", "url": "" })),
        _ => FakeResponse::empty(),
    })
    .await;

    let err = list_notebooks(&browser, &fast_policy()).await.unwrap_err();

    assert!(err.is_timeout(), "got: {err}");
    assert_tab_closed(&log);
}
