//! Notebook upload against a scripted fake remote end.
//!
//! Exercises the upload state machine: branch routing (text injection vs
//! file synthesis), tab disposal policy on success, and, by injecting a
//! failure at each phase, the guarantee that the tab is closed on every
//! failing path.

mod common;

use common::{
    CallLog, FakeResponse, RecordedCall, binary_upload, connect_fake, fast_policy, markers,
    text_upload,
};

use serde_json::json;

use clipship::{Error, upload_to_notebook};

// ============================================================================
// Handler
// ============================================================================

/// Behavior switches for the fake notebook page.
#[derive(Clone, Copy)]
struct PageBehavior {
    status_fails: bool,
    shell_ready: bool,
    add_control: bool,
    inject_ok: bool,
    save_ok: bool,
    attach_ok: bool,
}

impl Default for PageBehavior {
    fn default() -> Self {
        Self {
            status_fails: false,
            shell_ready: true,
            add_control: true,
            inject_ok: true,
            save_ok: true,
            attach_ok: true,
        }
    }
}

/// Fake notebook page honoring the behavior switches.
fn notebook_page(
    behavior: PageBehavior,
) -> impl FnMut(&RecordedCall) -> FakeResponse + Send + 'static {
    move |call| match call.method.as_str() {
        "tabs.create" => FakeResponse::ok(json!({ "tabId": 9 })),
        "tabs.status" if behavior.status_fails => {
            FakeResponse::error("no such tab", "Tab 9 does not exist")
        }
        "tabs.status" => FakeResponse::ok(json!({
            "status": "complete",
            "url": "https://notebooklm.google.com/notebook/abc",
        })),
        "script.evaluate" if call.is_script_with(markers::SHELL) => {
            FakeResponse::value(json!(behavior.shell_ready))
        }
        "script.evaluate" if call.is_script_with(markers::ADD) => {
            FakeResponse::value(json!(behavior.add_control))
        }
        "script.evaluate" if call.is_script_with(markers::INJECT) => {
            FakeResponse::value(json!(behavior.inject_ok))
        }
        "script.evaluate" if call.is_script_with(markers::SAVE) => {
            FakeResponse::value(json!(behavior.save_ok))
        }
        "script.evaluate" if call.is_script_with(markers::ATTACH) => {
            FakeResponse::value(json!(behavior.attach_ok))
        }
        _ => FakeResponse::empty(),
    }
}

fn assert_tab_closed(log: &CallLog) {
    assert_eq!(log.count_method("tabs.close"), 1, "tab must be closed");
}

fn assert_upload_failed_with(err: &Error, fragment: &str) {
    let message = err.to_string();
    assert!(matches!(err, Error::UploadFailed { .. }), "got: {err}");
    assert!(message.contains("Failed"), "missing Failed: {message}");
    assert!(message.contains(fragment), "missing {fragment:?}: {message}");
}

// ============================================================================
// Success paths
// ============================================================================

#[tokio::test]
async fn text_upload_injects_content_and_keeps_tab() {
    let (browser, log) = connect_fake(notebook_page(PageBehavior::default())).await;
    let policy = fast_policy();

    let message = upload_to_notebook(&browser, &policy, "abc", &text_upload())
        .await
        .expect("upload succeeds");

    assert!(message.contains("abc"), "message names the notebook");

    // Text branch only; foregrounded; overlay dismissed; tab kept open
    assert_eq!(log.count_scripts_with(markers::INJECT), 1);
    assert_eq!(log.count_scripts_with(markers::SAVE), 1);
    assert_eq!(log.count_scripts_with(markers::ATTACH), 0);
    assert_eq!(log.count_method("tabs.activate"), 1);
    assert_eq!(log.count_method("input.sendKey"), 1);
    assert_eq!(log.count_method("tabs.close"), 0);
}

#[tokio::test]
async fn close_policy_closes_tab_after_success() {
    let (browser, log) = connect_fake(notebook_page(PageBehavior::default())).await;
    let policy = fast_policy().with_keep_tab_on_success(false);

    upload_to_notebook(&browser, &policy, "abc", &text_upload())
        .await
        .expect("upload succeeds");

    assert_tab_closed(&log);
}

#[tokio::test]
async fn binary_upload_routes_through_file_synthesis() {
    let (browser, log) = connect_fake(notebook_page(PageBehavior::default())).await;
    let policy = fast_policy();

    upload_to_notebook(&browser, &policy, "abc", &binary_upload())
        .await
        .expect("upload succeeds");

    // File branch only: no text injection, no save scan
    assert_eq!(log.count_scripts_with(markers::ATTACH), 1);
    assert_eq!(log.count_scripts_with(markers::INJECT), 0);
    assert_eq!(log.count_scripts_with(markers::SAVE), 0);
}

#[tokio::test]
async fn upload_opens_the_notebook_url() {
    let (browser, log) = connect_fake(notebook_page(PageBehavior::default())).await;

    upload_to_notebook(&browser, &fast_policy(), "abc123", &text_upload())
        .await
        .expect("upload succeeds");

    let create = log
        .calls()
        .into_iter()
        .find(|c| c.method == "tabs.create")
        .expect("tabs.create sent");
    assert_eq!(
        create.params["url"],
        "https://notebooklm.google.com/notebook/abc123"
    );
}

// ============================================================================
// Failure injection: every phase closes the tab
// ============================================================================

#[tokio::test]
async fn attach_phase_failure_closes_tab() {
    let behavior = PageBehavior {
        status_fails: true,
        ..Default::default()
    };
    let (browser, log) = connect_fake(notebook_page(behavior)).await;

    let err = upload_to_notebook(&browser, &fast_policy(), "abc", &text_upload())
        .await
        .unwrap_err();

    assert_upload_failed_with(&err, "attaching to the notebook tab");
    assert_tab_closed(&log);
}

#[tokio::test]
async fn shell_never_ready_fails_after_exact_attempts_and_closes_tab() {
    let behavior = PageBehavior {
        shell_ready: false,
        ..Default::default()
    };
    let (browser, log) = connect_fake(notebook_page(behavior)).await;
    let policy = fast_policy();

    let err = upload_to_notebook(&browser, &policy, "abc", &text_upload())
        .await
        .unwrap_err();

    assert_upload_failed_with(&err, "waiting for the editor shell");
    assert_eq!(
        log.count_scripts_with(markers::SHELL),
        policy.shell_attempts as usize
    );
    assert_tab_closed(&log);
}

#[tokio::test]
async fn missing_add_control_closes_tab() {
    let behavior = PageBehavior {
        add_control: false,
        ..Default::default()
    };
    let (browser, log) = connect_fake(notebook_page(behavior)).await;

    let err = upload_to_notebook(&browser, &fast_policy(), "abc", &text_upload())
        .await
        .unwrap_err();

    assert_upload_failed_with(&err, "add-note control");
    assert_tab_closed(&log);
}

#[tokio::test]
async fn missing_content_surface_closes_tab() {
    let behavior = PageBehavior {
        inject_ok: false,
        ..Default::default()
    };
    let (browser, log) = connect_fake(notebook_page(behavior)).await;

    let err = upload_to_notebook(&browser, &fast_policy(), "abc", &text_upload())
        .await
        .unwrap_err();

    assert_upload_failed_with(&err, "note content surface");
    assert_tab_closed(&log);
}

#[tokio::test]
async fn missing_save_control_fails_in_submit_phase_and_closes_tab() {
    let behavior = PageBehavior {
        save_ok: false,
        ..Default::default()
    };
    let (browser, log) = connect_fake(notebook_page(behavior)).await;

    let err = upload_to_notebook(&browser, &fast_policy(), "abc", &text_upload())
        .await
        .unwrap_err();

    assert_upload_failed_with(&err, "save control");
    assert_upload_failed_with(&err, "submitting the note");
    assert_tab_closed(&log);
}

#[tokio::test]
async fn missing_file_input_closes_tab() {
    let behavior = PageBehavior {
        attach_ok: false,
        ..Default::default()
    };
    let (browser, log) = connect_fake(notebook_page(behavior)).await;

    let err = upload_to_notebook(&browser, &fast_policy(), "abc", &binary_upload())
        .await
        .unwrap_err();

    assert_upload_failed_with(&err, "file input");
    assert_tab_closed(&log);
}
