//! Upload into a notebook.
//!
//! The target page has no API, so an upload is a state machine driven
//! over its live DOM:
//!
//! ```text
//! Idle → TabOpening → SessionAttached → WaitingForShell
//!      → InteractingWithEditor → Submitting → {Succeeded, Failed}
//! ```
//!
//! Steps run strictly in sequence, separated by fixed delays that cover
//! the host page's own animation and render timing. Any failure is
//! wrapped as [`Error::UploadFailed`] naming the phase it occurred in;
//! terminal states always release the session, and `Failed` always
//! closes the tab.

// ============================================================================
// Imports
// ============================================================================

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::{Browser, Key, Tab};
use crate::error::{Error, Result};
use crate::transform::UploadData;

use super::dom::NotebookDom;
use super::policy::EnginePolicy;
use super::session::{AutomationSession, TabDisposal};

// ============================================================================
// UploadPhase
// ============================================================================

/// Phase of the upload state machine, used to contextualize failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadPhase {
    /// Opening and navigating the notebook tab.
    TabOpening,
    /// Waiting for navigation and foregrounding the tab.
    SessionAttached,
    /// Polling for the rendered editor shell.
    WaitingForShell,
    /// Opening the editor and injecting content.
    InteractingWithEditor,
    /// Saving the note / handing off the synthesized file.
    Submitting,
}

impl UploadPhase {
    /// Human-readable phase description for failure context.
    fn describe(self) -> &'static str {
        match self {
            Self::TabOpening => "opening the notebook tab",
            Self::SessionAttached => "attaching to the notebook tab",
            Self::WaitingForShell => "waiting for the editor shell",
            Self::InteractingWithEditor => "interacting with the editor",
            Self::Submitting => "submitting the note",
        }
    }
}

/// A step failure carrying the phase it happened in.
struct StepFailure {
    phase: UploadPhase,
    source: Error,
}

impl StepFailure {
    fn wrap(phase: UploadPhase) -> impl FnOnce(Error) -> Self {
        move |source| Self { phase, source }
    }
}

// ============================================================================
// Upload
// ============================================================================

/// Uploads a payload into the given notebook.
///
/// Text-like payloads (`text/*`) are injected into the note editor;
/// anything else is synthesized into a file and handed to the page's own
/// upload handling. The two branches are mutually exclusive per call.
///
/// On success the tab stays open or closes per
/// [`EnginePolicy::keep_tab_on_success`]; on failure it always closes.
///
/// # Errors
///
/// Returns [`Error::UploadFailed`] wrapping the underlying cause and the
/// phase it occurred in.
pub async fn upload_to_notebook(
    browser: &Browser,
    policy: &EnginePolicy,
    notebook_id: &str,
    upload: &UploadData,
) -> Result<String> {
    let url = policy
        .notebook_url(notebook_id)
        .map_err(|e| wrap_failure(UploadPhase::TabOpening, e))?;

    info!(
        notebook_id,
        mime = %upload.mime_type,
        bytes = upload.data.len(),
        "Uploading to notebook"
    );

    let session = AutomationSession::open(browser, url.as_str(), false)
        .await
        .map_err(|e| wrap_failure(UploadPhase::TabOpening, e))?;

    match drive_editor(session.tab(), policy, notebook_id, upload).await {
        Ok(message) => {
            let disposal = if policy.keep_tab_on_success {
                TabDisposal::Keep
            } else {
                TabDisposal::Close
            };
            session.dispose(disposal).await?;
            info!(notebook_id, "Upload succeeded");
            Ok(message)
        }
        Err(failure) => {
            if let Err(teardown_err) = session.dispose(TabDisposal::Close).await {
                warn!(error = %teardown_err, "Tab close failed after upload error");
            }
            Err(wrap_failure(failure.phase, failure.source))
        }
    }
}

/// Wraps a step error with its phase context.
fn wrap_failure(phase: UploadPhase, source: Error) -> Error {
    Error::upload_failed(format!("{} while {}", source, phase.describe()))
}

/// Runs the editor interaction sequence against an attached tab.
async fn drive_editor(
    tab: &Tab,
    policy: &EnginePolicy,
    notebook_id: &str,
    upload: &UploadData,
) -> std::result::Result<String, StepFailure> {
    // SessionAttached: wait out navigation, then foreground the tab
    tab.wait_for_load(policy.load_attempts, policy.poll_interval)
        .await
        .map_err(StepFailure::wrap(UploadPhase::SessionAttached))?;
    sleep(policy.settle_delay).await;
    tab.activate()
        .await
        .map_err(StepFailure::wrap(UploadPhase::SessionAttached))?;

    // WaitingForShell
    wait_for_shell(tab, policy, notebook_id)
        .await
        .map_err(StepFailure::wrap(UploadPhase::WaitingForShell))?;

    // InteractingWithEditor: clear any overlay, open the editor
    tab.send_key(Key::Escape)
        .await
        .map_err(StepFailure::wrap(UploadPhase::InteractingWithEditor))?;

    if !eval_flag(tab, &NotebookDom::press_add_control())
        .await
        .map_err(StepFailure::wrap(UploadPhase::InteractingWithEditor))?
    {
        return Err(StepFailure {
            phase: UploadPhase::InteractingWithEditor,
            source: Error::element_not_found("add-note control"),
        });
    }
    sleep(policy.editor_delay).await;

    if upload.is_text() {
        submit_text(tab, policy, upload).await?;
    } else {
        submit_file(tab, policy, upload).await?;
    }

    Ok(format!("Content uploaded to notebook {notebook_id}"))
}

/// Text branch: fill the editor and click save.
async fn submit_text(
    tab: &Tab,
    policy: &EnginePolicy,
    upload: &UploadData,
) -> std::result::Result<(), StepFailure> {
    debug!("Injecting text content");

    let script = NotebookDom::inject_text(
        &upload.page_data.title,
        &upload.text_content(),
        &upload.page_data.url,
    );

    if !eval_flag(tab, &script)
        .await
        .map_err(StepFailure::wrap(UploadPhase::InteractingWithEditor))?
    {
        return Err(StepFailure {
            phase: UploadPhase::InteractingWithEditor,
            source: Error::element_not_found("note content surface"),
        });
    }
    sleep(policy.save_delay).await;

    // Submitting
    if !eval_flag(tab, &NotebookDom::press_save())
        .await
        .map_err(StepFailure::wrap(UploadPhase::Submitting))?
    {
        return Err(StepFailure {
            phase: UploadPhase::Submitting,
            source: Error::element_not_found("save control"),
        });
    }
    sleep(policy.submit_delay).await;

    Ok(())
}

/// File branch: synthesize a file and hand it to the page's own upload
/// handling.
async fn submit_file(
    tab: &Tab,
    policy: &EnginePolicy,
    upload: &UploadData,
) -> std::result::Result<(), StepFailure> {
    debug!(file = %upload.file_name(), "Attaching synthesized file");

    let script = NotebookDom::attach_file(&upload.data, &upload.mime_type, &upload.file_name());

    if !eval_flag(tab, &script)
        .await
        .map_err(StepFailure::wrap(UploadPhase::Submitting))?
    {
        return Err(StepFailure {
            phase: UploadPhase::Submitting,
            source: Error::element_not_found("file input"),
        });
    }
    sleep(policy.submit_delay).await;

    Ok(())
}

/// Polls the shell probe until it reports ready or attempts exhaust.
async fn wait_for_shell(tab: &Tab, policy: &EnginePolicy, notebook_id: &str) -> Result<()> {
    let script = NotebookDom::shell_probe(notebook_id);

    for attempt in 1..=policy.shell_attempts {
        if eval_flag(tab, &script).await? {
            debug!(attempt, "Editor shell ready");
            return Ok(());
        }
        if attempt < policy.shell_attempts {
            sleep(policy.poll_interval).await;
        }
    }

    Err(Error::shell_not_found(policy.shell_attempts))
}

/// Evaluates a script expected to return a boolean.
async fn eval_flag(tab: &Tab, script: &str) -> Result<bool> {
    Ok(tab.evaluate(script).await?.as_bool().unwrap_or(false))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_descriptions() {
        assert_eq!(
            UploadPhase::WaitingForShell.describe(),
            "waiting for the editor shell"
        );
        assert_eq!(UploadPhase::Submitting.describe(), "submitting the note");
    }

    #[test]
    fn test_wrap_failure_names_phase_and_cause() {
        let err = wrap_failure(
            UploadPhase::Submitting,
            Error::element_not_found("save control"),
        );

        let message = err.to_string();
        assert!(message.contains("Failed"));
        assert!(message.contains("save control"));
        assert!(message.contains("submitting the note"));
    }
}
