//! Notebook enumeration.
//!
//! Opens a background tab on the notes application's landing page and
//! polls it for notebook tiles. The landing page renders asynchronously
//! and exposes no readiness signal, so the poll is a bounded retry loop;
//! exhaustion means the titles never appeared, which in practice means
//! the browser is not signed in.

// ============================================================================
// Imports
// ============================================================================

use tokio::time::sleep;
use tracing::{debug, info, trace, warn};

use crate::browser::{Browser, Tab};
use crate::error::{Error, Result};

use super::dom::NotebookDom;
use super::policy::EnginePolicy;
use super::session::{AutomationSession, TabDisposal};
use super::{NotebookInfo, strip_title_suffix};

// ============================================================================
// Listing
// ============================================================================

/// Enumerates the notebooks visible on the landing page.
///
/// The listing tab is closed on every exit path.
///
/// # Errors
///
/// - [`Error::SignInRequired`] if no notebook titles appeared within the
///   configured number of attempts
/// - [`Error::Timeout`] if the landing page never finished loading
pub async fn list_notebooks(browser: &Browser, policy: &EnginePolicy) -> Result<Vec<NotebookInfo>> {
    info!(url = %policy.root_url, "Listing notebooks");

    let session = AutomationSession::open(browser, policy.root_url.as_str(), false).await?;
    let outcome = poll_for_notebooks(session.tab(), policy).await;
    let teardown = session.dispose(TabDisposal::Close).await;

    match outcome {
        Ok(notebooks) => {
            teardown?;
            info!(count = notebooks.len(), "Notebooks listed");
            Ok(notebooks)
        }
        Err(err) => {
            if let Err(teardown_err) = teardown {
                warn!(error = %teardown_err, "Tab close failed after listing error");
            }
            Err(err)
        }
    }
}

/// Polls the landing page for notebook tiles until found or exhausted.
async fn poll_for_notebooks(tab: &Tab, policy: &EnginePolicy) -> Result<Vec<NotebookInfo>> {
    tab.wait_for_load(policy.load_attempts, policy.poll_interval)
        .await?;

    let script = NotebookDom::list_script();

    for attempt in 1..=policy.list_attempts {
        let value = tab.evaluate(&script).await?;
        let found: Vec<NotebookInfo> = serde_json::from_value(value).unwrap_or_default();

        if !found.is_empty() {
            debug!(attempt, count = found.len(), "Notebook titles found");
            return Ok(found
                .into_iter()
                .map(|n| NotebookInfo {
                    id: strip_title_suffix(&n.id).to_string(),
                    name: n.name,
                })
                .collect());
        }

        trace!(attempt, "No notebook titles yet");
        if attempt < policy.list_attempts {
            sleep(policy.poll_interval).await;
        }
    }

    Err(Error::sign_in_required(policy.list_attempts))
}
