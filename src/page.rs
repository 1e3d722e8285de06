//! Page extraction.
//!
//! Reads an immutable [`PageData`] snapshot out of the browser's active
//! tab with a single one-shot script evaluation. The snapshot is the sole
//! input to the content transformers.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::browser::Browser;
use crate::error::Result;

// ============================================================================
// PageData
// ============================================================================

/// Snapshot of the extracted page.
///
/// Taken once per extraction and never mutated afterwards. Paper
/// dimensions are the body's scroll dimensions divided by the CSS DPI of
/// 96, in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    /// Document title.
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Visible text content of the body.
    pub content: String,
    /// Outer HTML of the whole document.
    #[serde(rename = "entireHTML")]
    pub entire_html: String,
    /// Outer HTML of the body.
    #[serde(rename = "bodyHTML")]
    pub body_html: String,
    /// Body scroll width in inches at 96 DPI.
    pub paper_width: f64,
    /// Body scroll height in inches at 96 DPI.
    pub paper_height: f64,
}

// ============================================================================
// Extraction
// ============================================================================

/// Script evaluated in the active tab to take the snapshot.
const EXTRACTION_SCRIPT: &str = r#"
const dpi = 96;
return {
  title: document.title,
  url: window.location.href,
  content: document.body.textContent || "",
  entireHTML: document.documentElement.outerHTML,
  bodyHTML: document.body.outerHTML,
  paperWidth: document.body.scrollWidth / dpi,
  paperHeight: document.body.scrollHeight / dpi,
};
"#;

/// Extracts a [`PageData`] snapshot from the browser's active tab.
///
/// # Errors
///
/// - [`Error::NoActiveTab`](crate::Error::NoActiveTab) if the browser has
///   no active tab
/// - [`Error::ScriptError`](crate::Error::ScriptError) if the snapshot
///   script fails in the page
///
/// # Example
///
/// ```ignore
/// let page = extract_page(&browser).await?;
/// println!("captured {} ({} chars)", page.title, page.content.len());
/// ```
pub async fn extract_page(browser: &Browser) -> Result<PageData> {
    let tab = browser.active_tab().await?;
    debug!(tab_id = %tab.id(), "Extracting page snapshot");

    let value = tab.evaluate(EXTRACTION_SCRIPT).await?;
    let page: PageData = serde_json::from_value(value)?;

    debug!(
        title = %page.title,
        url = %page.url,
        content_len = page.content.len(),
        "Page extracted"
    );

    Ok(page)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "title": "Example Domain",
            "url": "https://example.com/",
            "content": "Example Domain text",
            "entireHTML": "<html><body><p>x</p></body></html>",
            "bodyHTML": "<body><p>x</p></body>",
            "paperWidth": 8.5,
            "paperHeight": 22.0,
        })
    }

    #[test]
    fn test_page_data_deserializes_snapshot_shape() {
        let page: PageData = serde_json::from_value(sample_json()).expect("deserialize");
        assert_eq!(page.title, "Example Domain");
        assert_eq!(page.url, "https://example.com/");
        assert!((page.paper_width - 8.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_page_data_round_trip_keeps_field_names() {
        let page: PageData = serde_json::from_value(sample_json()).expect("deserialize");
        let json = serde_json::to_value(&page).expect("serialize");

        assert!(json.get("entireHTML").is_some());
        assert!(json.get("bodyHTML").is_some());
        assert!(json.get("paperWidth").is_some());
        assert!(json.get("entire_html").is_none());
    }

    #[test]
    fn test_extraction_script_reads_scroll_dimensions() {
        assert!(EXTRACTION_SCRIPT.contains("scrollWidth"));
        assert!(EXTRACTION_SCRIPT.contains("scrollHeight"));
        assert!(EXTRACTION_SCRIPT.contains("96"));
    }
}
