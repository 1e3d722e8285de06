//! Plain-text transformer.

use crate::page::PageData;

use super::UploadData;

/// MIME type of the produced payload.
const MIME_TYPE: &str = "text/plain";

/// Transforms a snapshot into a plain-text payload.
///
/// The payload bytes are the page's raw text content, unmodified.
#[must_use]
pub fn transform(page: &PageData) -> UploadData {
    UploadData {
        page_data: page.clone(),
        data: page.content.clone().into_bytes(),
        mime_type: MIME_TYPE.to_string(),
        file_extension: "txt".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
