//! Content transformers.
//!
//! A transformer turns one [`PageData`] snapshot into one [`UploadData`]
//! payload for a chosen output [`Format`]. Exactly one transformer runs
//! per upload; transformers share no state.
//!
//! | Format | MIME | Extension | Source |
//! |--------|------|-----------|--------|
//! | [`Format::Text`] | `text/plain` | `txt` | raw text content |
//! | [`Format::Markdown`] | `text/markdown` | `md` | body HTML, converted |

// ============================================================================
// Submodules
// ============================================================================

/// Markdown transformer (body HTML → Markdown).
pub mod markdown;

/// Plain-text transformer.
pub mod text;

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::page::PageData;

// ============================================================================
// Format
// ============================================================================

/// Output format selector.
///
/// A pure dispatch key: picks which transformer produces the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Plain text.
    Text,
    /// Markdown.
    Markdown,
}

impl Format {
    /// Runs the transformer for this format.
    #[must_use]
    pub fn transform(self, page: &PageData) -> UploadData {
        match self {
            Self::Text => text::transform(page),
            Self::Markdown => markdown::transform(page),
        }
    }
}

// ============================================================================
// UploadData
// ============================================================================

/// A typed upload payload.
///
/// Produced by exactly one transformer, consumed by exactly one
/// destination client. The payload bytes serialize as a JSON number array
/// so the value survives the relay contract unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    /// The snapshot this payload was produced from.
    pub page_data: PageData,
    /// Payload bytes.
    pub data: Vec<u8>,
    /// Payload MIME type.
    pub mime_type: String,
    /// File extension without the dot.
    pub file_extension: String,
}

impl UploadData {
    /// Returns `true` for text-like payloads (`text/*` MIME types).
    ///
    /// Text payloads are injected into the notebook editor; everything
    /// else goes through file synthesis.
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.mime_type.starts_with("text/")
    }

    /// Returns the destination file name, `{title}.{extension}`.
    ///
    /// Untitled pages fall back to `untitled page`.
    #[must_use]
    pub fn file_name(&self) -> String {
        let title = if self.page_data.title.is_empty() {
            "untitled page"
        } else {
            self.page_data.title.as_str()
        };
        format!("{}.{}", title, self.file_extension)
    }

    /// Returns the payload as text, replacing invalid UTF-8.
    #[inline]
    #[must_use]
    pub fn text_content(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

// ============================================================================
// Tests
// ============================================================================
