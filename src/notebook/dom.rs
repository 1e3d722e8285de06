//! DOM adapter for the notes application.
//!
//! Every selector, readiness probe, and injection script the engine uses
//! lives here. The markup these scripts address belongs to an uncontrolled
//! third party and will drift; when it does, this file is the only place
//! that needs updating. The state machine in `upload` and the poll loop in
//! `listing` never touch selectors directly.
//!
//! Scripts return JSON-serializable values: the listing script returns an
//! array of `{id, name}` objects, every interaction script returns a bool
//! (`false` = the expected element was absent).

// ============================================================================
// Imports
// ============================================================================

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

// ============================================================================
// NotebookDom
// ============================================================================

/// Script builders addressing the notes application's current markup.
pub struct NotebookDom;

impl NotebookDom {
    /// Script enumerating the landing page's notebook tiles.
    ///
    /// Each tile title carries an element id of the form `{id}-title`;
    /// the script strips the suffix and pairs the id with the visible
    /// title text.
    #[must_use]
    pub fn list_script() -> String {
        r#"
const elements = document.getElementsByClassName("project-button-title");
return Array.from(elements).map((el) => ({
  id: el.id.replace(/-title$/, ""),
  name: el.innerText,
}));
"#
        .to_string()
    }

    /// Probe proving the notebook's editor shell has rendered.
    ///
    /// True once the tab's URL names the expected notebook and one of the
    /// known shell containers exists.
    #[must_use]
    pub fn shell_probe(notebook_id: &str) -> String {
        format!(
            r#"
const expected = {id};
const url = window.location.href;
return (
  url.includes("/notebook/" + expected) &&
  (document.querySelector(".editor-container") !== null ||
    document.querySelector(".note-editor") !== null ||
    document.querySelector(".notes-list") !== null)
);
"#,
            id = js_str(notebook_id)
        )
    }

    /// Locates and clicks the add-note control.
    #[must_use]
    pub fn press_add_control() -> String {
        r#"
const button = Array.from(document.querySelectorAll("button")).find(
  (b) =>
    (b.textContent || "").includes("Add note") ||
    (b.textContent || "").includes("New note") ||
    (b.getAttribute("aria-label") || "").includes("note"),
);
if (!button) { return false; }
button.click();
return true;
"#
        .to_string()
    }

    /// Fills the note title and content surface, with generic fallbacks
    /// when the expected selectors are absent.
    ///
    /// The content is suffixed with a `Source:` line naming the captured
    /// page.
    #[must_use]
    pub fn inject_text(title: &str, content: &str, source_url: &str) -> String {
        format!(
            r#"
const title = {title};
const body = {content} + "\n\nSource: " + {source};
const titleInput =
  document.querySelector('input[placeholder*="title"], input[aria-label*="title"]') ||
  document.querySelector("input");
if (titleInput) {{
  titleInput.value = title;
  titleInput.dispatchEvent(new Event("input", {{ bubbles: true }}));
}}
const surface =
  document.querySelector('[contenteditable="true"], textarea.note-content, div.note-editor') ||
  document.querySelector("textarea");
if (!surface) {{ return false; }}
if (surface instanceof HTMLTextAreaElement) {{
  surface.value = body;
}} else {{
  surface.textContent = body;
}}
surface.dispatchEvent(new Event("input", {{ bubbles: true }}));
return true;
"#,
            title = js_str(title),
            content = js_str(content),
            source = js_str(source_url)
        )
    }

    /// Locates and clicks the save control by label scan.
    #[must_use]
    pub fn press_save() -> String {
        r#"
const button = Array.from(document.querySelectorAll("button")).find(
  (b) =>
    (b.textContent || "").includes("Save") ||
    (b.textContent || "").includes("Create") ||
    (b.textContent || "").includes("Add") ||
    (b.getAttribute("aria-label") || "").includes("save"),
);
if (!button) { return false; }
button.click();
return true;
"#
        .to_string()
    }

    /// Synthesizes a file from raw payload bytes and attaches it to the
    /// page's file input, dispatching `change` so the host page's own
    /// upload handling takes over.
    #[must_use]
    pub fn attach_file(data: &[u8], mime_type: &str, file_name: &str) -> String {
        format!(
            r#"
const bytes = Uint8Array.from(atob({payload}), (c) => c.charCodeAt(0));
const file = new File([bytes], {name}, {{ type: {mime} }});
const input = document.querySelector('input[type="file"]');
if (!input) {{ return false; }}
const transfer = new DataTransfer();
transfer.items.add(file);
input.files = transfer.files;
input.dispatchEvent(new Event("change", {{ bubbles: true }}));
return true;
"#,
            payload = js_str(&BASE64.encode(data)),
            name = js_str(file_name),
            mime = js_str(mime_type)
        )
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Escapes a string into a JavaScript string literal.
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

// ============================================================================
// Tests
// ============================================================================
