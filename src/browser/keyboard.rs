//! Keyboard key definitions.
//!
//! Provides ergonomic key constants for the control keys automation
//! dispatches.
//!
//! # Example
//!
//! ```ignore
//! use clipship::Key;
//!
//! tab.send_key(Key::Escape).await?;
//! ```

// ============================================================================
// Key Enum
// ============================================================================

/// Control keys dispatched by the automation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter/Return key
    Enter,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
}

impl Key {
    /// Returns the key properties: (key, code, keyCode).
    #[must_use]
    pub fn properties(self) -> (&'static str, &'static str, u32) {
        match self {
            Key::Enter => ("Enter", "Enter", 13),
            Key::Escape => ("Escape", "Escape", 27),
            Key::Tab => ("Tab", "Tab", 9),
        }
    }

    /// Returns the DOM key value string.
    #[inline]
    #[must_use]
    pub fn key(self) -> &'static str {
        self.properties().0
    }

    /// Returns the DOM code string.
    #[inline]
    #[must_use]
    pub fn code(self) -> &'static str {
        self.properties().1
    }

    /// Returns the legacy keyCode.
    #[inline]
    #[must_use]
    pub fn key_code(self) -> u32 {
        self.properties().2
    }
}

// ============================================================================
// Tests
// ============================================================================
