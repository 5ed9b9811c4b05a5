//! The persisted dark-mode flag.

use serde::{Deserialize, Serialize};

/// Storage key of the dark-mode flag.
pub const DARK_MODE_KEY: &str = "journal-dark";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarkMode(bool);

impl DarkMode {
    /// Reads a stored value; only `"1"` means enabled.
    pub fn from_stored(value: Option<&str>) -> Self {
        Self(value == Some("1"))
    }

    /// The value written back under [`DARK_MODE_KEY`].
    pub fn stored_value(self) -> &'static str {
        if self.0 {
            "1"
        } else {
            "0"
        }
    }

    pub fn is_enabled(self) -> bool {
        self.0
    }

    pub fn toggled(self) -> Self {
        Self(!self.0)
    }

    /// Icon for the toggle button: the mode a click switches to.
    pub fn toggle_icon(self) -> &'static str {
        if self.0 {
            "☀️"
        } else {
            "🌙"
        }
    }

    /// Class for the `<body>` element.
    pub fn body_class(self) -> &'static str {
        if self.0 {
            "dark"
        } else {
            ""
        }
    }
}
