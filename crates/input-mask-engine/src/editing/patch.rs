use serde::{Deserialize, Serialize};

/// What the host applies to its text field after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Formatted value to render.
    pub display: String,
    /// Display-space caret to apply; `None` leaves the caret alone.
    pub cursor: Option<usize>,
    /// Logical buffer, exported as the bound model value.
    pub value: String,
    /// Per-field counter, bumped for every patch produced.
    pub version: u64,
}
