//! Canonical output delimiters shared by prompt construction and parsing.
//!
//! The prompt instructs the model to emit exactly these markers and the
//! parser splits on them. Both sides read from here so the coupling cannot
//! drift.

/// Opens a block header; the title follows, then [`BLOCK_CLOSE`]
pub const BLOCK_OPEN: &str = "[[BLOCK:";

/// Closes a block header
pub const BLOCK_CLOSE: &str = "]]";

/// Introduces one section within the current block
pub const SECTION_MARKER: &str = "[[SECTION]]";

/// Renders a complete block header for a title
pub fn block_header(title: &str) -> String {
    format!("{}{}{}", BLOCK_OPEN, title, BLOCK_CLOSE)
}
