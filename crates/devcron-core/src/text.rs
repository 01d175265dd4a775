//! Crontab text pre-processing, applied before parsing.
//!
//! Two edits, in this order: continuation-line folding, then the
//! `# devcron delete` directive. Both operate on the raw text so that a
//! deletion needle can reach into any line, commands included.

use tracing::{debug, warn};

/// Marks the rest of the line as a substring to delete from the whole text.
const DELETE_DIRECTIVE: &str = "# devcron delete ";

/// Join continuation lines.
///
/// Every backslash immediately followed by a newline is removed, splicing
/// the next line on with no inserted whitespace. A doubled backslash before
/// the newline therefore leaves one literal backslash in the joined line.
pub fn fold_lines(data: &str) -> String {
    data.replace("\\\n", "")
}

/// Apply `# devcron delete <needle>` directives.
///
/// Each directive's needle (the rest of the line, verbatim) is removed from
/// the entire text wherever it occurs. The directive lines themselves parse
/// as comments afterwards.
pub fn apply_deletions(data: &str) -> String {
    let mut needles: Vec<&str> = Vec::new();
    for line in data.lines() {
        if let Some(needle) = line.strip_prefix(DELETE_DIRECTIVE) {
            if needle.ends_with(' ') {
                warn!(directive = line, "trailing space on deletion directive is significant");
            }
            if !needle.is_empty() {
                needles.push(needle);
            }
        }
    }
    if needles.is_empty() {
        return data.to_string();
    }
    debug!(?needles, "applying crontab deletions");
    let mut out = data.to_string();
    for needle in needles {
        out = out.replace(needle, "");
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
