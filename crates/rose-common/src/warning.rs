//! Deduplicated warnings for recoverable problems.
//!
//! Missing images, unknown animations, broken hyperlinks and unreadable
//! colours all degrade gracefully. They are reported once per unique message
//! so that re-laying out a document on every keystroke does not flood the log.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a recoverable problem (emitted once per unique message).
///
/// The warning goes to `tracing` at `WARN` level with the component attached
/// as a field, so hosts decide where it ends up.
///
/// # Example
/// ```ignore
/// warn_once("image", "missing image 'portrait.png'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        tracing::warn!(target: "rose", component, "{message}");
    }
}

/// Whether `message` has already been reported for `component`.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        warn_once("test", "recorded once");
        assert!(has_warned("test", "recorded once"));
        assert!(!has_warned("other", "recorded once"));
    }
}
