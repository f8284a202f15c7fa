//! Renderer warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! The HTML, CSS, and layout stages never fail outright; whatever they drop or
//! ignore while recovering is reported here instead.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recovered error or unsupported feature (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("CSS", "unsupported font-size value '1.5em'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if first_sighting(&format!("[{component}] {message}")) {
        eprintln!("{}", format!("[Sprig {component}] ⚠ {message}").yellow());
    }
}

/// Record `key`; true only the first time it is seen since the last clear.
fn first_sighting(key: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key.to_string())
}

/// Clear all recorded warnings (call when loading a new page)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
