//! Process-wide cache of compiled rule patterns.
//!
//! Patterns are compiled lazily on first use and kept for the lifetime of
//! the process. The set of patterns comes from route configuration, so the
//! cache is left unbounded. Patterns that fail to compile are not cached.

use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

static REGEX_CACHE: OnceLock<RwLock<HashMap<String, Arc<Regex>>>> = OnceLock::new();

fn cache() -> &'static RwLock<HashMap<String, Arc<Regex>>> {
    REGEX_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get the compiled form of `pattern`, compiling and caching it on a miss.
///
/// Returns `None` if the pattern is not a valid regex.
pub fn cached_regex(pattern: &str) -> Option<Arc<Regex>> {
    if let Some(re) = cache().read().get(pattern) {
        return Some(Arc::clone(re));
    }

    let compiled = match Regex::new(pattern) {
        Ok(re) => Arc::new(re),
        Err(e) => {
            debug!("Invalid rule regex {:?}: {}", pattern, e);
            return None;
        }
    };

    // Another task may have inserted it meanwhile; keep whichever landed first.
    let mut cache = cache().write();
    let entry = cache
        .entry(pattern.to_string())
        .or_insert_with(|| compiled);
    Some(Arc::clone(entry))
}
