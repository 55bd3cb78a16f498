//! Route path patterns with named parameters.
//!
//! A pattern is a `/`-separated list of segments. A segment written as
//! `:name` binds whatever the request has in that position; every other
//! segment must be equal byte for byte. Leading and trailing slashes are
//! ignored on both sides, and the segment counts must be equal: there are
//! no wildcards, optional segments, or catch-alls.

use std::collections::HashMap;

/// Match `path` against `pattern`.
///
/// Returns the bound parameters on success and `None` otherwise; a failed
/// match never yields a partially filled map.
///
/// # Example
/// ```
/// use ersatz_server::predicate::match_path;
///
/// let params = match_path("/users/:id/posts/:post_id", "/users/7/posts/42").unwrap();
/// assert_eq!(params["id"], "7");
/// assert_eq!(params["post_id"], "42");
/// assert!(match_path("/users/:id", "/users/7/posts").is_none());
/// ```
pub fn match_path(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path_parts: Vec<&str> = path.trim_matches('/').split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(name) = pattern_part.strip_prefix(':') {
            params.insert(name.to_string(), path_part.to_string());
        } else if pattern_part != path_part {
            return None;
        }
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_literal_match() {
        let params = match_path("/health", "/health").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_named_params() {
        let params = match_path("/users/:id/posts/:post_id", "/users/123/posts/456").unwrap();
        assert_eq!(params.get("id"), Some(&"123".to_string()));
        assert_eq!(params.get("post_id"), Some(&"456".to_string()));
    }

    #[test]
    fn test_slashes_are_trimmed() {
        assert!(match_path("users/:id/", "/users/1").is_some());
        assert!(match_path("/users/:id", "users/1/").is_some());
        assert!(match_path("/", "").is_some());
        assert!(match_path("/", "/").is_some());
    }

    #[test]
    fn test_segment_count_mismatch() {
        assert!(match_path("/users/:id", "/users").is_none());
        assert!(match_path("/users/:id", "/users/1/extra").is_none());
    }

    #[test]
    fn test_literal_mismatch() {
        assert!(match_path("/users/:id", "/posts/123").is_none());
        assert!(match_path("/Users/:id", "/users/123").is_none());
    }

    #[test]
    fn test_literal_mismatch_after_binding_discards_params() {
        assert!(match_path("/users/:id/profile", "/users/9/settings").is_none());
    }

    #[test]
    fn test_empty_segment_binds_empty_string() {
        let params = match_path("/a/:x/b", "/a//b").unwrap();
        assert_eq!(params.get("x"), Some(&String::new()));
    }

    #[test]
    fn test_repeated_name_keeps_last() {
        let params = match_path("/:id/:id", "/first/second").unwrap();
        assert_eq!(params.get("id"), Some(&"second".to_string()));
    }

    proptest! {
        #[test]
        fn prop_binds_every_param_segment(
            segments in prop::collection::vec(("[a-z]{1,8}", any::<bool>(), "[A-Za-z0-9_.-]{1,12}"), 1..6)
        ) {
            let mut pattern = String::new();
            let mut path = String::new();
            let mut expected = HashMap::new();

            for (i, (literal, is_param, value)) in segments.iter().enumerate() {
                if *is_param {
                    let name = format!("p{i}");
                    pattern.push_str(&format!("/:{name}"));
                    path.push_str(&format!("/{value}"));
                    expected.insert(name, value.clone());
                } else {
                    pattern.push_str(&format!("/{literal}"));
                    path.push_str(&format!("/{literal}"));
                }
            }

            let params = match_path(&pattern, &path);
            prop_assert_eq!(params, Some(expected));
        }
    }
}
