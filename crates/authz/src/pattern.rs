//! Prefix-wildcard pattern matching for action and resource strings.

/// Match `value` against `pattern`.
///
/// A `*` in the pattern matches the entire remainder of the string from that
/// point (`docs:*` matches `docs:Create`; a lone `*` matches anything). A
/// pattern without `*` must match exactly.
pub fn pattern_matches(pattern: &str, value: &str) -> bool {
    match pattern.find('*') {
        Some(idx) => value.starts_with(&pattern[..idx]),
        None => pattern == value,
    }
}

#[cfg(test)]
mod tests {
    use super::pattern_matches;

    #[test]
    fn exact_match() {
        assert!(pattern_matches("docs:Read", "docs:Read"));
        assert!(!pattern_matches("docs:Read", "docs:ReadAll"));
        assert!(!pattern_matches("docs:Read", "docs:Write"));
    }

    #[test]
    fn lone_wildcard_matches_anything() {
        assert!(pattern_matches("*", "docs:Delete"));
        assert!(pattern_matches("*", ""));
    }

    #[test]
    fn prefix_wildcard_matches_remainder() {
        assert!(pattern_matches("docs:*", "docs:Create"));
        assert!(pattern_matches("docs:*", "docs:"));
        assert!(!pattern_matches("docs:*", "users:Create"));
    }

    #[test]
    fn wildcard_consumes_everything_after_it() {
        // Anything following the first `*` is unreachable by construction.
        assert!(pattern_matches("docs:*:meta", "docs:Create"));
    }
}
