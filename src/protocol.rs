//! Remote-protocol constants and field helpers
//!
//! The orchestration service enforces hard limits on most string fields and
//! expects timeouts rendered as whole-second strings (or the literal
//! `"NONE"`). Everything that builds a decision or a registration value goes
//! through the helpers here so oversized payloads are trimmed instead of
//! rejected server-side.

use std::time::Duration;

/// Sentinel for "no timeout" in protocol timeout fields.
pub const TIMEOUT_NONE: &str = "NONE";

/// One year in seconds, the maximum workflow execution timeout.
pub const TIMEOUT_YEAR_SECS: u64 = 365 * 24 * 60 * 60;

/// Default decision-task timeout (one minute).
pub const TIMEOUT_DECISION_DEFAULT_SECS: u64 = 60;

pub const MAX_NAME_LENGTH: usize = 256;
pub const MAX_VERSION_LENGTH: usize = 64;
pub const MAX_ID_LENGTH: usize = 256;
pub const MAX_RUN_ID_LENGTH: usize = 64;
pub const MAX_REASON_LENGTH: usize = 256;
pub const MAX_DETAILS_LENGTH: usize = 32_768;
pub const MAX_RESULT_LENGTH: usize = 32_768;
pub const MARKER_NAME_MAX_LENGTH: usize = 256;

/// Combine a name and version into the single key the registry indexes by.
///
/// Registered workflow types are identified by the combination of name and
/// version on the remote service.
pub fn make_key(name: &str, version: &str) -> String {
    format!("{name}-{version}")
}

/// Render a duration as a protocol timeout string.
///
/// Zero means "no timeout" and renders as [`TIMEOUT_NONE`].
pub fn timeout_string(timeout: Option<Duration>) -> String {
    match timeout {
        Some(d) if d.as_secs() > 0 => d.as_secs().to_string(),
        _ => TIMEOUT_NONE.to_string(),
    }
}

/// Trim a string to a maximum length, on a char boundary.
pub fn trim_to_max_length(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// True if the value passes the service's constraints for names, versions,
/// domains, task lists, and identifiers: non-empty, no surrounding
/// whitespace, no control characters, none of `: / |`, and no `arn` literal.
pub fn is_valid_name(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        return false;
    }
    if value.contains(['|', ':', '/']) || value.contains("arn") {
        return false;
    }
    !value.chars().any(|c| c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key() {
        assert_eq!(make_key("order-flow", "1.0"), "order-flow-1.0");
    }

    #[test]
    fn test_timeout_string() {
        assert_eq!(timeout_string(None), "NONE");
        assert_eq!(timeout_string(Some(Duration::ZERO)), "NONE");
        assert_eq!(timeout_string(Some(Duration::from_secs(30))), "30");
        // Sub-second durations round down to no timeout
        assert_eq!(timeout_string(Some(Duration::from_millis(500))), "NONE");
    }

    #[test]
    fn test_trim_to_max_length() {
        assert_eq!(trim_to_max_length("hello", 10), "hello");
        assert_eq!(trim_to_max_length("hello", 3), "hel");
        // Never splits a multi-byte char
        assert_eq!(trim_to_max_length("héllo", 2), "h");
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("order-flow_v2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name(" padded"));
        assert!(!is_valid_name("has:colon"));
        assert!(!is_valid_name("has/slash"));
        assert!(!is_valid_name("an arn value"));
        assert!(!is_valid_name("ctrl\u{0001}char"));
    }
}
