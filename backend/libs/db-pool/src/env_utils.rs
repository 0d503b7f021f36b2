//! Environment variable parsing helpers shared by the service configs.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when the
/// variable is missing or does not parse.
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning `None` if missing or invalid.
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable, using `default` only when it is unset.
///
/// Unlike [`parse_env_with_default`], a value that is set but malformed is an
/// error rather than silently replaced.
pub fn parse_env_strict<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Failed to parse {}='{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated variable into trimmed, non-empty entries.
pub fn parse_env_list(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
