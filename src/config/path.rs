//! Key normalization and path splitting.
//!
//! Keys arrive in several spellings: `parent:child` from code and files,
//! `PARENT__CHILD` from environment variables, `--parent__child` from the
//! command line. All of them fold to the same lowercase, colon-delimited
//! path.

/// Path segment separator.
pub const SEPARATOR: char = ':';

/// Alternate separator accepted where `:` is awkward (environment variables).
pub const ALT_SEPARATOR: &str = "__";

/// Fold a key to its canonical form: lowercase with `__` replaced by `:`.
///
/// Idempotent: `normalize_key(&normalize_key(k)) == normalize_key(k)`.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase().replace(ALT_SEPARATOR, ":")
}

/// Normalize a key and split it into path segments.
pub fn segments(key: &str) -> Vec<String> {
    normalize_key(key)
        .split(SEPARATOR)
        .map(str::to_string)
        .collect()
}

/// Build a path by prefixing `path` with leading names.
///
/// Each name is normalized and split like a key, so an environment named
/// `us:east` or `US__EAST` addresses `environment:us:east:*`.
pub fn prefixed(prefix: &[&str], path: &[String]) -> Vec<String> {
    prefix
        .iter()
        .flat_map(|name| segments(name))
        .chain(path.iter().cloned())
        .collect()
}

/// Strip a config prefix (`PREFIX__`, `PREFIX_` or `PREFIX:`, any case).
///
/// Returns the remainder and whether a prefix was found. When a prefix is
/// found the remainder is uppercased, matching how environment variables
/// are spelled; normalization lowercases it again.
pub fn strip_config_prefix<'a>(key: &'a str, prefix: &str) -> (std::borrow::Cow<'a, str>, bool) {
    let upper = key.to_uppercase();
    let prefix = prefix.to_uppercase();
    for sep in ["__", "_", ":"] {
        let candidate = format!("{}{}", prefix, sep);
        if let Some(rest) = upper.strip_prefix(&candidate) {
            return (std::borrow::Cow::Owned(rest.to_string()), true);
        }
    }
    (std::borrow::Cow::Borrowed(key), false)
}
