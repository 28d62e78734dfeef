//! Environment variable ingestion.
//!
//! Variables carrying the config prefix are written into the store:
//! `CONFIG_LOG__LEVEL=debug` becomes `log:level = "debug"`. Values that look
//! like JSON arrays or objects are stored as structures.

use super::path::strip_config_prefix;
use super::store::ConfigStore;
use tracing::{debug, warn};

/// Default variable prefix.
pub const DEFAULT_PREFIX: &str = "CONFIG";

/// Whether `s` is a bracketed JSON object or array.
pub fn is_json(s: &str) -> bool {
    let s = s.trim();
    let bracketed =
        (s.starts_with('{') && s.ends_with('}')) || (s.starts_with('[') && s.ends_with(']'));
    bracketed && serde_json::from_str::<serde_json::Value>(s).is_ok()
}

/// Write every prefixed variable in `vars` into `store`.
///
/// Returns the number of variables applied.
pub fn load_environment_variables<I, K, V>(store: &ConfigStore, prefix: &str, vars: I) -> usize
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut applied = 0;
    for (name, value) in vars {
        let (key, matched) = strip_config_prefix(name.as_ref(), prefix);
        if !matched || key.is_empty() {
            continue;
        }
        let value = value.as_ref();

        if is_json(value) {
            if let Err(e) = store.set_json(&key, value) {
                warn!(variable = %name.as_ref(), error = %e, "Ignoring malformed JSON variable");
                continue;
            }
        } else {
            store.set(&key, value);
        }
        debug!(variable = %name.as_ref(), key = %key, "Applied environment override");
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Value;

    #[test]
    fn test_is_json() {
        assert!(is_json(r#"{"a": 1}"#));
        assert!(is_json("[1, 2]"));
        assert!(!is_json("{not json}"));
        assert!(!is_json("plain"));
        assert!(!is_json("42"));
        assert!(!is_json(r#""quoted""#));
    }

    #[test]
    fn test_prefixed_variables_applied() {
        let store = ConfigStore::new();
        let vars = vec![
            ("CONFIG_A", "E"),
            ("CONFIG_SUB__G", "E"),
            ("config:lower", "x"),
            ("HOME", "/root"),
            ("PATH", "/bin"),
        ];
        let applied = load_environment_variables(&store, DEFAULT_PREFIX, vars);
        assert_eq!(applied, 3);
        assert_eq!(store.get("a"), "E");
        assert_eq!(store.get("sub:g"), "E");
        assert_eq!(store.get("lower"), "x");
        assert_eq!(store.get("home"), "");
    }

    #[test]
    fn test_json_variable_becomes_structure() {
        let store = ConfigStore::new();
        load_environment_variables(
            &store,
            DEFAULT_PREFIX,
            [("CONFIG_PEOPLE", r#"[{"name":"a"},{"name":"b"}]"#)],
        );
        let people = store.get_any("people").unwrap();
        assert_eq!(people.as_list().unwrap().len(), 2);
        assert_eq!(store.get("people"), "");
    }

    #[test]
    fn test_custom_prefix() {
        let store = ConfigStore::new();
        load_environment_variables(&store, "myapp", [("MYAPP__DB__HOST", "db"), ("CONFIG_X", "1")]);
        assert_eq!(store.get("db:host"), "db");
        assert_eq!(store.raw("x"), None);
    }

    #[test]
    fn test_bare_prefix_ignored() {
        let store = ConfigStore::new();
        let applied = load_environment_variables(&store, DEFAULT_PREFIX, [("CONFIG_", "v")]);
        assert_eq!(applied, 0);
        assert!(store.snapshot() == Value::map());
    }

    #[test]
    fn test_env_variable_selects_environment() {
        let store = ConfigStore::new();
        load_environment_variables(&store, DEFAULT_PREFIX, [("CONFIG_ENV", "prod")]);
        assert_eq!(store.environment(), "prod");
    }
}
