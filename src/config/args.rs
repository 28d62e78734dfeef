//! Command-line override parsing.
//!
//! Turns docopt-style tokens into key/value pairs:
//!
//! | tokens            | pairs                          |
//! |-------------------|--------------------------------|
//! | `-k`              | `k=1`                          |
//! | `-k value`        | `k=value`                      |
//! | `-klm`            | `k=1 l=1 m=1`                  |
//! | `-klm value`      | `k=1 l=1 m=value`              |
//! | `-k=value`        | `k=value`                      |
//! | `--key`           | `key=1`                        |
//! | `--key value`     | `key=value`                    |
//! | `--key=value`     | `key=value`                    |
//!
//! Positional tokens before the first flag are skipped. Keys are lowercased.

use super::path::strip_config_prefix;
use super::store::ConfigStore;
use tracing::debug;

/// Value assigned to flags given without one.
pub const FLAG_SET: &str = "1";

/// A parsed `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgPair {
    pub key: String,
    pub value: String,
}

impl ArgPair {
    fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parse command-line tokens (without the program name) into pairs.
pub fn parse_command_line_args<I, S>(args: I) -> Vec<ArgPair>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pairs: Vec<ArgPair> = Vec::new();
    // Whether the last flag can still take the next bare token as its value.
    let mut awaiting_value = false;
    let mut seen_flag = false;

    for arg in args {
        let arg = arg.as_ref();

        if let Some(raw) = arg.strip_prefix("--") {
            seen_flag = true;
            if raw.is_empty() {
                // Bare `--` is a separator, not a key.
                awaiting_value = false;
                continue;
            }
            match raw.split_once('=') {
                Some((key, value)) => {
                    pairs.push(ArgPair::new(key, value));
                    awaiting_value = false;
                }
                None => {
                    pairs.push(ArgPair::new(raw, ""));
                    awaiting_value = true;
                }
            }
        } else if let Some(raw) = arg.strip_prefix('-') {
            seen_flag = true;
            let (flags, value) = match raw.split_once('=') {
                Some((flags, value)) => (flags, Some(value)),
                None => (raw, None),
            };

            let before = pairs.len();
            for c in flags.chars().filter(|c| *c != '-') {
                pairs.push(ArgPair::new(c.to_string(), FLAG_SET));
            }
            if pairs.len() == before {
                awaiting_value = false;
                continue;
            }

            match (value, pairs.last_mut()) {
                (Some(value), Some(last)) => {
                    last.value = value.to_string();
                    awaiting_value = false;
                }
                _ => awaiting_value = true,
            }
        } else if seen_flag && awaiting_value {
            if let Some(last) = pairs.last_mut() {
                last.value = arg.to_string();
            }
            awaiting_value = false;
        }
    }

    pairs
        .into_iter()
        .map(|p| ArgPair {
            key: p.key.to_lowercase(),
            value: if p.value.is_empty() {
                FLAG_SET.to_string()
            } else {
                p.value
            },
        })
        .collect()
}

/// The config URI named by `--config` or `-c`, if any.
pub fn config_uri_from_args(pairs: &[ArgPair]) -> Option<String> {
    pairs
        .iter()
        .find(|p| p.key == "config" || p.key == "c")
        .map(|p| p.value.clone())
}

/// Write parsed pairs into `store`, stripping the config prefix from keys.
pub fn load_command_line_args(store: &ConfigStore, prefix: &str, pairs: &[ArgPair]) -> usize {
    for pair in pairs {
        let (key, _) = strip_config_prefix(&pair.key, prefix);
        debug!(key = %key, "Applied command-line override");
        store.set(&key, pair.value.as_str());
    }
    pairs.len()
}
