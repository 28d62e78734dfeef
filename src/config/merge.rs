//! Deep merge of override layers.
//!
//! Maps are merged key by key; every other value is replaced wholesale.
//! Lists are never concatenated or merged by index.

use super::value::Value;

/// Merge `winner` over `loser`.
///
/// - Both maps: start from `loser`, insert every key of `winner`, recursing
///   where both sides hold a map. Keys only in `loser` are kept.
/// - Anything else: `winner` is returned unchanged, including `Null` and
///   lists.
/// - Missing `loser`: `winner`.
///
/// # Example
/// ```
/// use cfgtree::config::{Value, merge};
///
/// let winner = Value::from(serde_json::json!({"server": {"port": 9000}}));
/// let loser = Value::from(serde_json::json!({"server": {"port": 8080, "host": "localhost"}}));
/// let merged = merge(winner, Some(loser));
/// assert_eq!(
///     merged,
///     Value::from(serde_json::json!({"server": {"port": 9000, "host": "localhost"}}))
/// );
/// ```
pub fn merge(winner: Value, loser: Option<Value>) -> Value {
    match (winner, loser) {
        (Value::Map(winner_map), Some(Value::Map(mut loser_map))) => {
            for (key, winner_value) in winner_map {
                let merged = match loser_map.remove(&key) {
                    Some(loser_value) => merge(winner_value, Some(loser_value)),
                    None => winner_value,
                };
                loser_map.insert(key, merged);
            }
            Value::Map(loser_map)
        }
        (winner, _) => winner,
    }
}

/// Merge layers given lowest precedence first, skipping absent ones.
pub fn merge_layers(layers: impl IntoIterator<Item = Option<Value>>) -> Option<Value> {
    layers
        .into_iter()
        .flatten()
        .fold(None, |acc, layer| Some(merge(layer, acc)))
}
