//! The configuration store and its typed accessors.
//!
//! [`ConfigStore`] owns a raw [`PathTree`], the active
//! [`ResolverContext`] and a [`TemplateTable`]. Writes go straight to the
//! tree; reads resolve override layers, then substitute templates, then
//! coerce.
//!
//! ```
//! use cfgtree::config::ConfigStore;
//!
//! let store = ConfigStore::new();
//! store.set("parent:child", "default");
//! store.set("environment:test:parent:child", "override");
//! store.set("env", "test");
//! assert_eq!(store.get("parent:child"), "override");
//! assert_eq!(store.get_int("missing"), 0);
//! ```

use super::path::{normalize_key, segments};
use super::resolver::{ResolverContext, resolve};
use super::template::{Template, TemplateTable};
use super::tree::PathTree;
use super::value::Value;
use crate::error::{ConfigError, Result};
use arc_swap::ArcSwap;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// Reserved key selecting the active environment.
pub const ENV_KEY: &str = "env";

/// Reserved key selecting the active component.
pub const COMPONENT_KEY: &str = "comp";

/// Hierarchical configuration store.
///
/// Independent instances do not share any state. The store is `Send + Sync`;
/// share it by reference or behind an `Arc`.
#[derive(Debug, Default)]
pub struct ConfigStore {
    tree: PathTree,
    context: ArcSwap<ResolverContext>,
    templates: TemplateTable,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// Set or overwrite the value at `key`.
    ///
    /// Writing the reserved `env` or `comp` keys with a string also switches
    /// the active environment or component.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let path = segments(key);
        let value = value.into();
        self.observe_control_key(&path, &value);
        self.tree.set(&path, value);
    }

    /// Parse `json` and store the resulting structure at `key`.
    ///
    /// On a parse error nothing is written.
    pub fn set_json(&self, key: &str, json: &str) -> Result<()> {
        let parsed: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::malformed(key, e))?;
        self.set(key, Value::from(parsed).lowercase_keys());
        Ok(())
    }

    /// Parse a YAML (or JSON) document and fold its top-level keys into the
    /// tree. Each top-level key overwrites what was stored under it.
    ///
    /// `origin` names the source in errors and logs. On failure nothing is
    /// written.
    pub fn load_bytes(&self, origin: &str, data: &[u8]) -> Result<usize> {
        if data.iter().all(u8::is_ascii_whitespace) {
            debug!(origin = %origin, "Config document is empty");
            return Ok(0);
        }
        let parsed: serde_yaml::Value =
            serde_yaml::from_slice(data).map_err(|e| ConfigError::malformed(origin, e))?;
        let document = match Value::from(parsed).lowercase_keys() {
            Value::Map(map) => map,
            // A document holding only comments parses as null.
            Value::Null => {
                debug!(origin = %origin, "Config document is empty");
                return Ok(0);
            }
            _ => return Err(ConfigError::InvalidDocument(origin.to_string())),
        };

        let count = document.len();
        for (key, value) in document {
            self.set(&key, value);
        }
        info!(origin = %origin, keys = count, "Loaded config document");
        Ok(count)
    }

    /// Clear all tree data. Environment, component and templates survive.
    pub fn reset(&self) {
        self.tree.reset();
    }

    fn observe_control_key(&self, path: &[String], value: &Value) {
        let [key] = path else { return };
        let Some(name) = value.as_str() else { return };
        match key.as_str() {
            ENV_KEY => self.set_environment_name(name),
            COMPONENT_KEY => self.set_component_name(name),
            _ => {}
        }
    }

    // ---------------------------------------------------------------------
    // Resolver context
    // ---------------------------------------------------------------------

    /// Current resolver context.
    pub fn context(&self) -> Arc<ResolverContext> {
        self.context.load_full()
    }

    pub fn environment(&self) -> String {
        self.context.load().environment.clone()
    }

    pub fn component(&self) -> String {
        self.context.load().component.clone()
    }

    /// Select the active environment and record it under `env`.
    pub fn set_environment(&self, name: &str) {
        self.set(ENV_KEY, name);
    }

    /// Select the active component and record it under `comp`.
    pub fn set_component(&self, name: &str) {
        self.set(COMPONENT_KEY, name);
    }

    fn set_environment_name(&self, name: &str) {
        let name = name.to_lowercase();
        debug!(environment = %name, "Active environment changed");
        self.context.rcu(|ctx| ResolverContext {
            environment: name.clone(),
            component: ctx.component.clone(),
        });
    }

    fn set_component_name(&self, name: &str) {
        let name = name.to_lowercase();
        debug!(component = %name, "Active component changed");
        self.context.rcu(|ctx| ResolverContext {
            environment: ctx.environment.clone(),
            component: name.clone(),
        });
    }

    /// Adopt `env` from the tree if it holds a non-empty string, otherwise
    /// write the current environment back under `env`.
    pub fn sync_environment(&self) {
        match self.raw(ENV_KEY) {
            Some(Value::String(name)) if !name.is_empty() => self.set_environment_name(&name),
            _ => {
                let current = self.environment();
                self.tree.set(&segments(ENV_KEY), Value::String(current));
            }
        }
    }

    /// Adopt `comp` from the tree if it holds a non-empty string.
    pub fn sync_component(&self) {
        if let Some(Value::String(name)) = self.raw(COMPONENT_KEY) {
            if !name.is_empty() {
                self.set_component_name(&name);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Templates
    // ---------------------------------------------------------------------

    /// Register a `{search}` → `replace` substitution.
    pub fn register_template(&self, search: impl Into<String>, replace: impl Into<String>) {
        self.templates.register(Template::new(search, replace));
    }

    pub fn templates(&self) -> &TemplateTable {
        &self.templates
    }

    /// Apply every registered template to `s`.
    pub fn eval_template(&self, s: &str) -> String {
        self.templates.eval(s)
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Raw stored value at `key`, without override resolution or templating.
    pub fn raw(&self, key: &str) -> Option<Value> {
        self.tree.get(&segments(key))
    }

    /// Resolved value at `key` before template substitution.
    pub fn resolve(&self, key: &str) -> Option<Value> {
        let ctx = self.context.load();
        resolve(&self.tree, &segments(key), &ctx)
    }

    /// Resolved and templated value at `key`, or `None` if absent.
    pub fn get_any(&self, key: &str) -> Option<Value> {
        self.resolve(key).map(|v| self.templates.eval_all(&v))
    }

    /// String value at `key`. Integers render as decimal text; anything else,
    /// including absence, yields `""`.
    pub fn get(&self, key: &str) -> String {
        self.lookup_string(key).unwrap_or_default()
    }

    /// Alias of [`get`](Self::get).
    pub fn get_string(&self, key: &str) -> String {
        self.get(key)
    }

    /// Integer value at `key`; strings are parsed. `0` on miss or mismatch.
    pub fn get_int(&self, key: &str) -> i64 {
        self.lookup_int(key).unwrap_or_default()
    }

    /// Boolean value at `key`; strings are parsed. `false` on miss or mismatch.
    pub fn get_bool(&self, key: &str) -> bool {
        self.lookup_bool(key).unwrap_or_default()
    }

    /// Like [`get`](Self::get), but `None` on miss or mismatch.
    pub fn lookup_string(&self, key: &str) -> Option<String> {
        match self.get_any(key)? {
            Value::String(s) => Some(s),
            Value::Int(i) => Some(i.to_string()),
            _ => None,
        }
    }

    /// Like [`get_int`](Self::get_int), but `None` on miss or mismatch.
    pub fn lookup_int(&self, key: &str) -> Option<i64> {
        match self.get_any(key)? {
            Value::Int(i) => Some(i),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Like [`get_bool`](Self::get_bool), but `None` on miss or mismatch.
    pub fn lookup_bool(&self, key: &str) -> Option<bool> {
        match self.get_any(key)? {
            Value::Bool(b) => Some(b),
            Value::String(s) => parse_bool(&s),
            _ => None,
        }
    }

    /// Decode the resolved value at `key` into `T`.
    ///
    /// `Ok(None)` when the key is absent; an error when the value does not
    /// fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.get_any(key) else {
            return Ok(None);
        };
        let json = value.to_json()?;
        Ok(Some(serde_json::from_value(json)?))
    }

    /// Whether `key` resolves to anything.
    pub fn contains(&self, key: &str) -> bool {
        self.resolve(key).is_some()
    }

    // ---------------------------------------------------------------------
    // Diagnostics
    // ---------------------------------------------------------------------

    /// Copy of the raw tree.
    pub fn snapshot(&self) -> Value {
        self.tree.snapshot()
    }

    /// The raw tree as YAML.
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(&self.tree.snapshot()).unwrap_or_default()
    }

    /// The raw tree as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.tree.snapshot()).unwrap_or_default()
    }

    /// The raw tree in Rust debug notation.
    pub fn to_debug(&self) -> String {
        format!("{:#?}", self.tree.snapshot())
    }

    /// Normalized form of `key`, as used for storage.
    pub fn normalize(key: &str) -> String {
        normalize_key(key)
    }
}

/// Parse a boolean using the spellings accepted by most config tooling:
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
