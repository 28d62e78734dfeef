//! Read-time placeholder substitution.
//!
//! A template maps a search token to a replacement. Stored strings may
//! reference a token as `{token}`; the substitution runs on every read, so
//! templates registered after loading still apply.

use super::value::Value;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// A `{search}` → `replace` substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub search: String,
    pub replace: String,
}

impl Template {
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
        }
    }

    /// The placeholder as it appears in config text.
    pub fn token(&self) -> String {
        format!("{{{}}}", self.search)
    }

    /// Parse `SEARCH=REPLACE`.
    pub fn parse(pair: &str) -> Option<Self> {
        let (search, replace) = pair.split_once('=')?;
        if search.is_empty() {
            return None;
        }
        Some(Self::new(search, replace))
    }
}

/// Ordered, append-only substitution table.
///
/// Templates apply in registration order, each as a plain replace-all over
/// the output of the previous one. Cost per read is proportional to
/// template count × string-leaf count × string length, which is fine for
/// the handful of templates a process registers.
#[derive(Debug, Default)]
pub struct TemplateTable {
    templates: ArcSwap<Vec<Template>>,
}

impl TemplateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a template.
    pub fn register(&self, template: Template) {
        self.templates.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(template.clone());
            next
        });
    }

    /// Registered templates, in application order.
    pub fn templates(&self) -> Arc<Vec<Template>> {
        self.templates.load_full()
    }

    pub fn len(&self) -> usize {
        self.templates.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.load().is_empty()
    }

    /// Apply every template to `s`.
    pub fn eval(&self, s: &str) -> String {
        eval_with(&self.templates.load(), s)
    }

    /// Rebuild `value`, applying [`eval`](Self::eval) to every string leaf.
    pub fn eval_all(&self, value: &Value) -> Value {
        let templates = self.templates.load();
        eval_all_with(&templates, value)
    }
}

fn eval_with(templates: &[Template], s: &str) -> String {
    templates
        .iter()
        .fold(s.to_string(), |acc, t| acc.replace(&t.token(), &t.replace))
}

fn eval_all_with(templates: &[Template], value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(eval_with(templates, s)),
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| eval_all_with(templates, item))
                .collect(),
        ),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), eval_all_with(templates, v)))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) => value.clone(),
    }
}
