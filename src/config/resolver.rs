//! Read-time override resolution.
//!
//! Resolution precedence, highest to lowest:
//! 1. `component:<component>:environment:<environment>:<path>`
//! 2. `component:<component>:<path>`
//! 3. `environment:<environment>:<path>`
//! 4. `<path>`
//!
//! Layers are deep-merged, so an override only needs to restate the leaves
//! it changes.

use super::merge::merge_layers;
use super::path::prefixed;
use super::tree::PathTree;
use super::value::Value;

/// Default environment name.
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Top-level branch holding per-environment overrides.
pub const ENVIRONMENT_BRANCH: &str = "environment";

/// Top-level branch holding per-component overrides.
pub const COMPONENT_BRANCH: &str = "component";

/// Active environment and component consulted during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverContext {
    pub environment: String,
    /// Empty means no component layers are consulted.
    pub component: String,
}

impl Default for ResolverContext {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            component: String::new(),
        }
    }
}

impl ResolverContext {
    pub fn new(environment: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            environment: environment.into().to_lowercase(),
            component: component.into().to_lowercase(),
        }
    }

    pub fn has_component(&self) -> bool {
        !self.component.is_empty()
    }

    /// Paths of every layer for `path`, lowest precedence first.
    pub fn layer_paths(&self, path: &[String]) -> Vec<Vec<String>> {
        let env = self.environment.as_str();
        let mut layers = vec![
            path.to_vec(),
            prefixed(&[ENVIRONMENT_BRANCH, env], path),
        ];
        if self.has_component() {
            let comp = self.component.as_str();
            layers.push(prefixed(&[COMPONENT_BRANCH, comp], path));
            layers.push(prefixed(
                &[COMPONENT_BRANCH, comp, ENVIRONMENT_BRANCH, env],
                path,
            ));
        }
        layers
    }
}

/// Effective value of `path` after merging every present override layer.
pub fn resolve(tree: &PathTree, path: &[String], ctx: &ResolverContext) -> Option<Value> {
    merge_layers(ctx.layer_paths(path).iter().map(|layer| tree.get(layer)))
}
