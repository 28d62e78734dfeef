//! Layered configuration tree.
//!
//! Values live in one tree addressed by colon paths (`server:port`). Reads
//! resolve four layers, highest precedence first:
//! 1. **Component + environment** - `component:<comp>:environment:<env>:<path>`
//! 2. **Component** - `component:<comp>:<path>`
//! 3. **Environment** - `environment:<env>:<path>`
//! 4. **Base** - `<path>`
//!
//! Maps are deep-merged across layers; lists and scalars are replaced.
//! String leaves then pass through registered `{token}` templates.
//!
//! ## Sources
//! - Config documents (YAML or JSON) named by `--config`/`-c` or `CONFIG_URI`
//! - `CONFIG_*` environment variables (`__` separates path segments)
//! - Command-line overrides (`--server__port=80`)
//!
//! The reserved keys `env` and `comp` select the active environment
//! (default `dev`) and component.

pub mod args;
pub mod env;
mod loader;
mod merge;
pub mod path;
mod resolver;
mod store;
mod template;
mod tree;
mod value;

pub use loader::{
    AppliedSource, BytesLoader, ConfigLoader, ConfigTier, FileLoader, LoadOptions, LoadReport,
    Loader, loader_for_uri, process_env_vars, split_uris, utf8_args, utf8_env_vars,
};
pub use merge::{merge, merge_layers};
pub use path::normalize_key;
pub use resolver::{DEFAULT_ENVIRONMENT, ResolverContext, resolve};
pub use store::{COMPONENT_KEY, ConfigStore, ENV_KEY, parse_bool};
pub use template::{Template, TemplateTable};
pub use tree::PathTree;
pub use value::{Map, Value};
