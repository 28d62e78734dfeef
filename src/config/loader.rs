//! Source loading with progressive overwrite.
//!
//! A full load applies, in order:
//! 1. Config documents named by `--config`/`-c` or `CONFIG_URI` (`;`-separated)
//! 2. Prefixed environment variables
//! 3. Command-line overrides
//!
//! Later sources overwrite earlier ones at identical paths. This is a flat
//! overwrite, unrelated to the environment/component layering applied at
//! read time.

use super::args::{ArgPair, config_uri_from_args, load_command_line_args, parse_command_line_args};
use super::env::{DEFAULT_PREFIX, load_environment_variables};
use super::store::ConfigStore;
use crate::error::{ConfigError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the config documents to load.
pub const CONFIG_URI_VAR: &str = "CONFIG_URI";

/// URI prefix for object-storage sources.
pub const S3_URI_PREFIX: &str = "s3://";

/// Where a batch of values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// A config document (lowest priority)
    Document = 0,
    /// Environment variables
    Environment = 1,
    /// Command-line overrides (highest priority)
    CommandLine = 2,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Document => write!(f, "document"),
            ConfigTier::Environment => write!(f, "environment"),
            ConfigTier::CommandLine => write!(f, "command-line"),
        }
    }
}

/// A source of raw config bytes.
pub trait Loader: Send + Sync {
    /// Human-readable name of the source, for errors and logs.
    fn origin(&self) -> String;

    /// Retrieve the raw document.
    fn load(&self) -> Result<Vec<u8>>;
}

/// Reads a document from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Loader for FileLoader {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| ConfigError::unavailable(self.origin(), e))
    }
}

/// Serves a document held in memory.
#[derive(Debug, Clone)]
pub struct BytesLoader {
    origin: String,
    data: Vec<u8>,
}

impl BytesLoader {
    pub fn new(origin: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            origin: origin.into(),
            data: data.into(),
        }
    }
}

impl Loader for BytesLoader {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn load(&self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

/// Pick a loader for `uri` by its scheme.
///
/// Plain paths and `file://` URIs load from disk. Object-storage URIs are
/// recognised but not supported.
pub fn loader_for_uri(uri: &str) -> Result<Box<dyn Loader>> {
    if uri.starts_with(S3_URI_PREFIX) {
        return Err(ConfigError::UnsupportedSource(uri.to_string()));
    }
    let path = uri.strip_prefix("file://").unwrap_or(uri);
    Ok(Box::new(FileLoader::new(path)))
}

/// Split a `;`-separated URI list, dropping empty entries.
pub fn split_uris(uris: &str) -> Vec<String> {
    uris.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep the variables whose name and value are valid UTF-8.
///
/// Anything else cannot name a config key and is skipped.
pub fn utf8_env_vars<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
            (Ok(name), Ok(value)) => Some((name, value)),
            (name, _) => {
                debug!(variable = ?name, "Skipping non-UTF-8 environment variable");
                None
            }
        })
        .collect()
}

/// Keep the arguments that are valid UTF-8.
pub fn utf8_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .filter_map(|arg| match arg.into_string() {
            Ok(arg) => Some(arg),
            Err(arg) => {
                debug!(argument = ?arg, "Skipping non-UTF-8 argument");
                None
            }
        })
        .collect()
}

/// The running process's environment, minus non-UTF-8 entries.
pub fn process_env_vars() -> Vec<(String, String)> {
    utf8_env_vars(std::env::vars_os())
}

/// Inputs for a full load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Prefix marking config variables and flags (`CONFIG`).
    pub prefix: String,
    /// Explicit config URIs. When empty, URIs come from `CONFIG_URI` and
    /// `--config`/`-c`.
    pub uris: Vec<String>,
    /// Environment variables to scan.
    pub env_vars: Vec<(String, String)>,
    /// Command-line tokens, without the program name.
    pub args: Vec<String>,
    /// Component to activate after loading. When unset, `comp` from the
    /// loaded data is used.
    pub component: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            uris: Vec::new(),
            env_vars: Vec::new(),
            args: Vec::new(),
            component: None,
        }
    }
}

impl LoadOptions {
    /// Options drawn from the running process: its environment and arguments.
    pub fn discover() -> Self {
        Self {
            env_vars: process_env_vars(),
            args: utf8_args(std::env::args_os().skip(1)),
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uris.push(uri.into());
        self
    }

    pub fn with_env<K: Into<String>, V: Into<String>>(
        mut self,
        vars: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.env_vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_args<S: Into<String>>(mut self, args: impl IntoIterator<Item = S>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Config URIs to load: explicit ones, else `CONFIG_URI` overridden by
    /// `--config`/`-c`.
    pub fn config_uris(&self, pairs: &[ArgPair]) -> Vec<String> {
        if !self.uris.is_empty() {
            return self.uris.clone();
        }
        let from_env = self
            .env_vars
            .iter()
            .find(|(k, _)| k == CONFIG_URI_VAR)
            .map(|(_, v)| v.clone());
        config_uri_from_args(pairs)
            .or(from_env)
            .map(|uris| split_uris(&uris))
            .unwrap_or_default()
    }
}

/// One applied source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedSource {
    pub tier: ConfigTier,
    pub origin: String,
    pub keys: usize,
}

/// What a full load applied, in order.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub sources: Vec<AppliedSource>,
}

impl LoadReport {
    fn push(&mut self, tier: ConfigTier, origin: impl Into<String>, keys: usize) {
        self.sources.push(AppliedSource {
            tier,
            origin: origin.into(),
            keys,
        });
    }

    /// Origins of the documents that were loaded.
    pub fn documents(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|s| s.tier == ConfigTier::Document)
            .map(|s| s.origin.as_str())
            .collect()
    }
}

/// Drives a full load into a [`ConfigStore`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the running process's environment and arguments.
    pub fn load(store: &ConfigStore) -> Result<LoadReport> {
        Self::load_with_options(store, &LoadOptions::discover())
    }

    /// Load from explicit options.
    ///
    /// A failing document aborts the load; documents applied before it stay
    /// in the store.
    pub fn load_with_options(store: &ConfigStore, options: &LoadOptions) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        let pairs = parse_command_line_args(&options.args);

        for uri in options.config_uris(&pairs) {
            let loader = loader_for_uri(&uri)?;
            let keys = Self::load_source(store, loader.as_ref())?;
            report.push(ConfigTier::Document, loader.origin(), keys);
        }

        let env_vars = options.env_vars.iter().map(|(k, v)| (k, v));
        let env_keys = load_environment_variables(store, &options.prefix, env_vars);
        report.push(ConfigTier::Environment, "environment", env_keys);

        let arg_keys = load_command_line_args(store, &options.prefix, &pairs);
        report.push(ConfigTier::CommandLine, "command-line", arg_keys);

        match options.component.as_deref() {
            Some(component) if !component.is_empty() => store.set_component(component),
            _ => store.sync_component(),
        }
        store.sync_environment();

        info!(
            environment = %store.environment(),
            component = %store.component(),
            sources = report.sources.len(),
            "Configuration loaded"
        );
        Ok(report)
    }

    /// Fetch one source and fold it into `store`.
    pub fn load_source(store: &ConfigStore, loader: &dyn Loader) -> Result<usize> {
        let origin = loader.origin();
        debug!(origin = %origin, "Loading config source");
        let data = loader.load()?;
        store.load_bytes(&origin, &data)
    }
}
