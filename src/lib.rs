//! cfgtree: hierarchical configuration with override layers
//!
//! This module exports the configuration store and its loaders for use by
//! the `cfgtree` binary and by embedding applications.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;

pub use config::{ConfigLoader, ConfigStore, LoadOptions, Value};
pub use error::{ConfigError, Result};
