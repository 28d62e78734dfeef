//! Dump subcommand for cfgtree CLI
//!
//! Prints the raw tree as loaded: override branches are shown as stored and
//! templates are not applied.

use super::OverrideArgs;
use crate::format::OutputFormat;
use clap::Args;

/// Arguments for the dump subcommand
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Output format: yaml (default), json, or debug
    #[arg(short, long, default_value = "yaml", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Only dump the subtree under this key
    #[arg(long, value_name = "KEY")]
    pub key: Option<String>,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}
