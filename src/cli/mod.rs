//! CLI command definitions for cfgtree
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod dump;
pub mod get;

use clap::{Args, Parser, Subcommand};
use dump::DumpArgs;
use get::GetArgs;

/// Inspect layered configuration assembled from files, environment and flags
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config documents to load, `;`-separated (overrides CONFIG_URI)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Active environment (overrides `env` from loaded sources)
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Active component (overrides `comp` from loaded sources)
    #[arg(long, global = true)]
    pub component: Option<String>,

    /// Prefix marking config environment variables and flags
    #[arg(long, default_value = "CONFIG", global = true)]
    pub prefix: String,

    /// Template substitution applied at read time (repeatable)
    #[arg(short, long = "template", value_name = "SEARCH=REPLACE", global = true)]
    pub templates: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved value of one key
    Get(GetArgs),

    /// Print the raw configuration tree
    Dump(DumpArgs),
}

impl Command {
    /// Override tokens given after `--`.
    pub fn overrides(&self) -> &[String] {
        match self {
            Command::Get(args) => &args.overrides.tokens,
            Command::Dump(args) => &args.overrides.tokens,
        }
    }
}

/// Trailing config overrides, parsed with the docopt-style tokenizer.
#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    /// Overrides such as `--server__port=80 -v` after a `--` separator
    #[arg(last = true, value_name = "OVERRIDES")]
    pub tokens: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get_with_overrides() {
        let cli = Cli::try_parse_from([
            "cfgtree",
            "--env",
            "test",
            "-t",
            "root=/srv",
            "get",
            "server:port",
            "--",
            "--server__port=80",
        ])
        .unwrap();
        assert_eq!(cli.env.as_deref(), Some("test"));
        assert_eq!(cli.templates, vec!["root=/srv"]);
        assert_eq!(cli.command.overrides(), ["--server__port=80".to_string()]);
        match cli.command {
            Command::Get(args) => assert_eq!(args.key, "server:port"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_dump_defaults() {
        let cli = Cli::try_parse_from(["cfgtree", "dump"]).unwrap();
        assert_eq!(cli.prefix, "CONFIG");
        assert_eq!(cli.log, "2");
        assert!(cli.command.overrides().is_empty());
    }
}
