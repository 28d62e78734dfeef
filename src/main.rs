//! cfgtree CLI
//!
//! Loads configuration from documents, environment variables and
//! command-line overrides, then prints resolved values or the raw tree.

use anyhow::{Result, anyhow, bail};
use cfgtree::cli::dump::DumpArgs;
use cfgtree::cli::get::{GetArgs, ValueType};
use cfgtree::cli::{Cli, Command};
use cfgtree::config::{
    ConfigLoader, ConfigStore, LoadOptions, Template, Value, process_env_vars, split_uris,
};
use cfgtree::logging::{LogTarget, init_logging};
use clap::Parser;
use std::io::Write;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogTarget::parse(&cli.log), cli.verbose)?;

    let store = ConfigStore::new();
    let options = load_options(&cli);
    let report = ConfigLoader::load_with_options(&store, &options)?;
    for source in &report.sources {
        debug!(tier = %source.tier, origin = %source.origin, keys = source.keys, "Applied source");
    }

    // Explicit flags win over anything the sources selected.
    if let Some(env) = &cli.env {
        store.set_environment(env);
    }
    for entry in &cli.templates {
        let template =
            Template::parse(entry).ok_or_else(|| anyhow!("Invalid template '{}': expected SEARCH=REPLACE", entry))?;
        store.templates().register(template);
    }

    match &cli.command {
        Command::Get(args) => run_get(&store, args),
        Command::Dump(args) => run_dump(&store, args),
    }
}

fn load_options(cli: &Cli) -> LoadOptions {
    let mut options = LoadOptions::default()
        .with_prefix(&cli.prefix)
        .with_env(process_env_vars())
        .with_args(cli.command.overrides().iter().cloned());
    if let Some(uris) = &cli.config {
        for uri in split_uris(uris) {
            options = options.with_uri(uri);
        }
    }
    if let Some(component) = &cli.component {
        options = options.with_component(component);
    }
    options
}

fn run_get(store: &ConfigStore, args: &GetArgs) -> Result<()> {
    let key = args.key.as_str();
    let output = match (args.value_type, args.strict) {
        (ValueType::String, false) => format!("{}\n", store.get(key)),
        (ValueType::Int, false) => format!("{}\n", store.get_int(key)),
        (ValueType::Bool, false) => format!("{}\n", store.get_bool(key)),
        (ValueType::String, true) => format!("{}\n", require(store.lookup_string(key), args)?),
        (ValueType::Int, true) => format!("{}\n", require(store.lookup_int(key), args)?),
        (ValueType::Bool, true) => format!("{}\n", require(store.lookup_bool(key), args)?),
        (ValueType::Any, strict) => match store.get_any(key) {
            Some(value) => args.format.render(&value)?,
            None if strict => bail!("Key not found: {}", key),
            None => args.format.render(&Value::Null)?,
        },
    };
    write_stdout(&output)
}

fn require<T>(value: Option<T>, args: &GetArgs) -> Result<T> {
    value.ok_or_else(|| anyhow!("Key '{}' is missing or not a {}", args.key, args.value_type))
}

fn run_dump(store: &ConfigStore, args: &DumpArgs) -> Result<()> {
    let tree = match &args.key {
        Some(key) => store
            .raw(key)
            .ok_or_else(|| anyhow!("Key not found: {}", key))?,
        None => store.snapshot(),
    };
    write_stdout(&args.format.render(&tree)?)
}

fn write_stdout(output: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
