//! Get subcommand for cfgtree CLI
//!
//! Resolves one key through the override layers and templates, then prints
//! it coerced to the requested type.

use super::OverrideArgs;
use crate::format::OutputFormat;
use clap::Args;

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Key to resolve, e.g. `server:port` or `SERVER__PORT`
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Coercion: string (default), int, bool, or any
    #[arg(long = "type", default_value = "string", value_name = "TYPE")]
    pub value_type: ValueType,

    /// Output format for `--type any`: yaml (default), json, or debug
    #[arg(short, long, default_value = "yaml", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Fail instead of printing a default when the key is absent or mistyped
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Accessor used by the get subcommand
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueType {
    #[default]
    String,
    Int,
    Bool,
    Any,
}

impl std::str::FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "str" => Ok(ValueType::String),
            "int" | "integer" => Ok(ValueType::Int),
            "bool" | "boolean" => Ok(ValueType::Bool),
            "any" => Ok(ValueType::Any),
            _ => Err(format!(
                "Invalid type '{}'. Valid options: string, int, bool, any",
                s
            )),
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::String => write!(f, "string"),
            ValueType::Int => write!(f, "int"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Any => write!(f, "any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_from_str() {
        assert_eq!("INT".parse::<ValueType>(), Ok(ValueType::Int));
        assert_eq!("boolean".parse::<ValueType>(), Ok(ValueType::Bool));
        assert!("float".parse::<ValueType>().is_err());
    }
}
