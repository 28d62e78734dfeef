//! Output formatting for tree dumps and lookups.

use crate::config::Value;

/// Output format for printed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
    Debug,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "debug" | "rust" => Ok(OutputFormat::Debug),
            _ => Err(format!(
                "Invalid format '{}'. Valid options: yaml, json, debug",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Debug => write!(f, "debug"),
        }
    }
}

impl OutputFormat {
    /// Render a value in this format.
    pub fn render(&self, value: &Value) -> anyhow::Result<String> {
        Ok(match self {
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Json => {
                let mut out = serde_json::to_string_pretty(value)?;
                out.push('\n');
                out
            }
            OutputFormat::Debug => format!("{:#?}\n", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("YAML".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("rust".parse::<OutputFormat>(), Ok(OutputFormat::Debug));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_json() {
        let value = Value::from(serde_json::json!({"a": [1, 2]}));
        let out = OutputFormat::Json.render(&value).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!({"a": [1, 2]}));
    }

    #[test]
    fn test_render_yaml_scalar() {
        let out = OutputFormat::Yaml.render(&Value::from("plain")).unwrap();
        assert_eq!(out.trim(), "plain");
    }
}
