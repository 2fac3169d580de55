//! Output configuration from TOML (`[output]` and `[telemetry]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use verity_domain::OutputFormat;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format; `--output` on the command line wins
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Raw `[telemetry]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTelemetryConfig {
    /// JSONL file receiving health and metrics snapshots
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"
color = false

[telemetry]
path = "/var/log/verity/telemetry.jsonl"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert_eq!(
            config.telemetry.path,
            Some(PathBuf::from("/var/log/verity/telemetry.jsonl"))
        );
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result: Result<super::super::FileConfig, _> = toml::from_str("[output]\nformat = \"xml\"\n");
        assert!(result.is_err());
    }
}
