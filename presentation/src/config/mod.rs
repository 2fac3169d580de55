//! Presentation-level configuration
//!
//! Resolves how results are rendered from CLI flags and the `[output]`
//! section of the configuration file.

use crate::cli::commands;
use verity_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// CLI flags win over the file; JSON output never shows progress
    pub fn resolve(
        cli_format: Option<commands::OutputFormat>,
        file_format: Option<OutputFormat>,
        file_color: bool,
        quiet: bool,
    ) -> Self {
        let format = cli_format
            .map(OutputFormat::from)
            .or(file_format)
            .unwrap_or_default();
        Self {
            format,
            color: file_color && format != OutputFormat::Json,
            show_progress: !quiet && format != OutputFormat::Json,
        }
    }

    /// Apply the color choice to every later `colored` call
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_format_wins() {
        let config = OutputConfig::resolve(
            Some(commands::OutputFormat::Full),
            Some(OutputFormat::Json),
            true,
            false,
        );
        assert_eq!(config.format, OutputFormat::Full);
        assert!(config.color);
        assert!(config.show_progress);
    }

    #[test]
    fn test_file_format_then_default() {
        let config = OutputConfig::resolve(None, Some(OutputFormat::Full), true, false);
        assert_eq!(config.format, OutputFormat::Full);

        let config = OutputConfig::resolve(None, None, true, false);
        assert_eq!(config.format, OutputFormat::default());
    }

    #[test]
    fn test_json_disables_color_and_progress() {
        let config = OutputConfig::resolve(Some(commands::OutputFormat::Json), None, true, false);
        assert!(!config.color);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_quiet_and_color_off() {
        let config = OutputConfig::resolve(None, None, false, true);
        assert!(!config.color);
        assert!(!config.show_progress);
    }
}
