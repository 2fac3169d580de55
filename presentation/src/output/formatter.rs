//! Output formatter trait

use verity_domain::{BatchResult, OutputFormat, VerificationResult};

/// Trait for formatting verification results
pub trait OutputFormatter {
    /// Every verdict with votes, factors, warnings and suggestions
    fn format_full(&self, result: &VerificationResult) -> String;

    /// Decision and confidence per verdict
    fn format_summary(&self, result: &VerificationResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &VerificationResult) -> String;

    /// Format one batch outcome
    fn format_batch(&self, batch: &BatchResult, format: OutputFormat) -> String;

    fn format_result(&self, result: &VerificationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_full(result),
            OutputFormat::Summary => self.format_summary(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
