//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for verification results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every verdict with votes, factors, warnings and suggestions
    Full,
    /// Decision and confidence per verdict (default)
    #[default]
    Summary,
    /// JSON output
    Json,
}
