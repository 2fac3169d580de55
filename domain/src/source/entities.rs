//! Source verification entities

use serde::{Deserialize, Serialize};

/// Whether a candidate source could be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum Accessibility {
    /// Source responded successfully
    Reachable {
        response_time_ms: u64,
        status_code: u16,
    },
    /// Source responded but denied access (401, 403, 407, 451)
    Restricted {
        response_time_ms: u64,
        status_code: u16,
    },
    /// Source responded with an error status
    Unreachable { status_code: Option<u16> },
}

impl Accessibility {
    /// Classify an HTTP status code
    pub fn from_status(status_code: u16, response_time_ms: u64) -> Self {
        match status_code {
            200..=399 => Accessibility::Reachable {
                response_time_ms,
                status_code,
            },
            401 | 403 | 407 | 451 => Accessibility::Restricted {
                response_time_ms,
                status_code,
            },
            _ => Accessibility::Unreachable {
                status_code: Some(status_code),
            },
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Accessibility::Reachable { .. })
    }

    /// 1.0 if reachable, else 0.0
    pub fn score(&self) -> f64 {
        if self.is_reachable() { 1.0 } else { 0.0 }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Accessibility::Reachable { status_code, .. }
            | Accessibility::Restricted { status_code, .. } => Some(*status_code),
            Accessibility::Unreachable { status_code } => *status_code,
        }
    }

    pub fn response_time_ms(&self) -> Option<u64> {
        match self {
            Accessibility::Reachable {
                response_time_ms, ..
            }
            | Accessibility::Restricted {
                response_time_ms, ..
            } => Some(*response_time_ms),
            Accessibility::Unreachable { .. } => None,
        }
    }
}

/// Credibility classification of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Verified,
    Disputed,
    Unverified,
    /// The source could not be fetched at all
    Invalid,
}

impl SourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceStatus::Verified => "verified",
            SourceStatus::Disputed => "disputed",
            SourceStatus::Unverified => "unverified",
            SourceStatus::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of verifying a single candidate source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCheck {
    pub uri: String,
    /// Host name, when the URI could be parsed
    pub domain: Option<String>,
    /// `None` when the fetch itself failed
    pub accessibility: Option<Accessibility>,
    pub reputation: f64,
    pub quality: f64,
    pub credibility: f64,
    pub status: SourceStatus,
    /// Failure reason for invalid sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceCheck {
    /// An invalid source: credibility 0, no accessibility information
    pub fn invalid(uri: impl Into<String>, domain: Option<String>, error: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            domain,
            accessibility: None,
            reputation: 0.0,
            quality: 0.0,
            credibility: 0.0,
            status: SourceStatus::Invalid,
            error: Some(error.into()),
        }
    }
}

/// Aggregate over all candidate sources of one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub checks: Vec<SourceCheck>,
    /// Mean credibility; `None` when no source was checked
    pub reliability: Option<f64>,
    /// `1 − normalized variance` of credibilities (1.0 with < 2 sources)
    pub consensus_level: f64,
    /// True when sources were synthesized by discovery rather than supplied
    pub discovered: bool,
}

impl SourceReport {
    pub fn count(&self, status: SourceStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// Extract the host of a URI
pub fn extract_domain(uri: &str) -> Result<String, String> {
    let parsed = url::Url::parse(uri).map_err(|e| e.to_string())?;
    parsed
        .host_str()
        .map(|h| h.trim_start_matches("www.").to_lowercase())
        .ok_or_else(|| "URI has no host".to_string())
}
