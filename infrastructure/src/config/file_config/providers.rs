//! Provider configuration from TOML (`[providers]` section)

use crate::providers::is_known_provider;
use serde::{Deserialize, Serialize};
use verity_domain::{ConfigIssue, ConfigIssueCode};

/// Raw `[providers]` table
///
/// ```toml
/// [providers]
/// disabled = ["external"]
/// external_endpoint = "https://checks.example/api/verify"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Providers never invoked; they still count as missing votes
    pub disabled: Vec<String>,
    /// Remote fact-checking service used by the `external` detector
    pub external_endpoint: Option<String>,
}

impl FileProvidersConfig {
    /// Known disabled provider names; unknown names are reported and ignored
    pub fn disabled(&self) -> (Vec<String>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut names = Vec::new();
        for name in &self.disabled {
            if !is_known_provider(name) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownProvider { name: name.clone() },
                    format!("providers.disabled: unknown provider '{}', ignoring it", name),
                ));
            } else if !names.contains(name) {
                names.push(name.clone());
            }
        }
        (names, issues)
    }

    /// Endpoint URL, if it parses as http(s)
    pub fn external_endpoint(&self) -> (Option<String>, Vec<ConfigIssue>) {
        let Some(endpoint) = self.external_endpoint.as_deref().map(str::trim) else {
            return (None, Vec::new());
        };
        if endpoint.is_empty() {
            return (None, Vec::new());
        }
        match url::Url::parse(endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => (Some(endpoint.to_string()), Vec::new()),
            _ => (
                None,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEndpoint {
                        endpoint: endpoint.to_string(),
                    },
                    format!(
                        "providers.external_endpoint '{}' is not an http(s) URL, using local evidence checks",
                        endpoint
                    ),
                )],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[providers]
disabled = ["external", "ensemble"]
external_endpoint = "https://checks.example/api"
"#,
        )
        .unwrap();
        let (disabled, issues) = config.providers.disabled();
        assert!(issues.is_empty());
        assert_eq!(disabled, vec!["external", "ensemble"]);
        assert_eq!(
            config.providers.external_endpoint().0.as_deref(),
            Some("https://checks.example/api")
        );
    }

    #[test]
    fn test_unknown_provider_is_reported() {
        let config = FileProvidersConfig {
            disabled: vec!["pattern".to_string(), "oracle".to_string(), "pattern".to_string()],
            external_endpoint: None,
        };
        let (disabled, issues) = config.disabled();
        assert_eq!(disabled, vec!["pattern"]);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0].code,
            ConfigIssueCode::UnknownProvider { name } if name == "oracle"
        ));
    }

    #[test]
    fn test_invalid_endpoint_is_dropped() {
        let config = FileProvidersConfig {
            disabled: vec![],
            external_endpoint: Some("ftp://checks.example".to_string()),
        };
        let (endpoint, issues) = config.external_endpoint();
        assert!(endpoint.is_none());
        assert_eq!(issues.len(), 1);
    }
}
