//! Wires the built-in adapters into a [`VerificationOrchestrator`]

use crate::cache::InMemoryResultCache;
use crate::config::FileConfig;
use crate::logging::JsonlTelemetrySink;
use crate::providers::HeuristicSuite;
use crate::sources::{ContentSourceDiscovery, HttpSourceFetcher, StaticReputationTable};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use verity_application::{
    HallucinationDetectorAgent, InformationVerifierAgent, ProviderError, SinkError,
    SourceVerifier, VerificationOrchestrator,
};
use verity_domain::ConfigIssue;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("check providers unavailable: {0}")]
    Providers(#[from] ProviderError),

    #[error("telemetry sink unavailable: {0}")]
    Telemetry(#[from] SinkError),
}

/// An orchestrator ready to initialize, plus what the configuration changed
pub struct Assembly {
    pub orchestrator: VerificationOrchestrator,
    /// Issues found while converting the file configuration
    pub issues: Vec<ConfigIssue>,
    /// Providers switched off by `[providers] disabled`
    pub disabled_providers: Vec<String>,
}

/// Builder over a loaded [`FileConfig`]
pub struct EngineAssembler {
    config: FileConfig,
    telemetry_path: Option<PathBuf>,
}

impl EngineAssembler {
    pub fn new(config: FileConfig) -> Self {
        let telemetry_path = config.telemetry.path.clone();
        Self {
            config,
            telemetry_path,
        }
    }

    /// Override `[telemetry] path`
    pub fn with_telemetry_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.telemetry_path = path;
        }
        self
    }

    pub fn assemble(self) -> Result<Assembly, AssemblyError> {
        let config = &self.config;
        let (engine, mut issues) = config.to_engine_config();

        let (unknown_reputation, found) = config.sources.unknown_reputation();
        issues.extend(found);
        let (overrides, found) = config.reputation_overrides();
        issues.extend(found);
        let (templates, found) = config.discovery.templates();
        issues.extend(found);
        let (max_entries, found) = config.cache.max_entries();
        issues.extend(found);
        let (disabled_providers, found) = config.providers.disabled();
        issues.extend(found);
        let (endpoint, found) = config.providers.external_endpoint();
        issues.extend(found);

        for issue in &issues {
            warn!("{}", issue);
        }

        let mut fetcher = HttpSourceFetcher::default();
        if let Some(user_agent) = &config.sources.user_agent {
            fetcher = fetcher.with_user_agent(user_agent.clone());
        }
        let reputation = StaticReputationTable::builtin()
            .with_overrides(&overrides)
            .with_default(unknown_reputation);
        debug!("Reputation table holds {} domains", reputation.len());
        let discovery =
            ContentSourceDiscovery::new(templates).with_max_terms(config.discovery.max_terms);

        let sources = Arc::new(SourceVerifier::new(
            Arc::new(fetcher),
            Arc::new(reputation),
            Arc::new(discovery),
            &engine.sources,
        ));

        let suite = HeuristicSuite::new()?;
        let information = Arc::new(InformationVerifierAgent::new(
            suite.semantic_similarity(),
            suite.fact_validation(),
            Arc::clone(&sources),
            &engine.information,
        ));
        let detector = Arc::new(HallucinationDetectorAgent::new(
            suite.detectors(endpoint),
            suite.risk_analyzer(),
            &engine.detection,
        ));

        let mut orchestrator = VerificationOrchestrator::new(information, detector, sources, engine)
            .with_cache(Arc::new(InMemoryResultCache::new(max_entries)));
        if let Some(path) = &self.telemetry_path {
            orchestrator = orchestrator.with_telemetry(Arc::new(JsonlTelemetrySink::new(path)?));
        }

        Ok(Assembly {
            orchestrator,
            issues,
            disabled_providers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::{AgentKind, AgentStatus, HealthStatus};

    #[tokio::test]
    async fn test_default_assembly_initializes() {
        let assembly = EngineAssembler::new(FileConfig::default()).assemble().unwrap();
        assert!(assembly.issues.is_empty());
        assert!(assembly.disabled_providers.is_empty());

        let health = assembly.orchestrator.initialize().await;
        assert_eq!(health.status, HealthStatus::Healthy);
        let record = assembly
            .orchestrator
            .manager()
            .record(AgentKind::HallucinationDetector)
            .unwrap();
        assert_eq!(record.status, AgentStatus::Active);
    }

    #[tokio::test]
    async fn test_issues_and_disabled_providers_are_reported() {
        let config: FileConfig = toml::from_str(
            r#"
[batch]
max_concurrency = 0

[providers]
disabled = ["external", "nonsense"]
"#,
        )
        .unwrap();
        let assembly = EngineAssembler::new(config).assemble().unwrap();
        assert_eq!(assembly.issues.len(), 2);
        assert_eq!(assembly.disabled_providers, vec!["external"]);
        assert_eq!(assembly.orchestrator.config().batch.max_concurrency, 8);
    }

    #[test]
    fn test_detector_panel_is_in_vote_order() {
        let suite = HeuristicSuite::new().unwrap();
        let detector = HallucinationDetectorAgent::new(
            suite.detectors(None),
            suite.risk_analyzer(),
            &verity_application::DetectionParams::default(),
        );
        assert_eq!(detector.provider_names(), crate::providers::DETECTOR_NAMES.to_vec());
    }

    #[test]
    fn test_telemetry_path_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("telemetry.jsonl");
        EngineAssembler::new(FileConfig::default())
            .with_telemetry_path(Some(path.clone()))
            .assemble()
            .unwrap();
        assert!(path.exists());
    }
}
