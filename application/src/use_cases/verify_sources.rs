//! Source verification use case
//!
//! Scores every candidate source independently (accessibility, domain
//! reputation, content quality) and aggregates the results into a
//! [`SourceReport`]. Fetch failures classify the source as invalid instead of
//! failing the request.

use crate::config::SourceParams;
use crate::ports::reputation::ReputationTable;
use crate::ports::source_discovery::SourceDiscovery;
use crate::ports::source_fetcher::{FetchError, SourceFetcher};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use verity_domain::{
    Accessibility, ContentSample, DomainVerdict, SourceCheck, SourceReport, SourceScoring,
    VerificationRequest, assess_content_quality, extract_domain,
};

pub struct SourceVerifier {
    fetcher: Arc<dyn SourceFetcher>,
    reputation: Arc<dyn ReputationTable>,
    discovery: Arc<dyn SourceDiscovery>,
    scoring: SourceScoring,
    fetch_timeout: Duration,
}

impl SourceVerifier {
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        reputation: Arc<dyn ReputationTable>,
        discovery: Arc<dyn SourceDiscovery>,
        params: &SourceParams,
    ) -> Self {
        Self {
            fetcher,
            reputation,
            discovery,
            scoring: params.scoring,
            fetch_timeout: params.fetch_timeout,
        }
    }

    pub fn scoring(&self) -> &SourceScoring {
        &self.scoring
    }

    /// Verify the given sources concurrently; the report keeps input order
    pub async fn verify(&self, uris: &[String]) -> SourceReport {
        self.verify_inner(uris, false).await
    }

    /// Verify a request's sources, discovering candidates when none are supplied
    pub async fn resolve_and_verify(&self, request: &VerificationRequest, limit: usize) -> SourceReport {
        if !request.sources().is_empty() {
            return self.verify(request.sources()).await;
        }

        let discovered = match self.discovery.discover(request.content(), limit).await {
            Ok(uris) => uris.into_iter().take(limit).collect::<Vec<_>>(),
            Err(e) => {
                warn!("Source discovery failed: {}", e);
                Vec::new()
            }
        };
        debug!("Discovered {} candidate sources", discovered.len());
        self.verify_inner(&discovered, true).await
    }

    /// Source verification as a standalone verdict
    pub async fn verdict(&self, request: &VerificationRequest) -> DomainVerdict {
        let report = self.verify(request.sources()).await;
        DomainVerdict::sources(report, &self.scoring)
    }

    async fn verify_inner(&self, uris: &[String], discovered: bool) -> SourceReport {
        let checks = futures::future::join_all(uris.iter().map(|uri| self.check_source(uri))).await;
        let report = self.scoring.report(checks, discovered);
        info!(
            "Verified {} sources (reliability {:?}, consensus {:.2})",
            report.checks.len(),
            report.reliability,
            report.consensus_level
        );
        report
    }

    /// Score a single source
    pub async fn check_source(&self, uri: &str) -> SourceCheck {
        let domain = match extract_domain(uri) {
            Ok(domain) => domain,
            Err(reason) => {
                warn!(source = uri, "Invalid source URI: {}", reason);
                return SourceCheck::invalid(uri, None, format!("invalid URI: {}", reason));
            }
        };

        let fetched = match tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(uri)).await {
            Ok(Ok(fetched)) => fetched,
            Ok(Err(e)) => return Self::invalid(uri, domain, e),
            Err(_) => {
                let e = FetchError::Timeout(self.fetch_timeout.as_millis() as u64);
                return Self::invalid(uri, domain, e);
            }
        };

        let accessibility = Accessibility::from_status(fetched.status_code, fetched.response_time_ms);
        let reputation = self.reputation.reputation(&domain);
        let quality = if accessibility.is_reachable() {
            assess_content_quality(ContentSample {
                text: &fetched.text,
                raw_len: fetched.raw_len,
            })
        } else {
            0.0
        };

        let check = self
            .scoring
            .check(uri, Some(domain), accessibility, reputation, quality);
        debug!(
            source = uri,
            "credibility {:.2} ({})",
            check.credibility,
            check.status
        );
        check
    }

    fn invalid(uri: &str, domain: String, error: FetchError) -> SourceCheck {
        warn!(source = uri, "Source fetch failed: {}", error);
        SourceCheck::invalid(uri, Some(domain), error.to_string())
    }
}
