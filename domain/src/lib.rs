//! Domain layer for verity-quorum
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Quorum
//!
//! Independent check providers each cast a [`ProviderVote`]. Agents reduce
//! those votes into a [`DomainVerdict`] with a documented rule:
//!
//! - **Hallucination detection**: six providers, count of flags with a
//!   confidence-weighted sub-vote for the 3-of-6 case
//! - **Information verification**: weighted semantic / factual / source
//!   signals gated by cross-signal consensus
//! - **Source verification**: per-source credibility and spread consensus
//!
//! ## Results
//!
//! A [`VerificationResult`] bundles one or more verdicts with a conservative
//! (minimum) unified confidence. Identical questions share a cache
//! [`Fingerprint`] regardless of who asked.

pub mod config;
pub mod core;
pub mod health;
pub mod quorum;
pub mod source;
pub mod util;
pub mod verdict;
pub mod verification;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::DomainError,
    request::{RequestKind, RequestOptions, VerificationRequest},
};
pub use health::{
    AgentHealthRecord, AgentKind, AgentStatus, HealthStatus, SystemHealth, SystemMetrics,
    TargetAccuracy,
};
pub use quorum::{
    ConfidenceTier, ConsensusOutcome, HallucinationRule, ProviderVote, RuleBranch, RuleOutcome,
    SignalConsensus, Verdict, VoteTally,
};
pub use source::{
    Accessibility, ContentSample, SourceCheck, SourceReport, SourceScoring, SourceStatus,
    UNKNOWN_DOMAIN_REPUTATION, assess_content_quality, extract_domain,
};
pub use verdict::{
    DomainVerdict, FactorThresholds, InformationPolicy, RiskSignals, VerdictDomain, factor,
};
pub use verification::{
    BatchItem, BatchItemResult, BatchOutcome, BatchRequest, BatchResult, BatchSummary,
    Fingerprint, VerificationResult,
};
