//! Domain verdicts
//!
//! A [`DomainVerdict`] is the reduced decision of one agent. It is built only
//! by the reducers in this module:
//!
//! - [`DomainVerdict::information`]: weighted signals + consensus
//! - [`DomainVerdict::hallucination`]: vote-count rule + risk factors
//! - [`DomainVerdict::sources`]: mean source credibility

pub mod entities;
pub mod hallucination;
pub mod information;
pub mod sources;

pub use entities::{DomainVerdict, VerdictDomain, factor};
pub use hallucination::{FactorThresholds, RELIABLE_CONTENT_SUGGESTION, RiskSignals};
pub use information::{
    InformationAssessment, InformationPolicy, InformationSignals, SOURCE_CREDIBILITY_PROVIDER,
};
