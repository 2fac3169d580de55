//! Candidate source verification domain
//!
//! Each candidate source is scored on accessibility, domain reputation and
//! content quality, then classified as verified / disputed / unverified, or
//! invalid when it could not be fetched.

pub mod entities;
pub mod quality;
pub mod scoring;

pub use entities::{Accessibility, SourceCheck, SourceReport, SourceStatus, extract_domain};
pub use quality::{ContentSample, assess_content_quality};
pub use scoring::{SourceScoring, UNKNOWN_DOMAIN_REPUTATION};
