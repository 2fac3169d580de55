//! Verification results, batches and cache fingerprints

pub mod batch;
pub mod fingerprint;
pub mod result;

pub use batch::{
    BatchItem, BatchItemResult, BatchOptions, BatchOutcome, BatchRequest, BatchResult,
    BatchSummary,
};
pub use fingerprint::Fingerprint;
pub use result::{VerificationResult, unified_confidence};
