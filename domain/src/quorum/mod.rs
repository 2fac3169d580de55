//! Quorum voting domain
//!
//! Core concepts for reducing independent check-provider votes into a
//! decision.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Check Providers (run concurrently)                          │
//! │   semantic  pattern  contradiction  factual  ensemble  ext.  │
//! │      │         │           │           │         │       │   │
//! │      └─────────┴───────────┴─────┬─────┴─────────┴───────┘   │
//! │                                  ↓                           │
//! │                        Vec<ProviderVote>                     │
//! │                                  ↓                           │
//! │   HallucinationRule (count / strong sub-vote)                │
//! │   SignalConsensus   (mean vs. threshold)                     │
//! │   spread_consensus  (1 − normalized variance)                │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod consensus;
pub mod rule;
pub mod vote;

// Re-export main types
pub use consensus::{ConsensusOutcome, SignalConsensus, spread_consensus};
pub use rule::{ConfidenceTier, HallucinationRule, RuleBranch, RuleOutcome};
pub use vote::{ProviderVote, Verdict, VoteTally, vote_summary};
