//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod agent_manager;
pub mod detect_hallucination;
pub mod metrics;
pub mod orchestrator;
pub mod run_checks;
pub(crate) mod shared;
pub mod verify_information;
pub mod verify_sources;
