//! Core domain concepts shared across all subdomains.
//!
//! - [`request::VerificationRequest`]: a validated verification question
//! - [`request::RequestKind`]: which verification the caller asked for
//! - [`error::DomainError`]: domain-level validation errors

pub mod error;
pub mod request;
