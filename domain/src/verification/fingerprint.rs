//! Cache fingerprints
//!
//! A fingerprint identifies the verification *question*, not the caller: it
//! covers the request kind, content, context and source list, and ignores
//! requester identity and options.

use crate::core::request::{RequestKind, VerificationRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

/// Deterministic cache key (hex-encoded SHA-256)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a request for the given kind
    ///
    /// Sources are sorted and deduplicated so the same set of URIs yields the
    /// same key regardless of order. Context objects serialize with sorted
    /// keys, so key order in the caller's JSON does not matter either.
    pub fn of(kind: RequestKind, request: &VerificationRequest) -> Self {
        let mut sources: Vec<&str> = request.sources().iter().map(String::as_str).collect();
        sources.sort_unstable();
        sources.dedup();

        let canonical = json!({
            "kind": kind.as_str(),
            "content": request.content(),
            "context": request.context().map(canonicalize),
            "sources": sources,
        });

        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rebuild objects with keys inserted in sorted order
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::RequestOptions;
    use serde_json::json;

    fn request() -> VerificationRequest {
        VerificationRequest::new("The Moon orbits the Earth.")
            .unwrap()
            .with_context(json!({"topic": "astronomy", "level": 1}))
            .with_sources(["https://b.example", "https://a.example"])
    }

    #[test]
    fn test_ignores_requester_and_options() {
        let a = request().with_requester("alice");
        let b = request()
            .with_requester("bob")
            .with_options(RequestOptions::default().with_cache().with_strict_mode());
        assert_eq!(
            Fingerprint::of(RequestKind::Information, &a),
            Fingerprint::of(RequestKind::Information, &b)
        );
    }

    #[test]
    fn test_source_order_does_not_matter() {
        let a = request();
        let b = request().with_sources(["https://a.example", "https://b.example"]);
        assert_eq!(
            Fingerprint::of(RequestKind::Information, &a),
            Fingerprint::of(RequestKind::Information, &b)
        );
    }

    #[test]
    fn test_context_key_order_does_not_matter() {
        let a = request().with_context(json!({"topic": "astronomy", "level": 1}));
        let b = request().with_context(json!({"level": 1, "topic": "astronomy"}));
        assert_eq!(
            Fingerprint::of(RequestKind::Information, &a),
            Fingerprint::of(RequestKind::Information, &b)
        );
    }

    #[test]
    fn test_kind_and_content_matter() {
        let r = request();
        assert_ne!(
            Fingerprint::of(RequestKind::Information, &r),
            Fingerprint::of(RequestKind::Hallucination, &r)
        );

        let other = VerificationRequest::new("The Sun orbits the Earth.").unwrap();
        assert_ne!(
            Fingerprint::of(RequestKind::Information, &r),
            Fingerprint::of(RequestKind::Information, &other)
        );
    }

    #[test]
    fn test_hex_length() {
        assert_eq!(Fingerprint::of(RequestKind::Sources, &request()).as_str().len(), 64);
    }
}
