//! Batch verification types

use super::result::VerificationResult;
use crate::core::request::VerificationRequest;
use serde::{Deserialize, Serialize};

/// One heterogeneous batch item
///
/// `kind` is kept as raw text so an unknown kind fails only its own item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub kind: String,
    #[serde(flatten)]
    pub request: VerificationRequest,
}

impl BatchItem {
    pub fn new(kind: impl Into<String>, request: VerificationRequest) -> Self {
        Self {
            kind: kind.into(),
            request,
        }
    }
}

/// Batch-level options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchOptions {
    /// Maximum items verified at once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
}

/// A batch of verification requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub items: Vec<BatchItem>,
    #[serde(default)]
    pub options: BatchOptions,
}

impl BatchRequest {
    pub fn new(items: Vec<BatchItem>) -> Self {
        Self {
            items,
            options: BatchOptions::default(),
        }
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.options.max_concurrency = Some(max);
        self
    }

    /// Switch off `disabled` providers on every item
    pub fn without_providers(mut self, known: &[&str], disabled: &[String]) -> Self {
        self.items = self
            .items
            .into_iter()
            .map(|item| BatchItem {
                request: item.request.without_providers(known, disabled),
                ..item
            })
            .collect();
        self
    }
}

/// Outcome of one batch item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome {
    Succeeded { result: Box<VerificationResult> },
    Failed { error: String },
}

/// Result for one batch item, at the same position as its input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub index: usize,
    pub kind: String,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchItemResult {
    pub fn succeeded(index: usize, kind: impl Into<String>, result: VerificationResult) -> Self {
        Self {
            index,
            kind: kind.into(),
            outcome: BatchOutcome::Succeeded {
                result: Box::new(result),
            },
        }
    }

    pub fn failed(index: usize, kind: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            index,
            kind: kind.into(),
            outcome: BatchOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Succeeded { .. })
    }

    pub fn result(&self) -> Option<&VerificationResult> {
        match &self.outcome {
            BatchOutcome::Succeeded { result } => Some(result),
            BatchOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            BatchOutcome::Succeeded { .. } => None,
            BatchOutcome::Failed { error } => Some(error),
        }
    }
}

/// Counts derived from the completed results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Scan completed results
    pub fn from_items(items: &[BatchItemResult]) -> Self {
        let succeeded = items.iter().filter(|i| i.is_success()).count();
        Self {
            total: items.len(),
            succeeded,
            failed: items.len() - succeeded,
        }
    }
}

/// Result of a batch verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_id: String,
    pub items: Vec<BatchItemResult>,
    pub summary: BatchSummary,
    pub processing_ms: u64,
}

impl BatchResult {
    pub fn new(batch_id: impl Into<String>, items: Vec<BatchItemResult>, processing_ms: u64) -> Self {
        let summary = BatchSummary::from_items(&items);
        Self {
            batch_id: batch_id.into(),
            items,
            summary,
            processing_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::RequestKind;
    use serde_json::json;

    #[test]
    fn test_summary_scans_results() {
        let ok = VerificationResult::new("r", RequestKind::Sources, vec![], vec![], 0);
        let items = vec![
            BatchItemResult::succeeded(0, "sources", ok.clone()),
            BatchItemResult::failed(1, "telepathy", "Unknown request kind: telepathy"),
            BatchItemResult::succeeded(2, "sources", ok),
        ];
        let batch = BatchResult::new("b", items, 3);

        assert_eq!(
            batch.summary,
            BatchSummary {
                total: 3,
                succeeded: 2,
                failed: 1
            }
        );
        assert_eq!(batch.items[1].error(), Some("Unknown request kind: telepathy"));
    }

    #[test]
    fn test_deserialize_batch_request() {
        let batch: BatchRequest = serde_json::from_value(json!({
            "items": [
                {"kind": "information", "content": "Paris is in France", "sources": ["https://a.example"]},
                {"kind": "hallucination", "content": "Studies show 97% of experts agree", "options": {"strictMode": true}}
            ],
            "options": {"maxConcurrency": 2}
        }))
        .unwrap();

        assert_eq!(batch.items.len(), 2);
        assert_eq!(batch.items[0].request.sources().len(), 1);
        assert!(batch.items[1].request.options().strict_mode);
        assert_eq!(batch.options.max_concurrency, Some(2));
    }

    #[test]
    fn test_disabled_providers_reach_every_item() {
        let batch: BatchRequest = serde_json::from_value(json!({
            "items": [
                {"kind": "hallucination", "content": "Studies show 97% of experts agree"},
                {"kind": "hallucination", "content": "The moon is made of cheese",
                 "options": {"enabledProviders": ["external", "pattern"]}}
            ]
        }))
        .unwrap();

        let known = ["semantic", "pattern", "external"];
        let batch = batch.without_providers(&known, &["external".to_string()]);

        for item in &batch.items {
            assert!(!item.request.options().is_provider_enabled("external"));
            assert!(item.request.options().is_provider_enabled("pattern"));
        }
        assert!(batch.items[0].request.options().is_provider_enabled("semantic"));
        assert!(!batch.items[1].request.options().is_provider_enabled("semantic"));
    }

    #[test]
    fn test_item_result_serialization() {
        let failed = BatchItemResult::failed(4, "x", "boom");
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["index"], 4);
        assert_eq!(value["error"], "boom");
    }
}
