//! Wire types for worker status reports.
//!
//! These types match the JSON document served by the sync backend's status
//! endpoint. Worker entries themselves stay untyped (`serde_json::Value`)
//! because their shape is backend-controlled; they are only given structure
//! by the normalizer in [`crate::data`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level document returned by the status endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusReport {
    /// Worker status records grouped by backend domain.
    #[serde(default)]
    pub domains: BTreeMap<String, DomainReport>,

    /// Backend-computed summary counts, when the backend supplies them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryCounts>,

    /// The backend's own overall verdict. Display-only; the client computes
    /// its own rollup from the worker records.
    #[serde(default)]
    pub ok: bool,

    /// Display label for when the backend assembled this report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<String>,
}

impl StatusReport {
    /// All raw worker entries across every domain, in domain order.
    pub fn flattened_workers(&self) -> impl Iterator<Item = &serde_json::Value> {
        self.domains.values().flat_map(|d| d.workers.iter())
    }
}

/// One backend domain and the workers it reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainReport {
    #[serde(default)]
    pub title: String,

    /// Raw worker records as sent by the backend.
    #[serde(default)]
    pub workers: Vec<serde_json::Value>,
}

/// Summary counts reported by the backend.
///
/// A count that is absent or non-numeric deserializes to `None`, which makes
/// the reducer fall back to its local recount instead of failing the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryCounts {
    #[serde(default, deserialize_with = "lenient_count")]
    pub error_count: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub waiting_count: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub overdue_count: Option<u64>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_report() {
        let json = r#"{
            "domains": {
                "rt": {
                    "title": "Realtime",
                    "workers": [
                        { "key": "rt_sales_sync", "status": "ok" },
                        { "key": "rt_inventory_refresh", "status": "waiting" }
                    ]
                },
                "batch": {
                    "title": "Batch",
                    "workers": [
                        { "key": "reconciliation", "status": "ok" }
                    ]
                }
            },
            "summary": { "error_count": 0, "waiting_count": 1, "overdue_count": 0 },
            "ok": true,
            "checked_at": "2026-08-05 14:02"
        }"#;

        let report: StatusReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.domains.len(), 2);
        assert!(report.ok);
        assert_eq!(report.checked_at.as_deref(), Some("2026-08-05 14:02"));

        let summary = report.summary.unwrap();
        assert_eq!(summary.error_count, Some(0));
        assert_eq!(summary.waiting_count, Some(1));

        // Flattening walks domains in key order: batch first, then rt.
        let keys: Vec<_> = report
            .flattened_workers()
            .filter_map(|w| w.get("key").and_then(|k| k.as_str()))
            .collect();
        assert_eq!(keys, vec!["reconciliation", "rt_sales_sync", "rt_inventory_refresh"]);
    }

    #[test]
    fn test_deserialize_minimal_report() {
        let report: StatusReport = serde_json::from_str("{}").unwrap();
        assert!(report.domains.is_empty());
        assert!(report.summary.is_none());
        assert!(!report.ok);
        assert!(report.checked_at.is_none());
        assert_eq!(report.flattened_workers().count(), 0);
    }

    #[test]
    fn test_non_numeric_summary_counts_ignored() {
        let json = r#"{
            "summary": { "error_count": "2", "waiting_count": -1, "overdue_count": 3 }
        }"#;

        let report: StatusReport = serde_json::from_str(json).unwrap();
        let summary = report.summary.unwrap();
        assert_eq!(summary.error_count, None);
        assert_eq!(summary.waiting_count, None);
        assert_eq!(summary.overdue_count, Some(3));
    }
}
