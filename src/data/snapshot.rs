//! Render-ready snapshot of one fetch cycle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::source::StatusReport;

use super::group::{aggregate, Group, GroupState, TIME_PLACEHOLDER};
use super::overall::{reduce, Overall};
use super::worker::{normalize, WorkerRecord, WorkerStatus};

/// Complete computed dashboard state for one fetch cycle.
///
/// Built fresh from each report and never mutated; a newer snapshot
/// replaces the whole value, superseded ones are discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub overall: Overall,

    /// Composite group states, in configured order.
    pub groups: Vec<GroupState>,

    /// Normalized worker records, sorted by key, for per-worker drill-down.
    pub workers: Vec<WorkerRecord>,

    /// Backend's display label for when the report was assembled.
    pub checked_at: String,

    /// Set when the fetch itself failed. Group detail is cleared alongside
    /// so stale "ok" rows never sit under an error banner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Snapshot {
    /// Compute a snapshot from a successfully fetched report.
    pub fn from_report(report: &StatusReport, groups: &[Group]) -> Self {
        let mut by_key: HashMap<String, WorkerRecord> = HashMap::new();
        for raw in report.flattened_workers() {
            if let Some(record) = normalize(raw) {
                // Duplicate keys are a backend bug; last record wins.
                by_key.insert(record.key.clone(), record);
            }
        }

        let states: Vec<GroupState> = groups.iter().map(|g| aggregate(g, &by_key)).collect();
        let overall = reduce(&states, report.summary.as_ref());

        let mut workers: Vec<WorkerRecord> = by_key.into_values().collect();
        workers.sort_by(|a, b| a.key.cmp(&b.key));

        Snapshot {
            overall,
            groups: states,
            workers,
            checked_at: report
                .checked_at
                .clone()
                .unwrap_or_else(|| TIME_PLACEHOLDER.to_string()),
            error: None,
        }
    }

    /// Snapshot representing a failed fetch.
    pub fn from_fetch_error(message: impl Into<String>) -> Self {
        Snapshot {
            overall: Overall {
                status: WorkerStatus::Error,
                label: "status fetch failed".to_string(),
            },
            groups: Vec::new(),
            workers: Vec::new(),
            checked_at: TIME_PLACEHOLDER.to_string(),
            error: Some(message.into()),
        }
    }

    /// Records for the given group's members, in the group's key order.
    pub fn workers_in_group<'a>(
        &'a self,
        group: &'a Group,
    ) -> impl Iterator<Item = &'a WorkerRecord> {
        group
            .keys
            .iter()
            .filter_map(|key| self.workers.iter().find(|w| &w.key == key))
    }
}
