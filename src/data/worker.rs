//! Worker status records and normalization.
//!
//! The backend reports one loosely-shaped record per worker. This module
//! turns each record into a canonical [`WorkerRecord`] in a single pass, so
//! downstream aggregation never has to know which of several field spellings
//! a given backend version uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Health status reported by a worker.
///
/// Statuses the backend sends that are not in this set degrade to `Unknown`
/// rather than failing the snapshot; the raw text is kept on the record's
/// `status_label` for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    Ok,
    Waiting,
    Cooldown,
    Locked,
    Overdue,
    Error,
    Unknown,
}

impl WorkerStatus {
    /// Parse a backend status string, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "ok" => WorkerStatus::Ok,
            "waiting" => WorkerStatus::Waiting,
            "cooldown" => WorkerStatus::Cooldown,
            "locked" => WorkerStatus::Locked,
            "overdue" => WorkerStatus::Overdue,
            "error" => WorkerStatus::Error,
            _ => WorkerStatus::Unknown,
        }
    }

    /// Severity rank. Higher is worse.
    pub fn rank(self) -> u8 {
        match self {
            WorkerStatus::Error => 5,
            WorkerStatus::Overdue => 4,
            WorkerStatus::Locked | WorkerStatus::Cooldown | WorkerStatus::Waiting => 3,
            WorkerStatus::Ok => 2,
            WorkerStatus::Unknown => 1,
        }
    }

    /// Whether this status counts toward the "waiting" bucket of the
    /// overall rollup.
    pub fn is_waiting(self) -> bool {
        matches!(
            self,
            WorkerStatus::Waiting | WorkerStatus::Cooldown | WorkerStatus::Locked
        )
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            WorkerStatus::Ok => "OK",
            WorkerStatus::Waiting => "WAIT",
            WorkerStatus::Cooldown => "COOL",
            WorkerStatus::Locked => "LOCK",
            WorkerStatus::Overdue => "LATE",
            WorkerStatus::Error => "ERR",
            WorkerStatus::Unknown => "?",
        }
    }

    /// Returns the canonical lower-case name.
    pub fn label(&self) -> &'static str {
        match self {
            WorkerStatus::Ok => "ok",
            WorkerStatus::Waiting => "waiting",
            WorkerStatus::Cooldown => "cooldown",
            WorkerStatus::Locked => "locked",
            WorkerStatus::Overdue => "overdue",
            WorkerStatus::Error => "error",
            WorkerStatus::Unknown => "unknown",
        }
    }
}

/// Pick the worst status in the slice, or `None` for an empty slice.
///
/// Ties keep the earliest element, so when a group carries both `locked`
/// and `cooldown` the one whose member comes first in the group's key order
/// wins. That keeps composite output deterministic.
pub fn worst(statuses: &[WorkerStatus]) -> Option<WorkerStatus> {
    let mut result: Option<WorkerStatus> = None;
    for &status in statuses {
        match result {
            Some(current) if status.rank() <= current.rank() => {}
            _ => result = Some(status),
        }
    }
    result
}

/// How a worker gets its runs scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// The scheduler reruns the worker on an expected interval.
    Auto,
    /// Runs are operator-triggered.
    Manual,
}

impl RunMode {
    /// Returns the display label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            RunMode::Auto => "auto",
            RunMode::Manual => "manual",
        }
    }
}

/// A run timestamp as reported by the backend.
///
/// `instant` is set when the backend supplied a sortable representation;
/// `display` always holds something renderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStamp {
    pub instant: Option<DateTime<Utc>>,
    pub display: String,
}

/// Canonical status record for a single worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRecord {
    /// Stable identifier, unique within one report.
    pub key: String,

    pub status: WorkerStatus,

    /// Lower-cased status text as reported. Preserved so a status this
    /// client does not know yet still shows verbatim in per-worker detail,
    /// even though it ranks as `Unknown`.
    pub status_label: String,

    pub last_run: Option<RunStamp>,
    pub next_run: Option<RunStamp>,

    pub mode: RunMode,

    pub message: Option<String>,

    pub overdue_minutes: u64,
}

/// Convert one raw worker entry into a [`WorkerRecord`].
///
/// Returns `None` when the entry is not an object or carries no usable key.
/// Callers skip such entries; a malformed record never aborts the report.
/// Malformed individual fields simply end up absent.
pub fn normalize(raw: &Value) -> Option<WorkerRecord> {
    let obj = raw.as_object()?;

    let key = first_string(obj, &["key", "worker", "id"])?;

    let status_label = first_string(obj, &["status", "state"])
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string());
    let status = WorkerStatus::parse(&status_label);

    let last_run = run_stamp(obj, "last_run");
    let next_run = run_stamp(obj, "next_run");

    // An expected-interval hint means the scheduler reruns this worker on
    // its own; without one, runs are operator-triggered.
    let mode = if obj.contains_key("expected_interval") || obj.contains_key("interval_minutes") {
        RunMode::Auto
    } else {
        RunMode::Manual
    };

    let message = first_string(obj, &["message", "error"]).filter(|m| !m.is_empty());

    let overdue_minutes = obj
        .get("overdue_minutes")
        .and_then(Value::as_f64)
        .map(|m| m.max(0.0) as u64)
        .unwrap_or(0);

    Some(WorkerRecord {
        key,
        status,
        status_label,
        last_run,
        next_run,
        mode,
        message,
        overdue_minutes,
    })
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

/// Read the `<field>_at` / `<field>_ts` / `<field>` triplet for a run field.
///
/// The sortable representation is preferred: RFC 3339 under `<field>_at`,
/// or epoch seconds under `<field>_ts`. The pre-formatted `<field>` label is
/// display-only; when it is missing the instant is formatted instead.
fn run_stamp(obj: &Map<String, Value>, field: &str) -> Option<RunStamp> {
    let instant = obj
        .get(&format!("{field}_at"))
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            obj.get(&format!("{field}_ts"))
                .and_then(Value::as_i64)
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
        });

    let label = obj.get(field).and_then(Value::as_str).map(str::to_string);

    let display = label.or_else(|| instant.map(|ts| ts.format("%Y-%m-%d %H:%M").to_string()))?;
    Some(RunStamp { instant, display })
}
