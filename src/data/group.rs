//! Group configuration and composite state aggregation.
//!
//! Groups are the schema the dashboard iterates over: a fixed list of
//! logical job families, each drawing from one or more worker keys. The
//! backend only reports per-worker records; everything group-shaped is
//! computed here, once per fetch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::worker::{worst, RunMode, RunStamp, WorkerRecord, WorkerStatus};

/// Placeholder shown when no run time is known.
pub const TIME_PLACEHOLDER: &str = "—";

/// A configured family of workers presented as one composite health entry.
///
/// Defined once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub label: String,

    /// Member worker keys, in presentation order. This order also breaks
    /// ties whenever members disagree: first match wins.
    pub keys: Vec<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_mode")]
    pub default_mode: RunMode,
}

fn default_mode() -> RunMode {
    RunMode::Auto
}

impl Group {
    /// Built-in group schema for the stock sync backend.
    pub fn defaults() -> Vec<Group> {
        vec![
            Group {
                id: "inventory".to_string(),
                label: "Inventory refresh".to_string(),
                keys: vec!["inventory_refresh".to_string()],
                description: "Pulls current stock levels from the ERP".to_string(),
                default_mode: RunMode::Auto,
            },
            Group {
                id: "rt".to_string(),
                label: "Sales sync".to_string(),
                keys: vec!["rt_sales_sync".to_string()],
                description: "Pushes point-of-sale transactions upstream".to_string(),
                default_mode: RunMode::Auto,
            },
            Group {
                id: "orders".to_string(),
                label: "Orders & payments".to_string(),
                keys: vec!["order_ingest".to_string(), "payment_ingest".to_string()],
                description: "Ingests web orders and their payment records".to_string(),
                default_mode: RunMode::Auto,
            },
            Group {
                id: "recon".to_string(),
                label: "Reconciliation".to_string(),
                keys: vec!["reconciliation".to_string()],
                description: "Cross-checks ledgers after the nightly close".to_string(),
                default_mode: RunMode::Manual,
            },
        ]
    }
}

/// Composite view of one group for a single report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupState {
    pub id: String,
    pub label: String,
    pub status: WorkerStatus,
    pub last_run: String,
    pub next_run: String,
    pub mode: RunMode,
    pub message: Option<String>,
    pub overdue_minutes: u64,
}

/// Combine a group's member records into one composite state.
///
/// Keys with no record in the report are simply absent from the member
/// list. A group with zero resolvable members resolves to `Error`: to an
/// operator, "no data" and "failing" call for the same reaction.
pub fn aggregate(group: &Group, workers: &HashMap<String, WorkerRecord>) -> GroupState {
    let members: Vec<&WorkerRecord> =
        group.keys.iter().filter_map(|k| workers.get(k)).collect();

    let statuses: Vec<WorkerStatus> = members.iter().map(|m| m.status).collect();
    let status = worst(&statuses).unwrap_or(WorkerStatus::Error);

    let last_run = select_stamp(&members, |m| m.last_run.as_ref(), Pick::Latest);
    let next_run = select_stamp(&members, |m| m.next_run.as_ref(), Pick::Soonest);

    let mode = members.first().map(|m| m.mode).unwrap_or(group.default_mode);
    let message = members.iter().find_map(|m| m.message.clone());
    let overdue_minutes = members.iter().map(|m| m.overdue_minutes).max().unwrap_or(0);

    GroupState {
        id: group.id.clone(),
        label: group.label.clone(),
        status,
        last_run,
        next_run,
        mode,
        message,
        overdue_minutes,
    }
}

enum Pick {
    /// Largest instant wins: most recent completion.
    Latest,
    /// Smallest instant wins: soonest upcoming run.
    Soonest,
}

/// Choose the display label for a run column.
///
/// Stamps carrying a sortable instant always beat label-only stamps; among
/// instants, `pick` decides; among label-only stamps, the first in key
/// order wins. These tie-breaks are the only defined behavior when members
/// disagree, so they must not drift.
fn select_stamp<'a, F>(members: &[&'a WorkerRecord], field: F, pick: Pick) -> String
where
    F: Fn(&'a WorkerRecord) -> Option<&'a RunStamp>,
{
    let mut best: Option<&RunStamp> = None;

    for stamp in members.iter().filter_map(|m| field(m)) {
        if let Some(instant) = stamp.instant {
            match best.and_then(|b| b.instant) {
                Some(current) => {
                    let replace = match pick {
                        Pick::Latest => instant > current,
                        Pick::Soonest => instant < current,
                    };
                    if replace {
                        best = Some(stamp);
                    }
                }
                // An instant-bearing stamp displaces any label-only one.
                None => best = Some(stamp),
            }
        } else if best.is_none() {
            best = Some(stamp);
        }
    }

    best.map(|s| s.display.clone()).unwrap_or_else(|| TIME_PLACEHOLDER.to_string())
}
