//! Overall health rollup across all groups.

use serde::{Deserialize, Serialize};

use crate::source::SummaryCounts;

use super::group::GroupState;
use super::worker::WorkerStatus;

/// Global status line summarizing every group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overall {
    pub status: WorkerStatus,
    pub label: String,
}

/// Reduce all group states to a single status and label.
///
/// Severity order: any `error` group wins, then `overdue`, then the waiting
/// family (`locked`/`cooldown`/`waiting`), else all clear. For the counted
/// labels, a numeric backend summary count overrides the local recount, so
/// the backend can correct the headline without a client upgrade.
pub fn reduce(groups: &[GroupState], summary: Option<&SummaryCounts>) -> Overall {
    let errors = groups.iter().filter(|g| g.status == WorkerStatus::Error).count();
    let overdue = groups.iter().filter(|g| g.status == WorkerStatus::Overdue).count();
    let waiting = groups.iter().filter(|g| g.status.is_waiting()).count();

    if errors > 0 {
        return Overall {
            status: WorkerStatus::Error,
            label: "sync workers in error".to_string(),
        };
    }

    if overdue > 0 {
        let n = summary.and_then(|s| s.overdue_count).unwrap_or(overdue as u64);
        return Overall {
            status: WorkerStatus::Overdue,
            label: format!("{} overdue", count_groups(n)),
        };
    }

    if waiting > 0 {
        let n = summary.and_then(|s| s.waiting_count).unwrap_or(waiting as u64);
        return Overall {
            status: WorkerStatus::Waiting,
            label: format!("{} waiting", count_groups(n)),
        };
    }

    Overall {
        status: WorkerStatus::Ok,
        label: "all workers clear".to_string(),
    }
}

fn count_groups(n: u64) -> String {
    if n == 1 {
        "1 group".to_string()
    } else {
        format!("{} groups", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::group::TIME_PLACEHOLDER;
    use crate::data::worker::RunMode;

    fn state(id: &str, status: WorkerStatus) -> GroupState {
        GroupState {
            id: id.to_string(),
            label: id.to_string(),
            status,
            last_run: TIME_PLACEHOLDER.to_string(),
            next_run: TIME_PLACEHOLDER.to_string(),
            mode: RunMode::Auto,
            message: None,
            overdue_minutes: 0,
        }
    }

    #[test]
    fn test_error_dominates() {
        let groups = [
            state("a", WorkerStatus::Ok),
            state("b", WorkerStatus::Overdue),
            state("c", WorkerStatus::Error),
        ];
        let overall = reduce(&groups, None);
        assert_eq!(overall.status, WorkerStatus::Error);
        assert_eq!(overall.label, "sync workers in error");
    }

    #[test]
    fn test_overdue_beats_waiting() {
        let groups = [
            state("a", WorkerStatus::Waiting),
            state("b", WorkerStatus::Overdue),
        ];
        let overall = reduce(&groups, None);
        assert_eq!(overall.status, WorkerStatus::Overdue);
        assert_eq!(overall.label, "1 group overdue");
    }

    #[test]
    fn test_locked_and_cooldown_count_as_waiting() {
        let groups = [
            state("a", WorkerStatus::Locked),
            state("b", WorkerStatus::Cooldown),
            state("c", WorkerStatus::Ok),
        ];
        let overall = reduce(&groups, None);
        assert_eq!(overall.status, WorkerStatus::Waiting);
        assert_eq!(overall.label, "2 groups waiting");
    }

    #[test]
    fn test_all_clear() {
        let groups = [state("a", WorkerStatus::Ok), state("b", WorkerStatus::Ok)];
        let overall = reduce(&groups, None);
        assert_eq!(overall.status, WorkerStatus::Ok);
        assert_eq!(overall.label, "all workers clear");
    }

    #[test]
    fn test_unknown_only_still_reduces_to_ok() {
        // Unknown ranks below ok and belongs to no bucket; nothing to flag.
        let groups = [state("a", WorkerStatus::Unknown)];
        assert_eq!(reduce(&groups, None).status, WorkerStatus::Ok);
    }

    #[test]
    fn test_backend_summary_count_overrides_recount() {
        let groups = [state("a", WorkerStatus::Waiting)];
        let summary = SummaryCounts {
            error_count: Some(0),
            waiting_count: Some(3),
            overdue_count: None,
        };
        let overall = reduce(&groups, Some(&summary));
        assert_eq!(overall.label, "3 groups waiting");
    }

    #[test]
    fn test_missing_summary_count_uses_recount() {
        let groups = [
            state("a", WorkerStatus::Overdue),
            state("b", WorkerStatus::Overdue),
        ];
        let summary = SummaryCounts::default();
        let overall = reduce(&groups, Some(&summary));
        assert_eq!(overall.label, "2 groups overdue");
    }

    #[test]
    fn test_empty_group_list_is_all_clear() {
        let overall = reduce(&[], None);
        assert_eq!(overall.status, WorkerStatus::Ok);
    }
}
