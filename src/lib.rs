// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # sync-doctor
//!
//! A diagnostic TUI and library for monitoring background data-sync
//! workers.
//!
//! This crate watches the sync backend's status endpoint and renders
//! per-worker and per-group health: which job families last completed
//! when, which are waiting on a cooldown or a lock, and which are overdue
//! or failing. The computation pipeline is pure and fully separated from
//! rendering, so the same engine drives the TUI, the `--once` JSON mode,
//! and embedding in other tools.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(pipeline)│    │(render) │    │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │ watch channel                                       │
//! │  ┌────┴────┐                                                │
//! │  │  poll   │◀── fixed-interval timer, cancel-before-replace │
//! │  │(Poller) │                                                │
//! │  └────┬────┘                                                │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── HttpSource | FileSource | ChannelSource     │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, navigation, and pause/refresh intents
//! - **[`source`]**: Status source abstraction ([`StatusSource`] trait)
//!   with HTTP, file, and channel implementations
//! - **[`data`]**: The pure pipeline - normalizes raw worker records,
//!   aggregates them per group, reduces to an overall verdict, and emits
//!   an immutable [`Snapshot`] per fetch
//! - **[`poll`]**: The [`Poller`] lifecycle: idle or polling, one in-flight
//!   request, stale fetches cancelled before replacement
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the backend's status endpoint
//! sync-doctor --url http://localhost:3000/workers/status
//!
//! # Replay a captured report from a file
//! sync-doctor --file status.json
//!
//! # One fetch, computed snapshot as JSON on stdout
//! sync-doctor --url http://localhost:3000/workers/status --once
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::sync::Arc;
//! use sync_doctor::{ChannelSource, Group, Poller};
//!
//! // Reports arrive through a channel (swap in HttpSource in production)
//! let (report_tx, source) = ChannelSource::create("embedded");
//!
//! let poller = Poller::new(Arc::new(source), Group::defaults());
//! let snapshots = poller.subscribe();
//!
//! // Push a report and run one fetch cycle
//! # tokio_test::block_on(async {
//! report_tx.send(Some(Default::default())).unwrap();
//! poller.refresh_once().await;
//! let snapshot = snapshots.borrow().clone().unwrap();
//! assert_eq!(snapshot.groups.len(), Group::defaults().len());
//! # });
//! ```
//!
//! ### Computing a snapshot without any I/O
//!
//! ```
//! use sync_doctor::{Group, Snapshot, StatusReport, WorkerStatus};
//!
//! let report: StatusReport = serde_json::from_str(r#"{
//!     "domains": {
//!         "rt": { "workers": [ { "key": "rt_sales_sync", "status": "ok" } ] }
//!     }
//! }"#).unwrap();
//!
//! let snapshot = Snapshot::from_report(&report, &Group::defaults());
//! let sales = snapshot.groups.iter().find(|g| g.id == "rt").unwrap();
//! assert_eq!(sales.status, WorkerStatus::Ok);
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod poll;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    aggregate, normalize, reduce, worst, Group, GroupState, Overall, RunMode, RunStamp, Snapshot,
    WorkerRecord, WorkerStatus, TIME_PLACEHOLDER,
};
pub use poll::{Poller, DEFAULT_POLL_INTERVAL};
pub use source::{
    ChannelSource, DomainReport, FileSource, HttpSource, SourceError, StatusReport, StatusSource,
    SummaryCounts,
};
