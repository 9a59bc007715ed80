//! Data models and processing for worker status reports.
//!
//! This module is the pure half of the crate: it turns a raw
//! [`StatusReport`](crate::source::StatusReport) into a render-ready
//! [`Snapshot`] with no I/O involved, so every rule in between is unit
//! testable.
//!
//! ## Submodules
//!
//! - [`worker`]: the normalizer ([`WorkerRecord`], [`WorkerStatus`]) and the
//!   severity ranking ([`worst`])
//! - [`group`]: group configuration ([`Group`]) and composite aggregation
//!   ([`GroupState`])
//! - [`overall`]: the global rollup ([`Overall`])
//! - [`snapshot`]: the per-fetch output value ([`Snapshot`])
//!
//! ## Data flow
//!
//! ```text
//! StatusReport (raw JSON)
//!        │
//!        ▼
//! worker::normalize()          one WorkerRecord per key
//!        │
//!        ▼
//! group::aggregate()           one GroupState per configured Group
//!        │
//!        ▼
//! overall::reduce()            one Overall status + label
//!        │
//!        ▼
//! Snapshot                     handed to the presentation layer
//! ```

pub mod group;
pub mod overall;
pub mod snapshot;
pub mod worker;

pub use group::{aggregate, Group, GroupState, TIME_PLACEHOLDER};
pub use overall::{reduce, Overall};
pub use snapshot::Snapshot;
pub use worker::{normalize, worst, RunMode, RunStamp, WorkerRecord, WorkerStatus};
