//! # CodeRef Index
//!
//! Normalized element index over one scan of a codebase.
//!
//! ## Pipeline
//!
//! ```text
//! Scanner output (external)
//!     │
//!     ├──> ScanRecord ingestion (path normalization)
//!     │      └─> ElementRecord list, stable scan order
//!     │
//!     └──> ElementIndex::build
//!            ├─ by kind / path / name / metadata lookup maps
//!            ├─ identity map (collision lists)
//!            └─ duplicate-identity warnings
//! ```
//!
//! An index is an immutable snapshot: a new scan produces a new index, never
//! an in-place update, so concurrent readers need no locking.

mod error;
mod index;
mod record;
mod snapshot;
mod stats;

pub use error::{IndexError, Result};
pub use index::{ElementFilter, ElementIndex, IndexBuild, IndexWarning};
pub use record::{normalize_path, ElementRecord, ScanRecord};
pub use snapshot::{Snapshot, SnapshotMeta, SNAPSHOT_VERSION};
pub use stats::IndexStats;
