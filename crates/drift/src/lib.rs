//! # CodeRef Drift
//!
//! Classifies how stored references changed between two scans.
//!
//! ## Classification
//!
//! ```text
//! baseline element
//!     │
//!     ├─ identity present in current ────────────────> unchanged
//!     ├─ same (type, path, name), new line ──────────> moved
//!     ├─ best same-path name similarity ≥ threshold
//!     │      ├─ unique within epsilon ───────────────> renamed
//!     │      └─ two or more tied ────────────────────> ambiguous
//!     └─ otherwise ──────────────────────────────────> missing
//! ```
//!
//! Ambiguity is a first-class status, not an error: tied candidates are
//! attached for external resolution rather than auto-picking one.

mod config;
mod detector;
mod types;

pub use config::{DriftConfig, DEFAULT_AMBIGUITY_EPSILON, DEFAULT_RENAME_THRESHOLD};
pub use detector::DriftDetector;
pub use types::{DriftResult, DriftStatus};
