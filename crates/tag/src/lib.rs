//! # CodeRef Tag
//!
//! Canonical reference-tag text format for identifying code elements.
//!
//! ## Format
//!
//! ```text
//! @Type/path#element:line{metadata}
//!     │    │        │    │
//!     │    │        │    └─ key=value pairs or a JSON object (optional)
//!     │    │        └─ 1-based line number (optional)
//!     │    └─ element name (optional)
//!     └─ forward-slash path, no file extension
//! ```
//!
//! ## Example
//!
//! ```
//! use coderef_tag::{generate, parse};
//!
//! let reference = parse("@Fn/auth/login#authenticate:24").unwrap();
//! assert_eq!(reference.path, "auth/login");
//! assert_eq!(generate(&reference), "@Fn/auth/login#authenticate:24");
//! ```

mod codec;
mod error;
mod kind;
mod meta;
mod reference;

pub use codec::{extract_all, generate, is_valid, parse, ExtractedTags};
pub use error::{Result, TagError};
pub use kind::ElementKind;
pub use meta::MetaValue;
pub use reference::Reference;
