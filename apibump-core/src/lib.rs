//! apibump core - API compatibility diffing and semantic version bumps.
//!
//! This crate compares two snapshots of a library's public API and computes
//! the smallest semantic-version bump that honestly describes the difference.
//! Every individual change is classified, given a severity and optionally
//! streamed to a changelog.
//!
//! # Features
//!
//! - **Generic type model**: any [`types::ApiType`] can drive the comparison
//! - **Overload reconciliation**: compatible overload evolution is not breaking
//! - **Ignore rules**: glob patterns over dotted entity paths
//! - **Version arithmetic**: parse tags and compute the next release
//!
//! # Usage
//!
//! ```
//! use apibump_core::ignore::IgnoreRules;
//! use apibump_core::types::{codebase, Entity, NamedType};
//! use apibump_core::{compare_codebases_report, release_bump, Bump, Version};
//!
//! let old = codebase([Entity::field("limit", NamedType::new("int"))]);
//! let new = codebase([
//!     Entity::field("limit", NamedType::new("long").accepting(["int"])),
//!     Entity::field("offset", NamedType::new("int")),
//! ]);
//!
//! let rules = IgnoreRules::new(["internal.**"]).unwrap();
//! let report = compare_codebases_report(&old, &new, &rules).unwrap();
//! assert_eq!(report.bump, Bump::Minor);
//!
//! let previous: Version = "1.2.3".parse().unwrap();
//! let next = previous.bump(release_bump(report.bump, &previous)).unwrap();
//! assert_eq!(next.to_string(), "1.3.0");
//! ```

pub mod bump;
pub mod differ;
pub mod error;
pub mod ignore;
pub mod semver;
pub mod types;

pub use bump::Bump;
pub use differ::{
    compare_codebases, compare_codebases_report, compare_entities, Change, ChangeRecord,
    ChangelogSink, DiffReport, DiffSummary,
};
pub use error::{Error, Result};
pub use ignore::{IgnoreNothing, IgnorePolicy, IgnoreRules};
pub use semver::{release_bump, Version};
pub use types::{ApiType, Codebase, Entity, EntityKind, NamedType, Parameter, Signature};

/// Get the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
