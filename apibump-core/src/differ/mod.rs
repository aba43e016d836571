//! API diff engine for comparing two snapshots of a library's public surface.
//!
//! The engine walks two entity trees in lockstep and classifies every
//! difference into a fixed catalog of [`Change`] kinds. Each kind carries a
//! severity; the maximum over all of them is the [`Bump`](crate::Bump) a
//! release needs.
//!
//! # Features
//!
//! - **Type compatibility**: the new type decides whether it can replace the old one
//! - **Overload reconciliation**: an overload that evolved compatibly is not
//!   reported as one removal plus one addition
//! - **Ignore rules**: whole subtrees can be excluded by dotted path
//! - **Changelog streaming**: every change is forwarded to an optional sink
//!
//! # Example
//!
//! ```
//! use apibump_core::differ::{compare_codebases, ChangeRecord};
//! use apibump_core::ignore::IgnoreNothing;
//! use apibump_core::types::{codebase, Entity, NamedType};
//! use apibump_core::Bump;
//!
//! let old = codebase([Entity::field("count", NamedType::new("int"))]);
//! let new = codebase([
//!     Entity::field("count", NamedType::new("int")),
//!     Entity::unit("Widget"),
//! ]);
//!
//! let mut changelog: Vec<ChangeRecord> = Vec::new();
//! let bump = compare_codebases(&old, &new, &IgnoreNothing, Some(&mut changelog)).unwrap();
//!
//! assert_eq!(bump, Bump::Minor);
//! assert_eq!(changelog[0].to_string(), "Widget: Entity was introduced");
//! ```

pub mod changes;
pub mod comparator;
pub mod tree;

pub use changes::{Change, ChangeRecord, ChangelogSink, DiffReport, DiffSummary};
pub use comparator::{compare_signature_pair, compare_signature_sets, compare_types};
pub use tree::{compare_codebases, compare_codebases_report, compare_entities, EntityDiffer};
