//! Recursive entity-tree comparison.

use std::collections::BTreeSet;
use std::time::Instant;

use tracing::{debug, trace};

use crate::bump::Bump;
use crate::differ::changes::{Change, ChangeRecord, ChangelogSink, DiffReport};
use crate::differ::comparator::{compare_signature_sets, compare_types};
use crate::error::{Error, Result};
use crate::ignore::IgnorePolicy;
use crate::types::{ApiType, Codebase, Entity};

/// Join a parent path and a child name with `.`; empty parts add no segment.
pub fn join_path(path: &str, name: &str) -> String {
    match (path.is_empty(), name.is_empty()) {
        (_, true) => path.to_string(),
        (true, false) => name.to_string(),
        (false, false) => format!("{}.{}", path, name),
    }
}

/// Walks two entity trees, folding every change into one severity.
///
/// The floor is `patch`: a comparison that finds nothing still reports
/// `Bump::Patch`, never `Bump::None`.
pub struct EntityDiffer<'a> {
    policy: &'a dyn IgnorePolicy,
    sink: Option<&'a mut dyn ChangelogSink>,
}

impl<'a> EntityDiffer<'a> {
    pub fn new(policy: &'a dyn IgnorePolicy, sink: Option<&'a mut dyn ChangelogSink>) -> Self {
        Self { policy, sink }
    }

    fn emit(&mut self, path: &str, change: Change, running_max: &mut Bump) {
        *running_max = (*running_max).max(change.severity());
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.record(path, change);
        }
    }

    /// Compare two entities found at `path` (the parent's path).
    pub fn compare_entities<T: ApiType>(
        &mut self,
        old: &Entity<T>,
        new: &Entity<T>,
        path: &str,
    ) -> Result<Bump> {
        let child_path = join_path(path, &new.name);

        if !new.name.is_empty() && self.ignored(&child_path)? {
            debug!(path = %child_path, "ignoring entity");
            return Ok(Bump::Patch);
        }

        if !old.same_shape(new) {
            return Err(Error::ShapeMismatch {
                path: child_path,
                old_kind: old.kind_name(),
                new_kind: new.kind_name(),
            });
        }

        trace!(path = %child_path, kind = new.kind_name(), "comparing entity");
        let mut running_max = Bump::Patch;

        if let (Some(old_ty), Some(new_ty)) = (old.ty(), new.ty()) {
            if let Some(change) = compare_types(old_ty, new_ty) {
                self.emit(&child_path, change, &mut running_max);
            }
        }

        if let (Some(old_sigs), Some(new_sigs)) = (old.signatures(), new.signatures()) {
            for change in compare_signature_sets(old_sigs, new_sigs) {
                self.emit(&child_path, change, &mut running_max);
            }
        }

        for ((_, old_children), (_, new_children)) in old.children().into_iter().zip(new.children()) {
            let bump = self.compare_collection(old_children, new_children, &child_path)?;
            running_max = running_max.max(bump);
        }

        Ok(running_max)
    }

    /// Compare one named child collection of two entities at `path`.
    pub fn compare_collection<T: ApiType>(
        &mut self,
        old: &Codebase<T>,
        new: &Codebase<T>,
        path: &str,
    ) -> Result<Bump> {
        let mut running_max = Bump::Patch;
        let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

        for name in names {
            match (old.get(name), new.get(name)) {
                (None, Some(_)) => {
                    self.emit(&join_path(path, name), Change::EntityWasIntroduced, &mut running_max)
                }
                (Some(_), None) => {
                    self.emit(&join_path(path, name), Change::EntityWasRemoved, &mut running_max)
                }
                (Some(old_child), Some(new_child)) => {
                    let bump = self.compare_entities(old_child, new_child, path)?;
                    running_max = running_max.max(bump);
                }
                (None, None) => {}
            }
        }

        Ok(running_max)
    }

    fn ignored(&self, path: &str) -> Result<bool> {
        self.policy
            .entity_ignored(path)
            .map_err(|err| match err {
                Error::IgnorePolicy { .. } => err,
                other => Error::IgnorePolicy {
                    path: path.to_string(),
                    message: other.to_string(),
                },
            })
    }
}

/// Compare two entity trees rooted at `path`.
pub fn compare_entities<'a, T: ApiType>(
    old: &Entity<T>,
    new: &Entity<T>,
    path: &str,
    policy: &'a dyn IgnorePolicy,
    sink: Option<&'a mut dyn ChangelogSink>,
) -> Result<Bump> {
    EntityDiffer::new(policy, sink).compare_entities(old, new, path)
}

/// Compare two top-level mappings.
///
/// Equivalent to comparing two anonymous root units whose only child
/// collection is the given mapping: the root is never ignored, has no type
/// or signatures, and contributes no path segment.
pub fn compare_codebases<'a, T: ApiType>(
    old: &Codebase<T>,
    new: &Codebase<T>,
    policy: &'a dyn IgnorePolicy,
    sink: Option<&'a mut dyn ChangelogSink>,
) -> Result<Bump> {
    let bump = EntityDiffer::new(policy, sink).compare_collection(old, new, "")?;
    Ok(Bump::Patch.max(bump))
}

/// Compare two top-level mappings and collect every change into a report.
pub fn compare_codebases_report<T: ApiType>(
    old: &Codebase<T>,
    new: &Codebase<T>,
    policy: &dyn IgnorePolicy,
) -> Result<DiffReport> {
    let start = Instant::now();
    let mut records: Vec<ChangeRecord> = Vec::new();
    let bump = compare_codebases(old, new, policy, Some(&mut records))?;
    debug!(%bump, changes = records.len(), "codebase comparison finished");
    Ok(DiffReport::new(
        bump,
        records,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}
