//! Leaf comparisons: type descriptors, signatures, and overload sets.

use std::collections::HashSet;

use tracing::debug;

use crate::bump::Bump;
use crate::differ::changes::Change;
use crate::types::{ApiType, Signature};

/// Compare two type descriptors.
///
/// The new type decides compatibility: `new.is_compatible(old)`.
pub fn compare_types<T: ApiType>(old: &T, new: &T) -> Option<Change> {
    if old == new {
        None
    } else if new.is_compatible(old) {
        Some(Change::TypeChangedToCompatibleType)
    } else {
        Some(Change::TypeChangedToIncompatibleType)
    }
}

/// Compare one overload against another, parameter by position.
pub fn compare_signature_pair<T: ApiType>(old: &Signature<T>, new: &Signature<T>) -> Vec<Change> {
    let mut changes: Vec<Change> = old
        .parameters
        .iter()
        .zip(&new.parameters)
        .filter_map(|(o, n)| compare_types(&o.ty, &n.ty))
        .collect();

    if new.len() > old.len() {
        let tail = &new.parameters[old.len()..];
        if tail.iter().all(|p| p.has_default()) {
            changes.push(Change::ParameterDefaultsAddedToSignature);
        } else {
            changes.push(Change::ParameterAddedToSignature);
        }
    } else if new.len() < old.len() {
        changes.push(Change::ParameterRemovedFromSignature);
    }

    changes
}

/// Compare the overload sets of a callable.
///
/// A single signature on each side is compared directly. Otherwise the
/// count difference is reported once, then signatures missing from the other
/// side are paired greedily: any removed/added pair whose pairwise diff is at
/// most `patch` is treated as one overload evolving and reported as nothing.
/// A signature may reconcile with several partners.
pub fn compare_signature_sets<T: ApiType>(old: &[Signature<T>], new: &[Signature<T>]) -> Vec<Change> {
    if old.len() == 1 && new.len() == 1 {
        return compare_signature_pair(&old[0], &new[0]);
    }

    let mut changes = Vec::new();

    if old.len() < new.len() {
        changes.push(Change::FunctionWasOverloaded);
    } else if old.len() > new.len() {
        changes.push(Change::OverloadedFunctionRemoved);
    }

    let old_set: HashSet<&Signature<T>> = old.iter().collect();
    let new_set: HashSet<&Signature<T>> = new.iter().collect();

    let removed = missing_from(old, &new_set);
    let added = missing_from(new, &old_set);

    let mut removed_reconciled = vec![false; removed.len()];
    let mut added_reconciled = vec![false; added.len()];

    for (i, r) in removed.iter().enumerate() {
        for (j, a) in added.iter().enumerate() {
            let trial = compare_signature_pair(r, a);
            if trial.iter().all(|c| c.severity() <= Bump::Patch) {
                if !trial.is_empty() {
                    debug!(
                        removed = i,
                        added = j,
                        discarded = ?trial,
                        "reconciled overload pair"
                    );
                }
                removed_reconciled[i] = true;
                added_reconciled[j] = true;
            }
        }
    }

    changes.extend(
        added_reconciled
            .iter()
            .filter(|reconciled| !**reconciled)
            .map(|_| Change::FunctionWasOverloaded),
    );
    changes.extend(
        removed_reconciled
            .iter()
            .filter(|reconciled| !**reconciled)
            .map(|_| Change::OverloadedFunctionRemoved),
    );

    changes
}

/// Signatures of `side` absent from `other`, first occurrence order, deduplicated.
fn missing_from<'a, T: ApiType>(
    side: &'a [Signature<T>],
    other: &HashSet<&'a Signature<T>>,
) -> Vec<&'a Signature<T>> {
    let mut seen = HashSet::new();
    side.iter()
        .filter(|s| !other.contains(s) && seen.insert(*s))
        .collect()
}
