//! Change catalog, changelog sink, and report structures for API diffs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::bump::Bump;

/// Kind of API change detected.
///
/// Each kind carries exactly one severity and one description; both are
/// exhaustive matches, so a new kind without a severity does not compile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    RemovedDefaultValue,
    ChangedDefaultValue,
    EntityWasIntroduced,
    EntityWasRemoved,
    FunctionWasOverloaded,
    OverloadedFunctionRemoved,
    ParameterAddedToSignature,
    ParameterDefaultsAddedToSignature,
    ParameterRemovedFromSignature,
    TypeChangedToCompatibleType,
    TypeChangedToIncompatibleType,
}

impl Change {
    /// Every change kind, in catalog order.
    pub const ALL: [Change; 11] = [
        Change::RemovedDefaultValue,
        Change::ChangedDefaultValue,
        Change::EntityWasIntroduced,
        Change::EntityWasRemoved,
        Change::FunctionWasOverloaded,
        Change::OverloadedFunctionRemoved,
        Change::ParameterAddedToSignature,
        Change::ParameterDefaultsAddedToSignature,
        Change::ParameterRemovedFromSignature,
        Change::TypeChangedToCompatibleType,
        Change::TypeChangedToIncompatibleType,
    ];

    pub fn severity(&self) -> Bump {
        match self {
            Change::RemovedDefaultValue => Bump::Major,
            Change::ChangedDefaultValue => Bump::Patch,
            Change::EntityWasIntroduced => Bump::Minor,
            Change::EntityWasRemoved => Bump::Major,
            Change::FunctionWasOverloaded => Bump::Minor,
            Change::OverloadedFunctionRemoved => Bump::Major,
            Change::ParameterAddedToSignature => Bump::Major,
            Change::ParameterDefaultsAddedToSignature => Bump::Minor,
            Change::ParameterRemovedFromSignature => Bump::Major,
            Change::TypeChangedToCompatibleType => Bump::Patch,
            Change::TypeChangedToIncompatibleType => Bump::Major,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Change::RemovedDefaultValue => "Default value was removed",
            Change::ChangedDefaultValue => "Default value was changed",
            Change::EntityWasIntroduced => "Entity was introduced",
            Change::EntityWasRemoved => "Entity was removed",
            Change::FunctionWasOverloaded => "Function was overloaded",
            Change::OverloadedFunctionRemoved => "Overloaded function was removed",
            Change::ParameterAddedToSignature => "Parameter(s) added to function signature",
            Change::ParameterDefaultsAddedToSignature => {
                "Parameter(s) with default value(s) added to function signature"
            }
            Change::ParameterRemovedFromSignature => "Parameter(s) removed from function signature",
            Change::TypeChangedToCompatibleType => "Type was changed to a compatible type",
            Change::TypeChangedToIncompatibleType => "Type was changed to an incompatible type",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Change::RemovedDefaultValue => "removed_default_value",
            Change::ChangedDefaultValue => "changed_default_value",
            Change::EntityWasIntroduced => "entity_was_introduced",
            Change::EntityWasRemoved => "entity_was_removed",
            Change::FunctionWasOverloaded => "function_was_overloaded",
            Change::OverloadedFunctionRemoved => "overloaded_function_removed",
            Change::ParameterAddedToSignature => "parameter_added_to_signature",
            Change::ParameterDefaultsAddedToSignature => "parameter_defaults_added_to_signature",
            Change::ParameterRemovedFromSignature => "parameter_removed_from_signature",
            Change::TypeChangedToCompatibleType => "type_changed_to_compatible_type",
            Change::TypeChangedToIncompatibleType => "type_changed_to_incompatible_type",
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A change paired with the dotted path of the entity it was found on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Fully qualified path (empty for the synthetic root)
    pub path: String,

    /// Kind of change
    #[serde(rename = "kind")]
    pub change: Change,

    /// Severity implied by the change
    pub severity: Bump,

    /// Human-readable description
    pub description: String,
}

impl ChangeRecord {
    pub fn new(path: impl Into<String>, change: Change) -> Self {
        Self {
            path: path.into(),
            change,
            severity: change.severity(),
            description: change.description().to_string(),
        }
    }

    pub fn is_breaking(&self) -> bool {
        self.severity.is_breaking()
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.description)
        } else {
            write!(f, "{}: {}", self.path, self.description)
        }
    }
}

/// Receiver for changes as the differ discovers them.
///
/// Writes are append-only and happen in discovery order.
pub trait ChangelogSink {
    fn record(&mut self, path: &str, change: Change);
}

impl ChangelogSink for Vec<ChangeRecord> {
    fn record(&mut self, path: &str, change: Change) {
        self.push(ChangeRecord::new(path, change));
    }
}

/// Summary statistics for a diff.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,

    /// Count per change kind
    pub by_kind: BTreeMap<Change, u32>,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment counters for one change.
    pub fn record(&mut self, change: Change) {
        match change.severity() {
            Bump::Major => self.major += 1,
            Bump::Minor => self.minor += 1,
            Bump::Patch => self.patch += 1,
            Bump::None => {}
        }
        *self.by_kind.entry(change).or_insert(0) += 1;
    }

    pub fn total(&self) -> u32 {
        self.by_kind.values().sum()
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();

        if self.major > 0 {
            parts.push(format!("{} major", self.major));
        }
        if self.minor > 0 {
            parts.push(format!("{} minor", self.minor));
        }
        if self.patch > 0 {
            parts.push(format!("{} patch", self.patch));
        }

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Complete result of comparing two codebases.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiffReport {
    /// Severity of the release required
    pub bump: Bump,

    /// All changes, in discovery order
    pub changes: Vec<ChangeRecord>,

    /// Summary statistics
    pub summary: DiffSummary,

    /// Human-readable summary text
    pub summary_text: String,

    /// Duration of the comparison in milliseconds
    pub duration_ms: f64,
}

impl DiffReport {
    /// Build a report from a finished comparison.
    pub fn new(bump: Bump, changes: Vec<ChangeRecord>, duration_ms: f64) -> Self {
        let mut summary = DiffSummary::new();
        for record in &changes {
            summary.record(record.change);
        }
        let summary_text = summary.text();
        Self {
            bump,
            changes,
            summary,
            summary_text,
            duration_ms,
        }
    }

    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Check if there are breaking changes.
    pub fn has_breaking_changes(&self) -> bool {
        self.changes.iter().any(ChangeRecord::is_breaking)
    }

    /// Breaking changes only.
    pub fn breaking_changes(&self) -> Vec<&ChangeRecord> {
        self.changes.iter().filter(|c| c.is_breaking()).collect()
    }

    /// Filter changes by kind.
    pub fn filter_by_change(&self, change: Change) -> Vec<&ChangeRecord> {
        self.changes.iter().filter(|c| c.change == change).collect()
    }

    /// Filter changes on an entity and its descendants.
    pub fn filter_by_prefix(&self, prefix: &str) -> Vec<&ChangeRecord> {
        self.changes
            .iter()
            .filter(|c| {
                c.path == prefix
                    || (c.path.starts_with(prefix) && c.path[prefix.len()..].starts_with('.'))
            })
            .collect()
    }
}
