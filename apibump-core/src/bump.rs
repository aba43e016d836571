//! Semantic-versioning severity lattice.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a release implied by a set of API changes.
///
/// Variants are declared in ascending order, so the derived `Ord` is the
/// lattice order `None < Patch < Minor < Major` and `max` is the join.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Bump {
    #[default]
    None = 0,
    Patch = 1,
    Minor = 2,
    Major = 3,
}

impl Bump {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bump::None => "none",
            Bump::Patch => "patch",
            Bump::Minor => "minor",
            Bump::Major => "major",
        }
    }

    /// Numeric level of the severity (0 for `none` up to 3 for `major`).
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Whether this severity requires a new major version.
    pub fn is_breaking(&self) -> bool {
        *self == Bump::Major
    }
}

impl fmt::Display for Bump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
