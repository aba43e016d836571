//! Semantic version arithmetic for release tagging.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bump::Bump;
use crate::error::{Error, Result};

const VERSION_BODY: &str = r"(\d+)\.(\d+)\.(\d+)(?:-([0-9A-Za-z.-]+))?";

static EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{VERSION_BODY}$")).expect("version regex is valid"));
static EMBEDDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(VERSION_BODY).expect("version regex is valid"));

/// A `MAJOR.MINOR.PATCH[-label]` version.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Find the first version embedded in a tag like `v1.4.2` or `release-2.0.0-rc1`.
    pub fn guess_from_str(tag: &str) -> Result<Self> {
        EMBEDDED
            .captures(tag)
            .ok_or_else(|| Error::InvalidVersion(tag.to_string()))
            .and_then(|caps| from_captures(tag, &caps))
    }

    /// Next version after a release of the given severity. The label is dropped.
    ///
    /// Fails when the component being incremented is already `u64::MAX`.
    pub fn bump(&self, bump: Bump) -> Result<Self> {
        let next = |n: u64| {
            n.checked_add(1).ok_or_else(|| {
                Error::InvalidVersion(format!("{} has no next {} version", self, bump))
            })
        };
        Ok(match bump {
            Bump::Major => Self::new(next(self.major)?, 0, 0),
            Bump::Minor => Self::new(self.major, next(self.minor)?, 0),
            Bump::Patch => Self::new(self.major, self.minor, next(self.patch)?),
            Bump::None => self.drop_label(),
        })
    }

    pub fn drop_label(&self) -> Self {
        Self::new(self.major, self.minor, self.patch)
    }

    /// Whether this is a `0.x.y` release with no stable API yet.
    pub fn is_initial_development(&self) -> bool {
        self.major == 0
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EXACT
            .captures(s.trim())
            .ok_or_else(|| Error::InvalidVersion(s.to_string()))
            .and_then(|caps| from_captures(s, &caps))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(label) = &self.label {
            write!(f, "-{}", label)?;
        }
        Ok(())
    }
}

fn from_captures(input: &str, caps: &regex::Captures<'_>) -> Result<Version> {
    let number = |i: usize| -> Result<u64> {
        caps[i]
            .parse()
            .map_err(|_| Error::InvalidVersion(input.to_string()))
    };
    Ok(Version {
        major: number(1)?,
        minor: number(2)?,
        patch: number(3)?,
        label: caps.get(4).map(|m| m.as_str().to_string()),
    })
}

/// Adjust a computed bump for the version it is applied to.
///
/// A `0.x.y` line has no stable API, so a breaking change only moves the
/// minor number.
pub fn release_bump(bump: Bump, previous: &Version) -> Bump {
    if bump == Bump::Major && previous.is_initial_development() {
        warn!(
            version = %previous,
            "breaking changes on an initial development version, bumping minor instead of major"
        );
        return Bump::Minor;
    }
    bump
}
