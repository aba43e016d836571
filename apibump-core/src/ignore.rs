//! Ignore policies deciding which entities are left out of a comparison.
//!
//! The differ asks the policy once per entity path, before looking at the
//! entity or any of its descendants. Paths are dotted (`pkg.Widget.resize`).
//!
//! # Pattern syntax
//!
//! | Pattern        | Matches                                   |
//! |----------------|-------------------------------------------|
//! | `*`            | any run of characters within one segment  |
//! | `**`           | any run of characters, across segments    |
//! | `?`            | exactly one character other than `.`      |
//! | `re:<regex>`   | a raw regular expression (unanchored)     |
//!
//! Glob patterns must match the whole path.

use regex::Regex;

use crate::error::{Error, Result};

const REGEX_PREFIX: &str = "re:";

/// Decides whether an entity path is excluded from comparison.
pub trait IgnorePolicy {
    fn entity_ignored(&self, path: &str) -> Result<bool>;
}

/// Policy that never ignores anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreNothing;

impl IgnorePolicy for IgnoreNothing {
    fn entity_ignored(&self, _path: &str) -> Result<bool> {
        Ok(false)
    }
}

impl<F> IgnorePolicy for F
where
    F: Fn(&str) -> bool,
{
    fn entity_ignored(&self, path: &str) -> Result<bool> {
        Ok(self(path))
    }
}

/// Compiled set of ignore patterns.
#[derive(Clone, Debug, Default)]
pub struct IgnoreRules {
    patterns: Vec<String>,
    compiled: Vec<Regex>,
}

impl IgnoreRules {
    /// Compile patterns, failing on the first invalid one.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rules = Self::default();
        for pattern in patterns {
            let pattern = pattern.into();
            let source = match pattern.strip_prefix(REGEX_PREFIX) {
                Some(raw) => raw.to_string(),
                None => glob_to_regex(&pattern),
            };
            let regex = Regex::new(&source).map_err(|source| Error::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            rules.patterns.push(pattern);
            rules.compiled.push(regex);
        }
        Ok(rules)
    }

    /// Patterns as written.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.compiled.iter().any(|re| re.is_match(path))
    }
}

impl IgnorePolicy for IgnoreRules {
    fn entity_ignored(&self, path: &str) -> Result<bool> {
        Ok(self.is_match(path))
    }
}

/// Translate a dotted-path glob into an anchored regex.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2 + 6);
    out.push_str("^(?:");

    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(".*");
            }
            '*' => out.push_str("[^.]*"),
            '?' => out.push_str("[^.]"),
            other => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }

    out.push_str(")$");
    out
}
