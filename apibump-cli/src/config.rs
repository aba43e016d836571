//! apibump configuration loading from `.apibump.toml`.
//!
//! Configuration is optional; apibump uses sensible defaults when no config
//! file exists. The file is looked up in the working directory unless
//! `--config` points somewhere else.
//!
//! # Example Configuration
//!
//! ```toml
//! [ignore]
//! entities = ["internal.**", "*.test_*"]
//!
//! [versioning]
//! initial_development_major_is_minor = true
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use anyhow::Context;
use apibump_core::IgnoreRules;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, relative to the working directory.
pub const CONFIG_FILE: &str = ".apibump.toml";

/// Root configuration structure loaded from `.apibump.toml`.
///
/// All sections are optional and will use defaults if not specified.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApibumpConfig {
    /// Entities left out of the comparison.
    #[serde(default)]
    pub ignore: IgnoreSection,

    /// How a computed bump turns into the next version.
    #[serde(default)]
    pub versioning: VersioningSection,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Ignore rules over dotted entity paths.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IgnoreSection {
    /// Glob patterns (`*`, `**`, `?`) or raw regexes prefixed with `re:`.
    ///
    /// # Example
    /// ```toml
    /// entities = ["internal.**", "re:\\._[a-z]+$"]
    /// ```
    #[serde(default)]
    pub entities: Vec<String>,
}

/// Versioning policy.
#[derive(Debug, Deserialize, Serialize)]
pub struct VersioningSection {
    /// Lower a major bump to minor while the previous version is `0.x.y`.
    ///
    /// Default: `true`
    #[serde(default = "default_true")]
    pub initial_development_major_is_minor: bool,
}

fn default_true() -> bool {
    true
}

impl Default for VersioningSection {
    fn default() -> Self {
        Self {
            initial_development_major_is_minor: true,
        }
    }
}

/// Output formatting preferences.
///
/// Command-line flags (e.g., `--format json`) override these settings.
///
/// Note: This is distinct from the runtime `OutputConfig` in the output module,
/// which handles actual rendering.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OutputSettings {
    /// Default output format: `table` or `json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Whether to use colored output.
    ///
    /// Defaults to auto-detection when stdout is a TTY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl ApibumpConfig {
    /// Load configuration from `.apibump.toml` in the given directory.
    pub fn load(root: &Path) -> Self {
        Self::load_file(&root.join(CONFIG_FILE))
    }

    /// Load configuration from an explicit file.
    ///
    /// A missing file yields defaults. Read and parse errors are logged as
    /// warnings and also yield defaults.
    pub fn load_file(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Like [`ApibumpConfig::load_file`], but read and parse errors are fatal.
    pub fn load_strict(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::read(path)
    }

    /// Load configuration from a path given with `--config`.
    ///
    /// Unlike the implicit `.apibump.toml`, the file must exist. `strict`
    /// only decides whether read and parse errors are fatal.
    pub fn load_explicit(path: &Path, strict: bool) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }
        if strict {
            Self::read(path)
        } else {
            Ok(Self::load_file(path))
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Compile the configured ignore patterns.
    pub fn ignore_rules(&self) -> apibump_core::Result<IgnoreRules> {
        IgnoreRules::new(self.ignore.entities.iter().cloned())
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured color preference, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }

    pub fn major_is_minor_on_initial_development(&self) -> bool {
        self.versioning.initial_development_major_is_minor
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
