//! Compare command - API diff between two snapshots
//!
//! Loads two JSON snapshots of a library's public API, classifies every
//! change, and reports the semantic-version bump the new snapshot needs.

use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

use apibump_core::{
    compare_codebases_report, release_bump, Bump, ChangeRecord, Codebase, DiffSummary, NamedType,
    Version,
};

use crate::config::ApibumpConfig;
use crate::output::{Output, OutputConfig, OutputFormat, TableDisplay};

/// Where the previous release version comes from.
#[derive(Debug, Clone, Copy)]
pub enum PreviousVersion<'a> {
    /// An exact `MAJOR.MINOR.PATCH[-label]` string
    Exact(&'a str),
    /// A tag with a version somewhere inside it
    Tag(&'a str),
}

/// Where the changelog goes.
#[derive(Debug, Clone, Copy)]
pub enum ChangelogTarget<'a> {
    File(&'a Path),
    Stdout,
}

/// Compare result
#[derive(Debug, Serialize)]
pub struct CompareResult {
    pub old: String,
    pub new: String,
    /// Severity implied by the changes
    pub bump: Bump,
    /// Severity actually applied to the previous version
    pub release_bump: Bump,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version: Option<String>,
    pub changes: Vec<ChangeRecord>,
    pub summary: DiffSummary,
    pub summary_text: String,
    pub duration_ms: f64,
}

impl TableDisplay for CompareResult {
    fn to_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} -> {}\n",
            "COMPARE:".cyan().bold(),
            self.old.yellow(),
            self.new.green()
        ));
        output.push_str(&format!(
            "Found {} changes ({}) in {:.1}ms\n\n",
            self.changes.len().to_string().cyan(),
            self.summary_text,
            self.duration_ms
        ));

        if self.changes.is_empty() {
            output.push_str(&format!("{}\n\n", "No API changes detected.".dimmed()));
        } else {
            output.push_str(&format!(
                "{:<8} {:<40} {}\n",
                "SEVERITY".bold(),
                "ENTITY".bold(),
                "CHANGE".bold()
            ));
            output.push_str(&format!("{}\n", "-".repeat(80)));
            for change in &self.changes {
                let path = if change.path.is_empty() {
                    "(root)"
                } else {
                    change.path.as_str()
                };
                output.push_str(&format!(
                    "{:<8} {:<40} {}\n",
                    colorize_bump(change.severity),
                    path,
                    change.description
                ));
            }
            output.push('\n');
        }

        output.push_str(&format!("{} {}", "BUMP:".bold(), colorize_bump(self.bump)));
        if self.release_bump != self.bump {
            output.push_str(&format!(
                " {}",
                format!("(released as {})", self.release_bump).dimmed()
            ));
        }
        if let (Some(previous), Some(next)) = (&self.previous_version, &self.next_version) {
            output.push_str(&format!(
                "\n{} {} -> {}",
                "VERSION:".bold(),
                previous.yellow(),
                next.green().bold()
            ));
        }

        output
    }
}

fn colorize_bump(bump: Bump) -> colored::ColoredString {
    let text = format!("{:<8}", bump.as_str());
    match bump {
        Bump::Major => text.red().bold(),
        Bump::Minor => text.yellow(),
        Bump::Patch => text.green(),
        Bump::None => text.dimmed(),
    }
}

/// Load a snapshot file as a top-level entity mapping.
pub fn load_snapshot(path: &Path) -> anyhow::Result<Codebase<NamedType>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

fn resolve_previous(previous: PreviousVersion<'_>) -> anyhow::Result<Version> {
    match previous {
        PreviousVersion::Exact(text) => text
            .parse()
            .with_context(|| format!("Invalid --from-version '{}'", text)),
        PreviousVersion::Tag(tag) => Version::guess_from_str(tag)
            .with_context(|| format!("No version found in tag '{}'", tag)),
    }
}

/// Changelog lines on stdout would corrupt a JSON document on the same stream.
fn check_changelog_target(
    changelog: Option<ChangelogTarget<'_>>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if matches!(changelog, Some(ChangelogTarget::Stdout)) && format == OutputFormat::Json {
        anyhow::bail!(
            "--changelog-stdout cannot be combined with JSON output; the JSON result already lists every change"
        );
    }
    Ok(())
}

/// Write one `path: description` line per change.
fn write_changelog(changes: &[ChangeRecord], target: ChangelogTarget<'_>) -> anyhow::Result<()> {
    let mut text = String::new();
    for change in changes {
        text.push_str(&change.to_string());
        text.push('\n');
    }

    match target {
        ChangelogTarget::File(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write changelog {}", path.display())),
        ChangelogTarget::Stdout => {
            print!("{}", text);
            Ok(())
        }
    }
}

/// Run the compare command
pub fn run(
    old_path: &Path,
    new_path: &Path,
    previous: Option<PreviousVersion<'_>>,
    changelog: Option<ChangelogTarget<'_>>,
    config: &ApibumpConfig,
    output: OutputConfig,
) -> anyhow::Result<()> {
    check_changelog_target(changelog, output.format)?;

    let old = load_snapshot(old_path)?;
    let new = load_snapshot(new_path)?;
    let rules = config
        .ignore_rules()
        .context("Invalid ignore pattern in configuration")?;
    tracing::debug!("Ignore patterns: {:?}", rules.patterns());

    let report = compare_codebases_report(&old, &new, &rules).with_context(|| {
        format!(
            "Failed to compare {} with {}",
            old_path.display(),
            new_path.display()
        )
    })?;

    let previous = previous.map(resolve_previous).transpose()?;
    let applied = match &previous {
        Some(version) if config.major_is_minor_on_initial_development() => {
            release_bump(report.bump, version)
        }
        _ => report.bump,
    };
    let next = previous
        .as_ref()
        .map(|version| version.bump(applied))
        .transpose()
        .context("Cannot compute the next version")?;

    if let Some(target) = changelog {
        write_changelog(&report.changes, target)?;
    }

    let result = CompareResult {
        old: old_path.display().to_string(),
        new: new_path.display().to_string(),
        bump: report.bump,
        release_bump: applied,
        previous_version: previous.map(|v| v.to_string()),
        next_version: next.map(|v| v.to_string()),
        changes: report.changes,
        summary: report.summary,
        summary_text: report.summary_text,
        duration_ms: report.duration_ms,
    };

    Output::with_config(result, output).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_previous() {
        let exact = resolve_previous(PreviousVersion::Exact("1.2.3")).unwrap();
        assert_eq!(exact, Version::new(1, 2, 3));

        let tagged = resolve_previous(PreviousVersion::Tag("v0.4.0")).unwrap();
        assert_eq!(tagged, Version::new(0, 4, 0));

        assert!(resolve_previous(PreviousVersion::Exact("v1")).is_err());
    }

    #[test]
    fn test_changelog_stdout_rejected_with_json() {
        assert!(check_changelog_target(Some(ChangelogTarget::Stdout), OutputFormat::Json).is_err());
        assert!(check_changelog_target(Some(ChangelogTarget::Stdout), OutputFormat::Table).is_ok());

        let path = Path::new("CHANGES.txt");
        assert!(check_changelog_target(Some(ChangelogTarget::File(path)), OutputFormat::Json).is_ok());
        assert!(check_changelog_target(None, OutputFormat::Json).is_ok());
    }

    #[test]
    fn test_write_changelog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CHANGES.txt");
        let changes = vec![
            ChangeRecord::new("Widget", apibump_core::Change::EntityWasIntroduced),
            ChangeRecord::new("Widget.count", apibump_core::Change::TypeChangedToCompatibleType),
        ];

        write_changelog(&changes, ChangelogTarget::File(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Widget: Entity was introduced\nWidget.count: Type was changed to a compatible type\n"
        );
    }

    #[test]
    fn test_load_snapshot_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }

    #[test]
    fn test_table_mentions_versions() {
        colored::control::set_override(false);
        let result = CompareResult {
            old: "old.json".to_string(),
            new: "new.json".to_string(),
            bump: Bump::Major,
            release_bump: Bump::Minor,
            previous_version: Some("0.3.1".to_string()),
            next_version: Some("0.4.0".to_string()),
            changes: vec![ChangeRecord::new("Widget", apibump_core::Change::EntityWasRemoved)],
            summary: DiffSummary::new(),
            summary_text: "1 major".to_string(),
            duration_ms: 0.5,
        };

        let table = TableDisplay::to_table(&result);
        assert!(table.contains("Widget"));
        assert!(table.contains("Entity was removed"));
        assert!(table.contains("released as minor"));
        assert!(table.contains("0.3.1 -> 0.4.0"));
    }
}
