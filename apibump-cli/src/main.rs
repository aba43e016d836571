//! apibump CLI - API compatibility differ and semantic version bump calculator
//!
//! Compares two JSON snapshots of a library's public API and tells you which
//! semantic-version bump the new release needs.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::compare::{ChangelogTarget, PreviousVersion};
use config::{ApibumpConfig, CONFIG_FILE};
use output::{OutputConfig, OutputFormat};

/// Compute the semantic-version bump between two API snapshots.
#[derive(Parser)]
#[command(name = "apibump")]
#[command(author, version)]
#[command(about = "API compatibility differ and semantic version bump calculator")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  apibump compare old.json new.json                       Print the required bump
  apibump compare old.json new.json --from-tag v1.4.2     Also print the next version
  apibump compare old.json new.json --changelog CHANGES   Write one line per change
  apibump config                                          Show effective configuration")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Configuration file (defaults to ./.apibump.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show detailed version information
    #[arg(long = "version-verbose")]
    version_verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two API snapshots and compute the release bump
    #[command(visible_alias = "c")]
    Compare {
        /// Snapshot of the previous release (JSON)
        old: PathBuf,

        /// Snapshot of the candidate release (JSON)
        new: PathBuf,

        /// Version of the previous release, e.g. 1.4.2
        #[arg(long, conflicts_with = "from_tag")]
        from_version: Option<String>,

        /// Tag of the previous release, e.g. v1.4.2 or release-1.4.2
        #[arg(long)]
        from_tag: Option<String>,

        /// Write the changelog to this file
        #[arg(long, conflicts_with = "changelog_stdout")]
        changelog: Option<PathBuf>,

        /// Print the changelog to stdout
        #[arg(long)]
        changelog_stdout: bool,

        /// Fail on .apibump.toml errors instead of using defaults
        #[arg(long)]
        strict: bool,
    },

    /// Print the effective configuration
    Config,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print verbose version information
fn print_verbose_version() {
    use colored::Colorize;

    let cli_version = env!("CARGO_PKG_VERSION");
    let platform = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    println!("apibump {}", cli_version);
    println!("  {:<14} {}", "apibump-cli:".cyan(), cli_version);
    println!("  {:<14} {}", "apibump-core:".cyan(), apibump_core::version());
    println!("  {:<14} {}", "Platform:".cyan(), platform);
}

fn load_config(path: Option<&Path>, strict: bool) -> anyhow::Result<ApibumpConfig> {
    match (path, strict) {
        (Some(path), strict) => ApibumpConfig::load_explicit(path, strict),
        (None, true) => ApibumpConfig::load_strict(Path::new(CONFIG_FILE)),
        (None, false) => Ok(ApibumpConfig::load(Path::new("."))),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version_verbose {
        print_verbose_version();
        return Ok(());
    }

    setup_logging(cli.verbose, cli.quiet);

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    let strict = matches!(command, Commands::Compare { strict: true, .. });
    let config = load_config(cli.config.as_deref(), strict)?;

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });
    let output = OutputConfig::auto_detect_with_color_override(format, config.use_color());
    colored::control::set_override(output.use_colors());

    match command {
        Commands::Compare {
            old,
            new,
            from_version,
            from_tag,
            changelog,
            changelog_stdout,
            strict: _,
        } => {
            let previous = match (from_version.as_deref(), from_tag.as_deref()) {
                (Some(version), _) => Some(PreviousVersion::Exact(version)),
                (None, Some(tag)) => Some(PreviousVersion::Tag(tag)),
                (None, None) => None,
            };
            let changelog = match (changelog.as_deref(), changelog_stdout) {
                (Some(path), _) => Some(ChangelogTarget::File(path)),
                (None, true) => Some(ChangelogTarget::Stdout),
                (None, false) => None,
            };
            commands::compare::run(&old, &new, previous, changelog, &config, output)
        }
        Commands::Config => commands::config::run(config, output),
    }
}
