use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clavis::{AdvancementPolicy, PracticeSession};
use derive_more::From;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, Settings};
use crate::drill::{Drill, DrillError, article_from_text};
use crate::replay::{Replay, summary};

mod config;
mod drill;
mod replay;

/// Filter used when neither the settings nor `RUST_LOG` name one
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(name = "passage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding `settings.toml`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override when a segment hands over to the next one
    #[arg(short, long)]
    policy: Option<AdvancementPolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a drill file through the engine and print what happened
    Replay {
        /// Path to a TOML drill
        drill: PathBuf,
    },
    /// Print the typeable segments of a plain text article
    Segments {
        /// Path to a text file, paragraphs separated by blank lines
        file: PathBuf,
    },
}

#[derive(Debug, From, Error)]
enum Error {
    #[error("{0}")]
    Config(ConfigError),

    #[error("{0}")]
    Drill(DrillError),
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let settings = Settings::get(cli.config, cli.policy)?;

    init_tracing(settings.log_filter.as_deref());
    tracing::debug!(?settings, "settings loaded");

    match cli.command {
        Command::Replay { drill } => replay(&drill, &settings)?,
        Command::Segments { file } => segments(&file)?,
    }

    Ok(())
}

fn init_tracing(filter: Option<&str>) {
    let env_filter = filter
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if subscriber.try_init().is_ok() {
        tracing::trace!("tracing initialized");
    }
}

fn replay(path: &std::path::Path, settings: &Settings) -> Result<(), DrillError> {
    let drill = Drill::from_file(path)?;
    let replay = Replay::new(&drill, settings.engine.clone());

    println!(
        "{} ({} policy, {} events)",
        drill.article.id,
        settings.engine.advancement,
        drill.events.len()
    );

    if settings.show_segments {
        for segment in replay.session().segments() {
            println!("  #{:<3} {}", segment.index(), segment.text());
        }
    }
    println!();

    let report = replay.run(&drill.events);
    for line in &report.lines {
        println!("{line}");
    }

    println!();
    for line in summary(&report.metrics) {
        println!("{line}");
    }

    Ok(())
}

fn segments(path: &std::path::Path) -> Result<(), DrillError> {
    let article = article_from_text(path)?;
    let session = PracticeSession::new(article.id.as_str(), &article.paragraphs, Default::default());

    for segment in session.segments() {
        println!(
            "#{:<3} (paragraph {:<3}) {:>4} chars  {}",
            segment.index(),
            segment.source_index(),
            segment.len(),
            segment.text()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_policy_flag() {
        let cli = Cli::try_parse_from(["passage", "--policy", "strict-match", "replay", "a.toml"])
            .unwrap();

        assert_eq!(cli.policy, Some(AdvancementPolicy::StrictMatch));
        assert!(matches!(cli.command, Command::Replay { .. }));
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(Cli::try_parse_from(["passage", "--policy", "eventually", "replay", "a"]).is_err());
    }

    #[test]
    fn test_missing_drill_is_reported() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            let dir = tempfile::tempdir().unwrap();
            let config = dir.path().to_string_lossy().into_owned();
            let cli = Cli::try_parse_from([
                "passage",
                "--config",
                config.as_str(),
                "replay",
                "/definitely/not/here.toml",
            ])
            .unwrap();

            let error = run(cli).unwrap_err();

            assert!(matches!(error, Error::Drill(DrillError::ReadFile { .. })));
            assert!(error.to_string().starts_with("Failed to read drill"));
            Ok(())
        });
    }

    #[test]
    fn test_tracing_can_be_initialized_twice() {
        init_tracing(Some("passage=trace"));
        init_tracing(Some("not a [valid filter"));
    }

    #[test]
    fn test_bundled_drill_parses() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("drills/fox.toml");
        let drill = Drill::from_file(&path).unwrap();

        let report = Replay::new(&drill, Default::default()).run(&drill.events);
        assert!(report.metrics.is_finished);
    }
}
