//! Retouch CLI
//!
//! Edit images by describing the change in plain words.

mod api;
mod commands;
mod config;
mod export;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "retouch")]
#[command(author, version, about = "Retouch - prompt-driven image editing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write the log file here instead of the retouch home
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit an image once and save the result
    Edit {
        /// Image to edit
        image: PathBuf,

        /// Description of the edit
        #[arg(short, long)]
        prompt: String,

        /// Directory for the edited image
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Media type of the image (guessed from the extension if omitted)
        #[arg(long)]
        mime: Option<String>,
    },

    /// Start an interactive editing session
    Session {
        /// Image to start with
        image: Option<PathBuf>,

        /// Directory for downloaded images
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose configuration
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Store the API key (prompts if not given)
    SetKey { key: Option<String> },
    /// Set the image model
    SetModel { model: String },
    /// Set the API base URL
    SetBaseUrl { url: String },
    /// Set the default output directory
    SetOutput { dir: PathBuf },
    /// Set the request timeout in seconds (0 disables it)
    SetTimeout { secs: u64 },
    /// Show current configuration
    Show,
    /// Reset to default configuration
    Reset,
}

/// Console and file filters when `RUST_LOG` is unset
fn log_directives(verbose: bool) -> (&'static str, &'static str) {
    if verbose {
        (
            "retouch_cli=debug,retouch_core=debug",
            "retouch_cli=debug,retouch_core=debug",
        )
    } else {
        // Underlying causes from the core only go to the file
        ("retouch_cli=info", "retouch_cli=info,retouch_core=info")
    }
}

/// `--log-file` if given, otherwise `retouch.log` in the retouch home
fn log_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| crate::config::SettingsManager::log_path().ok())
}

fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "retouch.log".to_string());

    Ok(RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)?)
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let (console_directives, file_directives) = log_directives(verbose);

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(console_directives)),
        );

    let mut guard = None;
    let file = match log_file_path(log_file).map(|path| file_appender(&path)) {
        Some(Ok(appender)) => {
            let (non_blocking, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_target(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new(file_directives)),
                    ),
            )
        }
        // An explicit path must work; the default one is best effort
        Some(Err(e)) if log_file.is_some() => return Err(e),
        _ => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;
    info!("Starting Retouch CLI");

    let result = match cli.command {
        Commands::Edit {
            image,
            prompt,
            output,
            mime,
        } => {
            commands::edit::execute(commands::edit::EditOptions {
                image,
                prompt,
                output,
                mime,
            })
            .await
        }
        Commands::Session { image, output } => commands::session::run(image, output).await,
        Commands::Config { action } => match action {
            ConfigAction::SetKey { key } => commands::config::set_key(key).await,
            ConfigAction::SetModel { model } => commands::config::set_model(&model).await,
            ConfigAction::SetBaseUrl { url } => commands::config::set_base_url(&url).await,
            ConfigAction::SetOutput { dir } => commands::config::set_output(dir).await,
            ConfigAction::SetTimeout { secs } => commands::config::set_timeout(secs).await,
            ConfigAction::Show => commands::config::show().await,
            ConfigAction::Reset => commands::config::reset().await,
        },
        Commands::Doctor => commands::doctor::execute().await,
    };

    if let Err(ref e) = result {
        error!("Command failed: {:#}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit() {
        let cli = Cli::try_parse_from([
            "retouch", "edit", "cat.png", "--prompt", "add a hat", "-o", "out",
        ])
        .unwrap();
        match cli.command {
            Commands::Edit {
                image,
                prompt,
                output,
                mime,
            } => {
                assert_eq!(image, PathBuf::from("cat.png"));
                assert_eq!(prompt, "add a hat");
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(mime.is_none());
            }
            _ => panic!("expected edit command"),
        }
    }

    #[test]
    fn test_core_diagnostics_reach_the_file_only() {
        let (console, file) = log_directives(false);
        assert!(!console.contains("retouch_core"));
        assert!(file.contains("retouch_core=info"));
        assert!(console.contains("retouch_cli=info"));

        let (console, file) = log_directives(true);
        assert!(console.contains("retouch_core=debug"));
        assert_eq!(console, file);
    }

    #[test]
    fn test_explicit_log_file_wins() {
        let path = Path::new("/tmp/custom.log");
        assert_eq!(log_file_path(Some(path)), Some(path.to_path_buf()));
    }

    #[test]
    fn test_file_appender_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("retouch.log");
        let appender = file_appender(&path);
        assert!(appender.is_ok());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_log_file_flag() {
        let cli = Cli::try_parse_from(["retouch", "doctor", "--log-file", "out/r.log"]).unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from("out/r.log")));
    }
}
