// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::{Config, LogLevel, Settings};
use crate::backend::{HttpBackend, TranslationBackend};
use crate::file_utils::FileManager;
use crate::transfer::TransferOrchestrator;

mod app_config;
mod backend;
mod errors;
mod file_utils;
mod progress;
mod subtitle_counter;
mod time_estimator;
mod transfer;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a subtitle file through the remote service (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for subrelay
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input subtitle file (.srt)
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Output file path (defaults to <input>.translated.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation service endpoint URL
    #[arg(short, long, env = "SUBRELAY_ENDPOINT")]
    endpoint: Option<String>,

    /// Cues per translation batch (8, 16, 24 or 32)
    #[arg(short, long)]
    batch_size: Option<u32>,

    /// Trade quality for speed
    #[arg(short, long)]
    fast: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
#[command(name = "subrelay", version, about = "Relay subtitle files to a hosted translation service with live progress", long_about = "Uploads an English SRT file to a remote translation backend and shows a
smooth progress estimate while the request is in flight. The backend reports
no incremental progress, so completion is estimated from a calibrated
seconds-per-100-cues throughput and elapsed time.

CONFIGURATION:
    Settings are read from conf.json next to the working directory (created
    with defaults when missing). The endpoint can also be supplied with
    --endpoint or the SUBRELAY_ENDPOINT environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file (.srt)
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// Output file path (defaults to <input>.translated.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation service endpoint URL
    #[arg(short, long, env = "SUBRELAY_ENDPOINT")]
    endpoint: Option<String>,

    /// Cues per translation batch (8, 16, 24 or 32)
    #[arg(short, long)]
    batch_size: Option<u32>,

    /// Trade quality for speed
    #[arg(short, long)]
    fast: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[0m",
            Level::Debug => "\x1B[0;36m",
            Level::Trace => "\x1B[0;90m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = CommandLineOptions::parse();

    match options.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translation(args).await,
        None => match options.input_file {
            Some(input_file) => {
                run_translation(TranslateArgs {
                    input_file,
                    output: options.output,
                    endpoint: options.endpoint,
                    batch_size: options.batch_size,
                    fast: options.fast,
                    config_path: options.config_path,
                    log_level: options.log_level,
                })
                .await
            }
            None => {
                CommandLineOptions::command().print_help()?;
                Ok(())
            }
        },
    }
}

async fn run_translation(args: TranslateArgs) -> Result<()> {
    let mut config = Config::from_file(&args.config_path)
        .with_context(|| format!("Failed to load configuration from {}", args.config_path))?;

    // CLI overrides take precedence over the config file
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level.into();
    }
    config.validate()?;

    CustomLogger::init(config.log_level.to_level_filter())
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let settings = Settings {
        batch_size: args.batch_size.unwrap_or_else(|| Settings::default().batch_size),
        fast_mode: args.fast,
    };
    settings.validate()?;

    if !FileManager::file_exists(&args.input_file) {
        return Err(anyhow!("Input file not found: {:?}", args.input_file));
    }
    let content = FileManager::read_to_string(&args.input_file)?;

    let backend = HttpBackend::from_config(&config);
    info!("Using translation service at {}", backend.base_url());

    // Surface an unreachable service before uploading anything
    if let Err(e) = backend.test_connection().await {
        warn!("{}", e.user_message());
        return Err(anyhow!(e.user_message()));
    }
    debug!("Translation service is online");

    let orchestrator = TransferOrchestrator::from_config(backend, &config);

    let progress_bar = ProgressBar::new(100);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░"),
    );

    let result = orchestrator
        .run(&content, &settings, |state| {
            progress_bar.set_position(state.progress as u64);
            progress_bar.set_message(state.message.clone());
        })
        .await;

    let translated = match result {
        Ok(translated) => {
            progress_bar.finish_with_message("Translation complete");
            translated
        }
        Err(e) => {
            progress_bar.abandon_with_message("Translation failed");
            return Err(anyhow!(e.user_message()));
        }
    };

    let output_path = args
        .output
        .unwrap_or_else(|| FileManager::generate_output_path(&args.input_file, "translated", "srt"));
    FileManager::write_to_file(&output_path, &translated)?;
    info!("Wrote translated subtitles to {:?}", output_path);

    Ok(())
}
