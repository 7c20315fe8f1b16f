// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod clean;
mod cue;
mod demux;
mod errors;
mod file_utils;
mod host;
mod language_utils;
mod sanitize;
mod timeline;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import subtitles into keyframe timeline assets (default command)
    #[command(alias = "import")]
    Import(ImportArgs),

    /// Generate shell completions for subanim
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ImportArgs {
    /// Input media file, subtitle file, or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Keep extracted and cleaned subtitle files next to the media file
    #[arg(short, long)]
    keep_files: bool,

    /// Only import tracks matching this language code (e.g., 'en', 'fre')
    #[arg(short, long)]
    language: Option<String>,

    /// Frame rate assumed for MicroDVD subtitles without a declared rate
    #[arg(long)]
    fps: Option<f64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subanim - Subtitle to Animation Timeline Importer
///
/// Extracts subtitle tracks from media files, strips markup the text renderer
/// cannot display, and converts each track into a continuous keyframe
/// timeline asset.
#[derive(Parser, Debug)]
#[command(name = "subanim")]
#[command(version = "0.1.0")]
#[command(about = "Subtitle to keyframe timeline importer")]
#[command(long_about = "subanim extracts subtitle tracks from media files and converts them into
continuous keyframe timeline assets for driving text-display animations.

EXAMPLES:
    subanim movie.mkv                       # Import all subtitle tracks
    subanim -k movie.mkv                    # Keep intermediate subtitle files
    subanim -l en movie.mkv                 # Import only English tracks
    subanim captions.srt                    # Convert a subtitle file directly
    subanim --log-level debug /movies/      # Process a directory with debug logging
    subanim completions bash > subanim.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input media file, subtitle file, or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Keep extracted and cleaned subtitle files next to the media file
    #[arg(short, long)]
    keep_files: bool,

    /// Only import tracks matching this language code (e.g., 'en', 'fre')
    #[arg(short, long)]
    language: Option<String>,

    /// Frame rate assumed for MicroDVD subtitles without a declared rate
    #[arg(long)]
    fps: Option<f64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
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

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} [{}] {}\x1B[0m",
                color,
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
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subanim", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Import(args)) => run_import(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let import_args = ImportArgs {
                input_path,
                keep_files: cli.keep_files,
                language: cli.language,
                fps: cli.fps,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_import(import_args).await
        }
    }
}

async fn run_import(options: ImportArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if options.keep_files {
        config.keep_intermediate_files = true;
    }
    if let Some(language) = &options.language {
        config.preferred_language = Some(language.clone());
    }
    if let Some(fps) = options.fps {
        config.microdvd_fps = fps;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(to_level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the import for the input file or directory
    if options.input_path.is_file() {
        controller.run(options.input_path.clone()).await
    } else if options.input_path.is_dir() {
        controller.run_folder(options.input_path.clone()).await
    } else {
        Err(anyhow!("Input path does not exist: {:?}", options.input_path))
    }
}
