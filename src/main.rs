// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use postcue::app_config::{self, Config};
use postcue::app_controller::Controller;

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split raw dumps into cleaned per-post block files
    Clean {
        /// Folder containing the raw dumps
        #[arg(short, long, value_name = "DIR")]
        input: Option<PathBuf>,

        /// Folder receiving the block files
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Send every cleaned block through the text-correction service
        #[arg(long)]
        correct: bool,
    },

    /// Create subtitle files from cleaned block files
    Subtitles {
        /// Folder containing the block files
        #[arg(short, long, value_name = "DIR")]
        input: Option<PathBuf>,

        /// Folder receiving the subtitle files
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Maximum characters per cue
        #[arg(long, value_name = "N")]
        max_chars: Option<usize>,

        /// Duration of every cue in milliseconds
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },

    /// Clean the configured input folder, then create subtitles
    Run {
        /// Send every cleaned block through the text-correction service
        #[arg(long)]
        correct: bool,
    },

    /// Delete generated files of one extension from a folder
    Clear {
        /// Folder to clear
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Extension of the files to delete
        #[arg(short, long, default_value = "txt")]
        extension: String,
    },

    /// Generate shell completions for postcue
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// postcue - scraped post cleaner and subtitle chunker
#[derive(Parser, Debug)]
#[command(name = "postcue")]
#[command(version)]
#[command(about = "Clean scraped post dumps and turn them into subtitle files")]
#[command(long_about = "postcue splits scraped post dumps into cleaned, title-first block files and
chunks those blocks into fixed-interval subtitle files for narration.

EXAMPLES:
    postcue clean                               # old-posts -> cleaned-text
    postcue clean -i dumps -o blocks --correct  # Custom folders, with text correction
    postcue subtitles --max-chars 36            # cleaned-text -> subtitles
    postcue run                                 # Both stages with configured folders
    postcue clear cleaned-text -e txt           # Remove generated block files
    postcue completions bash > postcue.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
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
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level), now, Self::get_emoji_for_level(level), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Most verbose level here; the effective level is applied through set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "postcue", &mut std::io::stdout());
        return Ok(());
    }

    let cli_log_level: Option<app_config::LogLevel> = cli.log_level.clone().map(Into::into);
    if let Some(level) = &cli_log_level {
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_or_create_config(&cli.config)?;
    if let Some(level) = cli_log_level {
        config.log_level = level;
    }
    log::set_max_level(config.log_level.to_level_filter());

    let base_dir = Path::new(&cli.config)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    match cli.command {
        Commands::Clean { input, output, correct } => {
            if let Some(input) = input {
                config.folders.input_dir = input;
            }
            if let Some(output) = output {
                config.folders.cleaned_dir = output;
            }
            config.correction.enabled |= correct;

            let controller = build_controller(config, &base_dir)?;
            let folders = &controller.config().folders;
            controller.clean_folder(&folders.input_dir, &folders.cleaned_dir).await?;
        }
        Commands::Subtitles { input, output, max_chars, interval_ms } => {
            if let Some(input) = input {
                config.folders.cleaned_dir = input;
            }
            if let Some(output) = output {
                config.folders.subtitle_dir = output;
            }
            if let Some(max_chars) = max_chars {
                config.subtitles.max_chars_per_cue = max_chars;
            }
            if let Some(interval_ms) = interval_ms {
                config.subtitles.cue_interval_ms = interval_ms;
            }

            let controller = build_controller(config, &base_dir)?;
            let folders = &controller.config().folders;
            controller.subtitle_folder(&folders.cleaned_dir, &folders.subtitle_dir).await?;
        }
        Commands::Run { correct } => {
            config.correction.enabled |= correct;
            let controller = build_controller(config, &base_dir)?;
            controller.run_all().await?;
        }
        Commands::Clear { dir, extension } => {
            let controller = build_controller(config, &base_dir)?;
            controller.clear(&dir, &extension)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the configuration file, writing a default one when it is missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        return Ok(config);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();

    let config_json = serde_json::to_string_pretty(&config)
        .context("Failed to serialize default config to JSON")?;

    std::fs::write(config_path, config_json)
        .context(format!("Failed to write default config to file: {}", config_path))?;

    Ok(config)
}

/// Validate the configuration and wire the optional correction service
fn build_controller(config: Config, base_dir: &Path) -> Result<Controller> {
    config.validate()
        .context("Configuration validation failed")?;

    let corrector = if config.correction.enabled {
        Controller::build_corrector(&config.correction, base_dir)
    } else {
        None
    };

    let controller = Controller::with_config(config)?;
    Ok(match corrector {
        Some(corrector) => controller.with_corrector(corrector),
        None => controller,
    })
}
