use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::errors::PipelineError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and resolving credentials for the optional correction service.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Input and output folders
    #[serde(default)]
    pub folders: FolderConfig,

    /// Block splitting and cleaning settings
    #[serde(default)]
    pub cleaning: CleaningConfig,

    /// Subtitle chunking settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Text-correction service settings
    #[serde(default)]
    pub correction: CorrectionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Folders the pipeline reads from and writes to
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FolderConfig {
    /// Raw scraper dumps
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// One file per cleaned block
    #[serde(default = "default_cleaned_dir")]
    pub cleaned_dir: PathBuf,

    /// Generated .srt files
    #[serde(default = "default_subtitle_dir")]
    pub subtitle_dir: PathBuf,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            cleaned_dir: default_cleaned_dir(),
            subtitle_dir: default_subtitle_dir(),
        }
    }
}

/// Configuration for splitting and cleaning raw dumps
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CleaningConfig {
    /// Exact line that separates post records
    #[serde(default = "default_separator")]
    pub separator: String,

    /// How many leading lines are checked for scraper log headers
    #[serde(default = "default_header_scan_lines")]
    pub header_scan_lines: usize,

    /// How many leading content lines may hold the post title
    #[serde(default = "default_title_scan_lines")]
    pub title_scan_lines: usize,

    /// Extension of raw input files
    #[serde(default = "default_input_extension")]
    pub input_extension: String,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            header_scan_lines: default_header_scan_lines(),
            title_scan_lines: default_title_scan_lines(),
            input_extension: default_input_extension(),
        }
    }
}

/// Configuration for subtitle chunking
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Character budget of one cue line
    #[serde(default = "default_max_chars_per_cue")]
    pub max_chars_per_cue: usize,

    /// Fixed duration of every cue in milliseconds
    #[serde(default = "default_cue_interval_ms")]
    pub cue_interval_ms: u64,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_chars_per_cue: default_max_chars_per_cue(),
            cue_interval_ms: default_cue_interval_ms(),
        }
    }
}

/// Text-correction service configuration (OpenAI-compatible chat endpoint)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorrectionConfig {
    /// Run cleaned blocks through the correction service
    #[serde(default)]
    pub enabled: bool,

    /// Service endpoint URL
    #[serde(default = "default_correction_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_correction_model")]
    pub model: String,

    /// File holding the API key, checked before the environment
    #[serde(default = "default_api_key_file")]
    pub api_key_file: PathBuf,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Instruction sent ahead of every block
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_correction_endpoint(),
            model: default_correction_model(),
            api_key_file: default_api_key_file(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("old-posts")
}

fn default_cleaned_dir() -> PathBuf {
    PathBuf::from("cleaned-text")
}

fn default_subtitle_dir() -> PathBuf {
    PathBuf::from("subtitles")
}

fn default_separator() -> String {
    "---POST_SEPARATOR---".to_string()
}

fn default_header_scan_lines() -> usize {
    4
}

fn default_title_scan_lines() -> usize {
    3
}

fn default_input_extension() -> String {
    "txt".to_string()
}

fn default_max_chars_per_cue() -> usize {
    42 // common subtitle line recommendation
}

fn default_cue_interval_ms() -> u64 {
    5000
}

fn default_correction_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_correction_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_api_key_file() -> PathBuf {
    PathBuf::from("api_key.txt")
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_system_prompt() -> String {
    "You are a grammar and spelling corrector. Fix spelling, grammar and punctuation errors, \
expand chat abbreviations, and keep the exact tone, style and meaning. Keep a first line \
starting with \"Title: \" as the first line. Return ONLY the corrected text with no explanations."
        .to_string()
}

/// Longest accepted cue window (one hour)
pub const MAX_CUE_INTERVAL_MS: u64 = 3_600_000;

impl Config {

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.cleaning.separator.trim().is_empty() {
            return Err(PipelineError::InvalidConfig("separator token must not be empty".to_string()));
        }

        if self.cleaning.header_scan_lines == 0 || self.cleaning.title_scan_lines == 0 {
            return Err(PipelineError::InvalidConfig("scan windows must be at least one line".to_string()));
        }

        if self.subtitles.max_chars_per_cue == 0 {
            return Err(PipelineError::InvalidConfig("max_chars_per_cue must be greater than zero".to_string()));
        }

        if self.subtitles.cue_interval_ms == 0 || self.subtitles.cue_interval_ms > MAX_CUE_INTERVAL_MS {
            return Err(PipelineError::InvalidConfig(format!(
                "cue_interval_ms must be between 1 and {}", MAX_CUE_INTERVAL_MS
            )));
        }

        if self.correction.enabled && self.correction.endpoint.trim().is_empty() {
            return Err(PipelineError::InvalidConfig("correction endpoint is required when correction is enabled".to_string()));
        }

        Ok(())
    }
}

/// Resolve the correction service API key.
///
/// The key file (relative paths resolve against `base_dir`) wins when it holds a
/// non-empty key; otherwise the configured environment variable is used.
pub fn load_api_key(config: &CorrectionConfig, base_dir: &Path) -> Result<String, PipelineError> {
    let key_path = if config.api_key_file.is_absolute() {
        config.api_key_file.clone()
    } else {
        base_dir.join(&config.api_key_file)
    };

    if key_path.is_file() {
        if let Ok(content) = std::fs::read_to_string(&key_path) {
            let key = content.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }
    }

    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(PipelineError::CredentialMissing {
            searched: key_path,
            env_var: config.api_key_env.clone(),
        }),
    }
}
