/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;
use anyhow::Result;
use postcue::app_config::{Config, CorrectionConfig, LogLevel, MAX_CUE_INTERVAL_MS, load_api_key};
use postcue::errors::PipelineError;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.folders.input_dir, PathBuf::from("old-posts"));
    assert_eq!(config.folders.cleaned_dir, PathBuf::from("cleaned-text"));
    assert_eq!(config.folders.subtitle_dir, PathBuf::from("subtitles"));
    assert_eq!(config.cleaning.separator, "---POST_SEPARATOR---");
    assert_eq!(config.cleaning.header_scan_lines, 4);
    assert_eq!(config.cleaning.title_scan_lines, 3);
    assert_eq!(config.subtitles.max_chars_per_cue, 42);
    assert_eq!(config.subtitles.cue_interval_ms, 5000);
    assert!(!config.correction.enabled);
    assert_eq!(config.correction.api_key_env, "GROQ_API_KEY");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.cleaning.separator = "  ".to_string();
    assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));

    let mut config = Config::default();
    config.cleaning.title_scan_lines = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.subtitles.cue_interval_ms = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.subtitles.cue_interval_ms = u64::MAX;
    assert!(config.validate().is_err());
    config.subtitles.cue_interval_ms = MAX_CUE_INTERVAL_MS;
    assert!(config.validate().is_ok());

    let mut config = Config::default();
    config.correction.enabled = true;
    config.correction.endpoint = String::new();
    assert!(config.validate().is_err());
}

/// Test that a partial JSON file fills the rest with defaults
#[test]
fn test_config_fromPartialJson_shouldUseDefaults() -> Result<()> {
    let json = r#"{ "subtitles": { "max_chars_per_cue": 32 }, "log_level": "debug" }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.subtitles.max_chars_per_cue, 32);
    assert_eq!(config.subtitles.cue_interval_ms, 5000);
    assert_eq!(config.cleaning.separator, "---POST_SEPARATOR---");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);

    Ok(())
}

/// Test that the configuration survives a JSON round trip
#[test]
fn test_config_serialization_shouldRoundTrip() -> Result<()> {
    let mut config = Config::default();
    config.folders.input_dir = PathBuf::from("dumps");
    config.correction.enabled = true;

    let json = serde_json::to_string_pretty(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;

    assert_eq!(parsed.folders.input_dir, PathBuf::from("dumps"));
    assert!(parsed.correction.enabled);
    Ok(())
}

/// Test that the key file takes precedence over the environment
#[test]
fn test_load_api_key_withKeyFile_shouldReadTrimmedKey() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(&temp_dir.path().to_path_buf(), "api_key.txt", "  gsk_from_file \n")?;

    let config = CorrectionConfig {
        api_key_env: "POSTCUE_TEST_KEY_UNUSED".to_string(),
        ..CorrectionConfig::default()
    };

    assert_eq!(load_api_key(&config, temp_dir.path())?, "gsk_from_file");
    Ok(())
}

/// Test the environment fallback when no key file exists
#[test]
fn test_load_api_key_withEnvVar_shouldFallBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = CorrectionConfig {
        api_key_env: "POSTCUE_TEST_KEY_FROM_ENV".to_string(),
        ..CorrectionConfig::default()
    };

    // SAFETY: this variable name is only used by this test
    unsafe { std::env::set_var("POSTCUE_TEST_KEY_FROM_ENV", "gsk_from_env") };
    let key = load_api_key(&config, temp_dir.path());
    unsafe { std::env::remove_var("POSTCUE_TEST_KEY_FROM_ENV") };

    assert_eq!(key?, "gsk_from_env");
    Ok(())
}

/// Test that a missing key names both places searched
#[test]
fn test_load_api_key_withNothingConfigured_shouldReportCredentialMissing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(&temp_dir.path().to_path_buf(), "api_key.txt", "   \n")?;
    let config = CorrectionConfig {
        api_key_env: "POSTCUE_TEST_KEY_NEVER_SET".to_string(),
        ..CorrectionConfig::default()
    };

    match load_api_key(&config, temp_dir.path()) {
        Err(PipelineError::CredentialMissing { searched, env_var }) => {
            assert_eq!(searched, temp_dir.path().join("api_key.txt"));
            assert_eq!(env_var, "POSTCUE_TEST_KEY_NEVER_SET");
        }
        other => panic!("expected CredentialMissing, got {:?}", other),
    }
    Ok(())
}
