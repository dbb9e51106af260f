/*!
 * Tests for controller setup and the configured-folder run
 */

use std::fs;
use anyhow::Result;

use postcue::app_config::{Config, CorrectionConfig};
use postcue::app_controller::Controller;
use postcue::providers::TextCorrector;
use crate::common;

fn config_in(root: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.folders.input_dir = root.join("old-posts");
    config.folders.cleaned_dir = root.join("cleaned-text");
    config.folders.subtitle_dir = root.join("subtitles");
    config
}

/// Test that the controller can be created with default settings
#[test]
fn test_controller_creation_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert!(!controller.has_corrector());
    assert_eq!(controller.config().subtitles.max_chars_per_cue, 42);
    Ok(())
}

/// Test that an invalid configuration is rejected up front
#[test]
fn test_controller_creation_withEmptySeparator_shouldFail() {
    let mut config = Config::default();
    config.cleaning.separator = String::new();
    assert!(Controller::with_config(config).is_err());
}

/// Test both stages over the configured folders
#[tokio::test]
async fn test_runAll_withConfiguredFolders_shouldProduceSubtitles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = config_in(temp_dir.path());
    fs::create_dir(&config.folders.input_dir)?;
    common::create_test_file(&config.folders.input_dir, "first.txt", common::SAMPLE_DUMP)?;
    common::create_test_file(&config.folders.input_dir, "second.txt", "---POST_SEPARATOR---\nWas I wrong to leave?\nI left.\n")?;

    let controller = Controller::with_config(config.clone())?;
    let (clean_report, subtitle_report) = controller.run_all().await?;

    assert_eq!(clean_report.files_seen, 2);
    assert_eq!(clean_report.blocks_written, 3);
    assert_eq!(subtitle_report.outputs.len(), 3);
    assert_eq!(
        common::file_names(&config.folders.subtitle_dir)?,
        vec!["first_block_2.srt", "first_block_4.srt", "second_block_1.srt"]
    );
    Ok(())
}

/// Test that the subtitle stage stops when the cleaning stage left nothing
#[tokio::test]
async fn test_runAll_withOnlyNoise_shouldReportMissingBlocks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = config_in(temp_dir.path());
    fs::create_dir(&config.folders.input_dir)?;
    common::create_test_file(&config.folders.input_dir, "noise.txt", "<<MALE>>\n#tags #only\n")?;

    let controller = Controller::with_config(config)?;
    assert!(controller.run_all().await.is_err());
    Ok(())
}

/// Test clearing generated files through the controller
#[test]
fn test_clear_shouldRemoveGeneratedFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "a_block_1.srt", "1")?;
    common::create_test_file(&dir, "a_block_1.txt", "text")?;

    let controller = Controller::new_for_test()?;
    assert_eq!(controller.clear(&dir, ".srt")?, 1);
    assert_eq!(common::file_names(&dir)?, vec!["a_block_1.txt"]);
    Ok(())
}

/// Test that missing credentials disable correction instead of failing
#[test]
fn test_buildCorrector_withoutCredentials_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = CorrectionConfig {
        enabled: true,
        api_key_env: "POSTCUE_TEST_KEY_ABSENT".to_string(),
        ..CorrectionConfig::default()
    };

    assert!(Controller::build_corrector(&config, temp_dir.path()).is_none());
    Ok(())
}

/// Test that a key file enables the Groq client
#[test]
fn test_buildCorrector_withKeyFile_shouldReturnGroq() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(&temp_dir.path().to_path_buf(), "api_key.txt", "gsk_test")?;
    let config = CorrectionConfig {
        enabled: true,
        ..CorrectionConfig::default()
    };

    let corrector = Controller::build_corrector(&config, temp_dir.path()).expect("key file present");
    assert_eq!(corrector.name(), "groq");

    let controller = Controller::new_for_test()?.with_corrector(corrector);
    assert!(controller.has_corrector());
    Ok(())
}
