/*!
 * Tests for cue chunking, timing and SRT handling
 */

use std::path::PathBuf;
use anyhow::Result;
use postcue::app_config::SubtitleConfig;
use postcue::errors::SubtitleError;
use postcue::subtitle_processor::{SubtitleCollection, SubtitleEntry, chunk_text};
use crate::common;

fn config(max_chars_per_cue: usize, cue_interval_ms: u64) -> SubtitleConfig {
    SubtitleConfig { max_chars_per_cue, cue_interval_ms }
}

/// Test the documented wrapping scenario
#[test]
fn test_chunkText_longLine_shouldBreakAtSpace() -> Result<()> {
    let text = "This is a moderately long line of thirty plus characters";
    let cues = chunk_text(text, 42)?;

    assert!(cues.len() >= 2);
    assert!(cues.iter().all(|cue| cue.chars().count() <= 42));
    assert!(text[cues[0].len()..].starts_with(' '));
    assert_eq!(cues.join(" "), text);

    Ok(())
}

/// Test that a long title is split once and keeps its words
#[test]
fn test_chunkText_longTitle_shouldSplitOnce() -> Result<()> {
    let text = "Title: AITA for refusing to drive my sister to her job interview\n\nShort body.";
    let cues = chunk_text(text, 42)?;

    assert_eq!(cues, vec![
        "AITA for refusing to drive my sister to".to_string(),
        "her job interview".to_string(),
        "Short body.".to_string(),
    ]);

    Ok(())
}

/// Test that a word longer than the budget is hard-cut without losing characters
#[test]
fn test_chunkText_oversizedWord_shouldHardCut() -> Result<()> {
    let word = "a".repeat(25);
    let cues = chunk_text(&word, 10)?;

    assert_eq!(cues, vec!["a".repeat(10), "a".repeat(10), "a".repeat(5)]);
    Ok(())
}

/// Test that multi-byte characters are counted as characters
#[test]
fn test_chunkText_multibyteText_shouldCountChars() -> Result<()> {
    let text = "ééééé ééééé ééééé";
    let cues = chunk_text(text, 11)?;

    assert_eq!(cues, vec!["ééééé ééééé".to_string(), "ééééé".to_string()]);
    Ok(())
}

/// Test that whitespace-only text reports no content
#[test]
fn test_chunkText_blankText_shouldReportNoContent() {
    assert_eq!(chunk_text("\n   \n\n", 42), Err(SubtitleError::NoContent));
    assert_eq!(chunk_text("", 42), Err(SubtitleError::NoContent));
}

/// Test that cues sit on a contiguous fixed grid
#[test]
fn test_fromNormalizedText_shouldAssignContiguousIntervals() -> Result<()> {
    let text = "Title: AITA for this\n\nline one\nline two";
    let collection = SubtitleCollection::from_normalized_text(PathBuf::from("x_block_2.txt"), text, &config(42, 5000))?;

    let times: Vec<(usize, u64, u64)> = collection
        .entries
        .iter()
        .map(|e| (e.seq_num, e.start_time_ms, e.end_time_ms))
        .collect();
    assert_eq!(times, vec![(1, 0, 5000), (2, 5000, 10000), (3, 10000, 15000)]);

    Ok(())
}

/// Test SRT serialization of a single cue
#[test]
fn test_toSrtString_shouldUseStandardLayout() -> Result<()> {
    let collection = SubtitleCollection::from_normalized_text(PathBuf::from("x.txt"), "Hello there", &config(42, 2500))?;
    assert_eq!(collection.to_srt_string(), "1\n00:00:00,000 --> 00:00:02,500\nHello there\n\n");
    Ok(())
}

/// Test that a written subtitle file parses back to the same cues
#[test]
fn test_writeAndParse_shouldPreserveCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let text = "Title: Was I wrong to skip the family dinner last Sunday evening\n\nIt had been planned for weeks.";
    let collection = SubtitleCollection::from_normalized_text(PathBuf::from("x.txt"), text, &config(30, 4000))?;

    let path = collection.write_to_unique_srt(temp_dir.path().join("x.srt"))?;
    let parsed = SubtitleCollection::parse_srt_string(&std::fs::read_to_string(path)?)?;

    assert_eq!(parsed, collection.entries);
    Ok(())
}

/// Test that writing the same target twice produces two files
#[test]
fn test_writeToUniqueSrt_twice_shouldNotOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("story.srt");
    let collection = SubtitleCollection::from_normalized_text(PathBuf::from("story.txt"), "text", &config(42, 5000))?;

    let first = collection.write_to_unique_srt(&target)?;
    let second = collection.write_to_unique_srt(&target)?;

    assert_ne!(first, second);
    assert_eq!(common::file_names(&temp_dir.path().to_path_buf())?, vec!["story.srt", "story_001.srt"]);
    Ok(())
}

/// Test timestamp conversion in both directions
#[test]
fn test_timestamps_shouldConvertBothWays() -> Result<()> {
    assert_eq!(SubtitleEntry::parse_timestamp("01:02:03,456")?, 3_723_456);
    assert_eq!(SubtitleEntry::format_timestamp(3_723_456), "01:02:03,456");
    assert_eq!(SubtitleEntry::format_timestamp(0), "00:00:00,000");
    Ok(())
}

/// Test that malformed timestamps are rejected
#[test]
fn test_parseTimestamp_withInvalidInput_shouldFail() {
    for bad in ["", "12:00", "00:61:00,000", "00:00:00,1000", "aa:bb:cc,ddd"] {
        assert!(
            matches!(SubtitleEntry::parse_timestamp(bad), Err(SubtitleError::InvalidTimestamp(_))),
            "{} should be rejected",
            bad
        );
    }
}

/// Test parsing of a hand written file with extra blank lines
#[test]
fn test_parseSrtString_withLooseSpacing_shouldParseEntries() -> Result<()> {
    let content = "1\n00:00:00,000 --> 00:00:05,000\nFirst cue\n\n\n2\n00:00:05,000 --> 00:00:10,000\nSecond cue\n";
    let entries = SubtitleCollection::parse_srt_string(content)?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].text, "Second cue");
    assert_eq!(entries[1].start_time_ms, 5000);
    Ok(())
}
