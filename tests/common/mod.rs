/*!
 * Common test utilities for the postcue test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// A dump with a log preamble, a post with a hashtag section, a noise-only
/// post and a plain post
pub const SAMPLE_DUMP: &str = "REDDIT SCRAPER LOG - Started: 2025-05-01 12:00:00
Subreddits: AmItheAsshole
Filter: top
AI Cleaning: enabled
---POST_SEPARATOR---
AITA for this
Some body text
---HASHTAGS---
#drama #family
---POST_SEPARATOR---
<<FEMALE>>
#justtags
---POST_SEPARATOR---
My neighbour keeps parking in front of my driveway and I finally had enough of it last weekend.
---POST_SEPARATOR---
";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Sorted file names directly inside `dir`
pub fn file_names(dir: &PathBuf) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().to_string());
    }
    names.sort();
    Ok(names)
}
