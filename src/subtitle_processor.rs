use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::Result;
use log::{warn, debug};

use crate::app_config::SubtitleConfig;
use crate::cleaning::TITLE_PREFIX;
use crate::errors::SubtitleError;
use crate::file_utils::FileManager;

// @module: Subtitle chunking, timing and SRT serialization

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})")
        .expect("valid SRT timestamp regex")
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());

        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 4 {
            return Err(invalid());
        }

        let mut values = [0u64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse().map_err(|_| invalid())?;
        }
        let [hours, minutes, seconds, millis] = values;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(invalid());
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Re-wrap normalized block text into cue lines of at most `max_chars` characters.
///
/// A leading `Title:` line is split once at the last space inside the budget.
/// If the remainder is still over budget it is wrapped like a body line, so a
/// long title may take more than two cues. Every other non-empty line is
/// wrapped greedily. A single word longer than
/// the budget is hard-cut. Lengths are counted in characters, not bytes.
pub fn chunk_text(text: &str, max_chars: usize) -> Result<Vec<String>, SubtitleError> {
    let max_chars = max_chars.max(1);
    let mut raw_lines = Vec::new();
    let mut lines = text.lines().peekable();

    if let Some(first) = lines.peek() {
        if first.starts_with(TITLE_PREFIX.trim_end()) {
            let title = first
                .strip_prefix(TITLE_PREFIX)
                .or_else(|| first.strip_prefix(TITLE_PREFIX.trim_end()))
                .unwrap_or(first);
            raw_lines.extend(split_title(title, max_chars));
            lines.next();
        }
    }

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        if line.chars().count() <= max_chars {
            raw_lines.push(line.to_string());
        } else {
            raw_lines.extend(wrap_line(line, max_chars));
        }
    }

    let cue_lines: Vec<String> = raw_lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if cue_lines.is_empty() {
        return Err(SubtitleError::NoContent);
    }

    Ok(cue_lines)
}

/// Split a title once at the last space within the budget.
///
/// A remainder that is still over budget is wrapped like a body line so no cue
/// line exceeds the budget unless a single word does.
fn split_title(title: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_chars {
        return vec![title.to_string()];
    }

    let cut = last_space_within(&chars, max_chars).unwrap_or(max_chars);
    let head: String = chars[..cut].iter().collect();
    let tail: String = chars[cut..].iter().collect();
    let tail = tail.trim();

    let mut parts = vec![head];
    if tail.chars().count() <= max_chars {
        parts.push(tail.to_string());
    } else {
        parts.extend(wrap_line(tail, max_chars));
    }
    parts
}

/// Greedy word wrap: longest prefix within budget that ends before a space, else a hard cut
fn wrap_line(line: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut pieces = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let rest = &chars[pos..];
        if rest.len() <= max_chars {
            pieces.push(rest.iter().collect());
            break;
        }

        match last_space_within(rest, max_chars) {
            Some(space) => {
                pieces.push(rest[..space].iter().collect());
                pos += space + 1; // skip the space we broke on
            }
            None => {
                pieces.push(rest[..max_chars].iter().collect());
                pos += max_chars;
            }
        }
    }

    pieces
}

/// Index of the last space that leaves a prefix of at most `max_chars` characters
fn last_space_within(chars: &[char], max_chars: usize) -> Option<usize> {
    let window = &chars[..chars.len().min(max_chars + 1)];
    window.iter().rposition(|c| *c == ' ')
}

/// Collection of subtitle entries with metadata
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Build timed cues from normalized block text.
    ///
    /// Cue `i` (1-based) spans `[(i-1) * interval, i * interval)`; cues are
    /// contiguous and never overlap.
    pub fn from_normalized_text(source_file: PathBuf, text: &str, config: &SubtitleConfig) -> Result<Self, SubtitleError> {
        let cue_lines = chunk_text(text, config.max_chars_per_cue)?;
        let interval = config.cue_interval_ms;

        let entries = cue_lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let seq_num = i + 1;
                let end = (seq_num as u64)
                    .checked_mul(interval)
                    .ok_or(SubtitleError::TimingOverflow { seq_num })?;
                Ok(SubtitleEntry::new(seq_num, end - interval, end, line))
            })
            .collect::<Result<Vec<_>, SubtitleError>>()?;

        debug!("Built {} cues from {:?}", entries.len(), source_file);

        Ok(SubtitleCollection { source_file, entries })
    }

    /// Serialize all entries in SRT format
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Write subtitles next to `path` without ever replacing an existing file.
    ///
    /// Collisions get a `_001`, `_002`, ... suffix; the path actually written is returned.
    pub fn write_to_unique_srt<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        FileManager::write_unique(path, &self.to_srt_string())
    }

    /// Parse SRT format string into subtitle entries
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let mut entries = Vec::new();

        // State variables for parsing
        let mut current_seq_num: Option<usize> = None;
        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();

        let mut flush = |seq_num: usize, (start_ms, end_ms): (u64, u64), text: &mut String| {
            if text.trim().is_empty() {
                warn!("Skipping empty subtitle entry {}", seq_num);
            } else {
                entries.push(SubtitleEntry::new(seq_num, start_ms, end_ms, text.trim().to_string()));
            }
            text.clear();
        };

        for (line_count, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let (Some(seq_num), Some(times)) = (current_seq_num, current_times) {
                    flush(seq_num, times, &mut current_text);
                    current_seq_num = None;
                    current_times = None;
                }
                continue;
            }

            // Try to parse as sequence number (only if we're starting a new entry)
            if current_seq_num.is_none() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
            }

            // Try to parse as timestamp
            if current_seq_num.is_some() && current_times.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    let start = SubtitleEntry::parse_timestamp(&format!("{}:{}:{},{}", &caps[1], &caps[2], &caps[3], &caps[4]))?;
                    let end = SubtitleEntry::parse_timestamp(&format!("{}:{}:{},{}", &caps[5], &caps[6], &caps[7], &caps[8]))?;
                    current_times = Some((start, end));
                    continue;
                }
            }

            if current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!("Unexpected text at line {} before sequence number or timestamp: {}", line_count + 1, trimmed);
            }
        }

        // Add the last entry if there is one
        if let (Some(seq_num), Some(times)) = (current_seq_num, current_times) {
            flush(seq_num, times, &mut current_text);
        }

        if entries.is_empty() {
            return Err(anyhow::anyhow!("No valid subtitle entries were found in the SRT content"));
        }

        Ok(entries)
    }
}
