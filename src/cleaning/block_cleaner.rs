use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::TITLE_PREFIX;
use super::classifier::{ClassifiedLine, LineClassifier, LineRole, is_header_line};
use crate::app_config::CleaningConfig;

// @module: Cleaning a single block into normalized text

// @const: Question-style openings that mark a post title
static TITLE_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(am i|was i|would i be|wibta|would i be the asshole)").expect("valid title regex")
});

/// Lines containing "aita" only count as titles below this length
const SHORT_TITLE_LIMIT: usize = 100;

/// Cleaned text of one block: an optional hoisted title followed by body lines.
///
/// Invariant: no body line is a separator, header, section marker, gender tag,
/// hashtag line or blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBlock {
    pub title: Option<String>,
    pub body: Vec<String>,
}

impl NormalizedBlock {
    /// Rendered text as written to the block file
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.body.len() + 2);
        if let Some(title) = &self.title {
            lines.push(format!("{}{}", TITLE_PREFIX, title));
            lines.push(String::new());
        }
        lines.extend(self.body.iter().cloned());
        lines.join("\n")
    }
}

impl fmt::Display for NormalizedBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Scan state for removing multi-line hashtag/shorts sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Normal,
    SkippingSection,
}

impl SectionState {
    /// Advance over one line, returning the next state and whether the line is kept.
    ///
    /// The marker line itself is dropped. The blank line or separator that ends a
    /// skipped section is kept.
    pub fn step(self, role: LineRole) -> (SectionState, bool) {
        match self {
            SectionState::Normal if role.starts_skip_section() => (SectionState::SkippingSection, false),
            SectionState::Normal => (SectionState::Normal, true),
            SectionState::SkippingSection if role.ends_skip_section() => (SectionState::Normal, true),
            SectionState::SkippingSection => (SectionState::SkippingSection, false),
        }
    }
}

/// Turns raw blocks into normalized blocks
#[derive(Debug, Clone)]
pub struct BlockCleaner {
    classifier: LineClassifier,
    header_scan_lines: usize,
    title_scan_lines: usize,
}

impl Default for BlockCleaner {
    fn default() -> Self {
        Self::new(&CleaningConfig::default())
    }
}

impl BlockCleaner {
    /// Create a cleaner from the cleaning configuration
    pub fn new(config: &CleaningConfig) -> Self {
        Self {
            classifier: LineClassifier::new(config.separator.clone()),
            header_scan_lines: config.header_scan_lines,
            title_scan_lines: config.title_scan_lines,
        }
    }

    /// The classifier used for every line
    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Clean one block. `None` means the block has nothing worth keeping.
    pub fn clean(&self, block: &str) -> Option<NormalizedBlock> {
        let lines: Vec<&str> = block.lines().collect();

        if lines.is_empty() || self.is_log_preamble(&lines) {
            debug!("Dropping block: empty or scraper log preamble");
            return None;
        }

        let classified: Vec<ClassifiedLine> = self
            .remove_skip_sections(&lines)
            .into_iter()
            .map(|line| self.classifier.classify(line))
            .collect();

        // Phase 1: locate the title without touching the lines
        let title = self.find_title(&classified);

        // Phase 2: keep content, suppressing every occurrence of the hoisted title
        let body = self.collect_body(classified, title.as_deref());

        if title.is_none() && body.is_empty() {
            debug!("Dropping block: no content left after cleaning");
            return None;
        }

        Some(NormalizedBlock { title, body })
    }

    /// Whether any of the first lines belongs to the scraper log preamble
    pub fn is_log_preamble(&self, lines: &[&str]) -> bool {
        lines
            .iter()
            .take(self.header_scan_lines)
            .any(|line| is_header_line(line))
    }

    /// Drop every multi-line section opened by a marker, up to the next blank line
    pub fn remove_skip_sections<'a>(&self, lines: &[&'a str]) -> Vec<&'a str> {
        let mut state = SectionState::Normal;
        let mut kept = Vec::with_capacity(lines.len());

        for line in lines {
            let (next, keep) = state.step(self.classifier.section_role(line));
            state = next;
            if keep {
                kept.push(*line);
            }
        }

        kept
    }

    /// First title among the leading lines, already stripped of any `Title:` prefix.
    ///
    /// Noise and blank lines count toward the window.
    fn find_title(&self, lines: &[ClassifiedLine]) -> Option<String> {
        lines
            .iter()
            .take(self.title_scan_lines)
            .filter(|line| matches!(line.role, LineRole::Content | LineRole::TitleMarker))
            .find(|line| is_title_line(&line.text))
            .map(|line| title_key(&line.text).to_string())
    }

    /// Content lines of the body, without the hoisted title.
    ///
    /// Without a hoisted title, title-like lines are also dropped until the
    /// first `title_scan_lines` body lines are filled, so cleaning the output
    /// again never hoists one.
    fn collect_body(&self, lines: Vec<ClassifiedLine>, title: Option<&str>) -> Vec<String> {
        let mut guarded_slots = if title.is_none() { self.title_scan_lines } else { 0 };
        let mut body = Vec::new();

        for line in lines {
            if line.role != LineRole::Content {
                continue;
            }
            if title.is_some_and(|t| title_key(&line.text) == t) {
                continue;
            }
            if guarded_slots > 0 {
                if is_title_line(&line.text) {
                    debug!("Dropping stray title line outside the title window: {}", line.text);
                    continue;
                }
                guarded_slots -= 1;
            }
            body.push(line.text);
        }

        body
    }
}

/// Title heuristic for AITA-style posts. An already hoisted `Title:` line counts too.
pub fn is_title_line(line: &str) -> bool {
    let trimmed = line.trim();

    if trimmed.starts_with(TITLE_PREFIX.trim_end()) {
        return !title_key(trimmed).is_empty();
    }

    let lower = trimmed.to_lowercase();
    lower.starts_with("am i the asshole")
        || lower.starts_with("aita")
        || lower.contains("am i the asshole")
        || (lower.contains("aita") && lower.chars().count() < SHORT_TITLE_LIMIT)
        || TITLE_OPENING.is_match(&lower)
}

/// Text a line would contribute as a title
pub fn title_key(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .strip_prefix(TITLE_PREFIX.trim_end())
        .map(str::trim)
        .unwrap_or(trimmed)
}
