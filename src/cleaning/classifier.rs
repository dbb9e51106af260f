use once_cell::sync::Lazy;
use regex::Regex;

use super::{DEFAULT_SEPARATOR, HEADER_PREFIXES, SECTION_MARKERS};

// @module: Per-line noise classification

// @const: Whole-line gender/category tag such as <<MALE>>
static GENDER_TAG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<<[A-Z]+>>$").expect("valid gender tag regex")
});

// @const: Any hashtag token; a line containing one is dropped whole
static HASHTAG_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#\S+").expect("valid hashtag regex")
});

// @const: Hashtag fragment with a gap, e.g. "# drama"
static INLINE_HASHTAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#\s*\w+").expect("valid inline hashtag regex")
});

// @const: Gender tag inside a line, including the " ." the correction service appends
static INLINE_GENDER_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<<[A-Z]+>>\s*\.?\s*").expect("valid inline gender tag regex")
});

const TITLE_MARKER_PREFIXES: [&str; 2] = ["Am I the asshole", "AITA"];

/// Role of a single line inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// The record separator line
    Separator,
    /// A scraper log preamble line
    Header,
    /// Opens a hashtags / shorts section that is skipped up to the next blank line
    SectionMarker,
    /// A whole-line `<<WORD>>` tag
    GenderTag,
    /// A line containing a hashtag token anywhere
    Hashtag,
    /// A line starting with an AITA-style phrase; only usable as the block title
    TitleMarker,
    /// Empty or whitespace-only, possibly after stripping inline fragments
    Blank,
    /// Everything else
    Content,
}

impl LineRole {
    /// Noise lines never appear in the body of a normalized block
    pub fn is_noise(self) -> bool {
        !matches!(self, LineRole::Content)
    }

    /// Whether this line switches the cleaner into skip-section mode
    pub fn starts_skip_section(self) -> bool {
        matches!(self, LineRole::SectionMarker)
    }

    /// Whether this line ends a skipped section
    pub fn ends_skip_section(self) -> bool {
        matches!(self, LineRole::Blank | LineRole::Separator)
    }
}

/// A line together with its role and normalized text.
///
/// `text` is empty for structural noise. For `Content` and `TitleMarker` it is
/// the line with inline hashtag fragments and gender tags removed; leading and
/// inner whitespace are preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub role: LineRole,
    pub text: String,
}

impl ClassifiedLine {
    fn noise(role: LineRole) -> Self {
        Self { role, text: String::new() }
    }
}

/// Stateless line classifier bound to one separator token
#[derive(Debug, Clone)]
pub struct LineClassifier {
    separator: String,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl LineClassifier {
    /// Create a classifier for the given separator token
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into().trim().to_string(),
        }
    }

    /// The separator token this classifier matches
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Exact (trimmed) separator match; a line merely containing the token does not count
    pub fn is_separator(&self, line: &str) -> bool {
        line.trim() == self.separator
    }

    /// Role of a raw line for skip-section tracking.
    ///
    /// Only the untouched trimmed text counts here: a line such as `# 1` that
    /// normalizes to nothing is not a blank line and does not end a section.
    pub fn section_role(&self, line: &str) -> LineRole {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            LineRole::Blank
        } else if trimmed == self.separator {
            LineRole::Separator
        } else if is_section_marker(trimmed) {
            LineRole::SectionMarker
        } else {
            LineRole::Content
        }
    }

    /// Classify one line. First matching rule wins.
    pub fn classify(&self, line: &str) -> ClassifiedLine {
        if let Some(role) = self.structural_role(line) {
            return ClassifiedLine::noise(role);
        }

        let normalized = normalize_inline(line);

        // Stripping may expose a different kind of line, so classify the result again
        if let Some(role) = self.structural_role(&normalized) {
            return ClassifiedLine::noise(role);
        }

        if is_title_marker(&normalized) {
            return ClassifiedLine { role: LineRole::TitleMarker, text: normalized };
        }

        ClassifiedLine { role: LineRole::Content, text: normalized }
    }

    fn structural_role(&self, line: &str) -> Option<LineRole> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            Some(LineRole::Blank)
        } else if trimmed == self.separator {
            Some(LineRole::Separator)
        } else if is_header_line(trimmed) {
            Some(LineRole::Header)
        } else if is_section_marker(trimmed) {
            Some(LineRole::SectionMarker)
        } else if GENDER_TAG_LINE.is_match(trimmed) {
            Some(LineRole::GenderTag)
        } else if HASHTAG_TOKEN.is_match(trimmed) {
            Some(LineRole::Hashtag)
        } else {
            None
        }
    }
}

/// Whether a line starts with one of the scraper log header prefixes
pub fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim();
    HEADER_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
}

/// Whether a line is exactly one of the skip-section markers
pub fn is_section_marker(line: &str) -> bool {
    let trimmed = line.trim();
    SECTION_MARKERS.iter().any(|marker| trimmed == *marker)
}

/// Whether a line starts with an AITA-style title phrase (case-sensitive)
pub fn is_title_marker(line: &str) -> bool {
    let trimmed = line.trim();
    TITLE_MARKER_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
}

/// Remove inline gender tags and hashtag fragments until nothing changes.
///
/// A single substitution pass can join text into a new fragment
/// (`<<A# x>>` becomes `<<A>>`), so the passes repeat to a fixpoint. Every
/// change shortens the string, which bounds the loop.
pub fn normalize_inline(line: &str) -> String {
    let mut current = line.trim_end_matches(['\r', '\n']).to_string();
    loop {
        let without_tags = INLINE_GENDER_TAG.replace_all(&current, "");
        let next = INLINE_HASHTAG.replace_all(&without_tags, "").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}
