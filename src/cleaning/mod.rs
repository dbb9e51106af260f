/*!
 * Splitting and cleaning of raw scraper dumps.
 *
 * A raw dump is a sequence of post records delimited by an exact separator
 * line, optionally preceded by a scraper log preamble. This module:
 * - `splitter`: cuts a dump into ordered blocks on the separator line
 * - `classifier`: decides per line whether it is noise or content
 * - `block_cleaner`: turns one block into a normalized, title-first text
 */

pub mod block_cleaner;
pub mod classifier;
pub mod splitter;

pub use block_cleaner::{BlockCleaner, NormalizedBlock};
pub use classifier::{ClassifiedLine, LineClassifier, LineRole};
pub use splitter::{Block, split_blocks};

/// Default line that separates post records in a dump
pub const DEFAULT_SEPARATOR: &str = "---POST_SEPARATOR---";

/// Marker opening the generated hashtags section
pub const HASHTAGS_MARKER: &str = "---HASHTAGS---";

/// Marker opening the shorts titles section
pub const SHORTS_TITLES_MARKER: &str = "---SHORTS_TITLES---";

/// Marker opening the shorts description section
pub const SHORTS_DESCRIPTION_MARKER: &str = "---SHORTS_DESCRIPTION---";

/// Markers whose section is removed up to the next blank line
pub const SECTION_MARKERS: [&str; 3] = [HASHTAGS_MARKER, SHORTS_TITLES_MARKER, SHORTS_DESCRIPTION_MARKER];

/// Line prefixes written by the scraper log preamble
pub const HEADER_PREFIXES: [&str; 4] = [
    "REDDIT SCRAPER LOG - Started:",
    "Subreddits:",
    "Filter:",
    "AI Cleaning:",
];

/// Prefix of the hoisted title line in a normalized block
pub const TITLE_PREFIX: &str = "Title: ";
