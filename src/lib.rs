/*!
 * # postcue
 *
 * Turns scraped post dumps into cleaned text blocks and narration subtitles.
 *
 * ## Features
 *
 * - Split raw dumps on an exact separator line, dropping the scraper log preamble
 * - Remove noise: separators, headers, gender tags, hashtags, generated sections
 * - Hoist an AITA-style title to the front of each block
 * - Optionally correct each block through an OpenAI-compatible chat API (Groq)
 * - Chunk blocks into length-bounded subtitle cues on a fixed time grid
 * - Never overwrite an existing subtitle file
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management and credential lookup
 * - `cleaning`: Block splitting, line classification and block cleaning
 * - `subtitle_processor`: Cue chunking, timing and SRT reading/writing
 * - `file_utils`: File system operations
 * - `app_controller`: Folder-level orchestration of both stages
 * - `providers`: Text-correction clients (`providers::groq`, `providers::mock`)
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod cleaning;
pub mod file_utils;
pub mod subtitle_processor;
pub mod app_controller;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, CleanReport, SubtitleReport};
pub use cleaning::{BlockCleaner, NormalizedBlock, split_blocks};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry, chunk_text};
pub use errors::{AppError, PipelineError, ProviderError, SubtitleError};
