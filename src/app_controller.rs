use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::{Config, CorrectionConfig, load_api_key};
use crate::cleaning::{BlockCleaner, NormalizedBlock, split_blocks};
use crate::errors::{PipelineError, SubtitleError};
use crate::file_utils::FileManager;
use crate::providers::TextCorrector;
use crate::providers::groq::Groq;
use crate::subtitle_processor::SubtitleCollection;

// @module: Application controller for the cleaning and subtitle stages

/// Marker every cleaned block file name carries
pub const BLOCK_FILE_MARKER: &str = "_block_";

/// Summary of one cleaning run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CleanReport {
    pub files_seen: usize,
    pub files_failed: usize,
    pub blocks_split: usize,
    pub blocks_written: usize,
    /// Blocks that cleaned to nothing
    pub blocks_skipped: usize,
    /// Blocks whose corrected text replaced the original
    pub blocks_corrected: usize,
    pub outputs: Vec<PathBuf>,
}

/// Summary of one subtitle run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubtitleReport {
    pub files_seen: usize,
    pub files_failed: usize,
    /// Block files that produced no cue
    pub files_skipped: usize,
    pub cues_written: usize,
    pub outputs: Vec<PathBuf>,
}

/// Cleaned blocks of one document, keyed by their 1-based split index
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CleanedDocument {
    pub blocks_split: usize,
    /// Blocks whose corrected text replaced the original
    pub blocks_corrected: usize,
    pub blocks: Vec<(usize, NormalizedBlock)>,
}

/// Main application controller
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    cleaner: BlockCleaner,
    corrector: Option<Box<dyn TextCorrector>>,
}

impl Controller {
    /// Create a controller without a correction service
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let cleaner = BlockCleaner::new(&config.cleaning);
        Ok(Self {
            config,
            cleaner,
            corrector: None,
        })
    }

    /// Create a controller for default settings
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Attach a correction service used by the cleaning stage
    pub fn with_corrector(mut self, corrector: Box<dyn TextCorrector>) -> Self {
        self.corrector = Some(corrector);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn has_corrector(&self) -> bool {
        self.corrector.is_some()
    }

    /// Build the configured correction client, or `None` when credentials are missing.
    ///
    /// A missing key disables correction for the run instead of failing it.
    pub fn build_corrector(config: &CorrectionConfig, base_dir: &Path) -> Option<Box<dyn TextCorrector>> {
        let api_key = match load_api_key(config, base_dir) {
            Ok(key) => key,
            Err(e) => {
                warn!("{}. Continuing without text correction", e);
                return None;
            }
        };

        match Groq::new(config, api_key) {
            Ok(client) => Some(Box::new(client)),
            Err(e) => {
                warn!("Failed to set up text correction: {}. Continuing without it", e);
                None
            }
        }
    }

    /// Split and clean one raw document
    pub async fn clean_document(&self, document: &str) -> CleanedDocument {
        let blocks = split_blocks(document, self.cleaner.classifier().separator());
        let mut cleaned = CleanedDocument {
            blocks_split: blocks.len(),
            blocks_corrected: 0,
            blocks: Vec::with_capacity(blocks.len()),
        };

        for block in blocks {
            let Some(normalized) = self.cleaner.clean(&block.text) else {
                debug!("Block {} is empty after cleaning, skipping", block.index);
                continue;
            };

            let normalized = match &self.corrector {
                Some(corrector) => match self.correct_block(corrector.as_ref(), block.index, &normalized).await {
                    Some(corrected) => {
                        cleaned.blocks_corrected += 1;
                        corrected
                    }
                    None => normalized,
                },
                None => normalized,
            };

            cleaned.blocks.push((block.index, normalized));
        }

        cleaned
    }

    /// Send a block through the corrector; `None` keeps the original text
    async fn correct_block(&self, corrector: &dyn TextCorrector, index: usize, block: &NormalizedBlock) -> Option<NormalizedBlock> {
        let reply = match corrector.correct(&block.text()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Correction via {} failed for block {}: {}. Keeping original text", corrector.name(), index, e);
                return None;
            }
        };

        if reply.trim().is_empty() {
            warn!("Correction via {} returned nothing for block {}. Keeping original text", corrector.name(), index);
            return None;
        }

        let corrected = self.cleaner.clean(&reply);
        if corrected.is_none() {
            warn!("Corrected text of block {} cleaned to nothing. Keeping original text", index);
        }
        corrected
    }

    /// Clean every input file of `input_dir` into per-block files in `output_dir`
    pub async fn clean_folder(&self, input_dir: &Path, output_dir: &Path) -> Result<CleanReport> {
        let start_time = Instant::now();
        let extension = self.config.cleaning.input_extension.as_str();

        if !FileManager::dir_exists(input_dir) {
            return Err(PipelineError::InputDirMissing(input_dir.to_path_buf()).into());
        }

        let input_files = FileManager::find_files(input_dir, extension, None)?;
        if input_files.is_empty() {
            return Err(PipelineError::NoInputFiles {
                dir: input_dir.to_path_buf(),
                pattern: format!("*.{}", extension),
            }.into());
        }

        FileManager::ensure_dir(output_dir)?;
        info!("Cleaning {} file(s) from {:?} into {:?}", input_files.len(), input_dir, output_dir);
        if let Some(corrector) = &self.corrector {
            info!("Text correction enabled via {}", corrector.name());
        }

        let folder_pb = Self::folder_progress_bar(input_files.len());
        let mut report = CleanReport::default();

        for input_file in &input_files {
            let file_name = Self::display_name(input_file);
            folder_pb.set_message(format!("Cleaning: {}", file_name));
            report.files_seen += 1;

            match self.clean_file(input_file, output_dir, &mut report).await {
                Ok(written) => info!("Processed {}: {} block file(s) written", file_name, written),
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    report.files_failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Cleaning complete");

        info!(
            "Cleaning completed in {}: {} file(s), {} block(s) split, {} written, {} empty, {} failed file(s)",
            Self::format_duration(start_time.elapsed()),
            report.files_seen,
            report.blocks_split,
            report.blocks_written,
            report.blocks_skipped,
            report.files_failed
        );

        Ok(report)
    }

    /// Clean one file, returning the number of block files written
    async fn clean_file(&self, input_file: &Path, output_dir: &Path, report: &mut CleanReport) -> Result<usize> {
        let document = FileManager::read_to_string(input_file)?;
        let base_name = input_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .context("Input file has no name")?;

        let cleaned = self.clean_document(&document).await;
        report.blocks_split += cleaned.blocks_split;
        report.blocks_skipped += cleaned.blocks_split - cleaned.blocks.len();
        report.blocks_corrected += cleaned.blocks_corrected;

        let mut written = 0;
        for (index, block) in &cleaned.blocks {
            let output_path = FileManager::block_output_path(output_dir, &base_name, *index);
            FileManager::write_to_file(&output_path, &block.text())?;
            debug!("Wrote {:?}", output_path);
            report.outputs.push(output_path);
            written += 1;
        }

        report.blocks_written += written;
        Ok(written)
    }

    /// Turn every cleaned block file of `input_dir` into a subtitle file in `output_dir`
    pub async fn subtitle_folder(&self, input_dir: &Path, output_dir: &Path) -> Result<SubtitleReport> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(PipelineError::InputDirMissing(input_dir.to_path_buf()).into());
        }

        let block_files = FileManager::find_files(input_dir, "txt", Some(BLOCK_FILE_MARKER))?;
        if block_files.is_empty() {
            return Err(PipelineError::NoInputFiles {
                dir: input_dir.to_path_buf(),
                pattern: format!("*{}*.txt", BLOCK_FILE_MARKER),
            }.into());
        }

        FileManager::ensure_dir(output_dir)?;
        info!("Creating subtitles for {} block file(s) into {:?}", block_files.len(), output_dir);

        let folder_pb = Self::folder_progress_bar(block_files.len());
        let mut report = SubtitleReport::default();

        for block_file in &block_files {
            let file_name = Self::display_name(block_file);
            folder_pb.set_message(format!("Subtitles: {}", file_name));
            report.files_seen += 1;

            match self.subtitle_file(block_file, output_dir) {
                Ok(Some((path, cue_count))) => {
                    info!("Created {:?} with {} cue(s)", path, cue_count);
                    report.cues_written += cue_count;
                    report.outputs.push(path);
                }
                Ok(None) => {
                    info!("No subtitle content in {}, skipping", file_name);
                    report.files_skipped += 1;
                }
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    report.files_failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Subtitles complete");

        info!(
            "Subtitles completed in {}: {} file(s) written, {} cue(s), {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            report.outputs.len(),
            report.cues_written,
            report.files_skipped,
            report.files_failed
        );

        Ok(report)
    }

    /// Chunk one block file and write it; `None` when it yields no cue
    fn subtitle_file(&self, block_file: &Path, output_dir: &Path) -> Result<Option<(PathBuf, usize)>> {
        let text = FileManager::read_to_string(block_file)?;

        let collection = match SubtitleCollection::from_normalized_text(block_file.to_path_buf(), &text, &self.config.subtitles) {
            Ok(collection) => collection,
            Err(SubtitleError::NoContent) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let target = FileManager::subtitle_output_path(block_file, output_dir);
        let written = collection.write_to_unique_srt(&target)?;
        Ok(Some((written, collection.entries.len())))
    }

    /// Clean the configured input folder, then subtitle the result
    pub async fn run_all(&self) -> Result<(CleanReport, SubtitleReport)> {
        let folders = &self.config.folders;
        let clean_report = self.clean_folder(&folders.input_dir, &folders.cleaned_dir).await?;
        let subtitle_report = self.subtitle_folder(&folders.cleaned_dir, &folders.subtitle_dir).await?;
        Ok((clean_report, subtitle_report))
    }

    /// Delete generated files of one extension
    pub fn clear(&self, dir: &Path, extension: &str) -> Result<usize> {
        let removed = FileManager::clear_files(dir, extension)?;
        info!("Deleted {} .{} file(s) from {:?}", removed, extension.trim_start_matches('.'), dir);
        Ok(removed)
    }

    fn folder_progress_bar(len: usize) -> ProgressBar {
        let folder_pb = ProgressBar::new(len as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Format a duration as `1h 2m 3s`, `2m 3s` or `3.042s`
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
