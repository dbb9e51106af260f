use anyhow::{Result, Context};
use std::fs;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use log::{error, debug};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path of one cleaned block
    // @params: output_dir, source basename, 1-based block index
    pub fn block_output_path<P: AsRef<Path>>(output_dir: P, base_name: &str, index: usize) -> PathBuf {
        output_dir.as_ref().join(format!("{}_block_{}.txt", base_name, index))
    }

    // @generates: Subtitle path for a cleaned block file
    pub fn subtitle_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(block_file: P1, output_dir: P2) -> PathBuf {
        let stem = block_file.as_ref().file_stem().unwrap_or_default();
        let mut file_name = stem.to_os_string();
        file_name.push(".srt");
        output_dir.as_ref().join(file_name)
    }

    /// Find files directly inside `dir` with the given extension, sorted by name.
    ///
    /// When `name_contains` is set, only file names containing it are returned.
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str, name_contains: Option<&str>) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext_matches = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext));
            let name_matches = name_contains.is_none_or(|needle| {
                entry.file_name().to_string_lossy().contains(needle)
            });

            if ext_matches && name_matches {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// First candidate of `path`, `stem_001.ext`, `stem_002.ext`, ... for `attempt` 0, 1, 2, ...
    pub fn numbered_path<P: AsRef<Path>>(path: P, attempt: usize) -> PathBuf {
        let path = path.as_ref();
        if attempt == 0 {
            return path.to_path_buf();
        }

        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        let file_name = match path.extension() {
            Some(ext) => format!("{}_{:03}.{}", stem, attempt, ext.to_string_lossy()),
            None => format!("{}_{:03}", stem, attempt),
        };
        path.with_file_name(file_name)
    }

    /// Write a new file at `path` or the first free numbered variant of it.
    ///
    /// Files are opened with `create_new`, so an existing file is never replaced
    /// even if it appears between the check and the write.
    pub fn write_unique<P: AsRef<Path>>(path: P, content: &str) -> Result<PathBuf> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        let mut attempt = 0;
        loop {
            let candidate = Self::numbered_path(path, attempt);
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())
                        .with_context(|| format!("Failed to write to file: {:?}", candidate))?;
                    return Ok(candidate);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{:?} already exists, trying next suffix", candidate);
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to create file: {:?}", candidate));
                }
            }
        }
    }

    /// Delete files with the given extension directly inside `dir`.
    ///
    /// Failures on single files are logged and skipped; returns how many were removed.
    pub fn clear_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<usize> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow::anyhow!("Folder {:?} not found", dir));
        }

        let mut removed = 0;
        for path in Self::find_files(dir, extension, None)? {
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Deleted: {:?}", path);
                    removed += 1;
                }
                Err(e) => error!("Error deleting file {:?}: {}", path, e),
            }
        }

        Ok(removed)
    }
}
