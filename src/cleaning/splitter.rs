use log::debug;

// @module: Splitting a raw dump into post blocks

/// One post record cut out of a raw dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// 1-based position among the non-empty segments of the dump
    pub index: usize,

    /// Lines between two separators, joined with '\n'
    pub text: String,
}

/// Split a document on lines that equal `separator` once trimmed.
///
/// Segments that are empty or whitespace-only are discarded, so leading or
/// trailing separators never produce boundary blocks. Order is preserved and
/// indices are assigned after discarding.
pub fn split_blocks(document: &str, separator: &str) -> Vec<Block> {
    let separator = separator.trim();
    let mut segments: Vec<Vec<&str>> = vec![Vec::new()];

    for line in document.lines() {
        if line.trim() == separator {
            segments.push(Vec::new());
        } else if let Some(current) = segments.last_mut() {
            current.push(line);
        }
    }

    let total_segments = segments.len();
    let blocks: Vec<Block> = segments
        .into_iter()
        .map(|lines| lines.join("\n"))
        .filter(|text| !text.trim().is_empty())
        .enumerate()
        .map(|(i, text)| Block { index: i + 1, text })
        .collect();

    debug!("Split document into {} segments, {} non-empty blocks", total_segments, blocks.len());

    blocks
}
