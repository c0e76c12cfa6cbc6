//! SubRip codec.
//!
//! Parsing is permissive: blocks without a numeric index or a valid
//! timestamp line are skipped. Timestamps are validated but kept as the
//! exact strings found in the file.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::SubtitleError;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Blank line, possibly containing stray whitespace.
static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("Invalid block separator regex"));

/// `HH:MM:SS,mmm --> HH:MM:SS,mmm`, comma or dot before the millis.
static TIMING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2}[,.]\d{3})")
        .expect("Invalid timing line regex")
});

/// One timed cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    pub index: u32,
    pub start: String,
    pub end: String,
    /// Cue text; multi-line cues keep their `\n` separators.
    pub text: String,
}

/// Ordered cues of one subtitle file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    entries: Vec<SubtitleEntry>,
}

impl SubtitleDocument {
    pub fn new(entries: Vec<SubtitleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse SubRip content into a document.
///
/// A leading byte-order mark is ignored and CRLF line endings are accepted.
/// Never fails; unparsable blocks are dropped.
pub fn parse(content: &str) -> SubtitleDocument {
    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return SubtitleDocument::default();
    }

    let entries = BLOCK_SEPARATOR
        .split(trimmed)
        .filter_map(parse_block)
        .collect();

    SubtitleDocument::new(entries)
}

fn parse_block(block: &str) -> Option<SubtitleEntry> {
    let lines: Vec<&str> = block.trim().split('\n').collect();
    if lines.len() < 3 {
        return None;
    }

    let index = lines[0].trim().parse::<u32>().ok()?;
    let timing = TIMING_LINE.captures(lines[1].trim())?;

    Some(SubtitleEntry {
        index,
        start: timing[1].to_string(),
        end: timing[2].to_string(),
        text: lines[2..].join("\n"),
    })
}

/// Render a document as SubRip text ending in exactly one newline.
pub fn write(doc: &SubtitleDocument) -> String {
    let blocks: Vec<String> = doc
        .entries
        .iter()
        .map(|e| format!("{}\n{} --> {}\n{}", e.index, e.start, e.end, e.text))
        .collect();
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Read and parse a subtitle file. The file must be valid UTF-8.
pub fn read_file(path: &Path) -> Result<SubtitleDocument, SubtitleError> {
    let content = std::fs::read_to_string(path).map_err(|source| SubtitleError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&content))
}

/// Write a document as UTF-8 without a byte-order mark.
pub fn write_file(path: &Path, doc: &SubtitleDocument) -> Result<(), SubtitleError> {
    std::fs::write(path, write(doc)).map_err(|source| SubtitleError::Write {
        path: path.to_path_buf(),
        source,
    })
}
