//! Proposing and sanitizing new file names.

use crate::file_record::FileRecord;
use regex::Regex;
use std::sync::LazyLock;

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s-]").expect("unsafe character pattern is valid")
});

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Makes a string safe to use as a file name component.
///
/// Every character that is not a word character, whitespace or a hyphen is removed,
/// runs of whitespace become a single underscore, and leading/trailing underscores
/// are trimmed. The result may be empty.
///
/// # Examples
///
/// ```
/// use tidyname::naming::sanitize_filename;
///
/// assert_eq!(sanitize_filename("file_#1@"), "file_1");
/// assert_eq!(sanitize_filename("  my   report - final "), "my_report_-_final");
/// assert_eq!(sanitize_filename("@#$"), "");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let stripped = UNSAFE_CHARS.replace_all(name, "");
    let collapsed = WHITESPACE_RUNS.replace_all(&stripped, "_");
    collapsed.trim_matches('_').to_string()
}

/// Strategy for proposing a new base name for a file.
///
/// Implementations receive the record (with content attached when it could be read)
/// and return a base name without extension. The result is sanitized by the caller.
pub trait Namer {
    fn propose(&self, record: &FileRecord) -> String;
}

/// Names files after the first few words of their text, or their lowercased stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicNamer {
    pub word_count: usize,
}

impl HeuristicNamer {
    pub const DEFAULT_WORD_COUNT: usize = 3;

    pub fn new(word_count: usize) -> Self {
        Self { word_count }
    }
}

impl Default for HeuristicNamer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WORD_COUNT)
    }
}

impl Namer for HeuristicNamer {
    fn propose(&self, record: &FileRecord) -> String {
        if let Some(content) = &record.content {
            let words: Vec<&str> = content.split_whitespace().take(self.word_count).collect();
            if !words.is_empty() {
                return words.join("_").to_lowercase();
            }
        }

        record.stem.to_lowercase()
    }
}
