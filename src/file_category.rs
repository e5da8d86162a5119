/// File categorization by extension.
///
/// This module maps file extensions to the category folders files are organized into
/// ("images", "documents", "audio", "video", "others"). Classification looks at the
/// file name only; contents are never sniffed.
///
/// # Examples
///
/// ```
/// use tidyname::file_category::{Category, Classifier};
///
/// let classifier = Classifier::default();
/// assert_eq!(classifier.classify(".jpg"), Category::Images);
/// assert_eq!(classifier.classify("PDF"), Category::Documents);
/// assert_eq!(classifier.classify(".xyz"), Category::Others);
/// ```
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A category folder a file can be placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    /// Image files (JPG, PNG)
    #[serde(rename = "images")]
    Images,
    /// Document files (TXT, PDF, DOCX, XLSX, CSV)
    #[serde(rename = "documents")]
    Documents,
    /// Audio files (MP3, WAV)
    #[serde(rename = "audio")]
    Audio,
    /// Video files (MP4)
    #[serde(rename = "video")]
    Video,
    /// Anything not listed in the extension table
    #[serde(rename = "others")]
    Others,
}

impl Category {
    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyname::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Others.dir_name(), "others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Others => "others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Maps file extensions to categories.
///
/// The table is fixed at construction and never mutated afterwards, so a single
/// classifier can be shared for the whole process.
#[derive(Debug, Clone)]
pub struct Classifier {
    extension_map: HashMap<&'static str, Category>,
}

impl Classifier {
    /// Creates a classifier holding the standard extension table.
    pub fn new() -> Self {
        let table = [
            ("jpg", Category::Images),
            ("png", Category::Images),
            ("txt", Category::Documents),
            ("pdf", Category::Documents),
            ("docx", Category::Documents),
            ("xlsx", Category::Documents),
            ("csv", Category::Documents),
            ("mp3", Category::Audio),
            ("wav", Category::Audio),
            ("mp4", Category::Video),
        ];

        Self {
            extension_map: table.into_iter().collect(),
        }
    }

    /// Looks up an extension, returning `None` when it is not in the table.
    ///
    /// The leading dot is optional and matching is case-insensitive.
    pub fn lookup(&self, ext: &str) -> Option<Category> {
        let normalized = ext.trim_start_matches('.').to_lowercase();
        self.extension_map.get(normalized.as_str()).copied()
    }

    /// Classifies an extension, falling back to [`Category::Others`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyname::file_category::{Category, Classifier};
    ///
    /// let classifier = Classifier::default();
    /// assert_eq!(classifier.classify(".JPG"), Category::Images);
    /// assert_eq!(classifier.classify(""), Category::Others);
    /// ```
    pub fn classify(&self, ext: &str) -> Category {
        self.lookup(ext).unwrap_or(Category::Others)
    }

    /// Classifies a path by its final suffix.
    pub fn classify_path(&self, path: &Path) -> Category {
        path.extension()
            .map(|ext| self.classify(&ext.to_string_lossy()))
            .unwrap_or(Category::Others)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Images.dir_name(), "images");
        assert_eq!(Category::Documents.dir_name(), "documents");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Video.dir_name(), "video");
        assert_eq!(Category::Others.dir_name(), "others");
    }

    #[test]
    fn test_classify_standard_table() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(".jpg"), Category::Images);
        assert_eq!(classifier.classify(".png"), Category::Images);
        assert_eq!(classifier.classify(".pdf"), Category::Documents);
        assert_eq!(classifier.classify(".csv"), Category::Documents);
        assert_eq!(classifier.classify(".mp3"), Category::Audio);
        assert_eq!(classifier.classify(".mp4"), Category::Video);
    }

    #[test]
    fn test_classify_unknown_defaults_to_others() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(".xyz"), Category::Others);
        assert_eq!(classifier.classify(""), Category::Others);
        // Only a single video extension is listed
        assert_eq!(classifier.classify(".mkv"), Category::Others);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify(".JPG"), Category::Images);
        assert_eq!(classifier.classify(".Mp3"), Category::Audio);
        assert_eq!(classifier.lookup("PDF"), Some(Category::Documents));
    }

    #[test]
    fn test_classify_path() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify_path(Path::new("/tmp/Holiday.PNG")),
            Category::Images
        );
        assert_eq!(
            classifier.classify_path(Path::new("archive.tar.gz")),
            Category::Others
        );
        assert_eq!(classifier.classify_path(Path::new("Makefile")), Category::Others);
    }

    #[test]
    fn test_category_serializes_as_dir_name() {
        let json = serde_json::to_string(&Category::Documents).unwrap();
        assert_eq!(json, "\"documents\"");
    }
}
