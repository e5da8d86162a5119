//! Per-file records and best-effort text extraction.
//!
//! A [`FileRecord`] is built for each file during a pass and dropped afterwards.
//! Text content is read by trying a list of encodings in order; the first one that
//! decodes the whole file wins, and running out of encodings simply means the file
//! has no content.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file seen during one organize pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Where the file was found by the scan.
    pub original_path: PathBuf,
    /// File name without its final suffix.
    pub stem: String,
    /// Final suffix including the leading dot, as text (may be empty).
    ///
    /// Bytes that are not valid UTF-8 are replaced; use [`suffix`](Self::suffix) when
    /// building names on disk.
    pub extension: String,
    /// Final suffix including the leading dot, byte for byte as on disk.
    pub suffix: OsString,
    /// Decoded text, for files whose extension is readable as text.
    pub content: Option<String>,
}

impl FileRecord {
    /// Builds a record from a path without reading any content.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidyname::file_record::FileRecord;
    /// use std::path::Path;
    ///
    /// let record = FileRecord::from_path(Path::new("/data/Report.Final.PDF"));
    /// assert_eq!(record.stem, "Report.Final");
    /// assert_eq!(record.extension, ".PDF");
    /// assert_eq!(record.content, None);
    /// ```
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = path
            .extension()
            .map(|e| {
                let mut suffix = OsString::from(".");
                suffix.push(e);
                suffix
            })
            .unwrap_or_default();

        Self {
            original_path: path.to_path_buf(),
            stem,
            extension: suffix.to_string_lossy().into_owned(),
            suffix,
            content: None,
        }
    }

    /// Attaches decoded content to this record.
    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = content;
        self
    }

    /// The file name this record would have with a different base name.
    ///
    /// The suffix is kept exactly as it is on disk.
    pub fn file_name_with(&self, base_name: &str) -> OsString {
        let mut name = OsString::from(base_name);
        name.push(&self.suffix);
        name
    }
}

/// Text encodings tried when reading file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    /// UTF-16 with an optional byte-order mark; little-endian when there is none.
    #[serde(rename = "utf-16", alias = "utf16")]
    Utf16,
    /// ISO-8859-1. Every byte sequence is valid.
    #[serde(rename = "latin1", alias = "latin-1", alias = "iso-8859-1")]
    Latin1,
}

impl TextEncoding {
    /// The order encodings are tried in unless configured otherwise.
    pub const DEFAULT_ORDER: [TextEncoding; 3] =
        [TextEncoding::Utf8, TextEncoding::Utf16, TextEncoding::Latin1];

    /// Decodes the whole buffer, or returns `None` if it is not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Utf16 => decode_utf16(bytes),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (body, big_endian) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        _ => (bytes, false),
    };

    if body.len() % 2 != 0 {
        return None;
    }

    let units = body.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });

    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .ok()
}

/// Reads a file as text, trying each encoding in order.
///
/// Returns `None` when the file cannot be read or no encoding decodes it. Neither
/// case is an error for the caller.
pub fn read_text_content(path: &Path, encodings: &[TextEncoding]) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read file content");
            return None;
        }
    };

    for encoding in encodings {
        if let Some(text) = encoding.decode(&bytes) {
            debug!(path = %path.display(), ?encoding, "decoded file content");
            return Some(text);
        }
        debug!(path = %path.display(), ?encoding, "decode attempt failed");
    }

    warn!(path = %path.display(), "no encoding could decode file content");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_path_splits_stem_and_extension() {
        let record = FileRecord::from_path(Path::new("dir/archive.tar.gz"));
        assert_eq!(record.stem, "archive.tar");
        assert_eq!(record.extension, ".gz");
        assert_eq!(record.file_name_with("backup"), "backup.gz");
    }

    #[test]
    fn test_from_path_without_extension() {
        let record = FileRecord::from_path(Path::new("Makefile"));
        assert_eq!(record.stem, "Makefile");
        assert_eq!(record.extension, "");

        let hidden = FileRecord::from_path(Path::new(".bashrc"));
        assert_eq!(hidden.stem, ".bashrc");
        assert_eq!(hidden.extension, "");
    }

    #[test]
    fn test_extension_keeps_case() {
        let record = FileRecord::from_path(Path::new("photo.JPG"));
        assert_eq!(record.extension, ".JPG");
        assert_eq!(record.file_name_with("photo"), "photo.JPG");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_suffix_is_kept_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"Report.d\xffc");
        let record = FileRecord::from_path(Path::new(name));

        assert_eq!(record.suffix.as_bytes(), b".d\xffc");
        assert_eq!(record.extension, ".d\u{fffd}c");
        assert_eq!(record.file_name_with("report").as_bytes(), b"report.d\xffc");
    }

    #[test]
    fn test_utf8_decodes_first() {
        let text = "héllo wörld";
        assert_eq!(
            TextEncoding::Utf8.decode(text.as_bytes()),
            Some(text.to_string())
        );
    }

    #[test]
    fn test_utf16_with_and_without_bom() {
        let le: Vec<u8> = "hi there"
            .encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .collect();
        assert_eq!(TextEncoding::Utf16.decode(&le), Some("hi there".to_string()));

        let mut be = vec![0xFE, 0xFF];
        be.extend("hi".encode_utf16().flat_map(|u| u.to_be_bytes()));
        assert_eq!(TextEncoding::Utf16.decode(&be), Some("hi".to_string()));
    }

    #[test]
    fn test_utf16_rejects_odd_length() {
        assert_eq!(TextEncoding::Utf16.decode(&[0x61, 0x00, 0x62]), None);
    }

    #[test]
    fn test_latin1_never_fails() {
        assert_eq!(
            TextEncoding::Latin1.decode(&[0x63, 0x61, 0x66, 0xE9]),
            Some("café".to_string())
        );
    }

    #[test]
    fn test_read_text_content_falls_back() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("notes.txt");
        // Invalid UTF-8 and odd length, so only latin1 succeeds
        fs::write(&path, [0x63, 0x61, 0x66, 0xE9, 0x21]).expect("Failed to write file");

        let content = read_text_content(&path, &TextEncoding::DEFAULT_ORDER);
        assert_eq!(content, Some("café!".to_string()));
    }

    #[test]
    fn test_read_text_content_exhausted_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, [0xFF, 0xFE, 0x00]).expect("Failed to write file");

        assert_eq!(
            read_text_content(&path, &[TextEncoding::Utf8, TextEncoding::Utf16]),
            None
        );
    }

    #[test]
    fn test_read_text_content_missing_file_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("missing.txt");
        assert_eq!(read_text_content(&path, &TextEncoding::DEFAULT_ORDER), None);
    }

    #[test]
    fn test_encoding_names_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            encodings: Vec<TextEncoding>,
        }
        let parsed: Wrapper =
            toml::from_str(r#"encodings = ["utf-8", "utf-16", "latin1"]"#).unwrap();
        assert_eq!(parsed.encodings, TextEncoding::DEFAULT_ORDER.to_vec());
    }
}
