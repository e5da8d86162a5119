//! Callable tool operations and their result envelope.
//!
//! Each tool takes a source folder and answers with a [`ToolResult`], which
//! serializes as `{"ok": true, "data": ...}` on success or
//! `{"ok": false, "error": {"code": ..., "message": ...}}` on failure. Every failure is
//! reported as [`ErrorCode::GeneralError`] with the error's message.

use crate::file_organizer::{CategoryFiles, FileListing, FileOrganizer};
use crate::naming::Namer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Machine-readable error codes carried by failed tool results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Any failure while running a tool.
    GeneralError,
    /// Reserved for source-folder validation; not produced yet.
    FileNotFound,
    /// Reserved for argument validation; not produced yet.
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Result envelope returned by every tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl<T> ToolResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ToolError {
                code,
                message: message.into(),
                details: None,
            }),
        }
    }

    /// Wraps an operation result, reporting any error as a general error.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => {
                warn!(error = %e, "tool failed");
                Self::failure(ErrorCode::GeneralError, e.to_string())
            }
        }
    }
}

impl<T: Serialize> ToolResult<T> {
    /// Converts the payload into a JSON value.
    pub fn into_json(self) -> ToolResult<Value> {
        match self.data.map(serde_json::to_value).transpose() {
            Ok(data) => ToolResult {
                ok: self.ok,
                data,
                error: self.error,
            },
            Err(e) => ToolResult::failure(ErrorCode::GeneralError, e.to_string()),
        }
    }
}

/// Organizes every file under `source_folder` into category folders.
pub fn organize_files<N: Namer>(
    organizer: &FileOrganizer<N>,
    source_folder: &Path,
) -> ToolResult<CategoryFiles> {
    debug!(source = %source_folder.display(), "organize_files");
    ToolResult::from_result(organizer.organize(source_folder))
}

/// Renames every file under `source_folder` in place.
pub fn change_file_names<N: Namer>(
    organizer: &FileOrganizer<N>,
    source_folder: &Path,
) -> ToolResult<Vec<String>> {
    debug!(source = %source_folder.display(), "change_file_names");
    ToolResult::from_result(organizer.rename_in_place(source_folder))
}

/// Same operation as [`organize_files`], kept under its historical tool name.
pub fn create_folders_and_move_files<N: Namer>(
    organizer: &FileOrganizer<N>,
    source_folder: &Path,
) -> ToolResult<CategoryFiles> {
    organize_files(organizer, source_folder)
}

/// Lists every file under `source_folder` with its extension and size.
pub fn scan_directory_and_list_files<N: Namer>(
    organizer: &FileOrganizer<N>,
    source_folder: &Path,
) -> ToolResult<Vec<FileListing>> {
    debug!(source = %source_folder.display(), "scan_directory_and_list_files");
    ToolResult::from_result(organizer.list_files(source_folder))
}

/// A tool invocation: the tool's name and the folder it works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    pub source_folder: PathBuf,
}

/// Names accepted by [`dispatch`].
pub const TOOL_NAMES: [&str; 4] = [
    "organize_files",
    "change_file_names",
    "create_folders_and_move_files",
    "scan_directory_and_list_files",
];

/// Runs the named tool, returning its envelope with a JSON payload.
///
/// An unknown tool name yields a general error.
pub fn dispatch<N: Namer>(organizer: &FileOrganizer<N>, call: &ToolCall) -> ToolResult<Value> {
    let source = call.source_folder.as_path();
    match call.tool.as_str() {
        "organize_files" => organize_files(organizer, source).into_json(),
        "change_file_names" => change_file_names(organizer, source).into_json(),
        "create_folders_and_move_files" => {
            create_folders_and_move_files(organizer, source).into_json()
        }
        "scan_directory_and_list_files" => {
            scan_directory_and_list_files(organizer, source).into_json()
        }
        other => ToolResult::failure(
            ErrorCode::GeneralError,
            format!(
                "Unknown tool '{}'; expected one of: {}",
                other,
                TOOL_NAMES.join(", ")
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_success_envelope_shape() {
        let result = ToolResult::success(vec!["a.txt".to_string()]);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"ok": true, "data": ["a.txt"]})
        );
    }

    #[test]
    fn test_failure_envelope_shape() {
        let result: ToolResult<Vec<String>> =
            ToolResult::failure(ErrorCode::GeneralError, "boom");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"ok": false, "error": {"code": "GENERAL_ERROR", "message": "boom"}})
        );
    }

    #[test]
    fn test_reserved_codes_serialize() {
        assert_eq!(
            serde_json::to_value(ErrorCode::FileNotFound).unwrap(),
            json!("FILE_NOT_FOUND")
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::InvalidInput).unwrap(),
            json!("INVALID_INPUT")
        );
    }

    #[test]
    fn test_missing_folder_is_general_error() {
        let organizer = FileOrganizer::new();
        let result = organize_files(&organizer, Path::new("/non/existent/path"));

        assert!(!result.ok);
        assert!(result.data.is_none());
        let error = result.error.expect("error should be set");
        assert_eq!(error.code, ErrorCode::GeneralError);
        assert!(error.message.contains("/non/existent/path"));
    }

    #[test]
    fn test_duplicate_entry_points_agree() {
        let first = TempDir::new().expect("Failed to create temp directory");
        let second = TempDir::new().expect("Failed to create temp directory");
        for dir in [first.path(), second.path()] {
            fs::write(dir.join("song.wav"), "x").unwrap();
            fs::write(dir.join("clip.mp4"), "x").unwrap();
        }

        let organizer = FileOrganizer::new();
        let a = organize_files(&organizer, first.path());
        let b = create_folders_and_move_files(&organizer, second.path());
        assert_eq!(a, b);
    }

    #[test]
    fn test_dispatch_routes_by_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("abc.xyz"), "1234").unwrap();

        let organizer = FileOrganizer::new();
        let call = ToolCall {
            tool: "scan_directory_and_list_files".to_string(),
            source_folder: temp_dir.path().to_path_buf(),
        };
        let result = dispatch(&organizer, &call);

        assert_eq!(
            result.data,
            Some(json!([{"name": "abc.xyz", "extension": ".xyz", "size": 4}]))
        );
    }

    #[test]
    fn test_dispatch_unknown_tool() {
        let organizer = FileOrganizer::new();
        let call = ToolCall {
            tool: "format_disk".to_string(),
            source_folder: PathBuf::from("."),
        };
        let result = dispatch(&organizer, &call);

        assert!(!result.ok);
        let error = result.error.unwrap();
        assert_eq!(error.code, ErrorCode::GeneralError);
        assert!(error.message.contains("format_disk"));
    }
}
