//! tidyname - a small file organization utility
//!
//! This library scans a directory, classifies files by extension, proposes tidy names
//! for them (from the first words of text files or their lowercased stem), and moves
//! them into category subfolders without ever overwriting an existing file. The same
//! operations are exposed as callable tools returning a JSON result envelope.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod file_record;
pub mod naming;
pub mod output;
pub mod scanner;
pub mod tools;

pub use config::{CompiledFilters, Config, ConfigError};
pub use file_category::{Category, Classifier};
pub use file_organizer::{
    CategoryFiles, FileListing, FileOrganizer, OrganizeError, OrganizeResult, PlannedMove,
    unique_name,
};
pub use file_record::{FileRecord, TextEncoding};
pub use naming::{HeuristicNamer, Namer, sanitize_filename};
pub use tools::{ErrorCode, ToolCall, ToolResult};

pub use cli::{Cli, Command, run_cli};
