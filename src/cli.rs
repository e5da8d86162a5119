//! Command-line interface module for tidyname.
//!
//! This module handles:
//! - Argument parsing (clap)
//! - Configuration loading
//! - Running the tools and printing either a human summary or the JSON envelope
//! - The line-oriented JSON tool server

use crate::config::{CONFIG_ENV_VAR, Config};
use crate::file_category::Category;
use crate::file_organizer::{CategoryFiles, FileOrganizer};
use crate::naming::Namer;
use crate::output::OutputFormatter;
use crate::tools::{self, ErrorCode, ToolCall, ToolResult};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Classify files by extension, give them tidy names, and move them into category folders.
#[derive(Debug, Parser)]
#[command(name = "tidyname", version, about)]
pub struct Cli {
    /// Configuration file (defaults to $TIDYNAME_CONFIG, ./.tidynamerc.toml, ~/.config/tidyname/config.toml)
    #[arg(short, long, global = true, value_name = "FILE", env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Print the JSON result envelope instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Move every file into a category folder, renaming it on the way
    #[command(alias = "create-folders-and-move-files")]
    Organize {
        source_folder: PathBuf,

        /// Show what would happen without changing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Rename every file in place without moving it
    Rename { source_folder: PathBuf },
    /// List every file with its extension and size
    Scan { source_folder: PathBuf },
    /// Answer JSON tool calls, one per line on stdin, with one envelope per line on stdout
    Serve,
}

/// Runs the parsed command.
///
/// Returns `Err` with a message when the command failed; in JSON mode the failure
/// envelope has already been printed by then.
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e));
    let organizer = config.and_then(|config| {
        FileOrganizer::from_config(&config)
            .map_err(|e| format!("Error compiling filters: {}", e))
    });

    let organizer = match organizer {
        Ok(organizer) => organizer,
        Err(message) => {
            if cli.json {
                print_json(&ToolResult::<()>::failure(
                    ErrorCode::GeneralError,
                    message.clone(),
                ))?;
            }
            return Err(message);
        }
    };

    match &cli.command {
        Command::Organize {
            source_folder,
            dry_run: true,
        } => dry_run(&organizer, source_folder, cli.json),
        Command::Organize {
            source_folder,
            dry_run: false,
        } => organize(&organizer, source_folder, cli.json),
        Command::Rename { source_folder } => rename(&organizer, source_folder, cli.json),
        Command::Scan { source_folder } => scan(&organizer, source_folder, cli.json),
        Command::Serve => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            serve(&organizer, stdin.lock(), stdout.lock())
                .map(|handled| debug!(handled, "tool server stopped"))
                .map_err(|e| format!("Tool server I/O error: {}", e))
        }
    }
}

fn organize<N: Namer>(
    organizer: &FileOrganizer<N>,
    source_folder: &Path,
    json: bool,
) -> Result<(), String> {
    if !json {
        OutputFormatter::info(&format!("Organizing contents of: {}", source_folder.display()));
    }

    let result = tools::organize_files(organizer, source_folder);
    if json {
        return emit_json(&result);
    }

    let files = into_data(result)?;
    if files.is_empty() {
        OutputFormatter::warning("No files found to organize.");
        return Ok(());
    }
    for (category, names) in &files {
        for name in names {
            OutputFormatter::plain(&format!(" - {}/{}", category.dir_name(), name));
        }
    }
    OutputFormatter::summary_table(&counts(&files));
    OutputFormatter::success("Organization complete!");
    Ok(())
}

fn dry_run<N: Namer>(
    organizer: &FileOrganizer<N>,
    source_folder: &Path,
    json: bool,
) -> Result<(), String> {
    let result = ToolResult::from_result(organizer.plan(source_folder));
    if json {
        return emit_json(&result);
    }

    OutputFormatter::dry_run_notice(&format!(
        "Analyzing contents of: {}",
        source_folder.display()
    ));
    let moves = into_data(result)?;
    if moves.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    let mut category_counts: BTreeMap<Category, usize> = BTreeMap::new();
    for planned in &moves {
        let shown = planned
            .original_path
            .strip_prefix(source_folder)
            .unwrap_or(&planned.original_path);
        OutputFormatter::plain(&format!(
            " - {}\n   → Would move to {}/{}",
            shown.display(),
            planned.category.dir_name(),
            planned.file_name
        ));
        *category_counts.entry(planned.category).or_insert(0) += 1;
    }

    OutputFormatter::summary_table(&category_counts);
    OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");
    Ok(())
}

fn rename<N: Namer>(
    organizer: &FileOrganizer<N>,
    source_folder: &Path,
    json: bool,
) -> Result<(), String> {
    let result = tools::change_file_names(organizer, source_folder);
    if json {
        return emit_json(&result);
    }

    let names = into_data(result)?;
    for name in &names {
        OutputFormatter::plain(&format!(" - {}", name));
    }
    OutputFormatter::success(&format!("Renamed files: {}", names.len()));
    Ok(())
}

fn scan<N: Namer>(
    organizer: &FileOrganizer<N>,
    source_folder: &Path,
    json: bool,
) -> Result<(), String> {
    let result = tools::scan_directory_and_list_files(organizer, source_folder);
    if json {
        return emit_json(&result);
    }

    let listing = into_data(result)?;
    OutputFormatter::header(&format!("Files in {}", source_folder.display()));
    for entry in &listing {
        let extension = if entry.extension.is_empty() {
            "-"
        } else {
            entry.extension.as_str()
        };
        OutputFormatter::plain(&format!(
            " - {} [{}] {} bytes",
            entry.name, extension, entry.size
        ));
    }
    OutputFormatter::plain(&format!("Total files: {}", listing.len()));
    Ok(())
}

/// Answers tool calls read one JSON object per line until EOF.
///
/// Each request looks like `{"tool": "organize_files", "source_folder": "/some/dir"}`
/// and gets exactly one envelope line back. Blank lines are skipped; malformed
/// requests are answered with a general error. Returns the number of requests
/// answered.
///
/// # Errors
///
/// Only I/O errors on the reader or writer end the loop early.
pub fn serve<N, R, W>(organizer: &FileOrganizer<N>, reader: R, mut writer: W) -> io::Result<usize>
where
    N: Namer,
    R: BufRead,
    W: Write,
{
    let mut handled = 0;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ToolCall>(&line) {
            Ok(call) => {
                info!(tool = %call.tool, source = %call.source_folder.display(), "tool call");
                tools::dispatch(organizer, &call)
            }
            Err(e) => ToolResult::failure(
                ErrorCode::GeneralError,
                format!("Invalid tool call: {}", e),
            ),
        };

        let encoded = serde_json::to_string(&response).map_err(io::Error::other)?;
        writeln!(writer, "{}", encoded)?;
        writer.flush()?;
        handled += 1;
    }

    Ok(handled)
}

fn counts(files: &CategoryFiles) -> BTreeMap<Category, usize> {
    files
        .iter()
        .map(|(category, names)| (*category, names.len()))
        .collect()
}

/// Takes the payload out of an envelope, or its error message.
fn into_data<T>(result: ToolResult<T>) -> Result<T, String> {
    match (result.data, result.error) {
        (Some(data), None) => Ok(data),
        (_, Some(error)) => Err(error.message),
        (None, None) => Err("Tool returned no data".to_string()),
    }
}

/// Prints an envelope as JSON, failing the command if the envelope is a failure.
fn emit_json<T: Serialize>(result: &ToolResult<T>) -> Result<(), String> {
    print_json(result)?;
    match &result.error {
        Some(error) => Err(error.message.clone()),
        None => Ok(()),
    }
}

fn print_json<T: Serialize>(result: &ToolResult<T>) -> Result<(), String> {
    let encoded = serde_json::to_string_pretty(result)
        .map_err(|e| format!("Could not encode result: {}", e))?;
    println!("{}", encoded);
    Ok(())
}
