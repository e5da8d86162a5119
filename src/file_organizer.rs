/// File organization: naming, collision-free renaming and moving into category folders.
///
/// One organize pass scans the source folder, classifies every file by extension,
/// proposes a tidy base name for it, finds a name that is free in the category folder
/// and moves the file there. Passes are sequential and keep no state between runs.
use crate::config::{CompiledFilters, Config, ConfigError, NamingConfig};
use crate::file_category::{Category, Classifier};
use crate::file_record::{FileRecord, read_text_content};
use crate::naming::{HeuristicNamer, Namer, sanitize_filename};
use crate::scanner::scan_directory;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Base name used when a proposed name sanitizes to nothing.
pub const FALLBACK_BASE_NAME: &str = "unnamed";

/// Final file names placed in each category folder during one pass, in visit order.
pub type CategoryFiles = BTreeMap<Category, Vec<String>>;

/// Errors that can occur during file organization.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The source folder, or a directory below it, could not be listed.
    #[error("Failed to scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read metadata for {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Where a single file goes during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    /// The path the scan found the file at.
    pub original_path: PathBuf,
    /// The full destination path.
    pub destination: PathBuf,
    /// The category folder the file goes to.
    pub category: Category,
    /// Final file name, including the extension, as text.
    pub file_name: String,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileListing {
    pub name: String,
    /// Final suffix with its leading dot, as written on disk (empty if none).
    pub extension: String,
    /// Size in bytes.
    pub size: u64,
}

/// Whether anything, including a dangling symlink, already sits at `path`.
fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Returns a base name such that `<name><extension>` does not exist in `folder`.
///
/// Tries `base_name` first, then `base_name_1`, `base_name_2`, and so on. The check
/// and the later use of the name are not atomic; passes are expected to run one at a
/// time.
///
/// # Examples
///
/// ```
/// use tidyname::file_organizer::unique_name;
///
/// let folder = std::env::temp_dir().join("tidyname-doc-unique-name-missing");
/// assert_eq!(unique_name(&folder, "a", ".txt"), "a");
/// ```
pub fn unique_name(folder: &Path, base_name: &str, extension: impl AsRef<OsStr>) -> String {
    unique_name_with(folder, base_name, extension, path_occupied)
}

/// Like [`unique_name`], with the occupancy check supplied by the caller.
pub fn unique_name_with<E, F>(folder: &Path, base_name: &str, extension: E, occupied: F) -> String
where
    E: AsRef<OsStr>,
    F: Fn(&Path) -> bool,
{
    let file_name = |candidate: &str| {
        let mut name = OsString::from(candidate);
        name.push(extension.as_ref());
        name
    };
    let mut candidate = base_name.to_string();
    let mut counter: u64 = 1;

    while occupied(&folder.join(file_name(&candidate))) {
        candidate = format!("{}_{}", base_name, counter);
        counter += 1;
    }

    candidate
}

/// Organizes files into category folders, renaming them on the way.
///
/// Generic over the naming strategy; [`HeuristicNamer`] is used unless another
/// [`Namer`] is supplied with [`FileOrganizer::with_namer`].
#[derive(Debug, Clone)]
pub struct FileOrganizer<N = HeuristicNamer> {
    classifier: Classifier,
    namer: N,
    naming: NamingConfig,
    filters: CompiledFilters,
}

impl FileOrganizer<HeuristicNamer> {
    /// Creates an organizer with the built-in naming rules and no filters.
    pub fn new() -> Self {
        Self {
            classifier: Classifier::default(),
            namer: HeuristicNamer::default(),
            naming: NamingConfig::default(),
            filters: CompiledFilters::allow_all(),
        }
    }

    /// Creates an organizer from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured filter patterns do not compile.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: Classifier::default(),
            namer: config.namer(),
            naming: config.naming.clone(),
            filters: config.compile_filters()?,
        })
    }
}

impl Default for FileOrganizer<HeuristicNamer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Namer> FileOrganizer<N> {
    /// Replaces the naming strategy.
    pub fn with_namer<M: Namer>(self, namer: M) -> FileOrganizer<M> {
        FileOrganizer {
            classifier: self.classifier,
            namer,
            naming: self.naming,
            filters: self.filters,
        }
    }

    /// Lists the files a pass over `source` would visit.
    pub fn scan(&self, source: &Path) -> OrganizeResult<Vec<PathBuf>> {
        scan_directory(source, &self.filters)
    }

    /// Runs one organize pass over `source`.
    ///
    /// Every file found under `source` (subfolders included) is moved to
    /// `<source>/<category>/<name><suffix>`, where the name comes from the namer,
    /// is sanitized, and is made unique within the category folder. Each file is
    /// moved with a single rename, so it is never left half-way.
    ///
    /// Files already handled stay where they were put if a later file fails; the
    /// error for that file is returned and the pass stops.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tidyname::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let organizer = FileOrganizer::new();
    /// match organizer.organize(Path::new("/path/to/downloads")) {
    ///     Ok(result) => {
    ///         for (category, files) in &result {
    ///             println!("{}: {} file(s)", category, files.len());
    ///         }
    ///     }
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn organize(&self, source: &Path) -> OrganizeResult<CategoryFiles> {
        let files = self.scan(source)?;
        let mut result = CategoryFiles::new();

        for path in files {
            let category = self.classifier.classify_path(&path);
            let record = FileRecord::from_path(&path);
            let category_dir = source.join(category.dir_name());
            ensure_directory(&category_dir)?;

            let planned = self.plan_file(record, category, &category_dir, path_occupied);
            move_file(&planned.original_path, &planned.destination)?;

            debug!(
                from = %planned.original_path.display(),
                to = %planned.destination.display(),
                "moved file"
            );
            result
                .entry(planned.category)
                .or_default()
                .push(planned.file_name);
        }

        info!(
            source = %source.display(),
            files = result.values().map(Vec::len).sum::<usize>(),
            categories = result.len(),
            "organize pass complete"
        );
        Ok(result)
    }

    /// Works out what [`organize`](Self::organize) would do without touching anything.
    ///
    /// Collision checks see names taken and paths freed by earlier files of the same
    /// plan, so the plan matches what a real pass would produce on an unchanged tree.
    pub fn plan(&self, source: &Path) -> OrganizeResult<Vec<PlannedMove>> {
        let files = self.scan(source)?;
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut vacated: HashSet<PathBuf> = HashSet::new();
        let mut moves = Vec::with_capacity(files.len());

        for path in files {
            let category = self.classifier.classify_path(&path);
            let record = FileRecord::from_path(&path);
            let category_dir = source.join(category.dir_name());

            let planned = self.plan_file(record, category, &category_dir, |candidate| {
                claimed.contains(candidate)
                    || (!vacated.contains(candidate) && path_occupied(candidate))
            });

            vacated.insert(planned.original_path.clone());
            claimed.insert(planned.destination.clone());
            moves.push(planned);
        }

        Ok(moves)
    }

    /// Renames every file under `source` in place, without moving it.
    ///
    /// Names come from the namer with no content attached, then the sanitizer. A file
    /// whose name would not change is left alone; otherwise the new name is made
    /// unique within the file's own directory. Returns the resulting file names in
    /// scan order.
    pub fn rename_in_place(&self, source: &Path) -> OrganizeResult<Vec<String>> {
        let files = self.scan(source)?;
        let mut renamed = Vec::with_capacity(files.len());

        for path in files {
            let record = FileRecord::from_path(&path);
            let base_name = self.propose_name(&record);
            let current_name = path.file_name().unwrap_or_default();

            if record.file_name_with(&base_name) == current_name {
                debug!(path = %path.display(), "name already tidy");
                renamed.push(current_name.to_string_lossy().into_owned());
                continue;
            }

            let folder = path.parent().unwrap_or(source);
            let unique = unique_name(folder, &base_name, &record.suffix);
            let file_name = record.file_name_with(&unique);
            let new_path = folder.join(&file_name);

            move_file(&path, &new_path)?;
            debug!(from = %path.display(), to = %new_path.display(), "renamed file");
            renamed.push(file_name.to_string_lossy().into_owned());
        }

        info!(source = %source.display(), files = renamed.len(), "rename pass complete");
        Ok(renamed)
    }

    /// Lists every file under `source` with its extension and size.
    pub fn list_files(&self, source: &Path) -> OrganizeResult<Vec<FileListing>> {
        self.scan(source)?
            .into_iter()
            .map(|path| {
                let metadata = fs::metadata(&path).map_err(|e| OrganizeError::Metadata {
                    path: path.clone(),
                    source: e,
                })?;
                let record = FileRecord::from_path(&path);

                Ok(FileListing {
                    name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    extension: record.extension,
                    size: metadata.len(),
                })
            })
            .collect()
    }

    /// Sanitized proposal for a record, never empty.
    fn propose_name(&self, record: &FileRecord) -> String {
        let sanitized = sanitize_filename(&self.namer.propose(record));
        if sanitized.is_empty() {
            FALLBACK_BASE_NAME.to_string()
        } else {
            sanitized
        }
    }

    fn plan_file<F>(
        &self,
        record: FileRecord,
        category: Category,
        category_dir: &Path,
        occupied: F,
    ) -> PlannedMove
    where
        F: Fn(&Path) -> bool,
    {
        let content = if self.naming.is_text_extension(&record.extension) {
            read_text_content(&record.original_path, &self.naming.encodings)
        } else {
            None
        };
        let record = record.with_content(content);

        let base_name = self.propose_name(&record);
        let unique = unique_name_with(category_dir, &base_name, &record.suffix, occupied);
        let file_name = record.file_name_with(&unique);

        PlannedMove {
            destination: category_dir.join(&file_name),
            original_path: record.original_path,
            category,
            file_name: file_name.to_string_lossy().into_owned(),
        }
    }
}

/// Creates a directory and its parents if missing.
fn ensure_directory(path: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn move_file(from: &Path, to: &Path) -> OrganizeResult<()> {
    fs::rename(from, to).map_err(|e| OrganizeError::FileMoveFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}
