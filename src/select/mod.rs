//! Selection of the documents to lint
//!
//! An explicit file list always wins over scanning. Files named in the list
//! that cannot be found are skipped with a warning; they never abort a run.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Extensions picked up by a directory scan (compared lowercased)
pub const OPENAPI_EXTENSIONS: [&str; 3] = [".yaml", ".yml", ".json"];

/// Files chosen for a run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "selected files should be validated"]
pub struct FileSelection {
    /// Regular files to validate
    pub files: Vec<PathBuf>,
    /// Explicitly named entries that were not regular files
    pub skipped: Vec<PathBuf>,
}

impl FileSelection {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Choose the files to validate.
///
/// With a non-empty `files` list each entry is resolved (relative entries
/// against `input_dir`) and kept only if it is an existing regular file.
/// Otherwise `input_dir` is scanned recursively for `.yaml`, `.yml` and
/// `.json` files, visiting directory entries in file-name order. Nothing
/// found is not an error.
pub fn select_files(input_dir: Option<&Path>, files: &[String]) -> FileSelection {
    if !files.is_empty() {
        return select_named(input_dir, files);
    }

    match input_dir {
        Some(dir) if dir.is_dir() => FileSelection {
            files: scan_directory(dir),
            skipped: Vec::new(),
        },
        _ => FileSelection::default(),
    }
}

fn select_named(input_dir: Option<&Path>, files: &[String]) -> FileSelection {
    let mut selection = FileSelection::default();

    for name in files {
        let candidate = Path::new(name);
        let path = match input_dir {
            Some(dir) if !candidate.is_absolute() => dir.join(candidate),
            _ => candidate.to_path_buf(),
        };

        if path.is_file() {
            selection.files.push(path);
        } else {
            warn!("Specified file not found: {}", path.display());
            selection.skipped.push(path);
        }
    }

    selection
}

fn scan_directory(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry while scanning {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_openapi_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Whether a file name carries one of the scanned extensions
pub fn is_openapi_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();
    OPENAPI_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
