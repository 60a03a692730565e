use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::IoError;

pub const TDATA_EXTENSION: &str = "tdata";

/// Every `*.tdata` file under `root` in file-name order. Hidden files and
/// directories are skipped.
pub fn walk_test_data_files(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry.map_err(|e| IoError::directory_scan_error(root, e))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == TDATA_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// `str/str.h.tdata` -> `str/str.h`
pub fn strip_tdata_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == TDATA_EXTENSION => path.with_extension(""),
        _ => path.to_path_buf(),
    }
}

/// Joins path components with `/`, the separator `#include` expects.
pub fn to_include_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
