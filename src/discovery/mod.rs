//! Batch mode: maps every test-data file under the tests directory to the
//! source file generated from it.

mod utils;

pub use utils::{strip_tdata_extension, to_include_path, walk_test_data_files, TDATA_EXTENSION};

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::IoError;

/// One test-data file found under the tests directory. Both paths are
/// relative to their directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDataFile {
    pub infile: PathBuf,
    pub outfile: PathBuf,
    /// Header the file is named after (`str/str.h.tdata` tests `str/str.h`).
    pub header: Option<String>,
}

impl TestDataFile {
    pub fn from_relative(infile: &Path, output_extension: &str) -> Self {
        let stripped = strip_tdata_extension(infile);
        let header = stripped
            .extension()
            .is_some_and(|ext| ext == "h")
            .then(|| to_include_path(&stripped));

        let mut outfile = stripped.into_os_string();
        outfile.push(".");
        outfile.push(output_extension);

        Self {
            infile: infile.to_path_buf(),
            outfile: PathBuf::from(outfile),
            header,
        }
    }
}

pub fn discover(tests_dir: &Path, output_extension: &str) -> Result<Vec<TestDataFile>, IoError> {
    let files = walk_test_data_files(tests_dir)?
        .into_iter()
        .filter_map(|path| {
            path.strip_prefix(tests_dir)
                .ok()
                .map(|relative| TestDataFile::from_relative(relative, output_extension))
        })
        .collect::<Vec<_>>();

    debug!(dir = %tests_dir.display(), count = files.len(), "discovered test-data files");
    Ok(files)
}
