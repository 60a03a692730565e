use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory '{path}': {source}")]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to scan directory '{path}': {source}")]
    DirectoryScanError {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl IoError {
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }

    pub fn create_dir_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDirError {
            path: path.into(),
            source,
        }
    }

    pub fn directory_scan_error(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::DirectoryScanError {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_display() {
        let source = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = IoError::read_error("tests/str.tdata", source);
        assert!(err
            .to_string()
            .starts_with("failed to read file 'tests/str.tdata': "));
    }

    #[test]
    fn test_create_dir_error_display() {
        let source = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let err = IoError::create_dir_error("build/tests", source);
        assert!(err
            .to_string()
            .starts_with("failed to create directory 'build/tests': "));
    }
}
