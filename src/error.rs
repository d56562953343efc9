use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can go wrong while inspecting or converting an archive.
///
/// Operations validate their arguments in a fixed order, so the first
/// applicable error is always the one reported: a missing path argument
/// beats a nonexistent file, which beats a decode failure.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required path argument was empty.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// The input archive path does not reference an existing file.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The archive exists but could not be opened or decoded.
    #[error("failed to read `{}`: {}", .path.display(), .source)]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The output file could not be produced.
    #[error("failed to write `{}`: {}", .path.display(), .source)]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ConvertError {
    pub(crate) fn read_failure(
        path: &Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        ConvertError::ReadFailure {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub(crate) fn write_failure(
        path: &Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        ConvertError::WriteFailure {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}
