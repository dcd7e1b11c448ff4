use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a scan or the confirmation step.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to access project root {}", .path.display())]
    ProjectRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to read directory {}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read source file {}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read confirmation answer")]
    Prompt(#[source] io::Error),
}

impl ScanError {
    /// Process exit code for this failure: 2 when the project itself could not be read.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScanError::Prompt(_) => 1,
            _ => 2,
        }
    }
}
