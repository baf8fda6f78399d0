use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PyfilesError {
    #[error("did not find a *.dist-info/RECORD file under: {}", format_paths(.searched))]
    RecordNotFound { searched: Vec<PathBuf> },

    #[error("multiple *.dist-info/RECORD files found (ambiguous install): {}", format_paths(.found))]
    MultipleRecords { found: Vec<PathBuf> },

    #[error("invalid argument: {token}")]
    InvalidArgument { token: String },

    #[error(
        "attempted to select a namespaced package {segment} in {pattern}: \
         dotted globs are not supported, use {segment} instead"
    )]
    NamespacedPattern { pattern: String, segment: String },

    #[error("globs did not match any module: {}", .patterns.join(", "))]
    UnusedPatterns { patterns: Vec<String> },

    #[error("invalid Python version '{value}': expected MAJOR.MINOR")]
    InvalidPythonVersion { value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PyfilesError>;

impl PyfilesError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RecordNotFound { .. } => 2,
            Self::MultipleRecords { .. } => 3,
            Self::InvalidArgument { .. }
            | Self::NamespacedPattern { .. }
            | Self::InvalidPythonVersion { .. } => 4,
            Self::UnusedPatterns { .. } => 5,
            _ => 1,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
