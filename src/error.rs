use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning snapshot files into a [`SourceReport`].
///
/// Every variant carries the path that caused it so the CLI can report
/// exactly which input was rejected.
///
/// [`SourceReport`]: crate::data::model::SourceReport
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path does not exist or is neither a file nor a directory.
    #[error("invalid path: {}", path.display())]
    InvalidPath { path: PathBuf },

    /// The file exists but could not be read as text.
    #[error("cannot read {}: {source}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file name does not start with a `YYYY_MM_DD_HH_MM_SS` timestamp.
    #[error("malformed timestamp in file name: {}", path.display())]
    MalformedTimestamp { path: PathBuf },

    /// A directory holds no files with the snapshot suffix.
    #[error("no snapshot files matching '*{suffix}' in {}", path.display())]
    NoMatchingFiles { path: PathBuf, suffix: String },

    /// Export target has an extension we cannot write.
    #[error("unsupported export format: {}", path.display())]
    UnsupportedExport { path: PathBuf },

    /// Creating or writing the export file failed.
    #[error("failed to write {}: {source}", path.display())]
    ExportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the JSON export failed.
    #[error("failed to write JSON to {}: {source}", path.display())]
    ExportJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing a CSV record failed.
    #[error("failed to write CSV to {}: {source}", path.display())]
    ExportCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    /// The offending path, whatever the variant.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::InvalidPath { path }
            | LoadError::UnreadableFile { path, .. }
            | LoadError::MalformedTimestamp { path }
            | LoadError::NoMatchingFiles { path, .. }
            | LoadError::UnsupportedExport { path }
            | LoadError::ExportIo { path, .. }
            | LoadError::ExportJson { path, .. }
            | LoadError::ExportCsv { path, .. } => path,
        }
    }
}
