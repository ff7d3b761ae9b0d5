//! Crate-level error types for linkcheck.

use std::path::PathBuf;

/// All errors in linkcheck carry enough context to produce a useful
/// diagnostic without a debugger. Only fatal conditions become errors;
/// per-document read and write failures are warned and counted instead,
/// so one bad file never aborts the run.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The CSV report file could not be written.
    #[error("cannot write csv report: {}: {reason}", path.display())]
    CsvWrite {
        /// Destination path of the CSV report.
        path: PathBuf,
        /// Description of the write failure.
        reason: String,
    },

    /// The content root exists but contains no markdown documents.
    #[error("no markdown documents found under {}", root.display())]
    EmptyTree {
        /// Content root that was scanned.
        root: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// The content root does not exist or is not a directory.
    #[error("content root is not a directory: {}", root.display())]
    RootNotFound {
        /// Content root path given on the command line.
        root: PathBuf,
    },

    /// TOML deserialization of the config file failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
