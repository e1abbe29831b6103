//! Error types for TOC generation.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. External error types (`std::io::Error`, `walkdir::Error`,
//! `binrw::Error`) are automatically converted via `From` impls.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while discovering, resolving, writing or reading a TOC.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (listing directories, reading file sizes, writing the TOC).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory walk failed (missing directory, permission denied).
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Failed to parse the fixed TOC header.
    #[error("TOC format error: {0}")]
    Format(#[from] binrw::Error),

    /// A discovery pass found nothing to index.
    ///
    /// Fatal for the base game unit. DLC units that only ship packed content
    /// report this and are skipped.
    #[error("There are no TOCable files in {0}")]
    NoTocableFiles(Utf8PathBuf),

    /// The given root or executable does not belong to a supported game.
    #[error("Not a supported Mass Effect game: {0}")]
    UnsupportedRoot(String),

    /// An indexed file does not fit the 32-bit size field of the TOC.
    #[error("File too large for TOC ({size} bytes): {path}")]
    FileTooLarge { path: Utf8PathBuf, size: u64 },

    /// A path could not be expressed relative to its TOC root.
    #[error("Invalid TOC path: {0}")]
    InvalidPath(String),
}

impl Error {
    /// Returns `true` if this is the "nothing to index" condition.
    pub fn is_no_tocable_files(&self) -> bool {
        matches!(self, Error::NoTocableFiles(_))
    }
}
