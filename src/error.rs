//! Error conditions for grammar construction and file-backed input sources.
//!
//! Parse failure itself is not an error — it is the `matched: false` value
//! the [`crate::driver`] returns. This enum only covers the conditions
//! spec §7 calls programmer errors or I/O failures.

use std::io;
use std::path::PathBuf;

/// Errors raised while building a grammar or opening an input source.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A repetition was configured with `min > max` while `max` is bounded.
    #[error("invalid repetition bounds: min={min} must not exceed max={max}")]
    InvalidRepetitionBounds { min: usize, max: usize },

    /// Opening or reading the backing file for a file-based input source failed.
    #[error("failed to open file source at {path}: {source}")]
    FileSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A zero-length buffer was requested for a file-backed input source.
    #[error("file source buffer size must be at least 1 element")]
    ZeroBufferSize,
}

pub type Result<T> = std::result::Result<T, Error>;
