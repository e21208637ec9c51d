use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// Errors that can occur while sorting a line stream.
///
/// Every variant is fatal to the sort in progress; the only recovery the
/// sorter performs internally is spilling the current batch and retrying
/// once when an allocation fails.
#[derive(Debug, Error)]
pub enum SortError {
    /// Reading the input stream failed.
    #[error("error reading input: {0}")]
    Read(#[source] io::Error),

    /// A temporary run file could not be created.
    #[error("error creating a temporary run file ({0}) [out of disk space?]")]
    TempFile(#[source] io::Error),

    /// Writing a sorted run to its temporary file failed.
    #[error("error writing a sorted run ({0}) [disk full?]")]
    RunWrite(#[source] io::Error),

    /// Reading back a temporary run failed during a merge.
    #[error("error reading a temporary run: {0}")]
    RunRead(#[source] io::Error),

    /// The output could not be opened after the input was drained.
    #[error("cannot open output file: {0}")]
    OpenOutput(#[source] io::Error),

    /// Writing sorted output failed.
    #[error("error writing output ({0}) [disk full?]")]
    OutputWrite(#[source] io::Error),

    /// Out of memory even after spilling the current batch to disk.
    #[error("out of RAM while buffering input ({bytes} more bytes needed)")]
    OutOfMemory {
        /// The size of the allocation that failed.
        bytes: usize,
        #[source]
        source: TryReserveError,
    },
}

/// A specialized Result type for external sorting operations.
pub type Result<T> = std::result::Result<T, SortError>;
