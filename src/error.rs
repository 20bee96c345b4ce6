//! Error types for encode and decode operations.

use std::path::PathBuf;

use thiserror::Error;

/// Error variants for compressor operations.
///
/// Each operation is a single deterministic pass: nothing is retried, and
/// a failure aborts the current step. Output written before the failure is
/// not rolled back, so callers should treat a partially written file as
/// invalid and remove it.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error on the input, output, or dictionary file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Tokenization produced no symbols; there is nothing to encode.
    #[error("input produced no symbols")]
    EmptyInput,

    /// A Huffman tree was requested from an empty frequency table.
    #[error("frequency model is empty")]
    EmptyModel,

    /// The fixed-size archive header could not be read in full.
    #[error("archive header truncated")]
    CorruptHeader,

    /// The serialized tree or the encoded body ended early or walked off
    /// the tree.
    #[error("corrupt archive: {0}")]
    CorruptTree(&'static str),

    /// The file does not carry the archive extension.
    #[error("unrecognized archive extension: {}", .0.display())]
    Format(PathBuf),

    /// A tokenized symbol has no entry in the code table. Unreachable
    /// through the encode pipeline, which derives codes from the same
    /// token sequence it writes.
    #[error("symbol missing from code table")]
    UnknownSymbol,
}

/// A specialized Result type for compressor operations.
pub type Result<T> = std::result::Result<T, Error>;
