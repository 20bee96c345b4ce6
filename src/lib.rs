//! # huffpack
//!
//! *Dictionary-aware Huffman compression for whole files.*
//!
//! ## Intuition First
//!
//! A Huffman coder spends fewer bits on what occurs often. Classic
//! byte-wise coding stops there: the alphabet is the 256 byte values and
//! a recurring word like `return` still costs six codes. `huffpack`
//! widens the alphabet instead. A configurable keyword dictionary feeds
//! a trie-based tokenizer that folds multi-byte sequences into single
//! symbols, so `return` can be one leaf of the tree and one code in the
//! stream. On structured text (source code, logs, config files) that is
//! where the extra compression comes from; on inputs the dictionary
//! never matches, the pipeline degrades gracefully to plain byte-wise
//! Huffman coding.
//!
//! ## Pipeline
//!
//! ```text
//! encode:  bytes -> Tokenizer -> FrequencyTable -> HuffmanTree
//!                -> header + tree + codes, bit-packed      (codec)
//! decode:  header -> HuffmanTree -> bit-by-bit walk -> bytes
//! ```
//!
//! Both directions share one bit-level I/O layer and the archive layout
//! is bit-exact, so conformant implementations interoperate. Coding is
//! static and whole-file: the entire input is buffered, tokenized and
//! counted before a single tree is built. Streaming operation and
//! adaptive coding are out of scope.
//!
//! ## Example
//!
//! ```
//! use huffpack::{decode_stream, encode_stream, Tokenizer};
//!
//! let tokenizer = Tokenizer::with_keywords(["fn ", "let "]);
//! let input = b"fn main() { let x = 1; }";
//!
//! let mut archive = Vec::new();
//! encode_stream(input, "rs", &tokenizer, &mut archive).unwrap();
//!
//! let mut restored = Vec::new();
//! let extension = decode_stream(archive.as_slice(), &mut restored).unwrap();
//! assert_eq!(extension, "rs");
//! assert_eq!(restored, input);
//! ```
//!
//! ## References
//!
//! - Huffman, D.A. (1952). "A Method for the Construction of
//!   Minimum-Redundancy Codes."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitio;
pub mod codec;
pub mod error;
pub mod huffman;
pub mod model;
pub mod tokenizer;

pub use bitio::{BitReader, BitWriter, Bits};
pub use codec::{decode_file, decode_stream, encode_file, encode_stream, ARCHIVE_EXTENSION};
pub use error::{Error, Result};
pub use huffman::{CodeTable, HuffmanTree};
pub use model::FrequencyTable;
pub use tokenizer::{Symbol, Tokenizer, MAX_SYMBOL_LEN};
