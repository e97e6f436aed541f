//! huffword-core: Huffman compression over fixed-width words
//!
//! The source is read as a sequence of 1, 2, 4 or 8 byte words rather than
//! single bytes. Each distinct word gets a prefix-free bit code, and the
//! result is written as a self-describing container:
//! - Compressor: counts word frequencies, builds the code tree, and streams
//!   packed codes to the sink
//! - Decompressor: parses the header, rebuilds the tree from the dictionary,
//!   and decodes bit by bit
//!
//! # Architecture
//!
//! - `word`: word widths and the word-by-word source reader
//! - `heap`: stable min-priority queue used by the tree builder
//! - `tree`: code tree construction and code table extraction
//! - `code`: bit-string codes and the word-to-code table
//! - `dictionary`: code table serialization
//! - `bitio`: bit-level reading and writing
//! - `container`: header layout
//! - `codec`: the compression and decompression passes
//! - `metrics`: per-run statistics
//!
//! # Example
//! ```
//! use huffword_core::{compress, decompress, WordLength};
//!
//! let data = b"abababababcd".to_vec();
//! let container = compress(&data, WordLength::Two).unwrap();
//! assert_eq!(decompress(&container).unwrap(), data);
//! ```
//!
//! Output is deterministic: the same input and word length always produce
//! the same container bytes.

pub mod bitio;
pub mod code;
pub mod codec;
pub mod container;
pub mod dictionary;
pub mod error;
pub mod heap;
pub mod metrics;
pub mod tree;
pub mod word;

pub use code::{Code, CodeTable};
pub use codec::{compress, decompress, Compressor, Decompressor};
pub use container::Header;
pub use error::{DictionaryError, Error, Result, StreamError};
pub use metrics::{Direction, Stats};
pub use word::{Word, WordLength};
