//! Error types for huffword.
//!
//! All operations return structured errors rather than panicking. Errors are
//! surfaced to the caller unmodified; the core never recovers silently from a
//! malformed container.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Input: the source or configuration cannot be used as word data
/// - Container: magic number mismatch
/// - Dictionary: the serialized code table cannot be recovered
/// - Stream: bit traversal of the packed data failed
/// - Queue: internal invariant violation while building the tree
/// - I/O: reading the source or writing the sink
#[derive(Debug, Error)]
pub enum Error {
    /// Source or configuration is not usable as word data
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Container does not start with the expected magic number
    #[error("bad magic number: expected {expected:?}, got {actual:?}")]
    BadMagicNumber { expected: Vec<u8>, actual: Vec<u8> },

    /// Dictionary cannot be parsed into a valid prefix-free code table
    #[error("malformed dictionary: {0}")]
    MalformedDictionary(#[from] DictionaryError),

    /// Packed data does not decode under the container's dictionary
    #[error("corrupt stream: {0}")]
    CorruptStream(#[from] StreamError),

    /// Priority queue was asked for an element it does not have.
    ///
    /// Unreachable on valid inputs; indicates a programming error.
    #[error("priority queue is empty")]
    EmptyQueue,

    /// Source or sink I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Dictionary (serialized code table) errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DictionaryError {
    /// Dictionary ended in the middle of a field
    #[error("truncated dictionary: needed {needed} more bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// Bytes left over after the checksum
    #[error("{0} trailing bytes after dictionary checksum")]
    TrailingBytes(usize),

    /// CRC32 over the entries does not match the stored value
    #[error("dictionary checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// A word was assigned a zero-length code
    #[error("empty code for word {word:#x}")]
    EmptyCode { word: u64 },

    /// Code is longer than any code tree can produce
    #[error("code for word {word:#x} is {length} bits, maximum is {max}")]
    CodeTooLong { word: u64, length: usize, max: usize },

    /// Unused bits after a code are not zero
    #[error("nonzero padding after the code for word {word:#x}")]
    DirtyPadding { word: u64 },

    /// Same word listed twice
    #[error("duplicate word {word:#x}")]
    DuplicateWord { word: u64 },

    /// Entries are not in ascending word order
    #[error("word {word:#x} out of order after {previous:#x}")]
    Unordered { previous: u64, word: u64 },

    /// One code is a prefix of another
    #[error("code {prefix} is a prefix of code {code}")]
    NotPrefixFree { prefix: String, code: String },

    /// Length prefix exceeds what the declared source length allows
    #[error("dictionary length {length} exceeds maximum {max}")]
    TooLarge { length: u64, max: u64 },

    /// Container declares data but carries no codes
    #[error("no codes for {original_length} bytes of data")]
    Missing { original_length: u64 },

    /// Container declares no data but carries codes
    #[error("{entries} codes present for an empty source")]
    Unexpected { entries: usize },
}

/// Packed bit stream errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    /// Traversal hit a node without the child named by the next bit
    #[error("no code continues with bit {bit} at bit position {position}")]
    MissingChild { position: u64, bit: u8 },

    /// Data ended before the declared length was produced
    #[error("packed data ended after {decoded} of {expected} bytes")]
    UnexpectedEof { decoded: u64, expected: u64 },

    /// Whole bytes remain after the declared length was produced
    #[error("packed data continues past the declared length of {expected} bytes")]
    TrailingData { expected: u64 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
