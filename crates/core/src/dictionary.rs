//! Serialized form of the code table.
//!
//! # Dictionary Format
//!
//! All integers are big-endian.
//!
//! ```text
//! +----------------------+
//! | entry_count (8)      |  u64
//! +----------------------+
//! | word (W)             |  repeated entry_count times,
//! | code_len (2)         |  ascending word order, 1..=MAX_CODE_LEN
//! | code (ceil(len / 8)) |  bits MSB-first, zero-padded
//! +----------------------+
//! | crc32 (4)            |  CRC-32 of every byte above
//! +----------------------+
//! ```
//!
//! The container stores the dictionary behind a length prefix, so parsing
//! never scans for a terminator and code bytes may hold any value.

use crate::code::{Code, CodeTable};
use crate::error::{DictionaryError, Error, Result};
use crate::word::{Word, WordLength};

/// Longest code accepted in a dictionary.
///
/// A code of depth `d` needs a total weight of at least `F(d + 2)`
/// (Fibonacci), and word counts are `u64`, so no built tree is deeper than
/// 91. Rebuilt trees are bounded by this length as well.
pub const MAX_CODE_LEN: usize = 96;

/// Serialized size of one entry with the longest code, for `word_length`.
pub fn max_entry_len(word_length: WordLength) -> u64 {
    (word_length.bytes() + 2 + MAX_CODE_LEN.div_ceil(8)) as u64
}

/// Largest dictionary a source of `original_length` bytes can produce.
///
/// Every entry is a distinct word of the source, so the entry count is at
/// most the word count.
pub fn max_dictionary_len(original_length: u64, word_length: WordLength) -> u64 {
    let words = original_length.div_ceil(word_length.bytes() as u64);
    words
        .saturating_mul(max_entry_len(word_length))
        .saturating_add((8 + CRC_SIZE) as u64)
}

/// Size of the trailing checksum.
const CRC_SIZE: usize = 4;

/// Converts code tables to and from their serialized bytes for one word width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryCodec {
    word_length: WordLength,
}

impl DictionaryCodec {
    pub fn new(word_length: WordLength) -> Self {
        Self { word_length }
    }

    pub fn word_length(&self) -> WordLength {
        self.word_length
    }

    /// Serialize `table`.
    ///
    /// # Errors
    /// - `Error::InvalidInput` if a word is wider than the codec's word length
    /// - `Error::MalformedDictionary` if a code is empty or longer than
    ///   [`MAX_CODE_LEN`]
    pub fn serialize(&self, table: &CodeTable) -> Result<Vec<u8>> {
        let width = self.word_length.bytes();
        let mut out = Vec::with_capacity(8 + table.len() * (width + 3) + CRC_SIZE);
        out.extend_from_slice(&(table.len() as u64).to_be_bytes());

        for (&word, code) in table {
            if !self.word_length.fits(word) {
                return Err(Error::InvalidInput(format!(
                    "word {word:#x} does not fit in {width} bytes"
                )));
            }
            if code.is_empty() {
                return Err(DictionaryError::EmptyCode { word }.into());
            }
            if code.len() > MAX_CODE_LEN {
                return Err(DictionaryError::CodeTooLong {
                    word,
                    length: code.len(),
                    max: MAX_CODE_LEN,
                }
                .into());
            }

            out.extend_from_slice(&word.to_be_bytes()[8 - width..]);
            out.extend_from_slice(&(code.len() as u16).to_be_bytes());
            out.extend_from_slice(&code.to_packed());
        }

        let crc = crc32fast::hash(&out);
        out.extend_from_slice(&crc.to_be_bytes());
        Ok(out)
    }

    /// Parse a serialized dictionary back into a code table.
    ///
    /// # Errors
    /// Returns `Error::MalformedDictionary` if the bytes are truncated, carry
    /// trailing data, fail the checksum, or list words out of order or twice.
    /// Codes must be non-empty, at most [`MAX_CODE_LEN`] bits, zero-padded,
    /// and prefix-free.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<CodeTable> {
        let width = self.word_length.bytes();
        let mut reader = ByteReader::new(bytes);

        let count = u64::from_be_bytes(reader.array()?);
        let mut table = CodeTable::new();
        let mut previous: Option<Word> = None;

        for _ in 0..count {
            let word = self.word_length.word_from_bytes(reader.take(width)?);
            match previous {
                Some(prev) if prev == word => {
                    return Err(DictionaryError::DuplicateWord { word }.into());
                }
                Some(prev) if prev > word => {
                    return Err(DictionaryError::Unordered { previous: prev, word }.into());
                }
                _ => {}
            }
            previous = Some(word);

            let code_len = u16::from_be_bytes(reader.array()?) as usize;
            if code_len == 0 {
                return Err(DictionaryError::EmptyCode { word }.into());
            }
            if code_len > MAX_CODE_LEN {
                return Err(DictionaryError::CodeTooLong {
                    word,
                    length: code_len,
                    max: MAX_CODE_LEN,
                }
                .into());
            }
            let packed = reader.take(code_len.div_ceil(8))?;
            let code = Code::from_packed(packed, code_len);
            if code.to_packed() != packed {
                return Err(DictionaryError::DirtyPadding { word }.into());
            }
            table.insert(word, code);
        }

        let body_len = reader.position();
        let expected = u32::from_be_bytes(reader.array()?);
        if reader.remaining() > 0 {
            return Err(DictionaryError::TrailingBytes(reader.remaining()).into());
        }

        let actual = crc32fast::hash(&bytes[..body_len]);
        if actual != expected {
            return Err(DictionaryError::ChecksumMismatch { expected, actual }.into());
        }

        table.check_prefix_free()?;
        Ok(table)
    }
}

/// Bounds-checked cursor over the dictionary bytes.
struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn take(&mut self, n: usize) -> std::result::Result<&'a [u8], DictionaryError> {
        if self.remaining() < n {
            return Err(DictionaryError::Truncated {
                offset: self.position,
                needed: n - self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> std::result::Result<[u8; N], DictionaryError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn position(&self) -> usize {
        self.position
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}
