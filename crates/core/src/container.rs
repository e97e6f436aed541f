//! Container header serialization and parsing.
//!
//! A container packages the packed bit data with everything needed to decode
//! it: the original length, the word width, and the code table.
//!
//! # Container Format
//!
//! ```text
//! +----------------------+
//! | Magic (8 bytes)      |  "HUFFWORD"
//! +----------------------+
//! | original_length (8)  |  u64 big-endian, bytes in the source
//! +----------------------+
//! | word_length (8)      |  u64 big-endian, 1, 2, 4 or 8
//! +----------------------+
//! | dictionary_len (8)   |  u64 big-endian
//! +----------------------+
//! | dictionary           |  serialized code table (dictionary_len bytes)
//! | (variable)           |
//! +----------------------+
//! | packed bits          |  remaining bytes, MSB-first, zero-padded
//! | (variable)           |
//! +----------------------+
//! ```
//!
//! The header is parsed from a stream and leaves it positioned at the first
//! byte of packed data, so decoding never needs the whole container in memory.
//!
//! `dictionary_len` may not exceed [`max_dictionary_len`] for the declared
//! `original_length`. Writing and reading enforce the same bound.

use std::io::{Read, Write};

use crate::code::CodeTable;
use crate::dictionary::{max_dictionary_len, DictionaryCodec};
use crate::error::{DictionaryError, Error, Result};
use crate::word::{fill, WordLength};

/// Read size while loading the dictionary.
const DICTIONARY_CHUNK: u64 = 64 * 1024;

/// Magic number opening every container.
pub const MAGIC: [u8; 8] = *b"HUFFWORD";

/// Size of the header fields before the dictionary bytes.
const FIXED_HEADER_SIZE: u64 = 32;

/// Parsed container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Source length in bytes, excluding word padding
    pub original_length: u64,

    /// Width of each word
    pub word_length: WordLength,

    /// Code for every distinct word in the source
    pub code_table: CodeTable,
}

impl Header {
    /// Write the header and return the number of bytes written.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` if the dictionary is longer than any
    /// source of `original_length` bytes can produce.
    pub fn write<W: Write + ?Sized>(&self, sink: &mut W) -> Result<u64> {
        let dictionary = DictionaryCodec::new(self.word_length).serialize(&self.code_table)?;
        let max = max_dictionary_len(self.original_length, self.word_length);
        if dictionary.len() as u64 > max {
            return Err(Error::InvalidInput(format!(
                "dictionary of {} codes is too large for {} bytes of {}-byte words",
                self.code_table.len(),
                self.original_length,
                self.word_length
            )));
        }

        sink.write_all(&MAGIC)?;
        sink.write_all(&self.original_length.to_be_bytes())?;
        sink.write_all(&(self.word_length.bytes() as u64).to_be_bytes())?;
        sink.write_all(&(dictionary.len() as u64).to_be_bytes())?;
        sink.write_all(&dictionary)?;

        Ok(FIXED_HEADER_SIZE + dictionary.len() as u64)
    }

    /// Parse a header, returning it with the number of bytes consumed.
    ///
    /// # Errors
    /// - `Error::BadMagicNumber` if the stream does not open with [`MAGIC`]
    /// - `Error::InvalidInput` if the word length is not 1, 2, 4 or 8
    /// - `Error::MalformedDictionary` if the dictionary is oversized,
    ///   truncated, invalid, or disagrees with the original length
    /// - `Error::Io` if the stream ends inside the fixed fields
    pub fn read<R: Read>(source: &mut R) -> Result<(Self, u64)> {
        let mut magic = [0u8; MAGIC.len()];
        let filled = fill(source, &mut magic)?;
        if filled < MAGIC.len() || magic != MAGIC {
            return Err(Error::BadMagicNumber {
                expected: MAGIC.to_vec(),
                actual: magic[..filled].to_vec(),
            });
        }

        let original_length = read_u64(source)?;
        let word_length = WordLength::try_from(read_u64(source)?)?;

        let dictionary_len = read_u64(source)?;
        let max = max_dictionary_len(original_length, word_length);
        if dictionary_len > max {
            return Err(DictionaryError::TooLarge {
                length: dictionary_len,
                max,
            }
            .into());
        }

        let dictionary = read_dictionary(source, dictionary_len)?;

        let code_table = DictionaryCodec::new(word_length).deserialize(&dictionary)?;
        if original_length == 0 && !code_table.is_empty() {
            return Err(DictionaryError::Unexpected {
                entries: code_table.len(),
            }
            .into());
        }
        if original_length > 0 && code_table.is_empty() {
            return Err(DictionaryError::Missing { original_length }.into());
        }

        let header = Header {
            original_length,
            word_length,
            code_table,
        };
        Ok((header, FIXED_HEADER_SIZE + dictionary_len))
    }
}

/// Read exactly `len` bytes. The buffer grows with the bytes actually read,
/// not with the declared length.
fn read_dictionary<R: Read>(source: &mut R, len: u64) -> Result<Vec<u8>> {
    let mut dictionary = Vec::with_capacity(len.min(DICTIONARY_CHUNK) as usize);
    while (dictionary.len() as u64) < len {
        let start = dictionary.len();
        let step = (len - start as u64).min(DICTIONARY_CHUNK) as usize;
        dictionary.resize(start + step, 0);

        let filled = fill(source, &mut dictionary[start..])?;
        if filled < step {
            let offset = start + filled;
            return Err(DictionaryError::Truncated {
                offset,
                needed: (len - offset as u64) as usize,
            }
            .into());
        }
    }
    Ok(dictionary)
}

fn read_u64<R: Read>(source: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    source.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}
