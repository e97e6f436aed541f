//! Fixed-width words and the byte source they are read from.
//!
//! A word is 1, 2, 4, or 8 bytes of the source read big-endian: the first
//! byte of a chunk is the most significant byte of the word. A short final
//! chunk is zero-padded on its trailing side, so writing the word back and
//! keeping only the leading bytes restores the original chunk.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};

use crate::error::{Error, Result};

/// The atomic unit of compression.
pub type Word = u64;

/// Supported word widths in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WordLength {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl WordLength {
    /// Every supported width, smallest first.
    pub const ALL: [WordLength; 4] = [
        WordLength::One,
        WordLength::Two,
        WordLength::Four,
        WordLength::Eight,
    ];

    /// Width in bytes.
    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Whether `word` is representable in this width.
    pub fn fits(self, word: Word) -> bool {
        self == WordLength::Eight || word >> (self.bytes() * 8) == 0
    }

    /// Build a word from up to `bytes()` bytes, zero-padding a short chunk.
    pub fn word_from_bytes(self, chunk: &[u8]) -> Word {
        debug_assert!(chunk.len() <= self.bytes());
        let mut buf = [0u8; 8];
        let start = 8 - self.bytes();
        buf[start..start + chunk.len()].copy_from_slice(chunk);
        u64::from_be_bytes(buf)
    }

    /// Write the leading `len` bytes of `word` (at most `bytes()`).
    pub fn write_word<W: Write>(self, word: Word, len: usize, sink: &mut W) -> io::Result<()> {
        debug_assert!(len <= self.bytes());
        let buf = word.to_be_bytes();
        let start = 8 - self.bytes();
        sink.write_all(&buf[start..start + len])
    }
}

impl TryFrom<u64> for WordLength {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self> {
        match value {
            1 => Ok(WordLength::One),
            2 => Ok(WordLength::Two),
            4 => Ok(WordLength::Four),
            8 => Ok(WordLength::Eight),
            other => Err(Error::InvalidInput(format!(
                "word length must be 1, 2, 4 or 8 bytes, got {other}"
            ))),
        }
    }
}

impl std::fmt::Display for WordLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bytes())
    }
}

/// Seekable byte source read in fixed-width words.
///
/// Wrap a `BufReader` around files; word iteration pulls a few bytes at a
/// time.
#[derive(Debug)]
pub struct WordSource<R> {
    inner: R,
    word_length: WordLength,
}

impl<R: Read + Seek> WordSource<R> {
    pub fn new(inner: R, word_length: WordLength) -> Self {
        Self { inner, word_length }
    }

    pub fn word_length(&self) -> WordLength {
        self.word_length
    }

    /// Read up to `n` bytes. Fewer are returned only at end of input.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let filled = fill(&mut self.inner, &mut buf)?;
        buf.truncate(filled);
        Ok(buf)
    }

    /// Move to an absolute byte offset.
    pub fn seek(&mut self, offset: u64) -> Result<u64> {
        Ok(self.inner.seek(SeekFrom::Start(offset))?)
    }

    /// Current byte offset.
    pub fn tell(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Total length in bytes. The current position is preserved.
    pub fn len(&mut self) -> Result<u64> {
        let position = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(position))?;
        Ok(end)
    }

    /// Iterate the remaining input as words.
    pub fn words(&mut self) -> Words<'_, R> {
        Words {
            inner: &mut self.inner,
            word_length: self.word_length,
            consumed: 0,
            done: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Iterator over the words of a [`WordSource`].
#[derive(Debug)]
pub struct Words<'a, R> {
    inner: &'a mut R,
    word_length: WordLength,
    consumed: u64,
    done: bool,
}

impl<R> Words<'_, R> {
    /// Source bytes consumed so far, excluding padding.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}

impl<R: Read> Iterator for Words<'_, R> {
    type Item = Result<Word>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = [0u8; 8];
        let chunk = &mut buf[..self.word_length.bytes()];
        let filled = match fill(&mut *self.inner, chunk) {
            Ok(filled) => filled,
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };

        if filled < chunk.len() {
            self.done = true;
        }
        if filled == 0 {
            return None;
        }

        self.consumed += filled as u64;
        Some(Ok(self.word_length.word_from_bytes(&chunk[..filled])))
    }
}

/// Read until `buf` is full or the reader is exhausted.
pub(crate) fn fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_word_length_try_from() {
        for width in WordLength::ALL {
            assert_eq!(WordLength::try_from(width.bytes() as u64).unwrap(), width);
        }
        assert!(matches!(WordLength::try_from(3), Err(Error::InvalidInput(_))));
        assert!(matches!(WordLength::try_from(0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_word_from_bytes_big_endian() {
        assert_eq!(WordLength::Two.word_from_bytes(&[0x12, 0x34]), 0x1234);
        assert_eq!(WordLength::Four.word_from_bytes(&[0xAB]), 0xAB00_0000);
        assert_eq!(WordLength::One.word_from_bytes(&[0xFF]), 0xFF);
    }

    #[test]
    fn test_write_word_truncates_low_order_bytes() {
        let mut out = Vec::new();
        WordLength::Four.write_word(0x4142_4300, 3, &mut out).unwrap();
        assert_eq!(out, b"ABC");
    }

    #[test]
    fn test_fits() {
        assert!(WordLength::One.fits(0xFF));
        assert!(!WordLength::One.fits(0x100));
        assert!(WordLength::Eight.fits(u64::MAX));
    }

    #[test]
    fn test_words_pad_final_chunk() {
        let mut source = WordSource::new(Cursor::new(b"ABCDEFG".to_vec()), WordLength::Four);
        let mut words = source.words();
        assert_eq!(words.next().unwrap().unwrap(), 0x4142_4344);
        assert_eq!(words.next().unwrap().unwrap(), 0x4546_4700);
        assert!(words.next().is_none());
        assert_eq!(words.consumed(), 7);
    }

    #[test]
    fn test_words_empty_source() {
        let mut source = WordSource::new(Cursor::new(Vec::new()), WordLength::Two);
        assert_eq!(source.words().count(), 0);
    }

    #[test]
    fn test_read_seek_tell_len() {
        let mut source = WordSource::new(Cursor::new(b"hello world".to_vec()), WordLength::One);
        assert_eq!(source.read(5).unwrap(), b"hello");
        assert_eq!(source.tell().unwrap(), 5);
        assert_eq!(source.len().unwrap(), 11);
        assert_eq!(source.tell().unwrap(), 5);

        source.seek(6).unwrap();
        assert_eq!(source.read(100).unwrap(), b"world");
        assert!(source.read(4).unwrap().is_empty());
    }
}
