//! Compression and decompression passes.
//!
//! [`Compressor`] reads its source twice: once to count word frequencies and
//! build the code table, once to stream packed codes to the sink.
//! [`Decompressor`] parses the container header up front and then streams
//! decoded words from the packed data, driving the rebuilt code tree one bit
//! at a time.

use std::io::{BufWriter, Cursor, Read, Seek, SeekFrom, Write};

use log::{debug, log_enabled, trace, Level};

use crate::bitio::{BitReader, BitWriter};
use crate::code::CodeTable;
use crate::container::Header;
use crate::error::{Error, Result, StreamError};
use crate::metrics::{Direction, Stats};
use crate::tree::{CodeTree, FrequencyTable, Node};
use crate::word::{WordLength, WordSource};

/// Count every word of the source from its current position.
///
/// Returns the table and the number of source bytes read.
pub fn count_frequencies<R: Read + Seek>(source: &mut WordSource<R>) -> Result<(FrequencyTable, u64)> {
    let mut frequencies = FrequencyTable::new();
    let mut words = source.words();
    for word in words.by_ref() {
        *frequencies.entry(word?).or_insert(0) += 1;
    }
    Ok((frequencies, words.consumed()))
}

/// Compresses one source.
///
/// The source is compressed from the position it had when the compressor was
/// created, to its end.
#[derive(Debug)]
pub struct Compressor<R> {
    source: WordSource<R>,
    start: u64,
    original_length: u64,
    word_count: u64,
    code_table: CodeTable,
}

impl<R: Read + Seek> Compressor<R> {
    /// Scan `source` and build its code table.
    ///
    /// An empty source is accepted and produces an empty code table.
    pub fn new(source: R, word_length: WordLength) -> Result<Self> {
        let mut source = WordSource::new(source, word_length);
        let start = source.tell()?;
        let (frequencies, original_length) = count_frequencies(&mut source)?;
        let word_count = frequencies.values().sum();

        let code_table = if frequencies.is_empty() {
            CodeTable::new()
        } else {
            CodeTree::from_frequencies(&frequencies)?.code_table()
        };

        debug!(
            "scanned {} bytes as {} words of {} bytes, {} distinct",
            original_length,
            word_count,
            word_length,
            code_table.len()
        );
        if log_enabled!(Level::Trace) {
            trace!("code table: {}", code_table.render(word_length));
        }

        Ok(Self {
            source,
            start,
            original_length,
            word_count,
            code_table,
        })
    }

    pub fn word_length(&self) -> WordLength {
        self.source.word_length()
    }

    pub fn original_length(&self) -> u64 {
        self.original_length
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.code_table
    }

    /// Write a full container: header followed by the packed data.
    pub fn compress<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<Stats> {
        let header = Header {
            original_length: self.original_length,
            word_length: self.word_length(),
            code_table: self.code_table.clone(),
        };

        let mut stats = self.new_stats();
        stats.header_bytes = header.write(sink)?;
        self.write_data(sink, &mut stats)?;
        stats.complete();

        debug!(
            "compressed {} bytes into {} ({} header)",
            stats.original_bytes,
            stats.container_bytes(),
            stats.header_bytes
        );
        Ok(stats)
    }

    /// Write only the packed data, without a header.
    ///
    /// The output cannot be decompressed on its own; the caller must carry
    /// the code table, word length, and original length separately.
    pub fn compress_data_only<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<Stats> {
        let mut stats = self.new_stats();
        self.write_data(sink, &mut stats)?;
        stats.complete();
        Ok(stats)
    }

    fn new_stats(&self) -> Stats {
        let mut stats = Stats::new(Direction::Compress, self.word_length());
        stats.original_bytes = self.original_length;
        stats.distinct_words = self.code_table.len();
        stats.max_code_len = self.code_table.max_code_len();
        stats
    }

    fn write_data<W: Write + ?Sized>(&mut self, sink: &mut W, stats: &mut Stats) -> Result<()> {
        self.source.seek(self.start)?;

        let mut writer = BitWriter::new(sink);
        let mut words = self.source.words();
        for word in words.by_ref() {
            let word = word?;
            let code = self.code_table.get(word).ok_or_else(|| {
                Error::InvalidInput(format!("word {word:#x} appeared after the frequency scan"))
            })?;
            writer.write_code(code)?;
            stats.words += 1;
        }

        if words.consumed() != self.original_length || stats.words != self.word_count {
            return Err(Error::InvalidInput(format!(
                "source changed during compression: scanned {} bytes, encoded {}",
                self.original_length,
                words.consumed()
            )));
        }

        stats.payload_bits = writer.bit_len();
        stats.payload_bytes = writer.bit_len().div_ceil(8);
        writer.finish()?;
        Ok(())
    }
}

/// Decompresses one container.
#[derive(Debug)]
pub struct Decompressor<R> {
    source: R,
    header: Header,
    header_len: u64,
    data_offset: u64,
    /// Absent for an empty source
    tree: Option<CodeTree>,
}

impl<R: Read + Seek> Decompressor<R> {
    /// Parse the header and rebuild the code tree.
    ///
    /// The source is left positioned at the first byte of packed data.
    pub fn new(mut source: R) -> Result<Self> {
        let (header, header_len) = Header::read(&mut source)?;
        let data_offset = source.stream_position()?;

        let tree = if header.code_table.is_empty() {
            None
        } else {
            Some(CodeTree::from_code_table(&header.code_table)?)
        };

        debug!(
            "container holds {} bytes as {}-byte words, {} codes, data at offset {}",
            header.original_length,
            header.word_length,
            header.code_table.len(),
            data_offset
        );

        Ok(Self {
            source,
            header,
            header_len,
            data_offset,
            tree,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn original_length(&self) -> u64 {
        self.header.original_length
    }

    pub fn word_length(&self) -> WordLength {
        self.header.word_length
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.header.code_table
    }

    /// Byte offset of the packed data within the source.
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Decode the packed data into `sink`.
    ///
    /// May be called more than once; each call starts again at the data
    /// offset.
    ///
    /// # Errors
    /// Returns `Error::CorruptStream` if a bit leads nowhere, the data ends
    /// early, or data remains after the declared length. Bytes decoded before
    /// the error may already have reached the sink.
    pub fn decompress<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<Stats> {
        self.source.seek(SeekFrom::Start(self.data_offset))?;

        let mut stats = Stats::new(Direction::Decompress, self.header.word_length);
        stats.original_bytes = self.header.original_length;
        stats.header_bytes = self.header_len;
        stats.distinct_words = self.header.code_table.len();
        stats.max_code_len = self.header.code_table.max_code_len();

        let mut reader = BitReader::new(&mut self.source);
        let mut out = BufWriter::new(sink);
        if let Some(tree) = &self.tree {
            decode_words(
                tree.root(),
                &mut reader,
                &mut out,
                self.header.original_length,
                self.header.word_length,
                &mut stats,
            )?;
        }

        if !reader.at_end()? {
            return Err(StreamError::TrailingData {
                expected: self.header.original_length,
            }
            .into());
        }
        out.flush()?;

        stats.payload_bits = reader.position();
        stats.payload_bytes = reader.position().div_ceil(8);
        stats.complete();

        debug!(
            "decompressed {} words into {} bytes",
            stats.words, stats.original_bytes
        );
        Ok(stats)
    }
}

/// Walk the tree bit by bit until `original_length` bytes are written.
///
/// The final word is cut to the bytes still owed, dropping its padding.
fn decode_words<R: Read, W: Write>(
    root: &Node,
    reader: &mut BitReader<R>,
    sink: &mut W,
    original_length: u64,
    word_length: WordLength,
    stats: &mut Stats,
) -> Result<()> {
    let width = word_length.bytes() as u64;
    let mut written = 0u64;
    let mut node = root;

    while written < original_length {
        let bit = reader.read_bit()?.ok_or(StreamError::UnexpectedEof {
            decoded: written,
            expected: original_length,
        })?;

        node = node.child(bit).ok_or(StreamError::MissingChild {
            position: reader.position() - 1,
            bit: bit as u8,
        })?;

        if let Some(word) = node.symbol {
            let len = (original_length - written).min(width);
            word_length.write_word(word, len as usize, sink)?;
            written += len;
            stats.words += 1;
            node = root;
        }
    }
    Ok(())
}

/// Compress an in-memory buffer into a complete container.
pub fn compress(data: &[u8], word_length: WordLength) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    Compressor::new(Cursor::new(data), word_length)?.compress(&mut out)?;
    Ok(out)
}

/// Decompress an in-memory container.
pub fn decompress(container: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    Decompressor::new(Cursor::new(container))?.decompress(&mut out)?;
    Ok(out)
}
