//! Bit-level I/O over byte streams.
//!
//! [`BitWriter`] packs codes into bytes for any `Write` sink, and
//! [`BitReader`] splits bytes from any `Read` source back into single bits.
//! Both operate in MSB-first (most significant bit first) order.
//!
//! # Padding Rules
//! - BitWriter: left-aligns a final partial byte and pads it with zero bits
//! - BitReader: cannot tell padding from data; the caller stops once it has
//!   decoded the declared number of bytes
//!
//! # Example
//! ```
//! use huffword_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! for bit in [true, false, true, true, true] {
//!     writer.write_bit(bit).unwrap();
//! }
//! // Total: 10111 -> padded to 10111000
//! let bytes = writer.finish().unwrap();
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(bytes.as_slice());
//! assert_eq!(reader.read_bit().unwrap(), Some(true));
//! assert_eq!(reader.read_bit().unwrap(), Some(false));
//! ```

use std::io::{Read, Write};

use crate::code::Code;
use crate::error::Result;
use crate::word::fill;

/// Bytes staged before they are handed to the sink, and read ahead from the
/// source.
const CHUNK_SIZE: usize = 8 * 1024;

/// Writes bits MSB-first into a byte sink.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - `bit_buffer` holds `bit_count` bits, MSB-aligned, low bits zero
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    sink: W,
    /// Completed bytes not yet written to the sink
    staged: Vec<u8>,
    /// Accumulator for the current partial byte
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
    /// Completed bytes so far, staged or written
    bytes_out: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            staged: Vec::with_capacity(CHUNK_SIZE),
            bit_buffer: 0,
            bit_count: 0,
            bytes_out: 0,
        }
    }

    /// Write one bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.push_byte(self.bit_buffer)?;
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
        Ok(())
    }

    /// Write the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u64, count: u8) -> Result<()> {
        debug_assert!(count <= 64);
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    /// Write every bit of `code`, first bit first.
    pub fn write_code(&mut self, code: &Code) -> Result<()> {
        for bit in code.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Flush any partial byte (zero-padded) and return the sink.
    pub fn finish(mut self) -> Result<W> {
        if self.bit_count > 0 {
            let last = self.bit_buffer;
            self.push_byte(last)?;
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
        self.flush_staged()?;
        self.sink.flush()?;
        Ok(self.sink)
    }

    /// Total bits written, including a pending partial byte.
    pub fn bit_len(&self) -> u64 {
        self.bytes_out * 8 + self.bit_count as u64
    }

    /// Complete bytes produced so far.
    pub fn byte_len(&self) -> u64 {
        self.bytes_out
    }

    fn push_byte(&mut self, byte: u8) -> Result<()> {
        self.staged.push(byte);
        self.bytes_out += 1;
        if self.staged.len() >= CHUNK_SIZE {
            self.flush_staged()?;
        }
        Ok(())
    }

    fn flush_staged(&mut self) -> Result<()> {
        self.sink.write_all(&self.staged)?;
        self.staged.clear();
        Ok(())
    }
}

/// Reads bits MSB-first from a byte source.
///
/// Bytes are pulled from the source in chunks, so the reader may consume
/// more of the source than it has handed out as bits.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    source: R,
    chunk: Box<[u8]>,
    /// Valid bytes in `chunk`
    chunk_len: usize,
    /// Next unread byte in `chunk`
    chunk_pos: usize,
    current: u8,
    /// Unread bits left in `current` (0-8)
    bits_left: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            chunk: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
            chunk_len: 0,
            chunk_pos: 0,
            current: 0,
            bits_left: 0,
            bits_read: 0,
        }
    }

    /// Read one bit, or `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.bits_left == 0 {
            match self.next_byte()? {
                Some(byte) => {
                    self.current = byte;
                    self.bits_left = 8;
                }
                None => return Ok(None),
            }
        }

        self.bits_left -= 1;
        self.bits_read += 1;
        Ok(Some((self.current >> self.bits_left) & 1 == 1))
    }

    /// Bits handed out so far.
    pub fn position(&self) -> u64 {
        self.bits_read
    }

    /// Whether no whole byte remains after the current one.
    ///
    /// Unread bits of the current byte are padding once decoding is done and
    /// are not counted. Consumes a byte if one is found.
    pub fn at_end(&mut self) -> Result<bool> {
        Ok(self.next_byte()?.is_none())
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if self.chunk_pos == self.chunk_len {
            self.chunk_len = fill(&mut self.source, &mut self.chunk)?;
            self.chunk_pos = 0;
            if self.chunk_len == 0 {
                return Ok(None);
            }
        }
        let byte = self.chunk[self.chunk_pos];
        self.chunk_pos += 1;
        Ok(Some(byte))
    }
}
