//! Statistics for a single compression or decompression run.
//!
//! Collected by [`Compressor`](crate::codec::Compressor) and
//! [`Decompressor`](crate::codec::Decompressor) as they stream, and returned
//! to the caller when the pass completes.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use crate::word::WordLength;

/// Which way the run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Compress => "compress",
            Direction::Decompress => "decompress",
        }
    }
}

/// Counters and timing for one pass.
#[derive(Debug, Clone)]
pub struct Stats {
    pub direction: Direction,

    // === Timing ===
    /// When the pass started
    pub start_time: Instant,

    /// When the pass ended (set on completion)
    pub end_time: Option<Instant>,

    // === Model ===
    /// Word width used
    pub word_length: WordLength,

    /// Words encoded or decoded, including a padded final word
    pub words: u64,

    /// Entries in the code table
    pub distinct_words: usize,

    /// Longest code in the table
    pub max_code_len: usize,

    // === Sizes ===
    /// Uncompressed byte count
    pub original_bytes: u64,

    /// Header bytes (magic, lengths, dictionary); 0 for data-only output
    pub header_bytes: u64,

    /// Packed data bytes
    pub payload_bytes: u64,

    /// Meaningful bits in the packed data, excluding final padding
    pub payload_bits: u64,
}

impl Stats {
    /// Create stats with start time set to now.
    pub fn new(direction: Direction, word_length: WordLength) -> Self {
        Self {
            direction,
            start_time: Instant::now(),
            end_time: None,
            word_length,
            words: 0,
            distinct_words: 0,
            max_code_len: 0,
            original_bytes: 0,
            header_bytes: 0,
            payload_bytes: 0,
            payload_bits: 0,
        }
    }

    /// Mark the pass as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Header plus packed data.
    pub fn container_bytes(&self) -> u64 {
        self.header_bytes + self.payload_bytes
    }

    /// Compression ratio (container / original).
    ///
    /// Returns 0.0 for an empty source.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            0.0
        } else {
            self.container_bytes() as f64 / self.original_bytes as f64
        }
    }

    /// Mean code length in bits per word.
    pub fn average_code_len(&self) -> f64 {
        if self.words == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.words as f64
        }
    }

    /// Uncompressed bytes processed per second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.original_bytes as f64 / duration_secs
        }
    }

    /// Human-readable multi-line summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== {} summary ===", self.direction.as_str());
        let _ = writeln!(out, "Duration: {} ms", self.duration().as_millis());
        let _ = writeln!(out, "Word length: {} bytes", self.word_length);
        let _ = writeln!(out, "Original: {} bytes", self.original_bytes);
        let _ = writeln!(
            out,
            "Container: {} bytes (header {}, data {})",
            self.container_bytes(),
            self.header_bytes,
            self.payload_bytes
        );
        let _ = writeln!(out, "Ratio: {:.1}%", self.compression_ratio() * 100.0);
        let _ = writeln!(
            out,
            "Words: {} ({} distinct, {:.2} bits avg, {} bits max)",
            self.words,
            self.distinct_words,
            self.average_code_len(),
            self.max_code_len
        );
        let _ = writeln!(out, "Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        out
    }

    /// Export stats as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "direction={}\n\
             duration_ms={}\n\
             word_length={}\n\
             original_bytes={}\n\
             header_bytes={}\n\
             payload_bytes={}\n\
             payload_bits={}\n\
             words={}\n\
             distinct_words={}\n\
             max_code_len={}\n\
             compression_ratio={:.4}\n",
            self.direction.as_str(),
            self.duration().as_millis(),
            self.word_length,
            self.original_bytes,
            self.header_bytes,
            self.payload_bytes,
            self.payload_bits,
            self.words,
            self.distinct_words,
            self.max_code_len,
            self.compression_ratio(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_creation() {
        let stats = Stats::new(Direction::Compress, WordLength::Four);
        assert!(stats.end_time.is_none());
        assert!(stats.duration().as_millis() < 100);
    }

    #[test]
    fn test_compression_ratio() {
        let mut stats = Stats::new(Direction::Compress, WordLength::One);
        assert_eq!(stats.compression_ratio(), 0.0);

        stats.original_bytes = 1000;
        stats.header_bytes = 50;
        stats.payload_bytes = 700;
        assert_eq!(stats.container_bytes(), 750);
        assert_eq!(stats.compression_ratio(), 0.75);
    }

    #[test]
    fn test_average_code_len() {
        let mut stats = Stats::new(Direction::Decompress, WordLength::Two);
        stats.words = 4;
        stats.payload_bits = 10;
        assert_eq!(stats.average_code_len(), 2.5);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut stats = Stats::new(Direction::Compress, WordLength::One);
        stats.complete();
        let first = stats.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(stats.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut stats = Stats::new(Direction::Compress, WordLength::Eight);
        stats.original_bytes = 1000;
        stats.words = 125;
        stats.distinct_words = 10;

        let text = stats.export_text();
        assert!(text.contains("direction=compress"));
        assert!(text.contains("word_length=8"));
        assert!(text.contains("original_bytes=1000"));
        assert!(text.contains("distinct_words=10"));
    }

    #[test]
    fn test_summary_mentions_sizes() {
        let mut stats = Stats::new(Direction::Decompress, WordLength::One);
        stats.original_bytes = 42;
        let summary = stats.summary();
        assert!(summary.starts_with("=== decompress summary ==="));
        assert!(summary.contains("Original: 42 bytes"));
    }
}
