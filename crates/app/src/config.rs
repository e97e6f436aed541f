//! Configuration for the huffword application.
//!
//! Command-line arguments are parsed with clap and resolved into a
//! [`Config`]: the mode, the input, where the output goes, and how chatty
//! the run should be.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{ArgAction, ArgGroup, Parser};
use huffword_core::WordLength;
use log::LevelFilter;

/// Extension added on compress and stripped on decompress.
pub const COMPRESSED_EXTENSION: &str = "compressed";

/// Extension added on decompress when the input has no `.compressed` suffix.
pub const DECOMPRESSED_EXTENSION: &str = "decompressed";

/// Huffman compression over fixed-width words.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "decompress"])))]
pub struct Args {
    /// Compress FILE
    #[arg(short, long)]
    pub compress: bool,

    /// Decompress FILE
    #[arg(short, long)]
    pub decompress: bool,

    /// Write output to PATH
    #[arg(short, long, value_name = "PATH", conflicts_with = "to_stdout")]
    pub output: Option<PathBuf>,

    /// Write output to stdout
    #[arg(long)]
    pub to_stdout: bool,

    /// Word length in bytes: 1, 2, 4 or 8 (compression only)
    #[arg(short = 'b', long = "bytes", value_name = "N", default_value_t = WordLength::Four, value_parser = parse_word_length)]
    pub word_length: WordLength,

    /// Print a summary to stderr; repeat for more log output
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Input file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

fn parse_word_length(s: &str) -> Result<WordLength, String> {
    let bytes: u64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    WordLength::try_from(bytes).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

/// Where the result is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    File(PathBuf),
    Stdout,
}

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub input: PathBuf,
    pub output: Output,

    /// Ignored on decompress; the container records its own
    pub word_length: WordLength,

    /// Number of `-v` flags
    pub verbosity: u8,
}

impl Config {
    /// Parse configuration from the process arguments.
    pub fn parse() -> Self {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Self {
        let mode = if args.compress {
            Mode::Compress
        } else {
            Mode::Decompress
        };

        let output = if args.to_stdout {
            Output::Stdout
        } else {
            Output::File(
                args.output
                    .unwrap_or_else(|| default_output(mode, &args.input)),
            )
        };

        Config {
            mode,
            input: args.input,
            output,
            word_length: args.word_length,
            verbosity: args.verbose,
        }
    }

    /// Log level for this run: warnings by default, more with each `-v`
    /// past the first.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 | 1 => LevelFilter::Warn,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Print the configuration to stderr.
    pub fn print(&self) {
        eprintln!("=== Configuration ===");
        eprintln!(
            "Mode: {}",
            match self.mode {
                Mode::Compress => "compress",
                Mode::Decompress => "decompress",
            }
        );
        eprintln!("Input: {}", self.input.display());
        match &self.output {
            Output::File(path) => eprintln!("Output: {}", path.display()),
            Output::Stdout => eprintln!("Output: (stdout)"),
        }
        if self.mode == Mode::Compress {
            eprintln!("Word length: {} bytes", self.word_length);
        }
    }
}

/// Output path used when none is given.
///
/// Compressing appends `.compressed`. Decompressing strips a trailing
/// `.compressed`, or appends `.decompressed` if there is none.
pub fn default_output(mode: Mode, input: &Path) -> PathBuf {
    match mode {
        Mode::Compress => with_suffix(input, COMPRESSED_EXTENSION),
        Mode::Decompress => {
            if input.extension().is_some_and(|ext| ext == COMPRESSED_EXTENSION) {
                input.with_extension("")
            } else {
                with_suffix(input, DECOMPRESSED_EXTENSION)
            }
        }
    }
}

fn with_suffix(path: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Result<Config, clap::Error> {
        let argv = std::iter::once("huffword").chain(args.iter().copied());
        Args::try_parse_from(argv).map(Config::from_args)
    }

    #[test]
    fn test_default_output_names() {
        assert_eq!(
            default_output(Mode::Compress, Path::new("data.txt")),
            PathBuf::from("data.txt.compressed")
        );
        assert_eq!(
            default_output(Mode::Decompress, Path::new("data.txt.compressed")),
            PathBuf::from("data.txt")
        );
        assert_eq!(
            default_output(Mode::Decompress, Path::new("dir/archive.bin")),
            PathBuf::from("dir/archive.bin.decompressed")
        );
        assert_eq!(
            default_output(Mode::Decompress, Path::new("noext")),
            PathBuf::from("noext.decompressed")
        );
    }

    #[test]
    fn test_compress_defaults() {
        let parsed = config(&["-c", "in.bin"]).unwrap();
        assert_eq!(parsed.mode, Mode::Compress);
        assert_eq!(parsed.word_length, WordLength::Four);
        assert_eq!(parsed.output, Output::File(PathBuf::from("in.bin.compressed")));
        assert_eq!(parsed.verbosity, 0);
        assert_eq!(parsed.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_explicit_options() {
        let parsed = config(&["-d", "-o", "out.bin", "-b", "8", "-vvv", "in.compressed"]).unwrap();
        assert_eq!(parsed.mode, Mode::Decompress);
        assert_eq!(parsed.output, Output::File(PathBuf::from("out.bin")));
        assert_eq!(parsed.word_length, WordLength::Eight);
        assert_eq!(parsed.log_level(), LevelFilter::Trace);

        let parsed = config(&["--compress", "--to-stdout", "in.bin"]).unwrap();
        assert_eq!(parsed.output, Output::Stdout);
    }

    #[test]
    fn test_rejected_arguments() {
        // no mode
        assert!(config(&["in.bin"]).is_err());
        // both modes
        assert!(config(&["-c", "-d", "in.bin"]).is_err());
        // both outputs
        assert!(config(&["-c", "-o", "x", "--to-stdout", "in.bin"]).is_err());
        // unsupported word lengths
        assert!(config(&["-c", "-b", "3", "in.bin"]).is_err());
        assert!(config(&["-c", "-b", "four", "in.bin"]).is_err());
        // no input
        assert!(config(&["-c"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
