//! huffword: compress or decompress one file.
//!
//! Exits 0 on success. On failure prints `error: <message>` to stderr, removes
//! any partially written output file, and exits 1.

mod config;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use huffword_core::{Compressor, Decompressor, Stats};
use log::{info, warn};

use config::{Config, Mode, Output};

fn main() -> ExitCode {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(&config) {
        Ok(stats) => {
            if config.verbosity > 0 {
                config.print();
                eprint!("{}", stats.summary());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<Stats> {
    let input = File::open(&config.input)
        .with_context(|| format!("cannot open {}", config.input.display()))?;
    let input = BufReader::new(input);

    // constructor failures happen before the output is created
    match config.mode {
        Mode::Compress => {
            let mut compressor = Compressor::new(input, config.word_length)
                .with_context(|| format!("cannot read {}", config.input.display()))?;
            info!(
                "compressing {} ({} bytes, {} distinct words)",
                config.input.display(),
                compressor.original_length(),
                compressor.code_table().len()
            );
            write_output(config, |sink| compressor.compress(sink))
        }
        Mode::Decompress => {
            let mut decompressor = Decompressor::new(input)
                .with_context(|| format!("{} is not a valid container", config.input.display()))?;
            info!(
                "decompressing {} ({} bytes, {}-byte words)",
                config.input.display(),
                decompressor.original_length(),
                decompressor.word_length()
            );
            write_output(config, |sink| decompressor.decompress(sink))
        }
    }
}

/// Run `pass` against the configured output.
///
/// A file that `pass` fails to complete is removed.
fn write_output<F>(config: &Config, pass: F) -> Result<Stats>
where
    F: FnOnce(&mut dyn Write) -> huffword_core::Result<Stats>,
{
    let action = match config.mode {
        Mode::Compress => "compressing",
        Mode::Decompress => "decompressing",
    };

    match &config.output {
        Output::Stdout => {
            let mut sink = BufWriter::new(io::stdout().lock());
            let stats = pass(&mut sink)
                .with_context(|| format!("{action} {}", config.input.display()))?;
            sink.flush().context("cannot write to stdout")?;
            Ok(stats)
        }
        Output::File(path) => {
            let file =
                File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            let mut sink = BufWriter::new(file);

            let result = pass(&mut sink)
                .with_context(|| format!("{action} {}", config.input.display()))
                .and_then(|stats| {
                    sink.flush()
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    Ok(stats)
                });
            drop(sink);

            if result.is_err() {
                if let Err(e) = fs::remove_file(path) {
                    warn!("could not remove partial output {}: {e}", path.display());
                }
            }
            result
        }
    }
}
