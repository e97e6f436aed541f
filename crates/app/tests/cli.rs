//! Runs the built binary against real files.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn huffword(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_huffword"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run huffword")
}

fn sample() -> Vec<u8> {
    b"the rain in spain stays mainly in the plain. ".repeat(40)
}

#[test]
fn test_round_trip_default_names() {
    let dir = TempDir::new().unwrap();
    let data = sample();
    fs::write(dir.path().join("text.txt"), &data).unwrap();

    let out = huffword(&["-c", "text.txt"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.path().join("text.txt.compressed").exists());

    fs::remove_file(dir.path().join("text.txt")).unwrap();
    let out = huffword(&["-d", "text.txt.compressed"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(dir.path().join("text.txt")).unwrap(), data);
}

#[test]
fn test_every_word_length() {
    let dir = TempDir::new().unwrap();
    let data = sample();
    fs::write(dir.path().join("in.bin"), &data).unwrap();

    for bytes in ["1", "2", "4", "8"] {
        let out = huffword(&["-c", "-b", bytes, "-o", "packed", "in.bin"], dir.path());
        assert!(out.status.success());
        let out = huffword(&["-d", "-o", "unpacked", "packed"], dir.path());
        assert!(out.status.success());
        assert_eq!(fs::read(dir.path().join("unpacked")).unwrap(), data, "-b {bytes}");
    }
}

#[test]
fn test_to_stdout() {
    let dir = TempDir::new().unwrap();
    let data = sample();
    fs::write(dir.path().join("in.bin"), &data).unwrap();

    assert!(huffword(&["-c", "in.bin"], dir.path()).status.success());
    let out = huffword(&["-d", "--to-stdout", "in.bin.compressed"], dir.path());
    assert!(out.status.success());
    assert_eq!(out.stdout, data);
    assert!(!dir.path().join("in.bin.compressed.decompressed").exists());
}

#[test]
fn test_verbose_summary() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("in.bin"), sample()).unwrap();

    let out = huffword(&["-c", "-v", "in.bin"], dir.path());
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("=== compress summary ==="), "{stderr}");
    assert!(stderr.contains("Original: 1800 bytes"), "{stderr}");
}

#[test]
fn test_bad_container_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("junk.compressed"), b"definitely not a container").unwrap();

    let out = huffword(&["-d", "junk.compressed"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("error: "), "{stderr}");
    assert!(!dir.path().join("junk").exists());
}

#[test]
fn test_corrupt_stream_removes_partial_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("in.bin"), sample()).unwrap();
    assert!(huffword(&["-c", "-b", "1", "in.bin"], dir.path()).status.success());

    // drop the last half of the packed data
    let container = fs::read(dir.path().join("in.bin.compressed")).unwrap();
    let dictionary_len = u64::from_be_bytes(container[24..32].try_into().unwrap()) as usize;
    let data_start = 32 + dictionary_len;
    let cut = data_start + (container.len() - data_start) / 2;
    fs::write(dir.path().join("cut.compressed"), &container[..cut]).unwrap();

    let out = huffword(&["-d", "cut.compressed"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("cut").exists());
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let out = huffword(&["-c", "nope.bin"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope.bin"));
    assert!(!dir.path().join("nope.bin.compressed").exists());
}
