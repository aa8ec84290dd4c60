// tests/common.rs

use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

// Helper function to get the binary command
pub fn ctx_cmd() -> Command {
    Command::cargo_bin("ctx").expect("Failed to find ctx binary")
}

// Creates a file (and its parent directories) under a test root.
#[allow(dead_code)]
pub fn create_file(
    dir_path: &Path,
    relative_path: &str,
    content: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file_path = dir_path.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(())
}

// Writes binary bytes under a test root.
#[allow(dead_code)]
pub fn create_binary_file(
    dir_path: &Path,
    relative_path: &str,
    content: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let file_path = dir_path.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(())
}
