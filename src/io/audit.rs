use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// Plain-text, append-only record of what a normalization run changed
pub struct AuditLog {
    path: PathBuf,
    file: File,
}

impl AuditLog {
    /// Create `cleaning_log_<timestamp>.txt` in `dir` and write the run header
    pub fn create(dir: &Path, started: DateTime<Local>) -> Result<Self> {
        let path = dir.join(format!(
            "cleaning_log_{}.txt",
            started.format("%Y%m%d_%H%M%S")
        ));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to create audit log: {:?}", path))?;

        let mut log = Self { path, file };
        log.line(&format!(
            "Cleaning Log - {}",
            started.format("%Y-%m-%d %H:%M:%S")
        ))?;
        log.line(&"=".repeat(50))?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line and flush it
    pub fn line(&mut self, message: &str) -> Result<()> {
        writeln!(self.file, "{}", message)
            .and_then(|_| self.file.flush())
            .with_context(|| format!("Failed to write audit log: {:?}", self.path))
    }

    fn entry(&mut self, message: &str) -> Result<()> {
        self.line(&format!("  {}", message))
    }

    pub fn fatal(&mut self, message: &str) -> Result<()> {
        self.line(&format!("FATAL ERROR: {}", message))
    }

    /// Open the block for one input file
    pub fn translation(&mut self, code: &str) -> Result<()> {
        self.line("")?;
        self.line(&format!("Translation: {}", code))
    }

    pub fn read_error(&mut self, error: &anyhow::Error) -> Result<()> {
        self.entry(&format!("[ERROR] Could not read file: {:#}", error))
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        self.entry(&format!("[RENAME] '{}' -> '{}'", from, to))
    }

    pub fn missing_mapping(&mut self, book: &str) -> Result<()> {
        self.entry(&format!(
            "[MISSING X-REF] '{}' not found in cross-reference mapping.",
            book
        ))
    }

    pub fn missing_column(&mut self, code: &str, available: &[&str]) -> Result<()> {
        self.entry(&format!(
            "[WARNING] No column named '{}' found in cross-reference sheet (available: {}).",
            code,
            available.join(", ")
        ))
    }

    pub fn write_error(&mut self, error: &anyhow::Error) -> Result<()> {
        self.entry(&format!("[ERROR] Could not write file: {:#}", error))
    }

    pub fn cleaned(&mut self, count: usize) -> Result<()> {
        self.entry(&format!("[MOJIBAKE] Cleaned {} verses.", count))
    }

    pub fn saved(&mut self, path: &Path) -> Result<()> {
        self.entry(&format!("[SUCCESS] Saved to: {}", path.display()))
    }
}
