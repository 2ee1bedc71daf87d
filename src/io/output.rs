use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};

use super::input::CsvTable;
use crate::models::{VERSE_HEADERS, VerseRecord};

/// Streaming writer for Book/Chapter/Verse/Text files
pub struct VerseWriter {
    writer: Writer<File>,
    rows_written: usize,
}

impl VerseWriter {
    /// Create the file and write the header row
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        writer.write_record(VERSE_HEADERS)?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    pub fn write(&mut self, record: &VerseRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .context("Failed to write verse row")?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush buffered rows, returning how many were written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().context("Failed to flush CSV")?;
        Ok(self.rows_written)
    }
}

/// Write a raw table back out with its original header
pub fn write_csv_table(path: &Path, table: &CsvTable) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// A single-table document: one header row and any number of body rows
#[derive(Debug, Clone)]
pub struct TableDocument {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableDocument {
    fn cell(text: &str, bold: bool) -> TableCell {
        let run = Run::new().add_text(text);
        let run = if bold { run.bold() } else { run };
        TableCell::new().add_paragraph(Paragraph::new().add_run(run))
    }

    /// Write as a .docx file
    pub fn write_docx(&self, path: &Path) -> Result<()> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(TableRow::new(
            self.headers.iter().map(|h| Self::cell(h, true)).collect(),
        ));
        for row in &self.rows {
            rows.push(TableRow::new(
                row.iter().map(|c| Self::cell(c, false)).collect(),
            ));
        }

        let file =
            File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
        Docx::new()
            .add_table(Table::new(rows))
            .build()
            .pack(file)
            .with_context(|| format!("Failed to write document: {:?}", path))?;
        Ok(())
    }
}
