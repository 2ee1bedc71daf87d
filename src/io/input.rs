use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};

use crate::models::VerseRecord;

/// A CSV table kept as raw strings so unknown columns survive a rewrite
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

impl CsvTable {
    /// Index of a column by exact header name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read a file as UTF-8, dropping a leading byte-order mark
fn read_utf8(path: &Path) -> Result<String> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Parse a CSV file with a header row into a raw table
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let content = read_utf8(path)?;
    parse_csv_table(&content).with_context(|| format!("Failed to parse CSV: {:?}", path))
}

/// Parse CSV text with a header row into a raw table
pub fn parse_csv_table(content: &str) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(CsvTable { headers, rows })
}

/// Read a Book/Chapter/Verse/Text file into typed records, in file order
pub fn read_verse_file(path: &Path) -> Result<Vec<VerseRecord>> {
    let content = read_utf8(path)?;
    parse_verse_csv(&content).with_context(|| format!("Failed to parse verses: {:?}", path))
}

pub fn parse_verse_csv(content: &str) -> Result<Vec<VerseRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<VerseRecord>, _>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verse_csv() {
        let csv = "Book,Chapter,Verse,Text\n\
                   2 Timothy,1,1,\"Paul, an apostle\"\n\
                   2 Timothy,1,2,To Timothy\n";

        let records = parse_verse_csv(csv).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "Paul, an apostle");
        assert_eq!(records[1].verse, 2);
    }

    #[test]
    fn test_extra_columns_are_ignored_for_verses() {
        let csv = "Book,Chapter,Verse,Text,Notes\nJude,1,3,Beloved,x\n";
        let records = parse_verse_csv(csv).unwrap();
        assert_eq!(records[0], VerseRecord::new("Jude", 1, 3, "Beloved"));
    }

    #[test]
    fn test_byte_order_mark_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NKJV_Bible.csv");
        std::fs::write(&path, "\u{feff}Book,Chapter,Verse,Text\nJude,1,1,Jude\n").unwrap();

        let table = read_csv_table(&path).unwrap();

        assert_eq!(table.column("Book"), Some(0));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(read_verse_file(&path).unwrap()[0].book, "Jude");
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let csv = "Book,Chapter,Verse,Text\nJude,1,1\n";
        assert!(parse_csv_table(csv).is_err());
    }
}
