use std::collections::HashMap;
use std::path::Path;

use calamine::{Reader, open_workbook_auto};

use crate::error::PrepError;

/// Sheet holding the book-name cross-reference
pub const DEFAULT_XREF_SHEET: &str = "STANDARD_BOOK_LIST";

/// Column holding the canonical book names
pub const STANDARD_COLUMN: &str = "STANDARD";

/// Source spelling → canonical book name, for one translation
pub type BookNameMap = HashMap<String, String>;

/// Row-aligned table of per-translation book spellings and their STANDARD name
#[derive(Debug, Clone)]
pub struct CrossReference {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    standard: usize,
}

impl CrossReference {
    /// Build from a header row followed by data rows
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Result<Self, String> {
        if rows.is_empty() {
            return Err("sheet is empty".to_string());
        }
        let columns: Vec<String> = rows
            .remove(0)
            .into_iter()
            .map(|c| c.trim().to_string())
            .collect();
        let standard = columns
            .iter()
            .position(|c| c == STANDARD_COLUMN)
            .ok_or_else(|| format!("no column named '{}'", STANDARD_COLUMN))?;

        Ok(Self {
            columns,
            rows,
            standard,
        })
    }

    /// Translation codes that have a column in the sheet
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.standard)
            .map(|(_, c)| c.as_str())
    }

    /// Mapping for one translation code, or `None` if the sheet has no such column
    ///
    /// Rows with an empty spelling or an empty STANDARD cell are skipped; when a
    /// spelling repeats, the later row wins.
    pub fn mapping_for(&self, code: &str) -> Option<BookNameMap> {
        let column = self.columns.iter().position(|c| c == code)?;
        let mut map = BookNameMap::new();
        for row in &self.rows {
            let source = row.get(column).map(|s| s.trim()).unwrap_or("");
            let standard = row.get(self.standard).map(|s| s.trim()).unwrap_or("");
            if source.is_empty() || standard.is_empty() {
                continue;
            }
            map.insert(source.to_string(), standard.to_string());
        }
        Some(map)
    }
}

/// Load the cross-reference sheet from a workbook
pub fn load_cross_reference(path: &Path, sheet: &str) -> Result<CrossReference, PrepError> {
    let unreadable = |reason: String| PrepError::CrossReferenceUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| unreadable(format!("sheet '{}': {}", sheet, e)))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    CrossReference::from_rows(rows).map_err(unreadable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn sample() -> CrossReference {
        CrossReference::from_rows(sheet(&[
            &["NKJV", "YLT", "STANDARD"],
            &["2 Timothy", "2 Timothy", "2 Timothy"],
            &["Song of Solomon", "Song of Songs", "Song of Solomon"],
            &["", "Revelation", "Revelation"],
        ]))
        .unwrap()
    }

    #[test]
    fn test_mapping_for_known_code() {
        let xref = sample();
        let map = xref.mapping_for("YLT").unwrap();

        assert_eq!(map.get("Song of Songs").map(String::as_str), Some("Song of Solomon"));
        assert_eq!(map.get("Revelation").map(String::as_str), Some("Revelation"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_empty_cells_are_skipped() {
        let map = sample().mapping_for("NKJV").unwrap();
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key(""));
    }

    #[test]
    fn test_unknown_code_has_no_mapping() {
        let xref = sample();
        assert!(xref.mapping_for("KJV").is_none());
        assert_eq!(xref.codes().collect::<Vec<_>>(), vec!["NKJV", "YLT"]);
    }

    #[test]
    fn test_standard_column_required() {
        let err = CrossReference::from_rows(sheet(&[&["NKJV"], &["Jude"]])).unwrap_err();
        assert!(err.contains("STANDARD"));
    }

    #[test]
    fn test_unreadable_workbook_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BIBLE BOOK NAME XREF.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        let err = load_cross_reference(&path, DEFAULT_XREF_SHEET).unwrap_err();
        assert!(matches!(err, PrepError::CrossReferenceUnreadable { .. }));

        let missing = dir.path().join("absent.xlsx");
        assert!(load_cross_reference(&missing, DEFAULT_XREF_SHEET).is_err());
    }
}
