use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use csv::StringRecord;
use tracing::{error, info, warn};

use crate::io::{
    AuditLog, BookNameMap, CrossReference, CsvTable, load_cross_reference, read_csv_table,
    write_csv_table,
};
use crate::text::clean_text;

/// Configuration for the normalize job
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Directory scanned for `*.csv` inputs
    pub input_dir: PathBuf,
    /// Directory receiving cleaned copies and the audit log
    pub output_dir: PathBuf,
    /// Cross-reference workbook
    pub xref_path: PathBuf,
    /// Sheet name inside the workbook
    pub xref_sheet: String,
}

/// Result of a normalize run
#[derive(Debug)]
pub struct NormalizeResult {
    pub log_path: PathBuf,
    /// Cleaned files written to the output directory
    pub written: Vec<PathBuf>,
    /// Inputs that could not be read
    pub skipped: Vec<PathBuf>,
}

/// Outcome of remapping one table's Book column
#[derive(Debug, Default, PartialEq)]
pub struct BookRemap {
    /// Distinct names that changed, in first-seen order
    pub renamed: Vec<(String, String)>,
    /// Distinct names with no mapping, in first-seen order
    pub missing: Vec<String>,
}

/// Translation code from a file name: the text before the first underscore
pub fn translation_code(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('_') {
        Some((code, _)) => code.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(name),
    }
}

/// Replace every Book value found in `map`; unknown names are left as they are
pub fn remap_books(table: &mut CsvTable, book_col: usize, map: &BookNameMap) -> BookRemap {
    let mut remap = BookRemap::default();
    let mut seen = HashSet::new();

    for row in &table.rows {
        let book = row.get(book_col).unwrap_or("");
        if !seen.insert(book.to_string()) {
            continue;
        }
        match map.get(book) {
            Some(standard) if standard != book => {
                remap.renamed.push((book.to_string(), standard.clone()))
            }
            Some(_) => {}
            None => remap.missing.push(book.to_string()),
        }
    }

    for row in table.rows.iter_mut() {
        let Some(standard) = row.get(book_col).and_then(|book| map.get(book)) else {
            continue;
        };
        if row.get(book_col) != Some(standard.as_str()) {
            *row = replace_field(row, book_col, standard);
        }
    }

    remap
}

/// Clean every Text field, returning how many rows changed
pub fn clean_text_column(table: &mut CsvTable, text_col: usize) -> usize {
    let mut cleaned_rows = 0;
    for row in table.rows.iter_mut() {
        let Some(text) = row.get(text_col) else {
            continue;
        };
        let (cleaned, changed) = clean_text(text);
        if changed {
            *row = replace_field(row, text_col, &cleaned);
            cleaned_rows += 1;
        }
    }
    cleaned_rows
}

fn replace_field(row: &StringRecord, index: usize, value: &str) -> StringRecord {
    row.iter()
        .enumerate()
        .map(|(i, field)| if i == index { value } else { field })
        .collect()
}

/// Every `*.csv` directly inside `dir`, sorted by path
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))?
    {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Standardize book names and repair mojibake for every CSV in a directory
///
/// A missing or unreadable cross-reference aborts the run before any file
/// is touched. Individual files that fail to parse are logged and skipped;
/// a cleaned copy that cannot be written aborts the run.
pub fn execute_normalize(config: &NormalizeConfig) -> Result<NormalizeResult> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {:?}", config.output_dir)
    })?;
    let mut log = AuditLog::create(&config.output_dir, Local::now())?;

    info!("Loading cross-reference from {:?}", config.xref_path);
    let xref = match load_cross_reference(&config.xref_path, &config.xref_sheet) {
        Ok(xref) => xref,
        Err(e) => {
            log.fatal(&e.to_string())?;
            error!("FATAL ERROR: {}", e);
            return Err(e.into());
        }
    };

    normalize_directory(&config.input_dir, &config.output_dir, &xref, &mut log)
}

/// Run every CSV in `input_dir` through [`normalize_file`], isolating failures
pub fn normalize_directory(
    input_dir: &Path,
    output_dir: &Path,
    xref: &CrossReference,
    log: &mut AuditLog,
) -> Result<NormalizeResult> {
    let mut result = NormalizeResult {
        log_path: log.path().to_path_buf(),
        written: Vec::new(),
        skipped: Vec::new(),
    };

    let files = list_csv_files(input_dir)?;
    if files.is_empty() {
        info!("No CSV files found in {:?}", input_dir);
        return Ok(result);
    }

    for path in files {
        let code = translation_code(&path);
        info!("Processing: {}", code);
        log.translation(&code)?;

        match normalize_file(&path, &code, xref, output_dir, log)? {
            Some(saved) => result.written.push(saved),
            None => result.skipped.push(path),
        }
    }

    Ok(result)
}

/// Parse an input table and locate its Book column
fn read_input(path: &Path) -> Result<(CsvTable, usize)> {
    let table = read_csv_table(path)?;
    let book_col = table
        .column("Book")
        .context("No 'Book' column in header")?;
    Ok((table, book_col))
}

/// Normalize one file into `output_dir`
///
/// Returns `Ok(None)` when the input could not be read; that failure is
/// logged and the file skipped. Write failures are logged and returned.
pub fn normalize_file(
    path: &Path,
    code: &str,
    xref: &CrossReference,
    output_dir: &Path,
    log: &mut AuditLog,
) -> Result<Option<PathBuf>> {
    let (mut table, book_col) = match read_input(path) {
        Ok(input) => input,
        Err(e) => {
            warn!("Skipping {:?}: {:#}", path, e);
            log.read_error(&e)?;
            return Ok(None);
        }
    };

    match xref.mapping_for(code) {
        Some(map) => {
            let remap = remap_books(&mut table, book_col, &map);
            for (from, to) in &remap.renamed {
                log.rename(from, to)?;
            }
            for book in &remap.missing {
                log.missing_mapping(book)?;
            }
        }
        None => log.missing_column(code, &xref.codes().collect::<Vec<_>>())?,
    }

    let cleaned = match table.column("Text") {
        Some(text_col) => clean_text_column(&mut table, text_col),
        None => 0,
    };
    log.cleaned(cleaned)?;

    let file_name = path
        .file_name()
        .context("Input path has no file name")?;
    let save_path = output_dir.join(file_name);
    if let Err(e) = write_csv_table(&save_path, &table) {
        log.write_error(&e)?;
        return Err(e);
    }
    log.saved(&save_path)?;

    Ok(Some(save_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{parse_csv_table, read_csv_table};

    fn map(pairs: &[(&str, &str)]) -> BookNameMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_translation_code() {
        assert_eq!(translation_code(Path::new("raw/NKJV_Bible.csv")), "NKJV");
        assert_eq!(translation_code(Path::new("YLT_full_text.csv")), "YLT");
        assert_eq!(translation_code(Path::new("KJV.csv")), "KJV");
    }

    #[test]
    fn test_remap_books() {
        let mut table = parse_csv_table(
            "Book,Chapter,Verse,Text\n\
             II Timothy,1,1,a\n\
             II Timothy,1,2,b\n\
             Titus,1,1,c\n\
             Philemon,1,1,d\n",
        )
        .unwrap();
        let map = map(&[("II Timothy", "2 Timothy"), ("Titus", "Titus")]);

        let remap = remap_books(&mut table, 0, &map);

        assert_eq!(
            remap.renamed,
            vec![("II Timothy".to_string(), "2 Timothy".to_string())]
        );
        assert_eq!(remap.missing, vec!["Philemon".to_string()]);
        let books: Vec<&str> = table.rows.iter().map(|r| &r[0]).collect();
        assert_eq!(books, vec!["2 Timothy", "2 Timothy", "Titus", "Philemon"]);
        assert_eq!(&table.rows[1][3], "b");
    }

    #[test]
    fn test_clean_text_column_counts_changed_rows() {
        let mut table = parse_csv_table(
            "Book,Chapter,Verse,Text\n\
             Jude,1,1,Donâ€™t fear\n\
             Jude,1,2,Mercy and peace\n\
             Jude,1,3, love \n",
        )
        .unwrap();

        assert_eq!(clean_text_column(&mut table, 3), 2);
        assert_eq!(&table.rows[0][3], "Don't fear");
        assert_eq!(&table.rows[2][3], "love");

        assert_eq!(clean_text_column(&mut table, 3), 0);
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        config: NormalizeConfig,
    }

    fn fixture(files: &[(&str, &str)]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("raw");
        std::fs::create_dir_all(&input_dir).unwrap();
        for (name, content) in files {
            std::fs::write(input_dir.join(name), content).unwrap();
        }
        let config = NormalizeConfig {
            xref_path: input_dir.join("BIBLE BOOK NAME XREF.xlsx"),
            input_dir,
            output_dir: dir.path().join("csv_for_json"),
            xref_sheet: crate::io::DEFAULT_XREF_SHEET.to_string(),
        };
        Fixture { _dir: dir, config }
    }

    #[test]
    fn test_unreadable_xref_aborts_before_any_file() {
        let fx = fixture(&[("NKJV_Bible.csv", "Book,Chapter,Verse,Text\nJude,1,1,x\n")]);
        std::fs::write(&fx.config.xref_path, b"locked by another program").unwrap();

        let err = execute_normalize(&fx.config).unwrap_err();
        assert!(err.downcast_ref::<crate::error::PrepError>().is_some());

        let outputs = list_csv_files(&fx.config.output_dir).unwrap();
        assert!(outputs.is_empty());

        let logs: Vec<PathBuf> = std::fs::read_dir(&fx.config.output_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(logs.len(), 1);
        let content = std::fs::read_to_string(&logs[0]).unwrap();
        assert_eq!(content.matches("FATAL ERROR").count(), 1);
    }

    #[test]
    fn test_normalize_directory_isolates_failures() {
        let fx = fixture(&[
            (
                "NKJV_Bible.csv",
                "\u{feff}Book,Chapter,Verse,Text\nII Timothy,1,1,Donâ€™t\nJudas,1,1,ok\n",
            ),
            ("KJV_Bible.csv", "Book,Chapter,Verse,Text\nJude,1,1,fine\n"),
            ("broken_file.csv", "Book,Chapter,Verse,Text\nJude,1\n"),
            ("notes.txt", "not a table"),
        ]);
        let xref = CrossReference::from_rows(vec![
            vec!["NKJV".into(), "STANDARD".into()],
            vec!["II Timothy".into(), "2 Timothy".into()],
        ])
        .unwrap();
        std::fs::create_dir_all(&fx.config.output_dir).unwrap();
        let mut log = AuditLog::create(&fx.config.output_dir, Local::now()).unwrap();

        let result = normalize_directory(
            &fx.config.input_dir,
            &fx.config.output_dir,
            &xref,
            &mut log,
        )
        .unwrap();

        assert_eq!(result.written.len(), 2);
        assert_eq!(result.skipped, vec![fx.config.input_dir.join("broken_file.csv")]);
        assert!(!fx.config.output_dir.join("broken_file.csv").exists());

        let table = read_csv_table(&fx.config.output_dir.join("NKJV_Bible.csv")).unwrap();
        assert_eq!(&table.rows[0][0], "2 Timothy");
        assert_eq!(&table.rows[0][3], "Don't");
        assert_eq!(&table.rows[1][0], "Judas");

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.matches("Translation: ").count(), 3);
        assert!(content.contains("[RENAME] 'II Timothy' -> '2 Timothy'"));
        assert!(content.contains("[MISSING X-REF] 'Judas'"));
        assert!(content.contains("[WARNING] No column named 'KJV'"));
        assert!(content.contains("[ERROR] Could not read file"));
        assert_eq!(content.matches("[MOJIBAKE]").count(), 2);
        assert_eq!(content.matches("[SUCCESS]").count(), 2);
    }

    #[test]
    fn test_missing_text_column_is_tolerated() {
        let fx = fixture(&[("NKJV_Books.csv", "Book,Chapter\nII Timothy,4\n")]);
        let xref = CrossReference::from_rows(vec![vec!["STANDARD".into()]]).unwrap();
        std::fs::create_dir_all(&fx.config.output_dir).unwrap();
        let mut log = AuditLog::create(&fx.config.output_dir, Local::now()).unwrap();

        let saved = normalize_file(
            &fx.config.input_dir.join("NKJV_Books.csv"),
            "NKJV",
            &xref,
            &fx.config.output_dir,
            &mut log,
        )
        .unwrap()
        .unwrap();

        assert_eq!(&read_csv_table(&saved).unwrap().rows[0][0], "II Timothy");
        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("[MOJIBAKE] Cleaned 0 verses."));
    }

    #[test]
    fn test_unwritable_output_is_not_reported_as_read_failure() {
        let fx = fixture(&[("NKJV_Bible.csv", "Book,Chapter,Verse,Text\nJude,1,1,x\n")]);
        let xref = CrossReference::from_rows(vec![
            vec!["NKJV".into(), "YLT".into(), "STANDARD".into()],
            vec!["Jude".into(), "Jude".into(), "Jude".into()],
        ])
        .unwrap();
        std::fs::create_dir_all(fx.config.output_dir.join("NKJV_Bible.csv")).unwrap();
        let mut log = AuditLog::create(&fx.config.output_dir, Local::now()).unwrap();

        let result = normalize_directory(
            &fx.config.input_dir,
            &fx.config.output_dir,
            &xref,
            &mut log,
        );

        assert!(result.is_err());
        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("[ERROR] Could not write file"));
        assert!(!content.contains("Could not read file"));
        assert!(!content.contains("[SUCCESS]"));
    }

    #[test]
    fn test_missing_column_warning_lists_available_codes() {
        let fx = fixture(&[("KJV_Bible.csv", "Book,Chapter,Verse,Text\nJude,1,1,x\n")]);
        let xref = CrossReference::from_rows(vec![
            vec!["NKJV".into(), "YLT".into(), "STANDARD".into()],
            vec!["Jude".into(), "Jude".into(), "Jude".into()],
        ])
        .unwrap();
        std::fs::create_dir_all(&fx.config.output_dir).unwrap();
        let mut log = AuditLog::create(&fx.config.output_dir, Local::now()).unwrap();

        normalize_directory(&fx.config.input_dir, &fx.config.output_dir, &xref, &mut log)
            .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains(
            "[WARNING] No column named 'KJV' found in cross-reference sheet (available: NKJV, YLT)."
        ));
    }
}
