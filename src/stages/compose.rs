use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::error::PrepError;
use crate::io::{TableDocument, read_verse_file};
use crate::models::{BookTarget, ChapterIndex, VerseRecord};

/// One translation taking part in a side-by-side document
#[derive(Debug, Clone)]
pub struct TranslationInput {
    /// Column heading, e.g. "NKJV"
    pub code: String,
    pub path: PathBuf,
}

impl TranslationInput {
    /// Use the file-name prefix before the first underscore as the code
    pub fn from_path(path: PathBuf) -> Self {
        let code = crate::stages::translation_code(&path);
        Self { code, path }
    }
}

/// Configuration for the compose job
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    pub left: TranslationInput,
    pub right: TranslationInput,
    pub target: BookTarget,
    /// Root of the `testament/book/chapter` document tree
    pub output_root: PathBuf,
}

/// Result of a compose run
#[derive(Debug)]
pub struct ComposeResult {
    pub documents: Vec<PathBuf>,
}

/// Select the rows of one book and group them by chapter
pub fn select_book(records: Vec<VerseRecord>, target: &BookTarget) -> ChapterIndex {
    ChapterIndex::from_records(
        records
            .into_iter()
            .filter(|r| target.matcher.matches(&r.book)),
    )
}

/// Pair two chapters verse-by-verse by position
///
/// Rows run to the longer of the two lists; the shorter side gets empty
/// cells. Verse numbers are not compared, so differing versification will
/// shift the pairing.
pub fn pair_verses(left: &[VerseRecord], right: &[VerseRecord]) -> Vec<Vec<String>> {
    let rows = left.len().max(right.len());
    (0..rows)
        .map(|i| {
            let l = left.get(i);
            let r = right.get(i);
            let verse = l
                .or(r)
                .map(|v| v.verse.to_string())
                .unwrap_or_default();
            vec![
                verse,
                l.map(|v| v.text.clone()).unwrap_or_default(),
                r.map(|v| v.text.clone()).unwrap_or_default(),
            ]
        })
        .collect()
}

/// `{root}/{testament}/{slug}/{chapter:03}/{slug}-{chapter}-chapter-scripture.docx`
pub fn chapter_document_path(root: &Path, target: &BookTarget, chapter: u32) -> PathBuf {
    root.join(&target.testament)
        .join(&target.slug)
        .join(format!("{:03}", chapter))
        .join(format!("{}-{}-chapter-scripture.docx", target.slug, chapter))
}

/// Build the side-by-side table for one chapter
pub fn build_chapter_document(
    left_code: &str,
    right_code: &str,
    left: &[VerseRecord],
    right: &[VerseRecord],
) -> TableDocument {
    TableDocument {
        headers: vec![
            "Verse".to_string(),
            left_code.to_string(),
            right_code.to_string(),
        ],
        rows: pair_verses(left, right),
    }
}

fn load_book(input: &TranslationInput, target: &BookTarget) -> Result<ChapterIndex> {
    let records = read_verse_file(&input.path)?;
    let index = select_book(records, target);
    if index.is_empty() {
        return Err(PrepError::BookNotFound {
            book: target.label.clone(),
            path: input.path.clone(),
        }
        .into());
    }
    info!(
        "{}: {} verses across {} chapters",
        input.code,
        index.verse_count(),
        index.chapter_numbers().count()
    );
    Ok(index)
}

/// Write one side-by-side document per chapter of the target book
///
/// Both inputs are read and filtered before anything is written; if either
/// has no rows for the book the run fails with no output.
pub fn execute_compose(config: &ComposeConfig) -> Result<ComposeResult> {
    info!("Starting .docx generation for: {}...", config.target.slug);

    let left = load_book(&config.left, &config.target)?;
    let right = load_book(&config.right, &config.target)?;

    let chapters: BTreeSet<u32> = left
        .chapter_numbers()
        .chain(right.chapter_numbers())
        .collect();

    let mut documents = Vec::with_capacity(chapters.len());
    for chapter in chapters {
        let path = chapter_document_path(&config.output_root, &config.target, chapter);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        }

        build_chapter_document(
            &config.left.code,
            &config.right.code,
            left.verses(chapter),
            right.verses(chapter),
        )
        .write_docx(&path)?;

        info!("Created: {:?}", path);
        documents.push(path);
    }

    Ok(ComposeResult { documents })
}
