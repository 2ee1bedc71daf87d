use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::api::ScriptureSource;
use crate::error::PrepError;
use crate::io::VerseWriter;
use crate::models::VerseRecord;
use crate::text::strip_markup;

/// Configuration for the fetch job
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Translation identifier understood by the remote service (e.g. "YLT")
    pub translation: String,
    /// Pause after every chapter request
    pub delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            translation: "YLT".to_string(),
            delay: Duration::from_millis(100),
        }
    }
}

impl FetchConfig {
    /// `{TRANSLATION}_Bible.csv`
    pub fn default_output(&self) -> PathBuf {
        PathBuf::from(format!("{}_Bible.csv", self.translation))
    }
}

/// Result of a fetch run
#[derive(Debug)]
pub struct FetchResult {
    pub books: usize,
    pub chapters_requested: usize,
    pub chapters_skipped: usize,
    pub rows_written: usize,
}

/// Download every verse of a translation into a CSV file
///
/// The book listing is fetched first; if it fails nothing is written. Each
/// chapter is then requested in order, and a failed chapter contributes no
/// rows without stopping the run.
pub async fn execute_fetch<S: ScriptureSource>(
    source: &S,
    config: &FetchConfig,
    output: &Path,
) -> Result<FetchResult> {
    info!("Fetching book list for {}", config.translation);
    let books = source
        .list_books(&config.translation)
        .await
        .map_err(|e| PrepError::BookListUnavailable {
            translation: config.translation.clone(),
            reason: format!("{:#}", e),
        })?;

    let mut writer = VerseWriter::create(output)?;
    let mut chapters_requested = 0;
    let mut chapters_skipped = 0;

    for book in &books {
        info!("Downloading {} ({} chapters)...", book.name, book.chapters);

        for chapter in 1..=book.chapters {
            chapters_requested += 1;
            match source
                .get_chapter(&config.translation, book.book_id, chapter)
                .await
            {
                Ok(verses) => {
                    for verse in verses {
                        writer.write(&VerseRecord::new(
                            book.name.as_str(),
                            chapter,
                            verse.verse,
                            strip_markup(&verse.text),
                        ))?;
                    }
                }
                Err(e) => {
                    debug!("Skipping {} {}: {:#}", book.name, chapter, e);
                    chapters_skipped += 1;
                }
            }

            if !config.delay.is_zero() {
                tokio::time::sleep(config.delay).await;
            }
        }
    }

    let rows_written = writer.finish()?;

    Ok(FetchResult {
        books: books.len(),
        chapters_requested,
        chapters_skipped,
        rows_written,
    })
}
