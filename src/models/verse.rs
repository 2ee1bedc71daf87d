use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Column names shared by every verse table
pub const VERSE_HEADERS: [&str; 4] = ["Book", "Chapter", "Verse", "Text"];

/// A single row of a verse table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerseRecord {
    #[serde(rename = "Book")]
    pub book: String,
    #[serde(rename = "Chapter")]
    pub chapter: u32,
    #[serde(rename = "Verse")]
    pub verse: u32,
    #[serde(rename = "Text")]
    pub text: String,
}

impl VerseRecord {
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32, text: impl Into<String>) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
            text: text.into(),
        }
    }
}

/// Verses of one book grouped by chapter, each chapter in source order
#[derive(Debug, Clone, Default)]
pub struct ChapterIndex {
    chapters: BTreeMap<u32, Vec<VerseRecord>>,
}

impl ChapterIndex {
    /// Group records by chapter, keeping the order they arrive in
    pub fn from_records(records: impl IntoIterator<Item = VerseRecord>) -> Self {
        let mut chapters: BTreeMap<u32, Vec<VerseRecord>> = BTreeMap::new();
        for record in records {
            chapters.entry(record.chapter).or_default().push(record);
        }
        Self { chapters }
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapter numbers in ascending order
    pub fn chapter_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.chapters.keys().copied()
    }

    /// Verses of a chapter, empty if the chapter is absent
    pub fn verses(&self, chapter: u32) -> &[VerseRecord] {
        self.chapters
            .get(&chapter)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.values().map(|v| v.len()).sum()
    }
}
