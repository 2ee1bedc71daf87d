use serde::{Deserialize, Serialize};

/// One entry of the `get-books` listing for a translation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookEntry {
    /// Numeric book identifier used in chapter URLs
    #[serde(rename = "bookid")]
    pub book_id: u32,
    /// Book name as spelled by this translation
    pub name: String,
    /// Number of chapters in the book
    pub chapters: u32,
}

/// One verse from a `get-chapter` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChapterVerse {
    /// Verse number within the chapter
    pub verse: u32,
    /// Verse text, may carry inline markup
    pub text: String,
}
