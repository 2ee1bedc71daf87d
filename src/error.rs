use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort a whole run
#[derive(Debug, Error)]
pub enum PrepError {
    /// The initial book listing could not be retrieved
    #[error("could not reach API for translation {translation}: {reason}")]
    BookListUnavailable { translation: String, reason: String },

    /// The cross-reference workbook, its sheet, or its STANDARD column is unusable
    #[error("could not read cross-reference workbook {path:?}: {reason}")]
    CrossReferenceUnreadable { path: PathBuf, reason: String },

    /// One of the input translations has no rows for the target book
    #[error("could not find {book} data in {path:?}")]
    BookNotFound { book: String, path: PathBuf },
}
