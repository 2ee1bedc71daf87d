pub mod api;
pub mod error;
pub mod io;
pub mod models;
pub mod stages;
pub mod text;

pub use api::{BollsClient, BollsConfig, ScriptureSource};
pub use error::PrepError;
pub use io::{AuditLog, CrossReference, CsvTable, TableDocument, VerseWriter, load_cross_reference};
pub use models::{BookEntry, BookMatcher, BookTarget, ChapterIndex, ChapterVerse, VerseRecord};
pub use stages::{
    ComposeConfig, FetchConfig, NormalizeConfig, TranslationInput, execute_compose,
    execute_fetch, execute_normalize,
};
pub use text::{clean_text, strip_markup};
