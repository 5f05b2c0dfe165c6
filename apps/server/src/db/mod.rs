//! Local SQLite lexicon store.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{DatasetPaths, LexiconStats, SeedReport, SqliteLexicon};
