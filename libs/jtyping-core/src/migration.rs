//! Versioned record schema.
//!
//! Each version bump is a set of pure record transforms; stores apply them
//! inside their own transaction and record the new version.

use crate::dataset::Kanjidic2Character;
use crate::error::{QuizError, Result};
use crate::types::{FrequencyEntry, KanjiEntry, VocabularyEntry};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 2;

/// Version 1 stored kanji bodies exactly as the dataset shipped them.
pub type KanjiRecordV1 = Kanjidic2Character;

/// Version 1 frequency row: raw corpus count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRecordV1 {
    pub id: String,
    pub f: u64,
}

/// Fail for schemas newer than this build understands.
pub fn check_version(found: u32) -> Result<()> {
    if found > SCHEMA_VERSION {
        return Err(QuizError::UnsupportedVersion(found));
    }
    Ok(())
}

pub fn migrate_kanji_v1(record: KanjiRecordV1) -> KanjiEntry {
    record.into()
}

/// Zipf score of a raw count: log10 of occurrences per billion words.
/// Counts of zero score zero.
pub fn zipf_from_count(count: u64, corpus_total: u64) -> f64 {
    if count == 0 || corpus_total == 0 {
        return 0.0;
    }
    (count as f64 * 1e9 / corpus_total as f64).log10()
}

pub fn migrate_frequency_v1(record: &FrequencyRecordV1, corpus_total: u64) -> FrequencyEntry {
    FrequencyEntry {
        id: record.id.clone(),
        zipf: zipf_from_count(record.f, corpus_total),
    }
}

pub fn migrate_frequencies_v1(records: &[FrequencyRecordV1]) -> Vec<FrequencyEntry> {
    let total = records.iter().map(|r| r.f).sum();
    records
        .iter()
        .map(|r| migrate_frequency_v1(r, total))
        .collect()
}

/// Rows of the derived spelling index for one entry: its common kanji
/// spellings, deduplicated.
pub fn spelling_index(entry: &VocabularyEntry) -> Vec<String> {
    let mut spellings = entry.common_spellings();
    spellings.sort();
    spellings.dedup();
    spellings
}
