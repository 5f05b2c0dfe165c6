//! Query surface the quiz engine needs from a lexicon store.

use crate::types::{FrequencyEntry, KanjiEntry, VocabularyEntry};
use std::collections::BTreeMap;
use std::convert::Infallible;

/// Read access to the three record collections.
///
/// Offset queries must use a fixed ordering so the same offset always yields
/// the same record. Random sampling assumes offset access is cheap (O(1) or
/// O(log N)); stores that scan are still correct, only slower.
pub trait LexiconStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of kanji with a grade at or below `grade_max`.
    fn count_kanji(&self, grade_max: u8) -> Result<usize, Self::Error>;

    /// Kanji at `offset` among those with a grade at or below `grade_max`.
    fn kanji_at(&self, grade_max: u8, offset: usize) -> Result<Option<KanjiEntry>, Self::Error>;

    /// Number of frequency entries scoring at least `min_zipf`.
    fn count_frequencies(&self, min_zipf: f64) -> Result<usize, Self::Error>;

    fn frequency_at(
        &self,
        min_zipf: f64,
        offset: usize,
    ) -> Result<Option<FrequencyEntry>, Self::Error>;

    /// Vocabulary entries whose common kanji spellings include `spelling`.
    fn vocabulary_by_spelling(&self, spelling: &str) -> Result<Vec<VocabularyEntry>, Self::Error>;

    fn count_vocabulary(&self) -> Result<usize, Self::Error>;

    fn vocabulary_at(&self, offset: usize) -> Result<Option<VocabularyEntry>, Self::Error>;
}

/// In-memory store ordered by key (literal, id).
#[derive(Debug, Clone, Default)]
pub struct MemoryLexicon {
    kanji: BTreeMap<String, KanjiEntry>,
    vocabulary: BTreeMap<String, VocabularyEntry>,
    frequencies: BTreeMap<String, FrequencyEntry>,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_kanji(&mut self, entry: KanjiEntry) {
        self.kanji.insert(entry.literal.clone(), entry);
    }

    pub fn insert_vocabulary(&mut self, entry: VocabularyEntry) {
        self.vocabulary.insert(entry.id.clone(), entry);
    }

    pub fn insert_frequency(&mut self, entry: FrequencyEntry) {
        self.frequencies.insert(entry.id.clone(), entry);
    }

    fn kanji_matching(&self, grade_max: u8) -> impl Iterator<Item = &KanjiEntry> {
        self.kanji
            .values()
            .filter(move |k| k.grade.is_some_and(|g| g <= grade_max))
    }

    fn frequencies_matching(&self, min_zipf: f64) -> impl Iterator<Item = &FrequencyEntry> {
        self.frequencies.values().filter(move |f| f.zipf >= min_zipf)
    }
}

impl LexiconStore for MemoryLexicon {
    type Error = Infallible;

    fn count_kanji(&self, grade_max: u8) -> Result<usize, Self::Error> {
        Ok(self.kanji_matching(grade_max).count())
    }

    fn kanji_at(&self, grade_max: u8, offset: usize) -> Result<Option<KanjiEntry>, Self::Error> {
        Ok(self.kanji_matching(grade_max).nth(offset).cloned())
    }

    fn count_frequencies(&self, min_zipf: f64) -> Result<usize, Self::Error> {
        Ok(self.frequencies_matching(min_zipf).count())
    }

    fn frequency_at(
        &self,
        min_zipf: f64,
        offset: usize,
    ) -> Result<Option<FrequencyEntry>, Self::Error> {
        Ok(self.frequencies_matching(min_zipf).nth(offset).cloned())
    }

    fn vocabulary_by_spelling(&self, spelling: &str) -> Result<Vec<VocabularyEntry>, Self::Error> {
        Ok(self
            .vocabulary
            .values()
            .filter(|v| v.kanji.iter().any(|k| k.common && k.text == spelling))
            .cloned()
            .collect())
    }

    fn count_vocabulary(&self) -> Result<usize, Self::Error> {
        Ok(self.vocabulary.len())
    }

    fn vocabulary_at(&self, offset: usize) -> Result<Option<VocabularyEntry>, Self::Error> {
        Ok(self.vocabulary.values().nth(offset).cloned())
    }
}
