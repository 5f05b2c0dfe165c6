//! Item selection strategies.

use crate::filter::QuizFilter;
use crate::store::LexiconStore;
use crate::types::{KanjiEntry, QuizSubject, SubjectKind};
use rand::{Rng, RngCore};

/// Picks the next quiz subject from a store.
///
/// `Ok(None)` means nothing matched the filter; callers show an empty state.
pub trait ItemSelector<S: LexiconStore>: Send + Sync {
    /// Strategy identifier.
    fn name(&self) -> &'static str;

    fn select_kanji(
        &self,
        store: &S,
        filter: &QuizFilter,
        rng: &mut dyn RngCore,
    ) -> Result<Option<KanjiEntry>, S::Error>;

    fn select_vocabulary(
        &self,
        store: &S,
        filter: &QuizFilter,
        rng: &mut dyn RngCore,
    ) -> Result<Option<QuizSubject>, S::Error>;

    /// Select from the pool named by `filter.mode`.
    fn select(
        &self,
        store: &S,
        filter: &QuizFilter,
        rng: &mut dyn RngCore,
    ) -> Result<Option<QuizSubject>, S::Error> {
        match filter.mode {
            SubjectKind::Kanji => Ok(self.select_kanji(store, filter, rng)?.map(QuizSubject::kanji)),
            SubjectKind::Vocabulary => self.select_vocabulary(store, filter, rng),
        }
    }
}

/// `floor(random() * count)`, kept below `count`. `count` must be non-zero.
pub fn random_offset(rng: &mut dyn RngCore, count: usize) -> usize {
    let offset = (rng.random::<f64>() * count as f64) as usize;
    offset.min(count - 1)
}

/// Uniform kanji selection by grade ceiling; frequency-weighted or uniform
/// vocabulary selection depending on `freq_min`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

impl<S: LexiconStore> ItemSelector<S> for DefaultStrategy {
    fn name(&self) -> &'static str {
        "default"
    }

    fn select_kanji(
        &self,
        store: &S,
        filter: &QuizFilter,
        rng: &mut dyn RngCore,
    ) -> Result<Option<KanjiEntry>, S::Error> {
        let count = store.count_kanji(filter.grade_max)?;
        if count == 0 {
            return Ok(None);
        }
        store.kanji_at(filter.grade_max, random_offset(rng, count))
    }

    fn select_vocabulary(
        &self,
        store: &S,
        filter: &QuizFilter,
        rng: &mut dyn RngCore,
    ) -> Result<Option<QuizSubject>, S::Error> {
        let Some(min_zipf) = filter.freq_min else {
            let count = store.count_vocabulary()?;
            if count == 0 {
                return Ok(None);
            }
            let entry = store.vocabulary_at(random_offset(rng, count))?;
            return Ok(entry.and_then(|e| QuizSubject::vocabulary(vec![e], None).ok()));
        };

        let count = store.count_frequencies(min_zipf)?;
        if count == 0 {
            return Ok(None);
        }
        let Some(frequency) = store.frequency_at(min_zipf, random_offset(rng, count))? else {
            return Ok(None);
        };

        // A drawn word without vocabulary entries fails the whole draw.
        let entries = store.vocabulary_by_spelling(&frequency.id)?;
        Ok(QuizSubject::vocabulary(entries, Some(frequency)).ok())
    }
}

pub type KanjiHook<S> = Box<
    dyn Fn(&S, &QuizFilter, &mut dyn RngCore) -> Result<Option<KanjiEntry>, <S as LexiconStore>::Error>
        + Send
        + Sync,
>;

pub type VocabularyHook<S> = Box<
    dyn Fn(&S, &QuizFilter, &mut dyn RngCore) -> Result<Option<QuizSubject>, <S as LexiconStore>::Error>
        + Send
        + Sync,
>;

/// Strategy with caller-supplied hooks. A missing hook falls back to
/// [`DefaultStrategy`].
pub struct CustomStrategy<S: LexiconStore> {
    kanji: Option<KanjiHook<S>>,
    vocabulary: Option<VocabularyHook<S>>,
}

impl<S: LexiconStore> Default for CustomStrategy<S> {
    fn default() -> Self {
        Self {
            kanji: None,
            vocabulary: None,
        }
    }
}

impl<S: LexiconStore> CustomStrategy<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kanji<F>(mut self, hook: F) -> Self
    where
        F: Fn(&S, &QuizFilter, &mut dyn RngCore) -> Result<Option<KanjiEntry>, S::Error>
            + Send
            + Sync
            + 'static,
    {
        self.kanji = Some(Box::new(hook));
        self
    }

    pub fn with_vocabulary<F>(mut self, hook: F) -> Self
    where
        F: Fn(&S, &QuizFilter, &mut dyn RngCore) -> Result<Option<QuizSubject>, S::Error>
            + Send
            + Sync
            + 'static,
    {
        self.vocabulary = Some(Box::new(hook));
        self
    }
}

impl<S: LexiconStore> ItemSelector<S> for CustomStrategy<S> {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn select_kanji(
        &self,
        store: &S,
        filter: &QuizFilter,
        rng: &mut dyn RngCore,
    ) -> Result<Option<KanjiEntry>, S::Error> {
        match &self.kanji {
            Some(hook) => hook(store, filter, rng),
            None => DefaultStrategy.select_kanji(store, filter, rng),
        }
    }

    fn select_vocabulary(
        &self,
        store: &S,
        filter: &QuizFilter,
        rng: &mut dyn RngCore,
    ) -> Result<Option<QuizSubject>, S::Error> {
        match &self.vocabulary {
            Some(hook) => hook(store, filter, rng),
            None => DefaultStrategy.select_vocabulary(store, filter, rng),
        }
    }
}
