//! Quiz engine for Japanese kanji and vocabulary drills.
//!
//! Provides:
//! - Answer normalization and matching against readings and meanings
//! - Item selection strategies over a lexicon store (uniform and
//!   frequency-weighted)
//! - Summary building for post-answer display
//! - Round state transitions with last-request-wins loading
//! - Dataset readers and record schema migrations
//! - Shared types (KanjiEntry, VocabularyEntry, QuizSubject, Verdict, etc.)

pub mod answer;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod matching;
pub mod migration;
pub mod prompt;
pub mod round;
pub mod selector;
pub mod store;
pub mod summary;
pub mod types;

pub use answer::prepare_answers;
pub use error::{QuizError, Result};
pub use filter::{FilterOverrides, QuizFilter};
pub use matching::{match_answers, AnswerOutcome, MatchResult};
pub use prompt::{DisplayClass, Prompt};
pub use round::{advance, QuizRoundState, RoundEvent, RoundPhase};
pub use selector::{CustomStrategy, DefaultStrategy, ItemSelector};
pub use store::{LexiconStore, MemoryLexicon};
pub use summary::{build_summary, debug_dump, Summary};
pub use types::{
    AppliesTo, FrequencyEntry, KanjiEntry, QuizSubject, QuizType, Reading, ReadingType,
    SubjectKind, Verdict, VocabularyEntry,
};
