//! API request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::LexiconStats;

// Re-export shared types from jtyping-core
pub use jtyping_core::{
    AnswerOutcome, FilterOverrides, Prompt, QuizFilter, QuizType, RoundPhase, SubjectKind,
    Summary, Verdict,
};

/// Current state of a session's round, as shown to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundView {
    pub session_id: Uuid,
    pub generation: u64,
    pub phase: RoundPhase,
    pub subject_kind: SubjectKind,
    pub quiz_type: QuizType,
    pub verdict: Verdict,
    pub answers: Vec<String>,
    pub prompt: Prompt,
    /// The filter matched nothing.
    pub empty: bool,
    pub filter: QuizFilter,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub round: RoundView,
    pub verdict: Verdict,
    pub outcomes: Vec<AnswerOutcome>,
    /// Canonical answers for re-display, set on a correct verdict.
    pub display_answer: Option<String>,
    pub summary: Summary,
    pub summary_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub lexicon: LexiconStats,
    pub sessions: usize,
}
