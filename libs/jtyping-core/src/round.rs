//! Quiz round state and its transitions.
//!
//! A round is an immutable value; [`advance`] returns the next state for an
//! event. Selections are tagged with the generation that requested them so a
//! result arriving after a newer request is dropped.

use crate::types::{QuizType, SubjectKind, Verdict};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// A selection is in flight.
    Loading,
    /// Waiting for the user's answer.
    Answering,
    /// Verdict reached; summary on display.
    Answered,
    /// Meaning round finished; a new subject should be loaded.
    NeedsNext,
    /// The filter matched nothing.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRoundState {
    pub generation: u64,
    pub subject_kind: SubjectKind,
    pub quiz_type: QuizType,
    pub verdict: Verdict,
    pub answers: Vec<String>,
    pub phase: RoundPhase,
}

impl QuizRoundState {
    pub fn new(subject_kind: SubjectKind) -> Self {
        Self {
            generation: 0,
            subject_kind,
            quiz_type: QuizType::Reading,
            verdict: Verdict::Unset,
            answers: Vec::new(),
            phase: RoundPhase::Loading,
        }
    }

    /// Whether a selection tagged with `generation` still belongs to this round.
    pub fn is_current(&self, generation: u64) -> bool {
        self.phase == RoundPhase::Loading && self.generation == generation
    }

    pub fn accepts_answer(&self) -> bool {
        self.phase == RoundPhase::Answering
    }

    fn fresh(&self, quiz_type: QuizType, phase: RoundPhase) -> Self {
        Self {
            generation: self.generation,
            subject_kind: self.subject_kind,
            quiz_type,
            verdict: Verdict::Unset,
            answers: Vec::new(),
            phase,
        }
    }

    fn begin_load(&self, subject_kind: SubjectKind) -> Self {
        Self {
            generation: self.generation + 1,
            subject_kind,
            ..self.fresh(QuizType::Reading, RoundPhase::Loading)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundEvent {
    BeginLoad,
    Loaded {
        generation: u64,
        kind: SubjectKind,
    },
    NothingFound {
        generation: u64,
    },
    Submitted {
        answers: Vec<String>,
        verdict: Verdict,
    },
    RetryRequested,
    Continue,
    SwitchMode {
        kind: SubjectKind,
    },
}

/// Apply an event. Events that do not fit the current phase leave the state
/// unchanged.
pub fn advance(state: &QuizRoundState, event: RoundEvent) -> QuizRoundState {
    match event {
        RoundEvent::BeginLoad => state.begin_load(state.subject_kind),
        RoundEvent::SwitchMode { kind } => state.begin_load(kind),

        RoundEvent::Loaded { generation, kind } if state.is_current(generation) => QuizRoundState {
            subject_kind: kind,
            ..state.fresh(QuizType::Reading, RoundPhase::Answering)
        },
        RoundEvent::NothingFound { generation } if state.is_current(generation) => {
            state.fresh(QuizType::Reading, RoundPhase::Empty)
        }

        RoundEvent::Submitted { answers, verdict } if state.accepts_answer() => QuizRoundState {
            verdict,
            answers,
            phase: RoundPhase::Answered,
            ..state.clone()
        },

        RoundEvent::RetryRequested
            if matches!(state.phase, RoundPhase::Answering | RoundPhase::Answered) =>
        {
            QuizRoundState {
                verdict: Verdict::RetryRequested,
                ..state.fresh(state.quiz_type, RoundPhase::Answering)
            }
        }

        RoundEvent::Continue if state.phase == RoundPhase::Answered => match state.quiz_type {
            QuizType::Reading => state.fresh(QuizType::Meaning, RoundPhase::Answering),
            QuizType::Meaning => state.fresh(QuizType::Meaning, RoundPhase::NeedsNext),
        },

        _ => state.clone(),
    }
}
