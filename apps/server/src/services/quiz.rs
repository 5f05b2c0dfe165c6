//! Quiz loop: selection, answering and round transitions for a session.

use jtyping_core::{
    build_summary, debug_dump, match_answers, prepare_answers, FilterOverrides, Prompt, QuizFilter,
    QuizSubject, RoundEvent, RoundPhase, Verdict,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{AnswerResponse, RoundView};
use crate::services::session::SessionRegistry;
use crate::AppState;

/// A drawn subject with the surface chosen for display.
#[derive(Debug, Clone)]
pub struct Selection {
    pub subject: QuizSubject,
    pub prompt: Prompt,
}

/// Start a load: bump the round generation and settle the filter. Returns
/// the generation the selection must be tagged with.
pub fn begin_load(
    registry: &SessionRegistry,
    id: Uuid,
    overrides: &FilterOverrides,
) -> Result<(u64, QuizFilter)> {
    registry.with_session(id, |session| {
        let filter = session.filter.with_overrides(overrides)?;
        let event = if filter.mode != session.round.subject_kind {
            RoundEvent::SwitchMode { kind: filter.mode }
        } else {
            RoundEvent::BeginLoad
        };

        session.filter = filter.clone();
        session.apply(event);
        session.subject = None;
        session.prompt = Prompt::loading();
        session.last_result = None;
        Ok((session.round.generation, filter))
    })
}

/// Draw a subject. Blocks on the store; run it off the async runtime.
pub fn select_subject(state: &AppState, filter: &QuizFilter) -> Result<Option<Selection>> {
    let lexicon = state
        .lexicon
        .lock()
        .map_err(|_| ApiError::Internal("lexicon lock poisoned".to_string()))?;
    let mut rng = state
        .rng
        .lock()
        .map_err(|_| ApiError::Internal("rng lock poisoned".to_string()))?;

    let Some(subject) = state.selector.select(&lexicon, filter, &mut *rng)? else {
        return Ok(None);
    };
    let prompt = Prompt::for_subject(&subject, &mut *rng)?;
    Ok(Some(Selection { subject, prompt }))
}

/// Apply a finished selection if it still belongs to the session's round.
pub fn finish_load(
    registry: &SessionRegistry,
    id: Uuid,
    generation: u64,
    selection: Option<Selection>,
) -> Result<RoundView> {
    registry.with_session(id, |session| {
        if !session.round.is_current(generation) {
            warn!(
                session = %id,
                generation,
                current = session.round.generation,
                "discarding stale selection"
            );
            return Err(ApiError::Conflict(format!(
                "selection {generation} superseded by a newer request"
            )));
        }

        match selection {
            Some(Selection { subject, prompt }) => {
                debug!(session = %id, generation, surface = %prompt.surface, "subject loaded");
                session.apply(RoundEvent::Loaded {
                    generation,
                    kind: subject.kind(),
                });
                session.subject = Some(subject);
                session.prompt = prompt;
            }
            None => {
                debug!(session = %id, generation, "nothing matches the filter");
                session.apply(RoundEvent::NothingFound { generation });
            }
        }
        Ok(session.view())
    })
}

/// Load the next subject. Only the most recent request for a session is
/// applied; earlier ones finish with a conflict.
pub async fn load_next(state: &AppState, id: Uuid, overrides: &FilterOverrides) -> Result<RoundView> {
    let (generation, filter) = begin_load(&state.sessions, id, overrides)?;

    let app = state.clone();
    let selection = tokio::task::spawn_blocking(move || select_subject(&app, &filter))
        .await
        .map_err(|e| ApiError::Internal(format!("selection task failed: {e}")))??;

    finish_load(&state.sessions, id, generation, selection)
}

pub fn submit_answer(registry: &SessionRegistry, id: Uuid, input: &str) -> Result<AnswerResponse> {
    registry.with_session(id, |session| {
        if !session.round.accepts_answer() {
            return Err(ApiError::Conflict("round is not accepting answers".to_string()));
        }
        let subject = session
            .subject
            .as_ref()
            .ok_or_else(|| ApiError::Conflict("no subject loaded".to_string()))?;
        let quiz_type = session.round.quiz_type;

        // Rejected input leaves the round untouched.
        let answers = prepare_answers(input, quiz_type, &session.prompt.surface)?;
        let result = match_answers(&answers, quiz_type, subject, &session.prompt.surface);
        let summary = build_summary(subject, quiz_type);

        debug!(
            session = %id,
            ?quiz_type,
            verdict = ?result.verdict,
            answers = ?result.answers,
            "answer checked"
        );

        session.apply(RoundEvent::Submitted {
            answers: result.answers.clone(),
            verdict: result.verdict,
        });

        let display_answer = (result.verdict == Verdict::Correct).then(|| result.display_answer());
        let response = AnswerResponse {
            round: session.view(),
            verdict: result.verdict,
            outcomes: result.outcomes.clone(),
            display_answer,
            summary_text: summary.to_string(),
            summary,
        };
        session.last_result = Some(result);
        Ok(response)
    })
}

pub fn retry(registry: &SessionRegistry, id: Uuid) -> Result<RoundView> {
    registry.with_session(id, |session| {
        if !session.apply(RoundEvent::RetryRequested) {
            return Err(ApiError::Conflict("nothing to retry".to_string()));
        }
        session.last_result = None;
        Ok(session.view())
    })
}

/// Move past an answered round: reading flips to meaning on the same
/// subject, meaning loads the next subject.
pub async fn continue_round(state: &AppState, id: Uuid) -> Result<RoundView> {
    let phase = state.sessions.with_session(id, |session| {
        if !session.apply(RoundEvent::Continue) {
            return Err(ApiError::Conflict("round has not been answered".to_string()));
        }
        session.last_result = None;
        Ok(session.round.phase)
    })?;

    if phase == RoundPhase::NeedsNext {
        return load_next(state, id, &FilterOverrides::default()).await;
    }
    state.sessions.with_session(id, |session| Ok(session.view()))
}

pub fn current_entry(registry: &SessionRegistry, id: Uuid) -> Result<serde_json::Value> {
    registry.with_session(id, |session| {
        session
            .subject
            .as_ref()
            .map(debug_dump)
            .ok_or_else(|| ApiError::NotFound(format!("no subject loaded for session {id}")))
    })
}
