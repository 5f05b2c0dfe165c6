//! In-memory quiz sessions.

use chrono::{DateTime, Duration, Utc};
use jtyping_core::{
    advance, MatchResult, Prompt, QuizFilter, QuizRoundState, QuizSubject, RoundEvent, RoundPhase,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::RoundView;

/// One user's quiz loop.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub filter: QuizFilter,
    pub round: QuizRoundState,
    pub subject: Option<QuizSubject>,
    pub prompt: Prompt,
    pub last_result: Option<MatchResult>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(filter: QuizFilter, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round: QuizRoundState::new(filter.mode),
            filter,
            subject: None,
            prompt: Prompt::loading(),
            last_result: None,
            last_seen: now,
        }
    }

    /// Advance the round. Returns whether the event applied.
    pub fn apply(&mut self, event: RoundEvent) -> bool {
        let next = advance(&self.round, event);
        let changed = next != self.round;
        self.round = next;
        changed
    }

    pub fn view(&self) -> RoundView {
        RoundView {
            session_id: self.id,
            generation: self.round.generation,
            phase: self.round.phase,
            subject_kind: self.round.subject_kind,
            quiz_type: self.round.quiz_type,
            verdict: self.round.verdict,
            answers: self.round.answers.clone(),
            prompt: self.prompt.clone(),
            empty: self.round.phase == RoundPhase::Empty,
            filter: self.filter.clone(),
        }
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_seen > ttl
    }
}

/// Sessions keyed by id, evicted after `ttl` of inactivity.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>> {
        self.sessions
            .lock()
            .map_err(|_| ApiError::Internal("session registry lock poisoned".to_string()))
    }

    pub fn create(&self, filter: QuizFilter) -> Result<Uuid> {
        let session = Session::new(filter, Utc::now());
        let id = session.id;
        self.lock()?.insert(id, session);
        Ok(id)
    }

    /// Run `f` against a live session and mark it as seen.
    pub fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> Result<T>) -> Result<T> {
        let now = Utc::now();
        let mut sessions = self.lock()?;

        if sessions.get(&id).is_some_and(|s| s.is_expired(now, self.ttl)) {
            sessions.remove(&id);
        }
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("session {id}")))?;

        session.last_seen = now;
        f(session)
    }

    /// Drop sessions idle longer than the TTL. Returns how many were dropped.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, self.ttl));
        Ok(before - sessions.len())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}
