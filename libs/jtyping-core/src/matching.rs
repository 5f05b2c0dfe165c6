//! Answer matching against a quiz subject's readings and meanings.

use crate::types::{
    KanjiEntry, QuizSubject, QuizType, ReadingMeaning, ReadingType, VocabularyEntry, Verdict,
};
use serde::{Deserialize, Serialize};
use wana_kana::ConvertJapanese;

/// How a single submitted answer fared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    /// Matched something that should not count on its own (dictionary
    /// notation, an uncommon reading).
    NeedsReview,
    Unmatched,
}

/// Result of matching a submission against a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub verdict: Verdict,
    pub quiz_type: QuizType,
    /// Submitted answers, canonicalized where a match supplied a canonical form.
    pub answers: Vec<String>,
    pub outcomes: Vec<AnswerOutcome>,
}

impl MatchResult {
    /// Answers joined for re-display in the input box.
    pub fn display_answer(&self) -> String {
        self.answers.join(self.quiz_type.answer_separator())
    }
}

/// Match normalized answers against a subject.
///
/// `surface` is the form currently displayed; vocabulary readings and senses
/// restricted to other spellings are not candidates.
pub fn match_answers(
    answers: &[String],
    quiz_type: QuizType,
    subject: &QuizSubject,
    surface: &str,
) -> MatchResult {
    let mut result = MatchResult {
        verdict: quiz_type.default_verdict(),
        quiz_type,
        answers: answers.to_vec(),
        outcomes: Vec::with_capacity(answers.len()),
    };

    if answers.is_empty() {
        result.verdict = Verdict::NeedsManualReview;
        return result;
    }

    for answer in answers {
        let (outcome, canonical) = match subject {
            QuizSubject::Kanji { entry } => match_kanji(answer, quiz_type, entry),
            QuizSubject::Vocabulary { entries, .. } => {
                match_vocabulary(answer, quiz_type, entries, surface)
            }
        };
        if let (AnswerOutcome::Correct, Some(text)) = (outcome, canonical) {
            let slot = result.outcomes.len();
            result.answers[slot] = text;
        }
        result.outcomes.push(outcome);
    }

    if let QuizSubject::Kanji { entry } = subject {
        if entry.reading_meaning.is_none() {
            result.verdict = Verdict::NeedsManualReview;
            return result;
        }
    }

    result.verdict = aggregate(&result.outcomes, result.verdict);
    result
}

fn aggregate(outcomes: &[AnswerOutcome], default: Verdict) -> Verdict {
    if outcomes.iter().all(|o| *o == AnswerOutcome::Correct) {
        Verdict::Correct
    } else if outcomes.contains(&AnswerOutcome::NeedsReview) {
        Verdict::NeedsManualReview
    } else {
        default
    }
}

fn match_kanji(
    answer: &str,
    quiz_type: QuizType,
    entry: &KanjiEntry,
) -> (AnswerOutcome, Option<String>) {
    let Some(rm) = &entry.reading_meaning else {
        return (AnswerOutcome::Unmatched, None);
    };

    match quiz_type {
        QuizType::Reading => match_kanji_reading(answer, rm),
        QuizType::Meaning => {
            let answer = answer.to_lowercase();
            let found = rm
                .groups
                .iter()
                .flat_map(|g| &g.meanings)
                .any(|m| m.value.to_lowercase() == answer);
            (outcome_of(found), None)
        }
    }
}

fn match_kanji_reading(answer: &str, rm: &ReadingMeaning) -> (AnswerOutcome, Option<String>) {
    let katakana = answer.to_katakana();
    let hiragana = answer.to_hiragana();
    let is_answer = |s: &str| s == answer || s == hiragana;
    let mut outcome = AnswerOutcome::Unmatched;

    for reading in rm.groups.iter().flat_map(|g| &g.readings) {
        match reading.kind {
            ReadingType::On => {
                if reading.value == katakana {
                    return (AnswerOutcome::Correct, Some(katakana));
                }
            }
            ReadingType::Kun => {
                let (stem, suffix) = reading.okurigana_split();
                if is_answer(stem) {
                    return (AnswerOutcome::Correct, None);
                }
                // The dictionary notation itself is not a reading anyone says.
                if suffix.is_some() && is_answer(&reading.value) {
                    outcome = AnswerOutcome::NeedsReview;
                }
            }
            ReadingType::Other(_) => {}
        }
    }

    if rm.nanori.iter().any(|n| is_answer(n)) {
        return (AnswerOutcome::Correct, None);
    }

    (outcome, None)
}

fn match_vocabulary(
    answer: &str,
    quiz_type: QuizType,
    entries: &[VocabularyEntry],
    surface: &str,
) -> (AnswerOutcome, Option<String>) {
    match quiz_type {
        QuizType::Reading => {
            let target = answer.to_katakana();
            let mut outcome = AnswerOutcome::Unmatched;

            for kana in entries.iter().flat_map(|e| &e.kana) {
                if kana.text.to_katakana() != target || !kana.applies_to_kanji.admits(surface) {
                    continue;
                }
                if !kana.common {
                    outcome = AnswerOutcome::NeedsReview;
                    continue;
                }
                return (AnswerOutcome::Correct, Some(kana.text.clone()));
            }

            (outcome, None)
        }
        QuizType::Meaning => {
            let answer = answer.to_lowercase();
            let found = entries
                .iter()
                .flat_map(|e| &e.senses)
                .filter(|s| s.applies_to_kanji.admits(surface))
                .flat_map(|s| &s.gloss)
                .any(|g| g.text.to_lowercase() == answer);
            (outcome_of(found), None)
        }
    }
}

fn outcome_of(found: bool) -> AnswerOutcome {
    if found {
        AnswerOutcome::Correct
    } else {
        AnswerOutcome::Unmatched
    }
}
