//! What the renderer shows for a subject.

use crate::error::{QuizError, Result};
use crate::types::{QuizSubject, VocabularyEntry};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Styling classification of the prompt area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayClass {
    Loading,
    Kanji,
    Vocab,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub surface: String,
    /// Language hint for font selection.
    pub lang: String,
    pub class: DisplayClass,
}

impl Prompt {
    pub fn loading() -> Self {
        Self {
            surface: "Loading...".to_string(),
            lang: "ja".to_string(),
            class: DisplayClass::Loading,
        }
    }

    /// Choose the displayed surface for a subject.
    ///
    /// Vocabulary drawn by frequency shows the spelling that was drawn;
    /// otherwise a random common spelling, then a random common reading.
    pub fn for_subject<R: Rng + ?Sized>(subject: &QuizSubject, rng: &mut R) -> Result<Self> {
        let (surface, class) = match subject {
            QuizSubject::Kanji { entry } => (entry.literal.clone(), DisplayClass::Kanji),
            QuizSubject::Vocabulary {
                entries,
                frequency_hint,
            } => {
                let surface = match frequency_hint {
                    Some(hint) => hint.id.clone(),
                    None => {
                        let entry = entries.first().ok_or(QuizError::NoCandidates)?;
                        vocabulary_surface(entry, rng)?
                    }
                };
                (surface, DisplayClass::Vocab)
            }
        };

        Ok(Self {
            surface,
            lang: "ja".to_string(),
            class,
        })
    }
}

fn vocabulary_surface<R: Rng + ?Sized>(entry: &VocabularyEntry, rng: &mut R) -> Result<String> {
    let common_kanji: Vec<&str> = entry
        .kanji
        .iter()
        .filter(|k| k.common)
        .map(|k| k.text.as_str())
        .collect();
    let common_kana: Vec<&str> = entry
        .kana
        .iter()
        .filter(|k| k.common)
        .map(|k| k.text.as_str())
        .collect();

    common_kanji
        .choose(rng)
        .or_else(|| common_kana.choose(rng))
        .map(|s| s.to_string())
        .or_else(|| entry.kanji.first().map(|k| k.text.clone()))
        .or_else(|| entry.kana.first().map(|k| k.text.clone()))
        .ok_or_else(|| QuizError::DataIntegrity(format!("entry {} has no spelling", entry.id)))
}
