//! Answer normalization: turns raw free text into the answer list the
//! matcher consumes, or refuses the submission.

use crate::error::{QuizError, Result};
use crate::types::QuizType;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use wana_kana::{ConvertJapanese, IsJapaneseStr};

/// Characters separating multiple answers in one submission.
pub const ANSWER_DELIMITERS: [char; 2] = ['/', '・'];

/// Normalize and split a raw submission.
///
/// Reading answers are converted to kana and must stay within the kana
/// script. When the displayed surface mixes kanji with kana (`食べる`), each
/// reading must also end and start with the surface's kana parts.
pub fn prepare_answers(raw: &str, quiz_type: QuizType, surface: &str) -> Result<Vec<String>> {
    let folded = fold_input(raw);

    let text = match quiz_type {
        QuizType::Reading => folded.to_kana(),
        QuizType::Meaning => folded,
    };

    let answers = split_answers(&text);

    if quiz_type == QuizType::Reading {
        if let Some(bad) = answers.iter().find(|a| !is_kana_answer(a)) {
            return Err(QuizError::MalformedAnswer { input: bad.clone() });
        }

        if let Some(shape) = surface_shape(surface) {
            if let Some(bad) = answers.iter().find(|a| !shape.is_match(&a.to_katakana())) {
                return Err(QuizError::ShapeMismatch {
                    input: bad.clone(),
                    surface: surface.to_string(),
                });
            }
        }
    }

    Ok(answers)
}

/// Width-fold, lowercase and collapse whitespace.
pub fn fold_input(raw: &str) -> String {
    let folded: String = raw.nfkc().collect::<String>().to_lowercase();
    normalize_whitespace(&folded)
}

/// Split on the answer delimiters, dropping empty pieces.
pub fn split_answers(text: &str) -> Vec<String> {
    text.split(ANSWER_DELIMITERS)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize whitespace in a string (trim and collapse multiple spaces).
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_kana_answer(answer: &str) -> bool {
    answer.chars().all(|c| c == 'ー' || is_katakana_or_hiragana(c))
}

fn is_katakana_or_hiragana(c: char) -> bool {
    let mut buf = [0u8; 4];
    let s: &str = c.encode_utf8(&mut buf);
    s.is_kana()
}

fn is_shape_char(c: char) -> bool {
    if c == '・' || c == 'ー' {
        return true;
    }
    let mut buf = [0u8; 4];
    let s: &str = c.encode_utf8(&mut buf);
    s.is_katakana()
}

/// Pattern for the displayed surface in katakana, with each non-kana run
/// replaced by a wildcard. `None` when the surface is kana only.
fn surface_shape(surface: &str) -> Option<Regex> {
    let katakana = surface.to_katakana();
    let mut pattern = String::from("^");
    let mut has_wildcard = false;
    let mut in_run = false;

    for c in katakana.chars() {
        if is_shape_char(c) {
            let mut buf = [0u8; 4];
            pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            in_run = false;
        } else if !in_run {
            pattern.push_str(".+");
            in_run = true;
            has_wildcard = true;
        }
    }
    pattern.push('$');

    if !has_wildcard {
        return None;
    }
    Regex::new(&pattern).ok()
}
