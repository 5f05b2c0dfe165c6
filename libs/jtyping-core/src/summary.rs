//! Structured breakdown of a subject shown after an answer is submitted.

use crate::types::{KanjiEntry, QuizSubject, QuizType, ReadingType, VocabularyEntry, WILDCARD};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A piece of line text. Okurigana is rendered distinctly from the stem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    Text(String),
    Okurigana(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    /// "Onyomi:", "1." and the like.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub spans: Vec<Span>,
}

impl SummaryLine {
    fn labeled(label: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            label: Some(label.into()),
            spans,
        }
    }

    /// Plain text of the line without its label.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|span| match span {
                Span::Text(t) => t.clone(),
                Span::Okurigana(t) => format!("({t})"),
            })
            .collect()
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label} {}", self.text()),
            None => f.write_str(&self.text()),
        }
    }
}

/// Lines that belong together: one reading-meaning group, one vocabulary
/// entry, or the nanori list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryBlock {
    pub lines: Vec<SummaryLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub quiz_type: QuizType,
    pub blocks: Vec<SummaryBlock>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for line in &block.lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

/// Build the mode-appropriate summary of a subject.
pub fn build_summary(subject: &QuizSubject, quiz_type: QuizType) -> Summary {
    let blocks = match (subject, quiz_type) {
        (QuizSubject::Kanji { entry }, QuizType::Reading) => kanji_readings(entry),
        (QuizSubject::Kanji { entry }, QuizType::Meaning) => kanji_meanings(entry),
        (QuizSubject::Vocabulary { entries, .. }, QuizType::Reading) => {
            entries.iter().filter_map(vocabulary_readings).collect()
        }
        (QuizSubject::Vocabulary { entries, .. }, QuizType::Meaning) => {
            entries.iter().map(vocabulary_senses).collect()
        }
    };

    Summary { quiz_type, blocks }
}

fn joined(items: impl IntoIterator<Item = Vec<Span>>, separator: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::Text(separator.to_string()));
        }
        spans.extend(item);
    }
    spans
}

fn kun_spans(value: &str) -> Vec<Span> {
    match value.split_once('.') {
        Some((stem, suffix)) => vec![
            Span::Text(stem.to_string()),
            Span::Okurigana(suffix.to_string()),
        ],
        None => vec![Span::Text(value.to_string())],
    }
}

fn kanji_readings(entry: &KanjiEntry) -> Vec<SummaryBlock> {
    let Some(rm) = &entry.reading_meaning else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    for group in &rm.groups {
        let mut kinds: Vec<&ReadingType> = Vec::new();
        for reading in &group.readings {
            if !kinds.contains(&&reading.kind) {
                kinds.push(&reading.kind);
            }
        }
        // On first, then kun, then the rest in order of appearance.
        kinds.sort_by_key(|kind| match kind {
            ReadingType::On => 0,
            ReadingType::Kun => 1,
            ReadingType::Other(_) => 2,
        });

        let lines = kinds
            .into_iter()
            .map(|kind| {
                let values = group.readings.iter().filter(|r| &r.kind == kind).map(|r| {
                    if *kind == ReadingType::Kun {
                        kun_spans(&r.value)
                    } else {
                        vec![Span::Text(r.value.clone())]
                    }
                });
                SummaryLine::labeled(format!("{}:", kind.label()), joined(values, ", "))
            })
            .collect();
        blocks.push(SummaryBlock { lines });
    }

    if !rm.nanori.is_empty() {
        let values = rm.nanori.iter().map(|n| vec![Span::Text(n.clone())]);
        blocks.push(SummaryBlock {
            lines: vec![SummaryLine::labeled("Nanori:", joined(values, ", "))],
        });
    }

    blocks
}

fn kanji_meanings(entry: &KanjiEntry) -> Vec<SummaryBlock> {
    let Some(rm) = &entry.reading_meaning else {
        return Vec::new();
    };

    let lines = rm
        .groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let meanings: Vec<&str> = group.meanings.iter().map(|m| m.value.as_str()).collect();
            SummaryLine::labeled(format!("{}.", i + 1), vec![Span::Text(meanings.join("; "))])
        })
        .collect();

    vec![SummaryBlock { lines }]
}

fn vocabulary_readings(entry: &VocabularyEntry) -> Option<SummaryBlock> {
    let common: Vec<&str> = entry
        .kana
        .iter()
        .filter(|k| k.common)
        .map(|k| k.text.as_str())
        .collect();
    if common.is_empty() {
        return None;
    }

    Some(SummaryBlock {
        lines: vec![SummaryLine {
            label: None,
            spans: vec![Span::Text(common.join(", "))],
        }],
    })
}

fn vocabulary_senses(entry: &VocabularyEntry) -> SummaryBlock {
    let lines = entry
        .senses
        .iter()
        .enumerate()
        .map(|(i, sense)| {
            let glosses: Vec<&str> = sense.gloss.iter().map(|g| g.text.as_str()).collect();
            SummaryLine::labeled(format!("{}.", i + 1), vec![Span::Text(glosses.join("; "))])
        })
        .collect();
    SummaryBlock { lines }
}

/// Full subject data for the "full entry" panel, with empty arrays and
/// wildcard-only restrictions left out.
pub fn debug_dump(subject: &QuizSubject) -> Value {
    let mut value = serde_json::to_value(subject).unwrap_or(Value::Null);
    prune(&mut value);
    value
}

fn is_elided(value: &Value) -> bool {
    match value {
        Value::Array(items) => {
            items.is_empty() || (items.len() == 1 && items[0].as_str() == Some(WILDCARD))
        }
        _ => false,
    }
}

fn prune(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.values_mut().for_each(prune);
            map.retain(|_, v| !is_elided(v));
        }
        Value::Array(items) => items.iter_mut().for_each(prune),
        _ => {}
    }
}
