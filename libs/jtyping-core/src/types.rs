//! Core types for the kanji and vocabulary quiz.
//!
//! Field names follow the kanjidic2 / JMdict "simplified JSON" datasets so
//! entries can be deserialized straight from them and stored back unchanged.

use serde::{Deserialize, Serialize};

/// Marker used by the datasets for "applies to every spelling".
pub const WILDCARD: &str = "*";

/// Which pool a quiz subject is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    Kanji,
    Vocabulary,
}

impl Default for SubjectKind {
    fn default() -> Self {
        Self::Kanji
    }
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kanji => "Kanji",
            Self::Vocabulary => "Vocabulary",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Kanji" | "kanji" => Some(Self::Kanji),
            "Vocabulary" | "vocabulary" | "vocab" => Some(Self::Vocabulary),
            _ => None,
        }
    }
}

/// What the user is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizType {
    Reading,
    Meaning,
}

impl Default for QuizType {
    fn default() -> Self {
        Self::Reading
    }
}

impl QuizType {
    /// Separator used when re-displaying canonical answers.
    pub fn answer_separator(self) -> &'static str {
        match self {
            Self::Reading => "・",
            Self::Meaning => " / ",
        }
    }

    /// Verdict a submission keeps when nothing matched: a missed reading is
    /// incorrect, a missed meaning is left to the user's judgment.
    pub fn default_verdict(self) -> Verdict {
        match self {
            Self::Reading => Verdict::Incorrect,
            Self::Meaning => Verdict::NeedsManualReview,
        }
    }
}

/// Outcome of a quiz round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Unset,
    Correct,
    Incorrect,
    NeedsManualReview,
    RetryRequested,
}

impl Default for Verdict {
    fn default() -> Self {
        Self::Unset
    }
}

impl Verdict {
    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset | Self::RetryRequested)
    }
}

/// Restriction of a reading or sense to particular kanji spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum AppliesTo {
    All,
    Only(Vec<String>),
}

impl Default for AppliesTo {
    fn default() -> Self {
        Self::All
    }
}

impl AppliesTo {
    /// Whether the restriction admits the displayed surface form.
    pub fn admits(&self, surface: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(spellings) => spellings.iter().any(|s| s == surface),
        }
    }
}

impl From<Vec<String>> for AppliesTo {
    fn from(values: Vec<String>) -> Self {
        if values.first().map(String::as_str) == Some(WILDCARD) {
            Self::All
        } else {
            Self::Only(values)
        }
    }
}

impl From<AppliesTo> for Vec<String> {
    fn from(applies: AppliesTo) -> Self {
        match applies {
            AppliesTo::All => vec![WILDCARD.to_string()],
            AppliesTo::Only(values) => values,
        }
    }
}

/// Reading type of a kanji reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReadingType {
    On,
    Kun,
    Other(String),
}

impl ReadingType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::On => "ja_on",
            Self::Kun => "ja_kun",
            Self::Other(name) => name,
        }
    }

    /// Heading shown above readings of this type.
    pub fn label(&self) -> String {
        match self {
            Self::On => "Onyomi".to_string(),
            Self::Kun => "Kunyomi".to_string(),
            Self::Other(name) => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl From<String> for ReadingType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ja_on" => Self::On,
            "ja_kun" => Self::Kun,
            _ => Self::Other(value),
        }
    }
}

impl From<ReadingType> for String {
    fn from(kind: ReadingType) -> Self {
        kind.as_str().to_string()
    }
}

/// A single (type, value) reading of a kanji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "type")]
    pub kind: ReadingType,
    pub value: String,
}

impl Reading {
    pub fn new(kind: ReadingType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Split a kun-reading on its okurigana marker: `"みず.から"` gives
    /// `("みず", Some("から"))`.
    pub fn okurigana_split(&self) -> (&str, Option<&str>) {
        match self.value.split_once('.') {
            Some((stem, suffix)) => (stem, Some(suffix)),
            None => (&self.value, None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(default = "default_meaning_lang")]
    pub lang: String,
    pub value: String,
}

fn default_meaning_lang() -> String {
    "en".to_string()
}

impl Meaning {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            lang: default_meaning_lang(),
            value: value.into(),
        }
    }
}

/// One reading/meaning group of a kanji.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingMeaningGroup {
    #[serde(default)]
    pub readings: Vec<Reading>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingMeaning {
    #[serde(default)]
    pub groups: Vec<ReadingMeaningGroup>,
    /// Readings used only in personal names.
    #[serde(default)]
    pub nanori: Vec<String>,
}

/// A kanji dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanjiEntry {
    pub literal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<u8>,
    /// Frequency rank among newspaper kanji (1 is most frequent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_meaning: Option<ReadingMeaning>,
}

/// A kanji spelling of a vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiSpelling {
    pub common: bool,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A kana reading of a vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanaReading {
    pub common: bool,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub applies_to_kanji: AppliesTo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gloss {
    #[serde(default = "default_gloss_lang")]
    pub lang: String,
    pub text: String,
}

fn default_gloss_lang() -> String {
    "eng".to_string()
}

impl Gloss {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            lang: default_gloss_lang(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    #[serde(default)]
    pub part_of_speech: Vec<String>,
    #[serde(default)]
    pub applies_to_kanji: AppliesTo,
    #[serde(default)]
    pub gloss: Vec<Gloss>,
}

/// A general-vocabulary dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: String,
    #[serde(default)]
    pub kanji: Vec<KanjiSpelling>,
    #[serde(default)]
    pub kana: Vec<KanaReading>,
    #[serde(default, rename = "sense")]
    pub senses: Vec<Sense>,
}

impl VocabularyEntry {
    /// Kanji spellings flagged common; the derived membership index.
    pub fn common_spellings(&self) -> Vec<String> {
        self.kanji
            .iter()
            .filter(|k| k.common)
            .map(|k| k.text.clone())
            .collect()
    }
}

/// Word frequency on the Zipf scale (log10 of occurrences per billion words).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub id: String,
    pub zipf: f64,
}

/// The item being quizzed in the current round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuizSubject {
    Kanji {
        entry: KanjiEntry,
    },
    Vocabulary {
        entries: Vec<VocabularyEntry>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frequency_hint: Option<FrequencyEntry>,
    },
}

impl QuizSubject {
    pub fn kanji(entry: KanjiEntry) -> Self {
        Self::Kanji { entry }
    }

    /// Group vocabulary entries into one subject. An empty grouping has
    /// nothing to quiz.
    pub fn vocabulary(
        entries: Vec<VocabularyEntry>,
        frequency_hint: Option<FrequencyEntry>,
    ) -> crate::Result<Self> {
        if entries.is_empty() {
            return Err(crate::QuizError::NoCandidates);
        }
        Ok(Self::Vocabulary {
            entries,
            frequency_hint,
        })
    }

    pub fn kind(&self) -> SubjectKind {
        match self {
            Self::Kanji { .. } => SubjectKind::Kanji,
            Self::Vocabulary { .. } => SubjectKind::Vocabulary,
        }
    }
}
