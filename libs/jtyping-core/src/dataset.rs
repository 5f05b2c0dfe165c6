//! Readers for the external datasets: kanjidic2 and JMdict in their
//! "simplified JSON" form, and the word frequency table.

use crate::error::Result;
use crate::migration::{migrate_frequencies_v1, FrequencyRecordV1};
use crate::types::{FrequencyEntry, KanjiEntry, ReadingMeaning, VocabularyEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kanjidic2Misc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub stroke_counts: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jlpt_level: Option<u8>,
}

/// One kanjidic2 character, reduced to the fields the quiz reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kanjidic2Character {
    pub literal: String,
    #[serde(default)]
    pub misc: Kanjidic2Misc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_meaning: Option<ReadingMeaning>,
}

impl From<Kanjidic2Character> for KanjiEntry {
    fn from(c: Kanjidic2Character) -> Self {
        KanjiEntry {
            literal: c.literal,
            grade: c.misc.grade,
            frequency: c.misc.frequency,
            reading_meaning: c.reading_meaning,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Kanjidic2 {
    characters: Vec<Kanjidic2Character>,
}

#[derive(Debug, Deserialize)]
struct JMdict {
    words: Vec<VocabularyEntry>,
}

pub fn read_kanjidic2<R: Read>(reader: R) -> Result<Vec<KanjiEntry>> {
    let dict: Kanjidic2 = serde_json::from_reader(reader)?;
    Ok(dict.characters.into_iter().map(KanjiEntry::from).collect())
}

pub fn read_jmdict<R: Read>(reader: R) -> Result<Vec<VocabularyEntry>> {
    let dict: JMdict = serde_json::from_reader(reader)?;
    Ok(dict.words)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZipfValue {
    Score(f64),
    Group(BTreeMap<String, f64>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FrequencyTable {
    Counts(Vec<FrequencyRecordV1>),
    Zipf(BTreeMap<String, ZipfValue>),
}

/// Read a frequency table, either `{"common": {text: zipf}, text: zipf}` or
/// a list of `{id, f}` raw counts. Output is Zipf-scaled; for the map form it
/// is ordered by text and scores listed under a group win over top-level
/// duplicates.
pub fn read_frequencies<R: Read>(reader: R) -> Result<Vec<FrequencyEntry>> {
    let table: FrequencyTable = serde_json::from_reader(reader)?;
    let entries = match table {
        FrequencyTable::Counts(records) => migrate_frequencies_v1(&records),
        FrequencyTable::Zipf(map) => {
            let mut scores = BTreeMap::new();
            let mut grouped = BTreeMap::new();
            for (key, value) in map {
                match value {
                    ZipfValue::Score(zipf) => {
                        scores.insert(key, zipf);
                    }
                    ZipfValue::Group(group) => grouped.extend(group),
                }
            }
            scores.extend(grouped);
            scores
                .into_iter()
                .map(|(id, zipf)| FrequencyEntry { id, zipf })
                .collect()
        }
    };
    Ok(entries)
}
