//! Small slices of the three datasets, in their published formats.

use std::sync::Arc;

use jtyping_core::dataset::{read_frequencies, read_jmdict, read_kanjidic2};
use jtyping_core::filter::MAX_GRADE;
use jtyping_core::{CustomStrategy, FrequencyEntry, ItemSelector, LexiconStore, QuizSubject};
use jtyping_server::db::SqliteLexicon;

pub const KANJIDIC2: &str = r#"{
  "version": "3.5.0",
  "languages": ["en"],
  "characters": [
    {
      "literal": "水",
      "misc": {"grade": 1, "strokeCounts": [4], "frequency": 223, "jlptLevel": 4},
      "readingMeaning": {
        "groups": [{
          "readings": [
            {"type": "pinyin", "value": "shui3"},
            {"type": "ja_on", "value": "スイ"},
            {"type": "ja_kun", "value": "みず"},
            {"type": "ja_kun", "value": "みず-"}
          ],
          "meanings": [{"lang": "en", "value": "water"}]
        }],
        "nanori": ["み", "みな"]
      }
    },
    {
      "literal": "食",
      "misc": {"grade": 2, "strokeCounts": [9], "frequency": 328, "jlptLevel": 4},
      "readingMeaning": {
        "groups": [{
          "readings": [
            {"type": "ja_on", "value": "ショク"},
            {"type": "ja_on", "value": "ジキ"},
            {"type": "ja_kun", "value": "く.う"},
            {"type": "ja_kun", "value": "た.べる"}
          ],
          "meanings": [{"lang": "en", "value": "eat"}, {"lang": "en", "value": "food"}]
        }],
        "nanori": []
      }
    },
    {
      "literal": "亘",
      "misc": {"grade": 10, "strokeCounts": [6]},
      "readingMeaning": {
        "groups": [{
          "readings": [{"type": "ja_on", "value": "コウ"}, {"type": "ja_kun", "value": "わた.る"}],
          "meanings": [{"lang": "en", "value": "span"}]
        }],
        "nanori": ["わたる"]
      }
    }
  ]
}"#;

pub const JMDICT: &str = r#"{
  "version": "3.5.0",
  "words": [
    {
      "id": "1358280",
      "kanji": [{"common": true, "text": "食べる", "tags": []}],
      "kana": [{"common": true, "text": "たべる", "tags": [], "appliesToKanji": ["*"]}],
      "sense": [{"partOfSpeech": ["v1", "vt"], "appliesToKanji": ["*"], "gloss": [{"lang": "eng", "text": "to eat"}]}]
    },
    {
      "id": "1429740",
      "kanji": [{"common": true, "text": "橋", "tags": []}],
      "kana": [{"common": true, "text": "はし", "tags": [], "appliesToKanji": ["*"]}],
      "sense": [{"partOfSpeech": ["n"], "appliesToKanji": ["*"], "gloss": [{"lang": "eng", "text": "bridge"}]}]
    },
    {
      "id": "1429760",
      "kanji": [{"common": true, "text": "箸", "tags": []}],
      "kana": [{"common": true, "text": "はし", "tags": [], "appliesToKanji": ["箸"]}],
      "sense": [{"partOfSpeech": ["n"], "appliesToKanji": ["箸"], "gloss": [{"lang": "eng", "text": "chopsticks"}]}]
    },
    {
      "id": "1580910",
      "kanji": [{"common": true, "text": "上手", "tags": []}],
      "kana": [{"common": true, "text": "じょうず", "tags": [], "appliesToKanji": ["*"]}],
      "sense": [{"partOfSpeech": ["adj-na", "n"], "appliesToKanji": ["*"], "gloss": [{"lang": "eng", "text": "skillful"}]}]
    },
    {
      "id": "1580920",
      "kanji": [{"common": true, "text": "上手", "tags": []}],
      "kana": [{"common": false, "text": "うわて", "tags": [], "appliesToKanji": ["*"]}],
      "sense": [{"partOfSpeech": ["n"], "appliesToKanji": ["*"], "gloss": [{"lang": "eng", "text": "upper part"}]}]
    }
  ]
}"#;

pub const FREQUENCIES: &str = r#"{
  "common": {"食べる": 5.3, "上手": 5.1, "橋": 4.6},
  "箸": 3.9
}"#;

/// Seed a store with every fixture collection.
pub fn seed(lexicon: &mut SqliteLexicon) {
    let kanji = read_kanjidic2(KANJIDIC2.as_bytes()).expect("kanjidic2 fixture");
    let words = read_jmdict(JMDICT.as_bytes()).expect("jmdict fixture");
    let frequencies = read_frequencies(FREQUENCIES.as_bytes()).expect("frequency fixture");

    lexicon.seed_kanji(&kanji).expect("seed kanji");
    lexicon.seed_vocabulary(&words).expect("seed vocabulary");
    lexicon.seed_frequencies(&frequencies).expect("seed frequencies");
}

/// Selector that always draws the kanji `literal`.
pub fn pinned_kanji(literal: &'static str) -> Arc<dyn ItemSelector<SqliteLexicon>> {
    Arc::new(
        CustomStrategy::<SqliteLexicon>::new().with_kanji(move |store, _, _| {
            for offset in 0..store.count_kanji(MAX_GRADE)? {
                if let Some(entry) = store.kanji_at(MAX_GRADE, offset)? {
                    if entry.literal == literal {
                        return Ok(Some(entry));
                    }
                }
            }
            Ok(None)
        }),
    )
}

/// Selector that groups the entries of every spelling in `spellings` and
/// displays the first one.
pub fn pinned_vocabulary(spellings: &'static [&'static str]) -> Arc<dyn ItemSelector<SqliteLexicon>> {
    Arc::new(
        CustomStrategy::<SqliteLexicon>::new().with_vocabulary(move |store, _, _| {
            let mut entries = Vec::new();
            for spelling in spellings {
                entries.extend(store.vocabulary_by_spelling(spelling)?);
            }
            let hint = FrequencyEntry {
                id: spellings[0].to_string(),
                zipf: 5.0,
            };
            Ok(QuizSubject::vocabulary(entries, Some(hint)).ok())
        }),
    )
}
