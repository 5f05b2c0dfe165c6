//! SQLite-backed lexicon store.

use crate::db::error::DbError;
use crate::db::schema;
use jtyping_core::dataset::{read_frequencies, read_jmdict, read_kanjidic2};
use jtyping_core::migration::{
    check_version, migrate_frequencies_v1, migrate_kanji_v1, spelling_index, FrequencyRecordV1,
    KanjiRecordV1, SCHEMA_VERSION,
};
use jtyping_core::{FrequencyEntry, KanjiEntry, LexiconStore, VocabularyEntry};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Record counts per collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexiconStats {
    pub kanji: usize,
    pub vocabulary: usize,
    pub spellings: usize,
    pub frequencies: usize,
    pub schema_version: u32,
}

/// Rows inserted by a seeding pass. Zero means the collection was already
/// populated or no dataset was given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub kanji: usize,
    pub vocabulary: usize,
    pub frequencies: usize,
}

/// Dataset files used for seeding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetPaths<'a> {
    pub kanji: Option<&'a Path>,
    pub vocabulary: Option<&'a Path>,
    pub frequencies: Option<&'a Path>,
}

pub struct SqliteLexicon {
    conn: Connection,
}

impl SqliteLexicon {
    /// Open database at path, creating or upgrading it as necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        let mut lexicon = Self { conn };
        lexicon.initialize()?;
        Ok(lexicon)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(schema::VERSION_TABLE)?;
        match self.stored_version()? {
            None => {
                self.conn.execute_batch(schema::SCHEMA)?;
                self.conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![SCHEMA_VERSION],
                )?;
            }
            Some(version) => {
                check_version(version)?;
                if version < SCHEMA_VERSION {
                    self.migrate_v1_to_v2()?;
                }
            }
        }
        Ok(())
    }

    fn stored_version(&self) -> Result<Option<u32>> {
        let version = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
        Ok(version)
    }

    pub fn schema_version(&self) -> Result<u32> {
        Ok(self.stored_version()?.unwrap_or(SCHEMA_VERSION))
    }

    /// Upgrade a version 1 database in one transaction.
    fn migrate_v1_to_v2(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(schema::UPGRADE_V1_V2)?;

        let kanji: Vec<(i64, String)> = {
            let mut stmt = tx.prepare("SELECT id, body FROM kanji")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect::<rusqlite::Result<_>>()?
        };
        for (id, body) in kanji {
            let record: KanjiRecordV1 = serde_json::from_str(&body)?;
            let entry = migrate_kanji_v1(record);
            tx.execute(
                "UPDATE kanji SET grade = ?1, frequency = ?2, body = ?3 WHERE id = ?4",
                params![entry.grade, entry.frequency, serde_json::to_string(&entry)?, id],
            )?;
        }

        let counts: Vec<FrequencyRecordV1> = {
            let mut stmt = tx.prepare("SELECT id, f FROM frequencies_v1 ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok(FrequencyRecordV1 {
                    id: row.get(0)?,
                    f: row.get::<_, i64>(1)?.max(0) as u64,
                })
            })?;
            rows.collect::<rusqlite::Result<_>>()?
        };
        for entry in migrate_frequencies_v1(&counts) {
            tx.execute(
                "INSERT INTO frequencies (id, zipf) VALUES (?1, ?2)",
                params![entry.id, entry.zipf],
            )?;
        }
        tx.execute("DROP TABLE frequencies_v1", [])?;

        let bodies: Vec<String> = {
            let mut stmt = tx.prepare("SELECT body FROM vocabulary")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<_>>()?
        };
        for body in bodies {
            let entry: VocabularyEntry = serde_json::from_str(&body)?;
            for spelling in spelling_index(&entry) {
                tx.execute(
                    "INSERT OR IGNORE INTO vocabulary_spellings (spelling, vocabulary_id) VALUES (?1, ?2)",
                    params![spelling, entry.id],
                )?;
            }
        }

        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn table_count(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn stats(&self) -> Result<LexiconStats> {
        Ok(LexiconStats {
            kanji: self.table_count("kanji")?,
            vocabulary: self.table_count("vocabulary")?,
            spellings: self.table_count("vocabulary_spellings")?,
            frequencies: self.table_count("frequencies")?,
            schema_version: self.schema_version()?,
        })
    }

    /// Insert kanji unless the collection is already populated.
    pub fn seed_kanji(&mut self, entries: &[KanjiEntry]) -> Result<usize> {
        if self.table_count("kanji")? > 0 {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO kanji (literal, grade, frequency, body) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for entry in entries {
                inserted += stmt.execute(params![
                    entry.literal,
                    entry.grade,
                    entry.frequency,
                    serde_json::to_string(entry)?
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Insert vocabulary and its spelling index unless already populated.
    pub fn seed_vocabulary(&mut self, entries: &[VocabularyEntry]) -> Result<usize> {
        if self.table_count("vocabulary")? > 0 {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut entry_stmt =
                tx.prepare("INSERT OR IGNORE INTO vocabulary (id, body) VALUES (?1, ?2)")?;
            let mut spelling_stmt = tx.prepare(
                "INSERT OR IGNORE INTO vocabulary_spellings (spelling, vocabulary_id) VALUES (?1, ?2)",
            )?;
            for entry in entries {
                inserted += entry_stmt.execute(params![entry.id, serde_json::to_string(entry)?])?;
                for spelling in spelling_index(entry) {
                    spelling_stmt.execute(params![spelling, entry.id])?;
                }
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn seed_frequencies(&mut self, entries: &[FrequencyEntry]) -> Result<usize> {
        if self.table_count("frequencies")? > 0 {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR REPLACE INTO frequencies (id, zipf) VALUES (?1, ?2)")?;
            for entry in entries {
                inserted += stmt.execute(params![entry.id, entry.zipf])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Seed every empty collection from its dataset file. Files for
    /// populated collections are not read.
    pub fn seed_from_files(&mut self, paths: DatasetPaths<'_>) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(path) = paths.kanji {
            if self.table_count("kanji")? == 0 {
                let entries = read_kanjidic2(BufReader::new(File::open(path)?))?;
                report.kanji = self.seed_kanji(&entries)?;
            }
        }
        if let Some(path) = paths.vocabulary {
            if self.table_count("vocabulary")? == 0 {
                let entries = read_jmdict(BufReader::new(File::open(path)?))?;
                report.vocabulary = self.seed_vocabulary(&entries)?;
            }
        }
        if let Some(path) = paths.frequencies {
            if self.table_count("frequencies")? == 0 {
                let entries = read_frequencies(BufReader::new(File::open(path)?))?;
                report.frequencies = self.seed_frequencies(&entries)?;
            }
        }

        Ok(report)
    }

    fn row_to_frequency(row: &rusqlite::Row) -> rusqlite::Result<FrequencyEntry> {
        Ok(FrequencyEntry {
            id: row.get(0)?,
            zipf: row.get(1)?,
        })
    }
}

impl LexiconStore for SqliteLexicon {
    type Error = DbError;

    fn count_kanji(&self, grade_max: u8) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM kanji WHERE grade IS NOT NULL AND grade <= ?1",
            params![grade_max],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn kanji_at(&self, grade_max: u8, offset: usize) -> Result<Option<KanjiEntry>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM kanji WHERE grade IS NOT NULL AND grade <= ?1 ORDER BY id LIMIT 1 OFFSET ?2",
                params![grade_max, offset as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
    }

    fn count_frequencies(&self, min_zipf: f64) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM frequencies WHERE zipf >= ?1",
            params![min_zipf],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn frequency_at(&self, min_zipf: f64, offset: usize) -> Result<Option<FrequencyEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT id, zipf FROM frequencies WHERE zipf >= ?1 ORDER BY id LIMIT 1 OFFSET ?2",
                params![min_zipf, offset as i64],
                Self::row_to_frequency,
            )
            .optional()?;
        Ok(entry)
    }

    fn vocabulary_by_spelling(&self, spelling: &str) -> Result<Vec<VocabularyEntry>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT v.body FROM vocabulary v
             JOIN vocabulary_spellings s ON s.vocabulary_id = v.id
             WHERE s.spelling = ?1
             ORDER BY v.id",
        )?;
        let bodies = stmt
            .query_map(params![spelling], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let entries = bodies
            .iter()
            .map(|b| serde_json::from_str(b))
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn count_vocabulary(&self) -> Result<usize> {
        self.table_count("vocabulary")
    }

    fn vocabulary_at(&self, offset: usize) -> Result<Option<VocabularyEntry>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM vocabulary ORDER BY id LIMIT 1 OFFSET ?1",
                params![offset as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jtyping_core::dataset::{Kanjidic2Character, Kanjidic2Misc};
    use jtyping_core::types::{AppliesTo, KanaReading, KanjiSpelling};
    use jtyping_core::QuizError;
    use pretty_assertions::assert_eq;

    fn kanji(literal: &str, grade: Option<u8>) -> KanjiEntry {
        KanjiEntry {
            literal: literal.to_string(),
            grade,
            frequency: None,
            reading_meaning: None,
        }
    }

    fn word(id: &str, spellings: &[(&str, bool)], reading: &str) -> VocabularyEntry {
        VocabularyEntry {
            id: id.to_string(),
            kanji: spellings
                .iter()
                .map(|(text, common)| KanjiSpelling {
                    common: *common,
                    text: text.to_string(),
                    tags: vec![],
                })
                .collect(),
            kana: vec![KanaReading {
                common: true,
                text: reading.to_string(),
                tags: vec![],
                applies_to_kanji: AppliesTo::All,
            }],
            senses: vec![],
        }
    }

    #[test]
    fn fresh_database_is_current_version() {
        let lexicon = SqliteLexicon::open_in_memory().unwrap();
        assert_eq!(lexicon.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(lexicon.stats().unwrap().kanji, 0);
    }

    #[test]
    fn kanji_queries_respect_grade() {
        let mut lexicon = SqliteLexicon::open_in_memory().unwrap();
        lexicon
            .seed_kanji(&[kanji("水", Some(1)), kanji("亘", Some(10)), kanji("〆", None), kanji("橋", Some(3))])
            .unwrap();

        assert_eq!(lexicon.count_kanji(9).unwrap(), 2);
        assert_eq!(lexicon.kanji_at(9, 0).unwrap().unwrap().literal, "水");
        assert_eq!(lexicon.kanji_at(9, 1).unwrap().unwrap().literal, "橋");
        assert!(lexicon.kanji_at(9, 2).unwrap().is_none());
        assert_eq!(lexicon.count_kanji(10).unwrap(), 3);
    }

    #[test]
    fn seeding_is_idempotent() {
        let mut lexicon = SqliteLexicon::open_in_memory().unwrap();
        assert_eq!(lexicon.seed_kanji(&[kanji("水", Some(1))]).unwrap(), 1);
        assert_eq!(lexicon.seed_kanji(&[kanji("火", Some(1))]).unwrap(), 0);
        assert_eq!(lexicon.stats().unwrap().kanji, 1);
    }

    #[test]
    fn spelling_lookup_uses_common_spellings() {
        let mut lexicon = SqliteLexicon::open_in_memory().unwrap();
        lexicon
            .seed_vocabulary(&[
                word("1", &[("上手", true)], "じょうず"),
                word("2", &[("上手", true)], "うわて"),
                word("3", &[("橋", true)], "はし"),
                word("4", &[("上衆", false)], "じょうず"),
            ])
            .unwrap();

        let ids: Vec<String> = lexicon
            .vocabulary_by_spelling("上手")
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["1".to_string(), "2".to_string()]);
        assert!(lexicon.vocabulary_by_spelling("上衆").unwrap().is_empty());
        assert_eq!(lexicon.count_vocabulary().unwrap(), 4);
        assert_eq!(lexicon.vocabulary_at(2).unwrap().unwrap().id, "3");
    }

    #[test]
    fn frequency_queries_respect_minimum() {
        let mut lexicon = SqliteLexicon::open_in_memory().unwrap();
        lexicon
            .seed_frequencies(&[
                FrequencyEntry { id: "橋".to_string(), zipf: 4.5 },
                FrequencyEntry { id: "水".to_string(), zipf: 5.9 },
                FrequencyEntry { id: "上手".to_string(), zipf: 5.0 },
            ])
            .unwrap();

        assert_eq!(lexicon.count_frequencies(5.0).unwrap(), 2);
        let first = lexicon.frequency_at(5.0, 0).unwrap().unwrap();
        assert_eq!(first.id, "上手");
        assert!(lexicon.frequency_at(5.0, 2).unwrap().is_none());
    }

    #[test]
    fn upgrades_version_one() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(schema::VERSION_TABLE).unwrap();
        conn.execute_batch(schema::SCHEMA_V1).unwrap();
        conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])
            .unwrap();

        let record = Kanjidic2Character {
            literal: "水".to_string(),
            misc: Kanjidic2Misc {
                grade: Some(1),
                frequency: Some(223),
                stroke_counts: vec![4],
                jlpt_level: None,
            },
            reading_meaning: None,
        };
        conn.execute(
            "INSERT INTO kanji (literal, body) VALUES (?1, ?2)",
            params![record.literal, serde_json::to_string(&record).unwrap()],
        )
        .unwrap();
        let bridge = word("3", &[("橋", true)], "はし");
        conn.execute(
            "INSERT INTO vocabulary (id, body) VALUES (?1, ?2)",
            params![bridge.id, serde_json::to_string(&bridge).unwrap()],
        )
        .unwrap();
        conn.execute("INSERT INTO frequencies (id, f) VALUES ('橋', 1000), ('水', 999000)", [])
            .unwrap();

        let lexicon = SqliteLexicon::from_connection(conn).unwrap();
        assert_eq!(lexicon.schema_version().unwrap(), 2);

        let water = lexicon.kanji_at(1, 0).unwrap().unwrap();
        assert_eq!(water.grade, Some(1));
        assert_eq!(water.frequency, Some(223));

        let bridge_freq = lexicon.frequency_at(0.0, 0).unwrap().unwrap();
        assert_eq!(bridge_freq.id, "橋");
        assert!((bridge_freq.zipf - 6.0).abs() < 1e-9);

        assert_eq!(lexicon.vocabulary_by_spelling("橋").unwrap().len(), 1);
        assert_eq!(lexicon.stats().unwrap().spellings, 1);
    }

    #[test]
    fn rejects_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(schema::VERSION_TABLE).unwrap();
        conn.execute("INSERT INTO schema_version (version) VALUES (99)", [])
            .unwrap();

        assert!(matches!(
            SqliteLexicon::from_connection(conn),
            Err(DbError::Quiz(QuizError::UnsupportedVersion(99)))
        ));
    }
}
