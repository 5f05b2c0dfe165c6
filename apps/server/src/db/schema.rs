//! SQLite schema definitions.

/// Version tracking table; created before anything else so the stored
/// version can be read.
pub const VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
"#;

/// Current schema (version 2).
pub const SCHEMA: &str = r#"
-- Kanji, flattened filter columns plus the full entry as JSON
CREATE TABLE IF NOT EXISTS kanji (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    literal TEXT NOT NULL UNIQUE,
    grade INTEGER,
    frequency INTEGER,
    body TEXT NOT NULL
);

-- Vocabulary entries as JSON
CREATE TABLE IF NOT EXISTS vocabulary (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL
);

-- Derived multi-valued index: common kanji spellings per entry
CREATE TABLE IF NOT EXISTS vocabulary_spellings (
    spelling TEXT NOT NULL,
    vocabulary_id TEXT NOT NULL REFERENCES vocabulary(id),
    PRIMARY KEY (spelling, vocabulary_id)
);

-- Word frequencies, Zipf scale
CREATE TABLE IF NOT EXISTS frequencies (
    id TEXT PRIMARY KEY,
    zipf REAL NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_kanji_grade ON kanji(grade);
CREATE INDEX IF NOT EXISTS idx_frequencies_zipf ON frequencies(zipf);
"#;

/// Legacy schema (version 1): kanjidic2-shaped bodies, raw frequency counts,
/// no spelling index.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS kanji (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    literal TEXT NOT NULL UNIQUE,
    body TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vocabulary (
    id TEXT PRIMARY KEY,
    body TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS frequencies (
    id TEXT PRIMARY KEY,
    f INTEGER NOT NULL
);
"#;

/// Structural part of the 1 -> 2 upgrade. Row contents are rewritten
/// separately.
pub const UPGRADE_V1_V2: &str = r#"
ALTER TABLE kanji ADD COLUMN grade INTEGER;
ALTER TABLE kanji ADD COLUMN frequency INTEGER;
ALTER TABLE frequencies RENAME TO frequencies_v1;

CREATE TABLE frequencies (
    id TEXT PRIMARY KEY,
    zipf REAL NOT NULL
);

CREATE TABLE vocabulary_spellings (
    spelling TEXT NOT NULL,
    vocabulary_id TEXT NOT NULL REFERENCES vocabulary(id),
    PRIMARY KEY (spelling, vocabulary_id)
);

CREATE INDEX IF NOT EXISTS idx_kanji_grade ON kanji(grade);
CREATE INDEX IF NOT EXISTS idx_frequencies_zipf ON frequencies(zipf);
"#;
