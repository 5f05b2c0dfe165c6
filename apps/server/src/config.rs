//! Service configuration from the environment.

use anyhow::Context;
use jtyping_core::{FilterOverrides, QuizFilter};
use std::path::PathBuf;

pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub kanji_path: Option<PathBuf>,
    pub vocab_path: Option<PathBuf>,
    pub freq_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    /// Filter applied when a request does not override it.
    pub default_filter: QuizFilter,
    /// Seed for the sampling RNG; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub session_ttl: chrono::Duration,
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jtyping")
        .join("lexicon.db")
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let overrides = FilterOverrides {
            grade_max: var("JTYPING_GRADE_MAX"),
            freq_min: lookup("JTYPING_FREQ_MIN"),
            mode: var("JTYPING_MODE"),
        };
        let default_filter = QuizFilter::default()
            .with_overrides(&overrides)
            .context("invalid default filter")?;

        let port = match var("PORT") {
            Some(p) => p.parse().with_context(|| format!("invalid PORT {p:?}"))?,
            None => 3000,
        };
        let seed = var("JTYPING_SEED")
            .map(|s| s.parse::<u64>())
            .transpose()
            .context("invalid JTYPING_SEED")?;
        let ttl_secs = match var("JTYPING_SESSION_TTL_SECS") {
            Some(s) => s
                .parse::<i64>()
                .with_context(|| format!("invalid JTYPING_SESSION_TTL_SECS {s:?}"))?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        Ok(Self {
            db_path: var("JTYPING_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            kanji_path: var("JTYPING_KANJI_PATH").map(PathBuf::from),
            vocab_path: var("JTYPING_VOCAB_PATH").map(PathBuf::from),
            freq_path: var("JTYPING_FREQ_PATH").map(PathBuf::from),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            default_filter,
            seed,
            session_ttl: chrono::Duration::seconds(ttl_secs.max(1)),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jtyping_core::SubjectKind;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.default_filter, QuizFilter::default());
        assert_eq!(config.session_ttl, chrono::Duration::seconds(3600));
        assert!(config.seed.is_none());
        assert!(config.kanji_path.is_none());
        assert!(config.db_path.ends_with("jtyping/lexicon.db"));
    }

    #[test]
    fn reads_filter_and_paths() {
        let config = config(&[
            ("JTYPING_GRADE_MAX", "4"),
            ("JTYPING_FREQ_MIN", "off"),
            ("JTYPING_MODE", "Vocabulary"),
            ("JTYPING_SEED", "42"),
            ("JTYPING_KANJI_PATH", "/data/kanjidic2.json"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.default_filter.grade_max, 4);
        assert_eq!(config.default_filter.freq_min, None);
        assert_eq!(config.default_filter.mode, SubjectKind::Vocabulary);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.kanji_path, Some(PathBuf::from("/data/kanjidic2.json")));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("JTYPING_GRADE_MAX", "42")]).is_err());
        assert!(config(&[("JTYPING_SEED", "-1")]).is_err());
    }
}
