pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use jtyping_core::{DefaultStrategy, ItemSelector, QuizFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::{DatasetPaths, SqliteLexicon};
use crate::services::session::SessionRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub lexicon: Arc<Mutex<SqliteLexicon>>,
    pub selector: Arc<dyn ItemSelector<SqliteLexicon>>,
    pub sessions: Arc<SessionRegistry>,
    pub rng: Arc<Mutex<StdRng>>,
    pub default_filter: QuizFilter,
}

impl AppState {
    pub fn new(
        lexicon: SqliteLexicon,
        selector: Arc<dyn ItemSelector<SqliteLexicon>>,
        rng: StdRng,
        default_filter: QuizFilter,
        session_ttl: chrono::Duration,
    ) -> Self {
        Self {
            lexicon: Arc::new(Mutex::new(lexicon)),
            selector,
            sessions: Arc::new(SessionRegistry::new(session_ttl)),
            rng: Arc::new(Mutex::new(rng)),
            default_filter,
        }
    }
}

/// Routes without the outer middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/stats", get(routes::stats::get))
        .route("/api/sessions", post(routes::sessions::create))
        .route("/api/sessions/:id", get(routes::sessions::get))
        .route("/api/sessions/:id/next", post(routes::sessions::next))
        .route("/api/sessions/:id/answer", post(routes::sessions::answer))
        .route("/api/sessions/:id/retry", post(routes::sessions::retry))
        .route("/api/sessions/:id/continue", post(routes::sessions::continue_round))
        .route("/api/sessions/:id/entry", get(routes::sessions::entry))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!("Opening lexicon store at {}...", config.db_path.display());
    let mut lexicon = SqliteLexicon::open(&config.db_path)?;

    tracing::info!("Seeding empty collections...");
    let report = lexicon.seed_from_files(DatasetPaths {
        kanji: config.kanji_path.as_deref(),
        vocabulary: config.vocab_path.as_deref(),
        frequencies: config.freq_path.as_deref(),
    })?;
    let stats = lexicon.stats()?;
    tracing::info!(
        seeded_kanji = report.kanji,
        seeded_vocabulary = report.vocabulary,
        seeded_frequencies = report.frequencies,
        kanji = stats.kanji,
        vocabulary = stats.vocabulary,
        frequencies = stats.frequencies,
        schema_version = stats.schema_version,
        "Lexicon ready"
    );

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let state = AppState::new(
        lexicon,
        Arc::new(DefaultStrategy),
        rng,
        config.default_filter.clone(),
        config.session_ttl,
    );

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            ticker.tick().await;
            match sessions.evict_expired(Utc::now()) {
                Ok(0) => {}
                Ok(evicted) => tracing::debug!(evicted, "Evicted idle sessions"),
                Err(e) => tracing::warn!(error = %e, "Session eviction failed"),
            }
        }
    });

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
