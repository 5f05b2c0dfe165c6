//! Common test utilities and fixtures for integration tests.
//!
//! Every test gets its own in-memory SQLite store seeded from
//! [`fixtures`], so no external services are needed.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use jtyping_core::{DefaultStrategy, ItemSelector, QuizFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use jtyping_server::db::SqliteLexicon;
use jtyping_server::{build_router, AppState};

/// Test context holding the application state and router.
pub struct TestContext {
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// Context with the default selection strategy and a fixed RNG seed.
    pub fn new() -> Self {
        Self::with_selector(Arc::new(DefaultStrategy))
    }

    pub fn with_selector(selector: Arc<dyn ItemSelector<SqliteLexicon>>) -> Self {
        let mut lexicon = SqliteLexicon::open_in_memory().expect("Failed to open test store");
        fixtures::seed(&mut lexicon);

        let state = AppState::new(
            lexicon,
            selector,
            StdRng::seed_from_u64(7),
            QuizFilter::default(),
            chrono::Duration::seconds(3600),
        );
        let app = build_router(state.clone());

        Self { state, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}
