//! HTTP route handlers

pub mod sessions;
pub mod stats;
