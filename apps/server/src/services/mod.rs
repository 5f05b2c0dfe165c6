//! Business logic services

pub mod quiz;
pub mod session;
