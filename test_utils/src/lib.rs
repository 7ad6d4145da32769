//! Shared helpers for the completion ranker's integration tests and benches

pub mod generator;
