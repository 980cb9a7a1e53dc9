// src/core/mod.rs

pub mod dataset;
pub mod engine;
pub mod forest;
pub mod history;
pub mod synthesizer;
pub mod tree;
pub mod types;
pub mod vectorizer;
