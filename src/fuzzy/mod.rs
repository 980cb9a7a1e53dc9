// src/fuzzy/mod.rs

pub mod matcher;
pub mod symspell;

pub use matcher::SymptomMatcher;
