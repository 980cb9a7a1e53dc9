// File: src/core/vectorizer.rs
use crate::core::types::FeatureVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bag-of-words count encoder over whitespace-separated symptom tokens.
///
/// The vocabulary is frozen by [`CountVectorizer::fit`]: tokens seen later
/// at transform time are dropped rather than added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountVectorizer {
    /// Token -> feature index. Indices follow sorted token order.
    vocabulary: BTreeMap<String, usize>,
}

impl CountVectorizer {
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut vocabulary: BTreeMap<String, usize> = corpus
            .iter()
            .flat_map(|doc| doc.as_ref().split_whitespace())
            .map(|token| (token.to_string(), 0))
            .collect();
        for (idx, slot) in vocabulary.values_mut().enumerate() {
            *slot = idx;
        }
        Self { vocabulary }
    }

    /// Number of features, i.e. the length of every transformed vector.
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Tokens in feature-index order.
    pub fn vocabulary(&self) -> Vec<&str> {
        self.vocabulary.keys().map(String::as_str).collect()
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.vocabulary.get(token).copied()
    }

    pub fn transform(&self, text: &str) -> FeatureVector {
        self.count(text.split_whitespace())
    }

    pub fn transform_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> FeatureVector {
        self.count(tokens.iter().flat_map(|t| t.as_ref().split_whitespace()))
    }

    pub fn transform_batch<S: AsRef<str>>(&self, corpus: &[S]) -> Vec<FeatureVector> {
        corpus.iter().map(|doc| self.transform(doc.as_ref())).collect()
    }

    fn count<'a>(&self, tokens: impl Iterator<Item = &'a str>) -> FeatureVector {
        let mut counts = vec![0.0; self.vocabulary.len()];
        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                counts[idx] += 1.0;
            }
        }
        counts
    }
}
