// File: src/core/forest.rs
//! Random forest classifier.
//!
//! Each tree is grown on a bootstrap resample of the training rows and
//! sees a random subset of features at every split. Probabilities are the
//! mean of the per-tree leaf distributions.

use crate::core::tree::{argmax, DecisionTree, TreeParams};
use crate::core::types::{FeatureVector, LabelId};
use crate::error::{PredictError, PredictResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// `None` draws a seed from the OS, so retrained forests differ.
    pub seed: Option<u64>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: Some(42),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    /// Known labels in sorted order; position is the class index.
    classes: Vec<String>,
    n_features: usize,
}

impl RandomForest {
    /// # Errors
    ///
    /// Returns `Training` when there are no rows, when `x` and `labels`
    /// differ in length, or when `n_trees` is zero.
    pub fn fit<S: AsRef<str>>(
        x: &[FeatureVector],
        labels: &[S],
        params: ForestParams,
    ) -> PredictResult<Self> {
        if x.is_empty() {
            return Err(PredictError::training("no training rows"));
        }
        if x.len() != labels.len() {
            return Err(PredictError::training(format!(
                "{} feature rows but {} labels",
                x.len(),
                labels.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(PredictError::training("forest needs at least one tree"));
        }

        let classes: Vec<String> = labels
            .iter()
            .map(|l| l.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let y: Vec<LabelId> = labels
            .iter()
            .map(|l| classes.binary_search_by(|c| c.as_str().cmp(l.as_ref())))
            .collect::<Result<_, _>>()
            .map_err(|_| PredictError::training("label missing from class list"))?;

        let n_features = x[0].len();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            max_features: ((n_features as f64).sqrt() as usize).max(1),
        };
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let n_rows = x.len();
        let trees: Vec<DecisionTree> = (0..params.n_trees)
            .map(|_| {
                let bootstrap: Vec<usize> =
                    (0..n_rows).map(|_| rng.random_range(0..n_rows)).collect();
                DecisionTree::fit(x, &y, &bootstrap, classes.len(), tree_params, &mut rng)
            })
            .collect();

        let forest = Self {
            trees,
            classes,
            n_features,
        };
        info!(
            trees = forest.n_trees(),
            classes = forest.classes.len(),
            features = n_features,
            avg_depth = forest.avg_depth(),
            "trained random forest"
        );
        Ok(forest)
    }

    /// One probability per class, in [`RandomForest::classes`] order.
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba(features)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n;
        }
        debug!(?proba, "forest probabilities");
        proba
    }

    /// Most probable label.
    pub fn predict(&self, features: &[f64]) -> &str {
        &self.classes[argmax(&self.predict_proba(features))]
    }

    /// Fraction of rows whose predicted label matches.
    pub fn accuracy<S: AsRef<str>>(&self, x: &[FeatureVector], labels: &[S]) -> f64 {
        if x.is_empty() {
            return 0.0;
        }
        let hits = x
            .iter()
            .zip(labels)
            .filter(|&(row, label)| self.predict(row) == label.as_ref())
            .count();
        hits as f64 / x.len() as f64
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn avg_depth(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: usize = self.trees.iter().map(DecisionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }

    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }
}
