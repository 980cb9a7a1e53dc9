// File: src/training.rs
use crate::config::PredictConfig;
use crate::core::dataset::Dataset;
use crate::core::forest::{ForestParams, RandomForest};
use crate::core::vectorizer::CountVectorizer;
use crate::error::{PredictError, PredictResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Fits the encoder and the classifier from a dataset.
pub struct TrainingEngine {
    params: ForestParams,
}

/// Accuracy on rows held out of training.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldoutReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub accuracy: f64,
}

impl TrainingEngine {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn from_config(config: &PredictConfig) -> Self {
        Self::new(ForestParams {
            n_trees: config.n_trees,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            seed: config.forest_seed,
        })
    }

    pub fn train(&self, dataset: &Dataset) -> PredictResult<(CountVectorizer, RandomForest)> {
        if dataset.is_empty() {
            return Err(PredictError::training("dataset is empty"));
        }
        let corpus = dataset.corpus();
        let labels = dataset.labels();

        let vectorizer = CountVectorizer::fit(&corpus);
        let x = vectorizer.transform_batch(&corpus);
        let model = RandomForest::fit(&x, &labels, self.params)?;
        info!(
            rows = dataset.len(),
            vocabulary = vectorizer.n_features(),
            "fitted encoder and classifier"
        );
        Ok((vectorizer, model))
    }

    /// Shuffles with `seed`, trains on the first `1 - test_fraction` of the
    /// rows and scores the rest. Both parts must be non-empty.
    pub fn holdout(
        &self,
        dataset: &Dataset,
        test_fraction: f64,
        seed: u64,
    ) -> PredictResult<HoldoutReport> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(PredictError::training(format!(
                "test fraction {test_fraction} outside (0, 1)"
            )));
        }
        let mut rows = dataset.records().to_vec();
        rows.shuffle(&mut StdRng::seed_from_u64(seed));

        let test_rows = ((rows.len() as f64) * test_fraction).round() as usize;
        let split = rows.len() - test_rows;
        if test_rows == 0 || split == 0 {
            return Err(PredictError::training(format!(
                "{} rows cannot be split at test fraction {test_fraction}",
                rows.len()
            )));
        }
        let test = Dataset::new(rows.split_off(split));
        let train = Dataset::new(rows);

        let (vectorizer, model) = self.train(&train)?;
        let accuracy = model.accuracy(&vectorizer.transform_batch(&test.corpus()), &test.labels());

        info!(train = train.len(), test = test.len(), accuracy, "holdout evaluation");
        Ok(HoldoutReport {
            train_rows: train.len(),
            test_rows: test.len(),
            accuracy,
        })
    }
}
