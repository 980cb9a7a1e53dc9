// File: src/config.rs
use crate::error::{PredictError, PredictResult};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "medipredict.toml";
pub const ENV_PREFIX: &str = "MEDIPREDICT_";

const VECTORIZER_FILE: &str = "vectorizer.bin";
const MODEL_FILE: &str = "disease_prediction_model.bin";

/// Paths and hyperparameters for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    pub dataset_path: PathBuf,
    pub model_dir: PathBuf,
    pub samples_per_disease: usize,
    pub min_symptoms: usize,
    /// `None` seeds the synthesizer from the OS.
    pub dataset_seed: Option<u64>,
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// `None` seeds the forest from the OS.
    pub forest_seed: Option<u64>,
    pub top_k: usize,
    /// Clears both seeds after loading so every run draws from the OS.
    pub random_seed: bool,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/disease_symptom_dataset.csv"),
            model_dir: PathBuf::from("models"),
            samples_per_disease: 30,
            min_symptoms: 3,
            dataset_seed: Some(42),
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            forest_seed: Some(42),
            top_k: 5,
            random_seed: false,
        }
    }
}

impl PredictConfig {
    /// Defaults, then `medipredict.toml`, then `MEDIPREDICT_*` variables.
    pub fn load() -> PredictResult<Self> {
        Self::load_from(CONFIG_FILE)
    }

    pub fn load_from<P: AsRef<Path>>(toml_path: P) -> PredictResult<Self> {
        let mut config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(toml_path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        if config.random_seed {
            config.use_random_seeds();
        }
        config.validate()?;
        Ok(config)
    }

    /// Keeps every path under `root`. Used by tests and by hosts that own a
    /// data directory.
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        let defaults = Self::default();
        Self {
            dataset_path: root.join(&defaults.dataset_path),
            model_dir: root.join(&defaults.model_dir),
            ..defaults
        }
    }

    /// Drops the dataset and forest seeds so both are drawn from the OS.
    pub fn use_random_seeds(&mut self) {
        self.random_seed = true;
        self.dataset_seed = None;
        self.forest_seed = None;
    }

    pub fn validate(&self) -> PredictResult<()> {
        if self.n_trees == 0 {
            return Err(PredictError::config("n_trees must be at least 1"));
        }
        if self.top_k == 0 {
            return Err(PredictError::config("top_k must be at least 1"));
        }
        if self.samples_per_disease == 0 {
            return Err(PredictError::config("samples_per_disease must be at least 1"));
        }
        if self.min_symptoms == 0 {
            return Err(PredictError::config("min_symptoms must be at least 1"));
        }
        Ok(())
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.model_dir.join(VECTORIZER_FILE)
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE)
    }
}
