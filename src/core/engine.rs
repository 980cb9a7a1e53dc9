// File: src/core/engine.rs
use crate::config::PredictConfig;
use crate::core::dataset::Dataset;
use crate::core::forest::RandomForest;
use crate::core::synthesizer::DatasetSynthesizer;
use crate::core::types::{PredictionRequest, PredictionResult, RankedDisease};
use crate::core::vectorizer::CountVectorizer;
use crate::error::{PredictError, PredictResult};
use crate::persistence::ModelCache;
use crate::training::TrainingEngine;
use tracing::{debug, info, warn};

pub const DEFAULT_TOP_K: usize = 5;

/// What `initialize` does with cached artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Load the cache; train and save only when an artifact is missing.
    ReuseCache,
    /// Always train and overwrite the cache.
    RetrainFresh,
}

/// A fitted encoder and classifier. Holds no per-request state.
pub struct PredictionEngine {
    vectorizer: CountVectorizer,
    model: RandomForest,
    top_k: usize,
}

impl PredictionEngine {
    pub fn new(vectorizer: CountVectorizer, model: RandomForest) -> Self {
        Self {
            vectorizer,
            model,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Zero is raised to one so there is always a top disease.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Loads or builds the engine according to `policy`. Dataset and cache
    /// paths come from `config`.
    pub fn initialize(config: &PredictConfig, policy: CachePolicy) -> PredictResult<Self> {
        let cache = ModelCache::new(config.vectorizer_path(), config.model_path());

        let (vectorizer, model) = match policy {
            CachePolicy::ReuseCache => match cache.load() {
                Ok(pair) => pair,
                Err(PredictError::MissingModelArtifact { path }) => {
                    warn!(path = %path.display(), "model artifact missing, retraining");
                    Self::train_and_save(config, &cache)?
                }
                Err(err) => return Err(err),
            },
            CachePolicy::RetrainFresh => Self::train_and_save(config, &cache)?,
        };

        Ok(Self::new(vectorizer, model).with_top_k(config.top_k))
    }

    fn train_and_save(
        config: &PredictConfig,
        cache: &ModelCache,
    ) -> PredictResult<(CountVectorizer, RandomForest)> {
        let synthesizer = DatasetSynthesizer::new(
            config.samples_per_disease,
            config.min_symptoms,
            config.dataset_seed,
        );
        let dataset = Dataset::load_or_generate(&config.dataset_path, &synthesizer)?;
        let (vectorizer, model) = TrainingEngine::from_config(config).train(&dataset)?;
        cache.save(&vectorizer, &model)?;
        Ok((vectorizer, model))
    }

    /// Ranks every known disease for the request and keeps the top `k`.
    ///
    /// Unknown symptoms are ignored and an empty request is allowed. Equal
    /// probabilities keep the classifier's sorted label order.
    pub fn predict(&self, request: &PredictionRequest) -> PredictionResult {
        predict(&request.symptoms, &self.vectorizer, &self.model, self.top_k)
    }

    /// Symptom tokens the encoder knows, sorted.
    pub fn catalog(&self) -> Vec<String> {
        self.vectorizer
            .vocabulary()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &RandomForest {
        &self.model
    }
}

/// Encodes `symptoms`, ranks class probabilities descending and keeps the
/// first `top_k` (at least one) as percentages.
pub fn predict<S: AsRef<str>>(
    symptoms: &[S],
    vectorizer: &CountVectorizer,
    model: &RandomForest,
    top_k: usize,
) -> PredictionResult {
    let joined = symptoms
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ");
    let features = vectorizer.transform(&joined);
    let proba = model.predict_proba(&features);

    let mut order: Vec<usize> = (0..proba.len()).collect();
    order.sort_by(|&a, &b| proba[b].total_cmp(&proba[a]));

    let ranked: Vec<RankedDisease> = order
        .into_iter()
        .take(top_k.max(1))
        .map(|idx| RankedDisease {
            disease: model.classes()[idx].clone(),
            probability_pct: proba[idx] * 100.0,
        })
        .collect();

    let (top_disease, top_probability_pct) = ranked
        .first()
        .map(|r| (r.disease.clone(), r.probability_pct))
        .unwrap_or_default();

    debug!(
        symptoms = %joined,
        known = features.iter().filter(|&&v| v > 0.0).count(),
        top = %top_disease,
        "prediction"
    );
    if !ranked.is_empty() {
        info!(top = %top_disease, pct = top_probability_pct, "predicted disease");
    }

    PredictionResult {
        top_disease,
        top_probability_pct,
        ranked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forest::ForestParams;

    fn engine() -> PredictionEngine {
        let corpus = [
            "fever chills body_aches",
            "fever chills cough",
            "cough runny_nose sore_throat",
            "cough runny_nose sore_throat",
            "cough runny_nose sore_throat",
            "runny_nose sneezing sore_throat",
            "wheezing cough chest_tightness",
            "wheezing shortness_of_breath",
        ];
        let labels = ["Flu", "Flu", "Cold", "Cold", "Cold", "Cold", "Asthma", "Asthma"];
        let vectorizer = CountVectorizer::fit(&corpus);
        let x = vectorizer.transform_batch(&corpus);
        let params = ForestParams {
            n_trees: 25,
            ..ForestParams::default()
        };
        let model = RandomForest::fit(&x, &labels, params).unwrap();
        PredictionEngine::new(vectorizer, model)
    }

    #[test]
    fn ranked_is_sorted_and_capped_by_class_count() {
        let engine = engine();
        let result = engine.predict(&PredictionRequest::new(["fever", "chills"]));
        assert_eq!(result.ranked.len(), 3);
        assert!(result
            .ranked
            .windows(2)
            .all(|w| w[0].probability_pct >= w[1].probability_pct));
        assert_eq!(result.top_disease, result.ranked[0].disease);
    }

    #[test]
    fn top_pct_is_max_probability() {
        let engine = engine();
        let request = PredictionRequest::new(["cough", "runny_nose", "sore_throat"]);
        let result = engine.predict(&request);
        let features = engine.vectorizer().transform("cough runny_nose sore_throat");
        let max = engine
            .model()
            .predict_proba(&features)
            .into_iter()
            .fold(0.0, f64::max);
        assert!((result.top_probability_pct - max * 100.0).abs() < 1e-9);
        assert_eq!(result.top_disease, "Cold");
    }

    #[test]
    fn empty_and_unknown_requests_are_well_formed() {
        let engine = engine();
        for request in [
            PredictionRequest::default(),
            PredictionRequest::new(["not_a_symptom"]),
        ] {
            let result = engine.predict(&request);
            assert_eq!(result.ranked.len(), 3);
            let total: f64 = result.ranked.iter().map(|r| r.probability_pct).sum();
            assert!((total - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn top_k_limits_output() {
        let engine = engine().with_top_k(1);
        let result = engine.predict(&PredictionRequest::new(["wheezing"]));
        assert_eq!(result.ranked.len(), 1);
        assert!(result.alternatives().is_empty());
    }

    #[test]
    fn zero_top_k_still_names_a_disease() {
        let engine = engine().with_top_k(0);
        let request = PredictionRequest::new(["cough", "runny_nose", "sore_throat"]);
        let result = engine.predict(&request);
        assert_eq!(result.ranked.len(), 1);
        assert_eq!(result.top_disease, "Cold");

        let direct = predict(&request.symptoms, engine.vectorizer(), engine.model(), 0);
        assert_eq!(direct, result);
    }
}
