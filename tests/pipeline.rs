use predict_core::core::dataset::Dataset;
use predict_core::core::engine::predict;
use predict_core::core::forest::ForestParams;
use predict_core::core::synthesizer::{DatasetSynthesizer, DISEASE_SYMPTOMS};
use predict_core::core::types::DiseaseSymptomRecord;
use predict_core::persistence::ModelCache;
use predict_core::training::TrainingEngine;
use predict_core::{
    CachePolicy, PredictConfig, PredictError, PredictionEngine, PredictionRequest,
};
use std::fs;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> PredictConfig {
    PredictConfig {
        n_trees: 30,
        ..PredictConfig::rooted_at(dir.path())
    }
}

fn cold_query() -> PredictionRequest {
    PredictionRequest::new(["cough", "runny_nose", "sore_throat"])
}

#[test]
fn first_run_generates_dataset_and_cache() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let engine = PredictionEngine::initialize(&config, CachePolicy::ReuseCache).unwrap();
    assert!(config.dataset_path.exists());
    assert!(config.vectorizer_path().exists());
    assert!(config.model_path().exists());

    let dataset = Dataset::load(&config.dataset_path).unwrap();
    assert_eq!(dataset.len(), DISEASE_SYMPTOMS.len() * 30);
    assert_eq!(engine.catalog(), dataset.list_symptoms());
    assert_eq!(engine.model().classes().len(), DISEASE_SYMPTOMS.len());
}

#[test]
fn reused_cache_predicts_identically() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let trained = PredictionEngine::initialize(&config, CachePolicy::RetrainFresh).unwrap();
    let loaded = PredictionEngine::initialize(&config, CachePolicy::ReuseCache).unwrap();

    for request in [
        cold_query(),
        PredictionRequest::new(["fever", "chills", "muscle_pain"]),
        PredictionRequest::default(),
    ] {
        assert_eq!(trained.predict(&request), loaded.predict(&request));
    }
}

#[test]
fn missing_artifact_triggers_retraining() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    PredictionEngine::initialize(&config, CachePolicy::ReuseCache).unwrap();

    fs::remove_file(config.vectorizer_path()).unwrap();
    let cache = ModelCache::new(config.vectorizer_path(), config.model_path());
    assert!(matches!(
        cache.load(),
        Err(PredictError::MissingModelArtifact { .. })
    ));

    PredictionEngine::initialize(&config, CachePolicy::ReuseCache).unwrap();
    assert!(config.vectorizer_path().exists());
}

#[test]
fn existing_dataset_is_reused_for_training() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let tiny = Dataset::new(vec![
        DiseaseSymptomRecord {
            disease: "Flu".into(),
            symptoms: vec!["fever".into(), "chills".into(), "cough".into()],
        },
        DiseaseSymptomRecord {
            disease: "Cold".into(),
            symptoms: vec!["runny_nose".into(), "sneezing".into(), "cough".into()],
        },
    ]);
    tiny.save(&config.dataset_path).unwrap();

    let engine = PredictionEngine::initialize(&config, CachePolicy::RetrainFresh).unwrap();
    assert_eq!(engine.model().classes(), &["Cold".to_string(), "Flu".to_string()]);
    assert_eq!(engine.predict(&cold_query()).ranked.len(), 2);
}

#[test]
fn common_cold_wins_its_signature_symptoms() {
    let mut records = DatasetSynthesizer::new(30, 3, Some(42)).generate();
    for _ in 0..3 {
        records.push(DiseaseSymptomRecord {
            disease: "Common Cold".into(),
            symptoms: vec!["cough".into(), "runny_nose".into(), "sore_throat".into()],
        });
    }
    let dataset = Dataset::new(records);
    let only_cold_has_all = dataset
        .records()
        .iter()
        .filter(|r| {
            ["cough", "runny_nose", "sore_throat"]
                .iter()
                .all(|s| r.symptoms.iter().any(|t| t == s))
        })
        .all(|r| r.disease == "Common Cold");
    assert!(only_cold_has_all);

    let (vectorizer, model) = TrainingEngine::new(ForestParams::default())
        .train(&dataset)
        .unwrap();
    let result = predict(&cold_query().symptoms, &vectorizer, &model, 5);

    assert_eq!(result.top_disease, "Common Cold");
    assert!(result
        .ranked
        .iter()
        .all(|r| r.probability_pct <= result.top_probability_pct));
}

#[test]
fn zero_symptoms_still_rank_five() {
    let dir = TempDir::new().unwrap();
    let engine = PredictionEngine::initialize(&config_in(&dir), CachePolicy::ReuseCache).unwrap();
    let result = engine.predict(&PredictionRequest::default());

    assert_eq!(result.ranked.len(), 5);
    assert!(!result.top_disease.is_empty());
    assert!((0.0..=100.0).contains(&result.top_probability_pct));
    assert!(result
        .ranked
        .windows(2)
        .all(|w| w[0].probability_pct >= w[1].probability_pct));
}

#[test]
fn unknown_symptoms_are_ignored() {
    let dir = TempDir::new().unwrap();
    let engine = PredictionEngine::initialize(&config_in(&dir), CachePolicy::ReuseCache).unwrap();

    let with_noise = PredictionRequest::new(["cough", "runny_nose", "sore_throat", "glowing_aura"]);
    assert_eq!(engine.predict(&with_noise), engine.predict(&cold_query()));
    assert!(engine
        .vectorizer()
        .transform("glowing_aura purple_spots")
        .iter()
        .all(|&v| v == 0.0));
}
