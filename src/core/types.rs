// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Index of a disease label in the classifier's sorted class list.
pub type LabelId = usize;

/// Token counts indexed by vocabulary position.
pub type FeatureVector = Vec<f64>;

/// One synthetic sample: a disease and the symptoms drawn for it.
/// Many records share the same disease label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseSymptomRecord {
    pub disease: String,
    pub symptoms: Vec<String>,
}

impl DiseaseSymptomRecord {
    /// The whitespace-joined form stored in the `symptoms_list` column.
    pub fn symptoms_list(&self) -> String {
        self.symptoms.join(" ")
    }
}

/// The symptoms a caller wants a prediction for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub symptoms: Vec<String>,
}

impl PredictionRequest {
    pub fn new<I, S>(symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symptoms: symptoms.into_iter().map(Into::into).collect(),
        }
    }
}

/// A disease label with its probability as a percentage in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDisease {
    pub disease: String,
    pub probability_pct: f64,
}

/// Up to `top_k` diseases, sorted by probability descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub top_disease: String,
    pub top_probability_pct: f64,
    pub ranked: Vec<RankedDisease>,
}

impl PredictionResult {
    /// Everything after the top prediction.
    pub fn alternatives(&self) -> &[RankedDisease] {
        self.ranked.get(1..).unwrap_or(&[])
    }
}
