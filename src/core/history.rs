// File: src/core/history.rs
use crate::core::types::{PredictionRequest, PredictionResult};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// One saved assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// `%Y-%m-%d`
    pub date: String,
    pub diagnosis: String,
    pub probability_pct: f64,
    pub symptoms: Vec<String>,
}

/// Assessments saved for one patient during a session. The shell owns
/// this value and passes it around explicitly; the pipeline never sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientHistory {
    patient_name: String,
    assessments: Vec<Assessment>,
}

impl PatientHistory {
    pub fn new(patient_name: impl Into<String>) -> Self {
        Self {
            patient_name: patient_name.into(),
            assessments: Vec::new(),
        }
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    /// Appends the result of `request`, dated today.
    pub fn record(&mut self, request: &PredictionRequest, result: &PredictionResult) -> &Assessment {
        let date = Local::now().format("%Y-%m-%d").to_string();
        self.record_on(date, request, result)
    }

    pub fn record_on(
        &mut self,
        date: impl Into<String>,
        request: &PredictionRequest,
        result: &PredictionResult,
    ) -> &Assessment {
        self.assessments.push(Assessment {
            date: date.into(),
            diagnosis: result.top_disease.clone(),
            probability_pct: result.top_probability_pct,
            symptoms: request.symptoms.clone(),
        });
        &self.assessments[self.assessments.len() - 1]
    }

    pub fn assessments(&self) -> &[Assessment] {
        &self.assessments
    }

    pub fn is_empty(&self) -> bool {
        self.assessments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RankedDisease;

    fn result(disease: &str) -> PredictionResult {
        PredictionResult {
            top_disease: disease.to_string(),
            top_probability_pct: 64.0,
            ranked: vec![RankedDisease {
                disease: disease.to_string(),
                probability_pct: 64.0,
            }],
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let mut history = PatientHistory::new("Ana");
        assert!(history.is_empty());
        history.record_on("2026-01-02", &PredictionRequest::new(["fever"]), &result("Flu"));
        history.record_on("2026-01-03", &PredictionRequest::new(["cough"]), &result("Cold"));

        let diagnoses: Vec<&str> = history
            .assessments()
            .iter()
            .map(|a| a.diagnosis.as_str())
            .collect();
        assert_eq!(diagnoses, vec!["Flu", "Cold"]);
        assert_eq!(history.patient_name(), "Ana");
        assert_eq!(history.assessments()[1].symptoms, vec!["cough"]);
    }

    #[test]
    fn record_dates_today() {
        let mut history = PatientHistory::new("Sam");
        let saved = history.record(&PredictionRequest::new(["rash"]), &result("Dengue Fever"));
        assert_eq!(saved.date.len(), 10);
        assert_eq!(saved.probability_pct, 64.0);
    }
}
