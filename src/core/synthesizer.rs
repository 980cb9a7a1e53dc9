// File: src/core/synthesizer.rs
use crate::core::types::DiseaseSymptomRecord;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Hand-authored disease -> characteristic symptoms table.
pub const DISEASE_SYMPTOMS: &[(&str, &[&str])] = &[
    ("Common Cold", &["cough", "runny_nose", "sore_throat", "sneezing", "headache", "fatigue"]),
    ("Influenza", &["fever", "cough", "fatigue", "body_aches", "headache", "chills"]),
    ("Pneumonia", &["cough", "fever", "shortness_of_breath", "chest_pain", "fatigue", "rapid_breathing"]),
    ("Tuberculosis", &["cough", "fever", "weight_loss", "night_sweats", "fatigue", "chest_pain"]),
    ("Asthma", &["shortness_of_breath", "wheezing", "cough", "chest_tightness"]),
    ("Bronchitis", &["cough", "mucus_production", "shortness_of_breath", "chest_discomfort", "fatigue"]),
    ("Sinusitis", &["nasal_congestion", "facial_pain", "headache", "cough", "fatigue"]),
    ("Gastroenteritis", &["nausea", "vomiting", "diarrhea", "abdominal_cramps", "fever"]),
    ("Appendicitis", &["abdominal_pain", "nausea", "vomiting", "fever", "loss_of_appetite"]),
    ("Diabetes", &["frequent_urination", "excessive_thirst", "weight_loss", "fatigue", "blurred_vision"]),
    ("Hypertension", &["headache", "shortness_of_breath", "dizziness", "chest_pain", "nosebleeds"]),
    ("Heart Attack", &["chest_pain", "shortness_of_breath", "pain_in_arms", "dizziness", "cold_sweat"]),
    ("Stroke", &["numbness", "confusion", "trouble_speaking", "dizziness", "severe_headache"]),
    ("Migraine", &["severe_headache", "nausea", "vomiting", "sensitivity_to_light", "vision_changes"]),
    ("Arthritis", &["joint_pain", "stiffness", "swelling", "reduced_mobility", "redness"]),
    ("Osteoporosis", &["back_pain", "loss_of_height", "stooped_posture", "bone_fractures"]),
    ("Anemia", &["fatigue", "weakness", "pale_skin", "shortness_of_breath", "dizziness"]),
    ("Hyperthyroidism", &["weight_loss", "increased_appetite", "anxiety", "sweating", "tremor"]),
    ("Hypothyroidism", &["fatigue", "weight_gain", "cold_intolerance", "dry_skin", "hair_loss"]),
    ("Depression", &["persistent_sadness", "loss_of_interest", "sleep_problems", "fatigue", "feelings_of_guilt"]),
    ("Anxiety Disorder", &["excessive_worry", "restlessness", "fatigue", "difficulty_concentrating", "sleep_problems"]),
    ("Urinary Tract Infection", &["burning_urination", "frequent_urination", "cloudy_urine", "strong_odor", "pelvic_pain"]),
    ("Kidney Stones", &["severe_pain", "nausea", "vomiting", "blood_in_urine", "frequent_urination"]),
    ("Malaria", &["fever", "chills", "headache", "nausea", "vomiting", "muscle_pain"]),
    ("Dengue Fever", &["high_fever", "severe_headache", "joint_pain", "rash", "pain_behind_eyes"]),
];

/// Generates labeled samples by drawing random symptom subsets per disease.
pub struct DatasetSynthesizer {
    samples_per_disease: usize,
    min_symptoms: usize,
    seed: Option<u64>,
}

impl DatasetSynthesizer {
    pub fn new(samples_per_disease: usize, min_symptoms: usize, seed: Option<u64>) -> Self {
        Self {
            samples_per_disease,
            min_symptoms,
            seed,
        }
    }

    /// Draws from the fixed disease table.
    pub fn generate(&self) -> Vec<DiseaseSymptomRecord> {
        self.generate_from(DISEASE_SYMPTOMS)
    }

    /// For each disease, draws `k` in `[min_symptoms, len]` and then `k`
    /// distinct symptoms without replacement. A `min_symptoms` above the
    /// list length takes the whole list.
    pub fn generate_from(&self, table: &[(&str, &[&str])]) -> Vec<DiseaseSymptomRecord> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut records = Vec::with_capacity(table.len() * self.samples_per_disease);
        for &(disease, symptoms) in table {
            let upper = symptoms.len();
            let lower = self.min_symptoms.min(upper);
            for _ in 0..self.samples_per_disease {
                let k = rng.random_range(lower..=upper);
                let chosen = symptoms
                    .choose_multiple(&mut rng, k)
                    .map(|s| (*s).to_string())
                    .collect();
                records.push(DiseaseSymptomRecord {
                    disease: disease.to_string(),
                    symptoms: chosen,
                });
            }
        }

        info!(
            diseases = table.len(),
            records = records.len(),
            seeded = self.seed.is_some(),
            "synthesized disease/symptom dataset"
        );
        records
    }
}
