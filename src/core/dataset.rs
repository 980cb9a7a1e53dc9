// File: src/core/dataset.rs
use crate::core::synthesizer::DatasetSynthesizer;
use crate::core::types::DiseaseSymptomRecord;
use crate::error::{PredictError, PredictResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// One row of the dataset file.
#[derive(Debug, Serialize, Deserialize)]
struct DatasetRow {
    disease: String,
    symptoms_list: String,
}

/// The labeled training table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<DiseaseSymptomRecord>,
}

impl Dataset {
    pub fn new(records: Vec<DiseaseSymptomRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[DiseaseSymptomRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The `symptoms_list` column, one string per record.
    pub fn corpus(&self) -> Vec<String> {
        self.records.iter().map(DiseaseSymptomRecord::symptoms_list).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(|r| r.disease.clone()).collect()
    }

    /// Every symptom token in the dataset, sorted ascending, no duplicates.
    pub fn list_symptoms(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|r| r.symptoms.iter())
            .flat_map(|s| s.split_whitespace())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Reads an existing dataset file. A missing file is `MissingDatasetFile`.
    pub fn load(path: &Path) -> PredictResult<Self> {
        if !path.exists() {
            return Err(PredictError::missing_dataset(path));
        }
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| PredictError::csv(format!("open {}", path.display()), e))?;

        let mut records = Vec::new();
        for row in reader.deserialize::<DatasetRow>() {
            let row = row.map_err(|e| PredictError::csv("read dataset row", e))?;
            records.push(DiseaseSymptomRecord {
                disease: row.disease,
                symptoms: row.symptoms_list.split_whitespace().map(str::to_string).collect(),
            });
        }

        info!(path = %path.display(), records = records.len(), "loaded dataset");
        Ok(Self { records })
    }

    /// Writes the dataset through a temp file in the target directory, then
    /// renames it into place.
    pub fn save(&self, path: &Path) -> PredictResult<()> {
        let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)
            .map_err(|e| PredictError::io("create dataset directory", e))?;

        let temp_file = NamedTempFile::new_in(parent_dir)
            .map_err(|e| PredictError::io("create temporary dataset file", e))?;
        {
            let mut writer = csv::Writer::from_writer(BufWriter::new(&temp_file));
            for record in &self.records {
                writer
                    .serialize(DatasetRow {
                        disease: record.disease.clone(),
                        symptoms_list: record.symptoms_list(),
                    })
                    .map_err(|e| PredictError::csv("write dataset row", e))?;
            }
            let mut inner = writer
                .into_inner()
                .map_err(|e| PredictError::io("flush dataset", e.into_error()))?;
            inner
                .flush()
                .map_err(|e| PredictError::io("flush dataset", e))?;
        }

        temp_file
            .persist(path)
            .map_err(|e| PredictError::io("persist dataset file", e.error))?;
        info!(path = %path.display(), records = self.records.len(), "saved dataset");
        Ok(())
    }

    /// Returns the file's contents when present. Otherwise synthesizes,
    /// saves and returns a fresh dataset. Never regenerates over an
    /// existing file.
    pub fn load_or_generate(path: &Path, synthesizer: &DatasetSynthesizer) -> PredictResult<Self> {
        match Self::load(path) {
            Err(PredictError::MissingDatasetFile { .. }) => {
                warn!(path = %path.display(), "dataset file missing, generating");
                let dataset = Self::new(synthesizer.generate());
                dataset.save(path)?;
                Ok(dataset)
            }
            other => other,
        }
    }
}
