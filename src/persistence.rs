// File: src/persistence.rs
use crate::core::forest::RandomForest;
use crate::core::vectorizer::CountVectorizer;
use crate::error::{PredictError, PredictResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// The fitted encoder and classifier as two bincode files.
///
/// Loading does not check that the encoder's vocabulary width matches the
/// forest's feature count.
#[derive(Debug, Clone)]
pub struct ModelCache {
    vectorizer_path: PathBuf,
    model_path: PathBuf,
}

impl ModelCache {
    pub fn new(vectorizer_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            vectorizer_path: vectorizer_path.into(),
            model_path: model_path.into(),
        }
    }

    pub fn vectorizer_path(&self) -> &Path {
        &self.vectorizer_path
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn save(&self, vectorizer: &CountVectorizer, model: &RandomForest) -> PredictResult<()> {
        save_to_disk(vectorizer, &self.vectorizer_path)?;
        save_to_disk(model, &self.model_path)?;
        info!(
            vectorizer = %self.vectorizer_path.display(),
            model = %self.model_path.display(),
            "saved model artifacts"
        );
        Ok(())
    }

    /// `MissingModelArtifact` when either file is absent.
    pub fn load(&self) -> PredictResult<(CountVectorizer, RandomForest)> {
        for path in [&self.vectorizer_path, &self.model_path] {
            if !path.exists() {
                return Err(PredictError::missing_artifact(path));
            }
        }
        let vectorizer: CountVectorizer = load_from_disk(&self.vectorizer_path)?;
        let model: RandomForest = load_from_disk(&self.model_path)?;
        info!(
            features = vectorizer.n_features(),
            classes = model.classes().len(),
            "loaded model artifacts"
        );
        Ok((vectorizer, model))
    }
}

fn save_to_disk<T: Serialize>(value: &T, path: &Path) -> PredictResult<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| PredictError::io("create model directory", e))?;

    let temp_file = NamedTempFile::new_in(parent_dir)
        .map_err(|e| PredictError::io("create temporary model file", e))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, value)
            .map_err(|e| PredictError::serialization(format!("encode {}", path.display()), e))?;
        writer
            .flush()
            .map_err(|e| PredictError::io("flush model file", e))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| PredictError::io("persist model file", e.error))?;
    Ok(())
}

fn load_from_disk<T: DeserializeOwned>(path: &Path) -> PredictResult<T> {
    let file = File::open(path).map_err(|e| PredictError::io("open model file", e))?;
    let reader = BufReader::new(file);
    bincode::deserialize_from(reader)
        .map_err(|e| PredictError::serialization(format!("decode {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forest::ForestParams;
    use tempfile::TempDir;

    fn fitted() -> (CountVectorizer, RandomForest) {
        let corpus = ["fever chills", "cough runny_nose", "fever cough", "runny_nose sneezing"];
        let labels = ["Flu", "Cold", "Flu", "Cold"];
        let vectorizer = CountVectorizer::fit(&corpus);
        let x = vectorizer.transform_batch(&corpus);
        let params = ForestParams {
            n_trees: 5,
            ..ForestParams::default()
        };
        (vectorizer, RandomForest::fit(&x, &labels, params).unwrap())
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let cache = ModelCache::new(dir.path().join("m/vec.bin"), dir.path().join("m/rf.bin"));
        let (vectorizer, model) = fitted();
        cache.save(&vectorizer, &model).unwrap();

        let (loaded_vec, loaded_model) = cache.load().unwrap();
        assert_eq!(loaded_vec, vectorizer);
        assert_eq!(loaded_model, model);
    }

    #[test]
    fn one_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let cache = ModelCache::new(dir.path().join("vec.bin"), dir.path().join("rf.bin"));
        let (vectorizer, model) = fitted();
        cache.save(&vectorizer, &model).unwrap();
        fs::remove_file(cache.model_path()).unwrap();

        let err = cache.load().unwrap_err();
        assert!(matches!(err, PredictError::MissingModelArtifact { .. }));
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let cache = ModelCache::new(dir.path().join("vec.bin"), dir.path().join("rf.bin"));
        fs::write(cache.vectorizer_path(), b"not bincode").unwrap();
        fs::write(cache.model_path(), b"").unwrap();
        assert!(matches!(
            cache.load().unwrap_err(),
            PredictError::Serialization { .. }
        ));
    }
}
