// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod fuzzy;
pub mod logging;
pub mod persistence;
pub mod training;

pub use crate::config::PredictConfig;
pub use crate::core::engine::{CachePolicy, PredictionEngine};
pub use crate::core::types::{PredictionRequest, PredictionResult, RankedDisease};
pub use crate::error::{PredictError, PredictResult};
