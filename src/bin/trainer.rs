use clap::Parser;
use predict_core::core::dataset::Dataset;
use predict_core::core::synthesizer::DatasetSynthesizer;
use predict_core::training::TrainingEngine;
use predict_core::{CachePolicy, PredictConfig, PredictionEngine, PredictionRequest};
use std::error::Error;
use std::fs;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Build the dataset and model cache", long_about = None)]
struct Args {
    /// Regenerate the dataset and retrain even if files exist
    #[clap(long)]
    fresh: bool,

    /// Report accuracy on this fraction of rows held out of training
    #[clap(long)]
    holdout: Option<f64>,

    /// Seed for both the synthesizer and the forest
    #[clap(long, conflicts_with = "random_seed")]
    seed: Option<u64>,

    /// Draw both seeds from the OS instead of the configured values
    #[clap(long)]
    random_seed: bool,

    /// Number of trees in the forest
    #[clap(long)]
    trees: Option<usize>,

    /// Symptoms to run through the trained model afterwards
    #[clap(long, value_delimiter = ',')]
    check: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    predict_core::logging::init("info");
    let args = Args::parse();

    let mut config = PredictConfig::load()?;
    if let Some(seed) = args.seed {
        config.dataset_seed = Some(seed);
        config.forest_seed = Some(seed);
    }
    if args.random_seed {
        config.use_random_seeds();
    }
    if let Some(trees) = args.trees {
        config.n_trees = trees;
    }
    config.validate()?;

    let policy = if args.fresh {
        if config.dataset_path.exists() {
            fs::remove_file(&config.dataset_path)?;
            info!(path = %config.dataset_path.display(), "removed dataset for fresh run");
        }
        CachePolicy::RetrainFresh
    } else {
        CachePolicy::ReuseCache
    };

    let engine = PredictionEngine::initialize(&config, policy)?;
    println!(
        "Model ready: {} diseases, {} symptoms, {} trees (avg depth {:.1}).",
        engine.model().classes().len(),
        engine.vectorizer().n_features(),
        engine.model().n_trees(),
        engine.model().avg_depth()
    );

    if let Some(fraction) = args.holdout {
        let synthesizer = DatasetSynthesizer::new(
            config.samples_per_disease,
            config.min_symptoms,
            config.dataset_seed,
        );
        let dataset = Dataset::load_or_generate(&config.dataset_path, &synthesizer)?;
        let report = TrainingEngine::from_config(&config).holdout(
            &dataset,
            fraction,
            config.forest_seed.unwrap_or_else(rand::random),
        )?;
        println!(
            "Holdout accuracy: {:.2}% ({} train / {} test rows)",
            report.accuracy * 100.0,
            report.train_rows,
            report.test_rows
        );
    }

    if !args.check.is_empty() {
        let result = engine.predict(&PredictionRequest::new(args.check));
        println!("{} ({:.2}%)", result.top_disease, result.top_probability_pct);
        for alt in result.alternatives() {
            println!("  {}: {:.2}%", alt.disease, alt.probability_pct);
        }
    }

    Ok(())
}
