// Line protocol for an external front end. One command per line on stdin,
// one reply line on stdout. Logs go to stderr.
//
//   SYMPTOMS             -> JSON array of catalog tokens
//   PREDICT tok tok ...  -> JSON PredictionResult
//   MATCH free text      -> JSON array of suggested tokens
//   EXIT
use predict_core::fuzzy::SymptomMatcher;
use predict_core::{CachePolicy, PredictConfig, PredictionEngine, PredictionRequest};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info};

const MATCH_COUNT: usize = 5;
const UNKNOWN_COMMAND: &str = "ERROR unknown command";

fn main() -> io::Result<()> {
    predict_core::logging::init("info");
    info!("prediction engine starting");

    let engine = PredictConfig::load()
        .and_then(|config| PredictionEngine::initialize(&config, CachePolicy::ReuseCache))
        .map_err(|e| {
            error!(error = %e, "could not initialize prediction engine");
            io::Error::new(io::ErrorKind::Other, e)
        })?;
    let matcher = SymptomMatcher::new(engine.catalog());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let input = line?;
        debug!(input = %input, "<-");
        let Some(reply) = handle_line(&engine, &matcher, &input) else {
            info!("received EXIT");
            break;
        };
        debug!(reply = %reply, "->");
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    info!("shutting down");
    Ok(())
}

/// One reply line for `input`, or `None` on `EXIT`.
fn handle_line(engine: &PredictionEngine, matcher: &SymptomMatcher, input: &str) -> Option<String> {
    let input = input.trim();
    let (command, rest) = input.split_once(' ').unwrap_or((input, ""));

    let reply = match command {
        "SYMPTOMS" => to_json(&engine.catalog()),
        "PREDICT" => {
            let request = PredictionRequest::new(rest.split_whitespace());
            to_json(&engine.predict(&request))
        }
        "MATCH" => to_json(&matcher.suggest(rest, MATCH_COUNT)),
        "EXIT" => return None,
        _ => {
            debug!(command, "unknown command");
            UNKNOWN_COMMAND.to_string()
        }
    };
    Some(reply)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        error!(error = %e, "could not encode reply");
        format!("ERROR {e}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use predict_core::core::forest::{ForestParams, RandomForest};
    use predict_core::core::vectorizer::CountVectorizer;
    use predict_core::PredictionResult;

    fn engine() -> PredictionEngine {
        let corpus = [
            "fever chills cough",
            "fever chills body_aches",
            "cough runny_nose sore_throat",
            "runny_nose sneezing sore_throat",
        ];
        let labels = ["Flu", "Flu", "Cold", "Cold"];
        let vectorizer = CountVectorizer::fit(&corpus);
        let x = vectorizer.transform_batch(&corpus);
        let params = ForestParams {
            n_trees: 10,
            ..ForestParams::default()
        };
        let model = RandomForest::fit(&x, &labels, params).unwrap();
        PredictionEngine::new(vectorizer, model)
    }

    fn run(input: &str) -> Option<String> {
        let engine = engine();
        let matcher = SymptomMatcher::new(engine.catalog());
        handle_line(&engine, &matcher, input)
    }

    #[test]
    fn symptoms_lists_the_catalog() {
        let reply = run("SYMPTOMS").unwrap();
        let catalog: Vec<String> = serde_json::from_str(&reply).unwrap();
        assert_eq!(
            catalog,
            ["body_aches", "chills", "cough", "fever", "runny_nose", "sneezing", "sore_throat"]
        );
    }

    #[test]
    fn predict_returns_a_result() {
        let reply = run("PREDICT runny_nose sneezing sore_throat").unwrap();
        let result: PredictionResult = serde_json::from_str(&reply).unwrap();
        assert_eq!(result.ranked.len(), 2);
        assert_eq!(result.top_disease, result.ranked[0].disease);

        let empty: PredictionResult = serde_json::from_str(&run("PREDICT").unwrap()).unwrap();
        assert_eq!(empty.ranked.len(), 2);
    }

    #[test]
    fn match_suggests_tokens() {
        let reply = run("MATCH runy nose").unwrap();
        let suggestions: Vec<String> = serde_json::from_str(&reply).unwrap();
        assert_eq!(suggestions.first().map(String::as_str), Some("runny_nose"));
    }

    #[test]
    fn unknown_command_and_exit() {
        assert_eq!(run("DIAGNOSE fever").as_deref(), Some("ERROR unknown command"));
        assert_eq!(run("").as_deref(), Some("ERROR unknown command"));
        assert_eq!(run("EXIT"), None);
        assert_eq!(run("  EXIT  "), None);
    }
}
