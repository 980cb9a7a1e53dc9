use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use predict_core::core::history::PatientHistory;
use predict_core::fuzzy::SymptomMatcher;
use predict_core::{CachePolicy, PredictConfig, PredictionEngine, PredictionRequest, PredictionResult};
use std::io::{self, stdin, stdout, Write};

const MIN_SELECTED: usize = 2;
const SUGGESTION_COUNT: usize = 5;
const ALTERNATIVES_SHOWN: usize = 3;

/// Everything the form remembers between commands.
struct Session {
    selected: Vec<String>,
    suggestions: Vec<String>,
    last: Option<(PredictionRequest, PredictionResult)>,
    history: Option<PatientHistory>,
    show_history: bool,
    message: String,
}

impl Session {
    fn new() -> Self {
        Self {
            selected: Vec::new(),
            suggestions: Vec::new(),
            last: None,
            history: None,
            show_history: true,
            message: String::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    predict_core::logging::init("warn");

    let config = PredictConfig::load()?;
    println!("Loading model (first run trains and caches it)...");
    let engine = PredictionEngine::initialize(&config, CachePolicy::ReuseCache)?;
    let matcher = SymptomMatcher::new(engine.catalog());

    let mut session = Session::new();

    loop {
        print_ui(&session, &matcher)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();
        session.message.clear();

        match cmd.split_once(' ').unwrap_or((cmd, "")) {
            ("exit", _) | ("quit", _) => break,
            ("", _) => {}
            ("list", _) => {
                session.suggestions = matcher.catalog().to_vec();
            }
            ("clear", _) => session.selected.clear(),
            ("rm", name) => {
                let token = SymptomMatcher::normalize(name);
                session.selected.retain(|s| *s != token);
            }
            ("predict", _) => predict(&engine, &mut session),
            ("patient", name) if !name.trim().is_empty() => {
                session.history = Some(PatientHistory::new(name.trim()));
                session.message = format!("Recording assessments for {}.", name.trim());
            }
            ("new", _) => {
                session.history = None;
                session.last = None;
                session.selected.clear();
                session.message = "Started a new patient. Use 'patient <name>'.".to_string();
            }
            ("save", _) => save_assessment(&mut session),
            ("history", _) => session.show_history = !session.show_history,
            (s, _) if s.starts_with(':') && s.len() > 1 => {
                // Select suggestion :1, :2 etc
                match s[1..].parse::<usize>() {
                    Ok(n) if n > 0 && n <= session.suggestions.len() => {
                        let chosen = session.suggestions[n - 1].clone();
                        select(&mut session, chosen);
                    }
                    _ => session.message = format!("No suggestion {s}."),
                }
            }
            _ => {
                // Anything else is a symptom name, possibly misspelled
                if let Some(token) = matcher.resolve(cmd) {
                    let token = token.to_string();
                    select(&mut session, token);
                    session.suggestions.clear();
                } else {
                    session.suggestions = matcher
                        .suggest(cmd, SUGGESTION_COUNT)
                        .into_iter()
                        .map(str::to_string)
                        .collect();
                    session.message = if session.suggestions.is_empty() {
                        format!("Unknown symptom '{cmd}'. Type 'list' to browse.")
                    } else {
                        format!("Unknown symptom '{cmd}'. Pick a suggestion with :N.")
                    };
                }
            }
        }
    }

    Ok(())
}

fn select(session: &mut Session, token: String) {
    if session.selected.contains(&token) {
        session.message = format!("'{token}' is already selected.");
    } else {
        session.message = format!("Added '{token}'.");
        session.selected.push(token);
    }
}

/// The form only predicts once enough symptoms are selected.
fn check_selection(selected: &[String]) -> Result<(), String> {
    if selected.len() < MIN_SELECTED {
        return Err(format!(
            "Please select at least {MIN_SELECTED} symptoms for a more accurate prediction."
        ));
    }
    Ok(())
}

fn predict(engine: &PredictionEngine, session: &mut Session) {
    if let Err(message) = check_selection(&session.selected) {
        session.message = message;
        return;
    }
    let request = PredictionRequest::new(session.selected.iter().cloned());
    let result = engine.predict(&request);
    session.last = Some((request, result));
}

fn save_assessment(session: &mut Session) {
    let Some(history) = session.history.as_mut() else {
        session.message = "Enter a patient first: 'patient <name>'.".to_string();
        return;
    };
    let Some((request, result)) = session.last.as_ref() else {
        session.message = "Nothing to save yet. Run 'predict' first.".to_string();
        return;
    };
    let saved = history.record(request, result);
    session.message = format!("Saved {} for {}.", saved.diagnosis, saved.date);
}

fn print_ui(session: &Session, matcher: &SymptomMatcher) -> io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    println!("{}", "MediPredict: Disease Prediction".bold().blue());
    println!("---------------------------------------------------------------");
    println!("Type a symptom to add it, ':N' to pick a suggestion, 'rm <symptom>',");
    println!("'list', 'clear', 'predict', 'patient <name>', 'save', 'history', 'new', 'exit'.");
    println!("{}", "For educational purposes only; not medical advice.".dark_grey());

    println!("\nSelected symptoms ({} known):", matcher.catalog().len());
    if session.selected.is_empty() {
        println!("  (none)");
    }
    for symptom in &session.selected {
        println!("  - {}", display_name(symptom));
    }

    if !session.suggestions.is_empty() {
        println!("\nSuggestions:");
        for (i, token) in session.suggestions.iter().enumerate() {
            println!("  :{}: {}", i + 1, display_name(token));
        }
    }

    if let Some((_, result)) = &session.last {
        println!("\n{}", "Prediction Results".bold().green());
        println!("Most likely diagnosis: {}", result.top_disease.as_str().bold());
        println!("Confidence: {:.2}%", result.top_probability_pct);
        if !result.alternatives().is_empty() {
            println!("Other possible diagnoses:");
            for alt in result.alternatives().iter().take(ALTERNATIVES_SHOWN) {
                println!("  {}: {:.2}%", alt.disease, alt.probability_pct);
            }
        }
        println!(
            "{}",
            "This prediction is not a substitute for professional diagnosis.".yellow()
        );
    }

    if let Some(history) = session.history.as_ref().filter(|_| session.show_history) {
        println!("\nPatient: {}", history.patient_name().bold());
        if history.is_empty() {
            println!("  No records yet.");
        }
        for record in history.assessments() {
            println!(
                "  {}  {} ({:.2}%)  [{}]",
                record.date,
                record.diagnosis,
                record.probability_pct,
                record.symptoms.join(", ")
            );
        }
    }

    if !session.message.is_empty() {
        println!("\n{}", session.message.as_str().cyan());
    }
    print!("\n> ");
    out.flush()
}

/// `chest_pain` -> `Chest Pain`
fn display_name(token: &str) -> String {
    token
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
