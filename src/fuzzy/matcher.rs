// File: src/fuzzy/matcher.rs
use crate::fuzzy::symspell::SymSpell;

const MAX_EDIT_DISTANCE: usize = 2;

/// Resolves free text to catalog symptom tokens.
///
/// Only the interactive shells use this. The prediction path itself never
/// rewrites tokens.
#[derive(Debug, Clone)]
pub struct SymptomMatcher {
    catalog: Vec<String>,
    symspell: SymSpell,
}

impl SymptomMatcher {
    /// `catalog` is expected sorted, as returned by `list_symptoms`.
    pub fn new(catalog: Vec<String>) -> Self {
        let mut symspell = SymSpell::new(MAX_EDIT_DISTANCE);
        for (id, token) in catalog.iter().enumerate() {
            symspell.add_word(token, id);
        }
        Self { catalog, symspell }
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// Lowercases, trims and joins words with `_`: `"Runny  Nose"` becomes
    /// `runny_nose`.
    pub fn normalize(input: &str) -> String {
        input
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }

    /// The exact token when known, otherwise the closest fuzzy match within
    /// the edit budget.
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let normalized = Self::normalize(input);
        if normalized.is_empty() {
            return None;
        }
        if let Some(exact) = self.catalog.iter().find(|t| **t == normalized) {
            return Some(exact.as_str());
        }
        self.fuzzy(&normalized).into_iter().next()
    }

    /// Catalog tokens starting with `prefix`, in catalog order.
    pub fn complete(&self, prefix: &str, count: usize) -> Vec<&str> {
        let normalized = Self::normalize(prefix);
        if normalized.is_empty() {
            return Vec::new();
        }
        self.catalog
            .iter()
            .filter(|t| t.starts_with(&normalized))
            .take(count)
            .map(String::as_str)
            .collect()
    }

    /// Prefix completions first, then fuzzy matches, without duplicates.
    pub fn suggest(&self, input: &str, count: usize) -> Vec<&str> {
        let mut suggestions = self.complete(input, count);
        for candidate in self.fuzzy(&Self::normalize(input)) {
            if suggestions.len() >= count {
                break;
            }
            if !suggestions.contains(&candidate) {
                suggestions.push(candidate);
            }
        }
        suggestions
    }

    /// Candidates within `MAX_EDIT_DISTANCE`, closest first, ties sorted by
    /// name.
    fn fuzzy(&self, normalized: &str) -> Vec<&str> {
        if normalized.is_empty() {
            return Vec::new();
        }
        let mut scored: Vec<(usize, &str)> = self
            .symspell
            .lookup(normalized)
            .into_iter()
            .map(|id| self.catalog[id].as_str())
            .map(|token| (strsim::damerau_levenshtein(normalized, token), token))
            .filter(|&(distance, _)| distance <= MAX_EDIT_DISTANCE)
            .collect();
        scored.sort();
        scored.into_iter().map(|(_, token)| token).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> SymptomMatcher {
        SymptomMatcher::new(
            ["chest_pain", "chills", "cough", "fever", "runny_nose", "sore_throat"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn normalizes_spacing_and_case() {
        assert_eq!(SymptomMatcher::normalize("  Runny  Nose "), "runny_nose");
        assert_eq!(SymptomMatcher::normalize("sore-throat"), "sore_throat");
        assert_eq!(SymptomMatcher::normalize("   "), "");
    }

    #[test]
    fn resolves_exact_and_fuzzy() {
        let m = matcher();
        assert_eq!(m.resolve("cough"), Some("cough"));
        assert_eq!(m.resolve("runy nose"), Some("runny_nose"));
        assert_eq!(m.resolve("fevr"), Some("fever"));
        assert_eq!(m.resolve("tremor"), None);
        assert_eq!(m.resolve(""), None);
    }

    #[test]
    fn completes_prefixes_in_order() {
        let m = matcher();
        assert_eq!(m.complete("ch", 5), vec!["chest_pain", "chills"]);
        assert_eq!(m.complete("ch", 1), vec!["chest_pain"]);
        assert!(m.complete("", 5).is_empty());
    }

    #[test]
    fn suggest_merges_without_duplicates() {
        let m = matcher();
        let suggestions = m.suggest("cough", 5);
        assert_eq!(suggestions[0], "cough");
        assert_eq!(suggestions.iter().filter(|s| **s == "cough").count(), 1);
    }
}
