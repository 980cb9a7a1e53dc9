// File: src/fuzzy/symspell.rs
use std::collections::{HashMap, HashSet};

/// Index of a word inside the dictionary that owns this SymSpell.
pub type WordId = usize;

/// Fuzzy lookup based on the Symmetric Delete (SymSpell) algorithm.
/// Every word's deletes up to `max_edit_distance` are precomputed, so a
/// lookup only generates the deletes of the input.
#[derive(Debug, Clone)]
pub struct SymSpell {
    /// Maps a delete variant (e.g. "runy_nose") to the words it came from.
    deletes: HashMap<String, HashSet<WordId>>,
    max_edit_distance: usize,
}

impl SymSpell {
    pub fn new(max_edit_distance: usize) -> Self {
        Self {
            deletes: HashMap::new(),
            max_edit_distance,
        }
    }

    pub fn add_word(&mut self, word: &str, word_id: WordId) {
        for edit in self.generate_edits(word) {
            self.deletes.entry(edit).or_default().insert(word_id);
        }
    }

    /// Candidate words sharing a delete variant with `input`. Candidates
    /// can be up to twice `max_edit_distance` away; callers rank them.
    pub fn lookup(&self, input: &str) -> HashSet<WordId> {
        let mut candidates = HashSet::new();
        for edit in self.generate_edits(input) {
            if let Some(word_ids) = self.deletes.get(&edit) {
                candidates.extend(word_ids.iter().copied());
            }
        }
        candidates
    }

    /// All variants within `max_edit_distance` deletions, including the
    /// word itself. Works on chars so multi-byte input never splits.
    fn generate_edits(&self, word: &str) -> HashSet<String> {
        let mut edits = HashSet::new();
        edits.insert(word.to_string());

        let mut current: Vec<Vec<char>> = vec![word.chars().collect()];
        for _ in 0..self.max_edit_distance {
            let mut next = Vec::new();
            for chars in &current {
                for i in 0..chars.len() {
                    let mut variant = chars.clone();
                    variant.remove(i);
                    if edits.insert(variant.iter().collect()) {
                        next.push(variant);
                    }
                }
            }
            current = next;
        }
        edits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_deletion() {
        let mut spell = SymSpell::new(2);
        spell.add_word("runny_nose", 0);
        spell.add_word("rash", 1);
        assert!(spell.lookup("runy_nose").contains(&0));
        assert!(!spell.lookup("runy_nose").contains(&1));
    }

    #[test]
    fn finds_transposition_within_two_edits() {
        let mut spell = SymSpell::new(2);
        spell.add_word("fever", 3);
        assert!(spell.lookup("fveer").contains(&3));
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        let mut spell = SymSpell::new(2);
        spell.add_word("fièvre", 0);
        assert!(spell.lookup("fivre").contains(&0));
        assert!(spell.lookup("ñ").is_empty());
    }
}
