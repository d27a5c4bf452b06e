//! Executable form of a zatlin program.
//!
//! A [`CompiledGenerator`] is a weighted selection of choices plus a list of exclusion
//! patterns. A [`Root`] maps definition names to generators and designates the main one.
//!
//! Identifier references are resolved through the root at expansion time, so definitions may
//! refer to each other in any order. Termination relies on validation: a `Root` is only built
//! for programs whose reference graph has no cycles.
//!
//! Randomness is injected through [`RandomSource`]. The generators hold no other state, so a
//! `Root` can be shared between threads as long as each caller brings its own source.

use crate::zatlin::token::{Token, TokenKind};
use indexmap::map::Entry;
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of candidates a generator draws before giving up on its exclusion patterns.
pub const MAX_ATTEMPTS: usize = 100;

/// Source of uniform random values in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// [`RandomSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        RngSource(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// One weighted alternative of a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Literal and identifier tokens, expanded left to right.
    pub sequence: Vec<Token>,
    pub weight: f64,
}

impl Choice {
    pub fn new(sequence: Vec<Token>, weight: f64) -> Self {
        Self { sequence, weight }
    }
}

/// An exclusion rule. `leading` anchors the literal at the start of the candidate and
/// `trailing` at its end.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub literal: Token,
    pub value: String,
    pub leading: bool,
    pub trailing: bool,
}

impl Pattern {
    pub fn new(literal: Token, value: String, leading: bool, trailing: bool) -> Self {
        Self {
            literal,
            value,
            leading,
            trailing,
        }
    }

    pub fn matches(&self, input: &str) -> bool {
        match (self.leading, self.trailing) {
            (true, true) => input == self.value,
            (true, false) => input.starts_with(&self.value),
            (false, true) => input.ends_with(&self.value),
            (false, false) => input.contains(&self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledGenerator {
    selection: Vec<Choice>,
    disjunction: Vec<Pattern>,
    total_weight: f64,
}

impl CompiledGenerator {
    pub fn new(selection: Vec<Choice>, disjunction: Vec<Pattern>) -> Self {
        let total_weight = selection.iter().map(|choice| choice.weight).sum();
        Self {
            selection,
            disjunction,
            total_weight,
        }
    }

    pub fn selection(&self) -> &[Choice] {
        &self.selection
    }

    pub fn disjunction(&self) -> &[Pattern] {
        &self.disjunction
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Every identifier token referenced by any choice, in declaration order.
    pub fn referenced_identifiers(&self) -> impl Iterator<Item = &Token> {
        self.selection
            .iter()
            .flat_map(|choice| choice.sequence.iter())
            .filter(|token| token.is_identifier())
    }

    /// Generates one string, retrying while the candidate matches an exclusion pattern.
    ///
    /// Returns an empty string once [`MAX_ATTEMPTS`] candidates have all been excluded. An
    /// empty result therefore also signals an over-constrained grammar.
    pub fn generate(&self, root: &Root, rng: &mut dyn RandomSource) -> String {
        for _ in 0..MAX_ATTEMPTS {
            let candidate = self.expand(root, rng);
            if !self.disjunction.iter().any(|pattern| pattern.matches(&candidate)) {
                return candidate;
            }
        }
        tracing::debug!(
            attempts = MAX_ATTEMPTS,
            "every candidate matched an exclusion pattern"
        );
        String::new()
    }

    /// Picks a choice by cumulative weight and expands it once.
    fn expand(&self, root: &Root, rng: &mut dyn RandomSource) -> String {
        let draw = rng.next_f64() * self.total_weight;
        let mut cumulative = 0.0;
        let mut output = String::new();

        let Some(choice) = self.selection.iter().find(|choice| {
            cumulative += choice.weight;
            draw < cumulative
        }) else {
            return output;
        };

        for token in &choice.sequence {
            match &token.kind {
                TokenKind::Literal(value) => output.push_str(value),
                TokenKind::Identifier => {
                    if let Some(generator) = root.definition(&token.text) {
                        output.push_str(&generator.generate(root, rng));
                    }
                }
                _ => {}
            }
        }
        output
    }
}

/// A named definition together with the token that declared it.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: Token,
    pub generator: CompiledGenerator,
}

/// Definitions in declaration order, with lookup by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    entries: IndexMap<String, Definition>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition unless the name is taken. Returns false for a duplicate, which is
    /// then discarded.
    pub fn insert(&mut self, name: Token, generator: CompiledGenerator) -> bool {
        match self.entries.entry(name.text.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Definition { name, generator });
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.entries.get(name)
    }

    /// Declaration index of a name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, Definition> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A validated, executable program.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    definitions: Definitions,
    main: CompiledGenerator,
}

impl Root {
    /// Only the compile pipeline builds roots, after validation found no errors.
    pub(crate) fn new(definitions: Definitions, main: CompiledGenerator) -> Self {
        Self { definitions, main }
    }

    pub fn generate(&self, rng: &mut dyn RandomSource) -> String {
        self.main.generate(self, rng)
    }

    pub fn definition(&self, name: &str) -> Option<&CompiledGenerator> {
        self.definitions.get(name).map(|d| &d.generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zatlin::testing::{ident, literal, ScriptedSource};

    fn choice(tokens: Vec<Token>, weight: f64) -> Choice {
        Choice::new(tokens, weight)
    }

    fn pattern(value: &str, leading: bool, trailing: bool) -> Pattern {
        Pattern::new(literal(value), value.to_string(), leading, trailing)
    }

    fn root_with_main(main: CompiledGenerator) -> Root {
        Root::new(Definitions::new(), main)
    }

    #[test]
    fn test_pattern_anchors() {
        assert!(pattern("ab", false, false).matches("cabd"));
        assert!(pattern("ab", true, false).matches("abd"));
        assert!(!pattern("ab", true, false).matches("cab"));
        assert!(pattern("ab", false, true).matches("cab"));
        assert!(!pattern("ab", false, true).matches("abc"));
        assert!(pattern("ab", true, true).matches("ab"));
        assert!(!pattern("ab", true, true).matches("abab"));
    }

    #[test]
    fn test_cumulative_weight_selection() {
        let main = CompiledGenerator::new(
            vec![
                choice(vec![literal("x")], 1.0),
                choice(vec![literal("y")], 3.0),
            ],
            vec![],
        );
        assert_eq!(main.total_weight(), 4.0);
        let root = root_with_main(main);

        // draws are scaled by the total weight: 0.2 * 4 = 0.8 < 1, 0.25 * 4 = 1.0 is not
        let mut rng = ScriptedSource::new(vec![0.2, 0.25, 0.99]);
        assert_eq!(root.generate(&mut rng), "x");
        assert_eq!(root.generate(&mut rng), "y");
        assert_eq!(root.generate(&mut rng), "y");
    }

    #[test]
    fn test_zero_weight_choice_is_never_picked() {
        let main = CompiledGenerator::new(
            vec![
                choice(vec![literal("never")], 0.0),
                choice(vec![literal("always")], 1.0),
            ],
            vec![],
        );
        let root = root_with_main(main);
        let mut rng = ScriptedSource::new(vec![0.0]);
        assert_eq!(root.generate(&mut rng), "always");
    }

    #[test]
    fn test_references_expand_through_root() {
        let mut definitions = Definitions::new();
        definitions.insert(
            ident("V"),
            CompiledGenerator::new(vec![choice(vec![literal("a")], 1.0)], vec![]),
        );
        let main = CompiledGenerator::new(
            vec![choice(vec![literal("k"), ident("V"), literal("n")], 1.0)],
            vec![],
        );
        let root = Root::new(definitions, main);
        let mut rng = ScriptedSource::new(vec![0.5]);
        assert_eq!(root.generate(&mut rng), "kan");
    }

    #[test]
    fn test_exclusion_retries_until_accepted() {
        let main = CompiledGenerator::new(
            vec![
                choice(vec![literal("x")], 1.0),
                choice(vec![literal("y")], 1.0),
            ],
            vec![pattern("x", true, true)],
        );
        let root = root_with_main(main);
        // first two candidates are "x", the third is "y"
        let mut rng = ScriptedSource::new(vec![0.1, 0.2, 0.7]);
        assert_eq!(root.generate(&mut rng), "y");
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn test_exhausted_retries_yield_empty_string() {
        let main = CompiledGenerator::new(
            vec![choice(vec![literal("x")], 1.0)],
            vec![pattern("x", false, false)],
        );
        let root = root_with_main(main);
        let mut rng = ScriptedSource::new(vec![0.5]);
        assert_eq!(root.generate(&mut rng), "");
        assert_eq!(rng.draws(), MAX_ATTEMPTS);
    }

    #[test]
    fn test_definitions_keep_declaration_order() {
        let mut definitions = Definitions::new();
        let empty = CompiledGenerator::new(vec![], vec![]);
        let first = CompiledGenerator::new(vec![choice(vec![literal("b")], 1.0)], vec![]);
        assert!(definitions.insert(ident("B"), first.clone()));
        assert!(definitions.insert(ident("A"), empty.clone()));
        assert!(!definitions.insert(ident("B"), empty));

        let names: Vec<&str> = definitions.iter().map(|d| d.name.text.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(definitions.index_of("A"), Some(1));
        assert_eq!(definitions.index_of("C"), None);
        assert_eq!(definitions.len(), 2);
        // the first declaration wins
        assert_eq!(definitions.get("B").map(|d| &d.generator), Some(&first));
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = RngSource::from_seed(7);
        let mut b = RngSource::from_seed(7);
        for _ in 0..10 {
            let value = a.next_f64();
            assert!((0.0..1.0).contains(&value));
            assert_eq!(value, b.next_f64());
        }
    }
}
