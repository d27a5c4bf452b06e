//! Load / generate API for zatlin sources
//!
//! [`compile`] runs the whole pipeline over a source and returns its diagnostics together with
//! a [`Root`] when, and only when, no error was recorded. [`Zatlin`] wraps that in the stateful
//! surface hosts use:
//!
//! ```rust,ignore
//! use zatlin::Zatlin;
//!
//! let mut zatlin = Zatlin::with_seed(42);
//! zatlin.load("V = \"a\" | \"i\"\nC = \"k\" | \"t\"\n% C V | C V C V\n");
//! assert!(zatlin.is_available());
//! let word = zatlin.generate();
//! ```
//!
//! `generate` returns an empty string when nothing is loaded, and also when the main pattern's
//! exclusion rules rejected every candidate. Both are valid outcomes, not failures.

use crate::zatlin::diagnostics::{Diagnostic, DiagnosticRecord, Diagnostics};
use crate::zatlin::error::ZatlinError;
use crate::zatlin::generator::{RandomSource, RngSource, Root};
use crate::zatlin::lexing::tokenize;
use crate::zatlin::parsing::parse;
use crate::zatlin::validation::validate;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Result of compiling one source.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub root: Option<Root>,
    pub diagnostics: Diagnostics,
}

/// Lex, parse and validate `source`.
///
/// Diagnostics are ordered by stage: lexical, then syntax, then semantic.
pub fn compile(source: &str) -> Compilation {
    let lexed = tokenize(source);
    let program = parse(&lexed.tokens);
    let definition_count = program.definitions.len();

    let mut diagnostics = lexed.diagnostics;
    diagnostics.extend(program.diagnostics);
    diagnostics.extend(validate(&program.definitions, program.main.as_ref()));

    let root = match program.main {
        Some(main) if !diagnostics.has_errors() => Some(Root::new(program.definitions, main)),
        _ => None,
    };

    tracing::debug!(
        tokens = lexed.tokens.len(),
        definitions = definition_count,
        errors = diagnostics.errors.len(),
        warnings = diagnostics.warnings.len(),
        available = root.is_some(),
        "compiled zatlin source"
    );

    Compilation { root, diagnostics }
}

/// A loaded zatlin program with its own random source.
pub struct Zatlin {
    root: Option<Root>,
    diagnostics: Diagnostics,
    rng: Box<dyn RandomSource + Send>,
}

impl Zatlin {
    /// An empty instance drawing from an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_random_source(RngSource::from_entropy())
    }

    /// An empty instance whose output is reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_random_source(RngSource::from_seed(seed))
    }

    pub fn with_random_source(rng: impl RandomSource + Send + 'static) -> Self {
        Self {
            root: None,
            diagnostics: Diagnostics::new(),
            rng: Box::new(rng),
        }
    }

    /// Compiles `source`, replacing the previous program and diagnostics. Never fails: check
    /// [`is_available`](Self::is_available) and [`errors`](Self::errors) afterwards.
    pub fn load(&mut self, source: &str) {
        let compilation = compile(source);
        self.root = compilation.root;
        self.diagnostics = compilation.diagnostics;
    }

    /// Reads and loads a source file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), ZatlinError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ZatlinError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.load(&source);
        Ok(())
    }

    /// True when the last load produced a runnable program.
    pub fn is_available(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&Root> {
        self.root.as_ref()
    }

    /// Generates one word, or an empty string if nothing is loaded.
    pub fn generate(&mut self) -> String {
        match &self.root {
            Some(root) => root.generate(self.rng.as_mut()),
            None => String::new(),
        }
    }

    /// Like [`generate`](Self::generate) with a caller-supplied random source.
    pub fn generate_with(&self, rng: &mut dyn RandomSource) -> String {
        match &self.root {
            Some(root) => root.generate(rng),
            None => String::new(),
        }
    }

    /// Generates up to `count` words.
    ///
    /// With `unique`, each word gets up to `unique_attempts` tries to differ from the words
    /// already produced. The batch stops early at the first word that cannot be made unique,
    /// so it may be shorter than `count`.
    pub fn generate_batch(
        &mut self,
        count: usize,
        unique: bool,
        unique_attempts: usize,
    ) -> Vec<String> {
        let mut words = Vec::with_capacity(count);
        if !self.is_available() {
            return words;
        }

        let mut seen = HashSet::new();
        for _ in 0..count {
            if !unique {
                words.push(self.generate());
                continue;
            }

            let fresh = (0..unique_attempts)
                .map(|_| self.generate())
                .find(|word| !seen.contains(word));
            match fresh {
                Some(word) => {
                    seen.insert(word.clone());
                    words.push(word);
                }
                None => {
                    tracing::debug!(
                        produced = words.len(),
                        requested = count,
                        "no new unique word, stopping batch"
                    );
                    break;
                }
            }
        }
        words
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.diagnostics.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.diagnostics.warnings
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Errors then warnings as flat records for export.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.diagnostics.records()
    }
}

impl Default for Zatlin {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Zatlin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zatlin")
            .field("available", &self.is_available())
            .field("errors", &self.diagnostics.errors.len())
            .field("warnings", &self.diagnostics.warnings.len())
            .finish()
    }
}
