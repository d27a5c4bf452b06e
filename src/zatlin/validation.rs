//! Semantic validation of a parsed program.
//!
//! Definitions form a graph: `A -> B` whenever a choice of `A` references `B`. A depth-first
//! walk starts at the main pattern and then again at every definition, so cycles are found
//! even among definitions the main pattern never reaches.
//!
//! Each node remembers the node it was entered from and the reference token used, which lets a
//! detected cycle be walked back edge by edge. Every edge of a cycle gets its own
//! "Circular reference" error. Nodes on a cycle are stamped with a cycle id; a later back edge
//! into a node that already carries the current id stops the walk, so one cycle is never
//! reported twice. When the walk leaves the node that entered the cycle, all its members are
//! marked done at once.
//!
//! References to undefined names are errors and are not followed. Definitions that are never
//! referenced produce warnings only.

use crate::zatlin::diagnostics::{Diagnostic, Diagnostics};
use crate::zatlin::generator::{CompiledGenerator, Definition, Definitions};
use crate::zatlin::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

#[derive(Debug, Clone)]
struct NodeState<'a> {
    visit: Visit,
    referred: bool,
    /// Node this one was entered from, `None` for the main pattern or a fresh start.
    previous: Option<usize>,
    /// Reference token that entered this node.
    via: Option<&'a Token>,
    cycle: Option<usize>,
}

impl Default for NodeState<'_> {
    fn default() -> Self {
        Self {
            visit: Visit::Unvisited,
            referred: false,
            previous: None,
            via: None,
            cycle: None,
        }
    }
}

/// Validate definitions and the main pattern, returning semantic errors and warnings.
pub fn validate(definitions: &Definitions, main: Option<&CompiledGenerator>) -> Diagnostics {
    let mut validator = Validator::new(definitions);
    validator.run(main);
    validator.diagnostics
}

struct Validator<'a> {
    definitions: &'a Definitions,
    entries: Vec<&'a Definition>,
    nodes: Vec<NodeState<'a>>,
    /// Members of each detected cycle, indexed by cycle id.
    cycles: Vec<Vec<usize>>,
    diagnostics: Diagnostics,
}

impl<'a> Validator<'a> {
    fn new(definitions: &'a Definitions) -> Self {
        let entries: Vec<&'a Definition> = definitions.iter().collect();
        let nodes = vec![NodeState::default(); definitions.len()];
        Self {
            definitions,
            entries,
            nodes,
            cycles: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn run(&mut self, main: Option<&'a CompiledGenerator>) {
        if let Some(main) = main {
            self.visit(main, None, None, None);
        }

        for index in 0..self.entries.len() {
            let entry = self.entries[index];
            self.nodes[index].previous = None;
            self.visit(&entry.generator, Some(index), None, None);
        }

        for (entry, node) in self.entries.iter().zip(&self.nodes) {
            if !node.referred {
                self.diagnostics
                    .warning(Diagnostic::new("Unused identifier", &entry.name));
            }
        }
    }

    fn visit(
        &mut self,
        generator: &'a CompiledGenerator,
        node: Option<usize>,
        previous: Option<usize>,
        via: Option<&'a Token>,
    ) {
        if let Some(index) = node {
            let state = &mut self.nodes[index];
            if state.visit == Visit::Done {
                return;
            }
            state.previous = previous;
            state.via = via;
            state.visit = Visit::InProgress;
        }

        for identifier in generator.referenced_identifiers() {
            let Some(next) = self.definitions.index_of(&identifier.text) else {
                self.diagnostics
                    .error(Diagnostic::new("Undefined identifier", identifier));
                continue;
            };
            self.nodes[next].referred = true;

            if self.nodes[next].visit == Visit::InProgress {
                self.close_cycle(node, next, identifier);
            } else {
                let entry = self.entries[next];
                self.visit(&entry.generator, Some(next), node, Some(identifier));
            }
        }

        let Some(index) = node else { return };
        match self.nodes[index].cycle {
            Some(cycle) => {
                // only the node that entered the cycle finishes it
                let entered_from_outside =
                    previous.map_or(true, |p| self.nodes[p].cycle != Some(cycle));
                if entered_from_outside {
                    for &member in &self.cycles[cycle] {
                        self.nodes[member].visit = Visit::Done;
                    }
                }
            }
            None => self.nodes[index].visit = Visit::Done,
        }
    }

    /// Reports the back edge `current -> next` and every edge on the path from `next` to
    /// `current`, stamping the nodes on the way with one cycle id.
    fn close_cycle(&mut self, current: Option<usize>, next: usize, closing: &'a Token) {
        self.diagnostics.error(Diagnostic::new(
            "Circular reference involving identifier",
            closing,
        ));

        let cycle = match self.nodes[next].cycle {
            Some(cycle) => cycle,
            None => {
                self.cycles.push(Vec::new());
                self.cycles.len() - 1
            }
        };
        tracing::trace!(
            closing = %closing.text,
            cycle,
            "circular reference detected"
        );

        let mut current = current;
        while let Some(index) = current {
            if self.nodes[index].cycle == Some(cycle) {
                break;
            }
            self.cycles[cycle].push(index);
            self.nodes[index].cycle = Some(cycle);
            if index == next {
                break;
            }
            if let Some(via) = self.nodes[index].via {
                self.diagnostics.error(Diagnostic::new(
                    "Circular reference involving identifier",
                    via,
                ));
            }
            current = self.nodes[index].previous;
        }
    }
}
