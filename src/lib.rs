//! # zatlin
//!
//! An interpreter for the zatlin grammar language, used to generate pseudo-words for constructed
//! languages. A zatlin source declares weighted pattern definitions, one main pattern and
//! exclusion rules:
//!
//! ```text
//! V = "a" 3 | "e" 2 | "i"
//! C = "s" | "t" | "k" | "n"
//! % C V | C V C - "nn" | ^"t"
//! ```
//!
//! See [`Zatlin`] for the load / generate surface and the [`zatlin`] module for the compiler
//! stages behind it.

pub mod zatlin;

pub use zatlin::diagnostics::{Diagnostic, Severity};
pub use zatlin::error::ZatlinError;
pub use zatlin::generator::{RandomSource, RngSource, Root};
pub use zatlin::processor::Zatlin;
