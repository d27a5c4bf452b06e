//! Main module for zatlin library functionality
//!
//! The pipeline runs in dependency order:
//! source text -> [lexing] -> tokens -> [parsing] -> definitions + main pattern
//! -> [validation] -> [generator::Root] (only when no errors were recorded).
//! [processor] composes the stages behind the `Zatlin` facade.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formats;
pub mod generator;
pub mod lexing;
pub mod parsing;
pub mod processor;
pub mod testing;
pub mod token;
pub mod validation;
