//! Output formats for generated words, diagnostics and token dumps
//!
//! - `text`: one item per line, positions printed 1-based as `line:column`
//! - `json`: pretty-printed JSON with 0-based positions, as editors expect them
//! - `yaml`: same shape as JSON

use crate::zatlin::diagnostics::DiagnosticRecord;
use crate::zatlin::error::ZatlinError;
use crate::zatlin::token::Token;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = ZatlinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(ZatlinError::UnknownFormat(other.to_string())),
        }
    }
}

/// Generated words with the diagnostics of the program that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport<'a> {
    pub words: &'a [String],
    pub diagnostics: &'a [DiagnosticRecord],
}

pub fn render_words(
    words: &[String],
    diagnostics: &[DiagnosticRecord],
    format: OutputFormat,
) -> Result<String, ZatlinError> {
    let report = GenerationReport { words, diagnostics };
    match format {
        OutputFormat::Text => Ok(words.join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&report)?),
    }
}

pub fn render_diagnostics(
    diagnostics: &[DiagnosticRecord],
    format: OutputFormat,
) -> Result<String, ZatlinError> {
    match format {
        OutputFormat::Text => Ok(diagnostics
            .iter()
            .map(|d| {
                format!(
                    "{}:{}: {}: {}",
                    d.line + 1,
                    d.column + 1,
                    d.severity,
                    d.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(diagnostics)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(diagnostics)?),
    }
}

pub fn render_tokens(tokens: &[Token], format: OutputFormat) -> Result<String, ZatlinError> {
    match format {
        OutputFormat::Text => Ok(tokens
            .iter()
            .map(|t| {
                format!(
                    "{}:{} {} {:?}",
                    t.position.line + 1,
                    t.position.column + 1,
                    t.kind.name(),
                    t.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tokens)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(tokens)?),
    }
}
