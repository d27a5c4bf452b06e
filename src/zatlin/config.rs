//! Configuration for the zatlin tool.
//!
//! Layers, lowest first:
//! 1. `defaults/zatlin.default.toml`, embedded into the binary
//! 2. a `zatlin.toml` next to the source being processed, if there is one
//! 3. a file named with `--config`, which must exist
//! 4. command line flags, see [`Overrides`]

use crate::zatlin::error::ZatlinError;
use crate::zatlin::formats::OutputFormat;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/zatlin.default.toml");

/// File name picked up from the directory of a source.
pub const PROJECT_FILE: &str = "zatlin.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ZatlinConfig {
    pub generate: GenerateConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateConfig {
    /// Words per run.
    pub count: usize,
    /// Suppress duplicate words within one run.
    pub unique: bool,
    /// Tries per word before a unique run gives up.
    pub unique_attempts: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub show_warnings: bool,
}

impl OutputConfig {
    pub fn format(&self) -> Result<OutputFormat, ZatlinError> {
        self.format.parse()
    }
}

/// Settings taken from command line flags. `None` and `false` leave the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub count: Option<u64>,
    pub unique: bool,
    pub seed: Option<u64>,
    pub format: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// A loader holding only the embedded defaults.
    pub fn from_defaults() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layers the [`PROJECT_FILE`] found beside `source`, when present.
    pub fn with_project_file(mut self, source: impl AsRef<Path>) -> Self {
        let directory = source.as_ref().parent().unwrap_or_else(|| Path::new(""));
        let project = directory.join(PROJECT_FILE);
        tracing::debug!(path = %project.display(), "looking for project configuration");
        self.builder = self.builder.add_source(
            File::from(project)
                .format(FileFormat::Toml)
                .required(false),
        );
        self
    }

    /// Layers an explicit configuration file. A missing file fails at [`build`](Self::build).
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self.builder.add_source(
            File::from(path.as_ref())
                .format(FileFormat::Toml)
                .required(true),
        );
        self
    }

    pub fn with_overrides(self, overrides: &Overrides) -> Result<Self, ZatlinError> {
        let mut loader = self;
        if let Some(count) = overrides.count {
            loader = loader.set("generate.count", count)?;
        }
        if overrides.unique {
            loader = loader.set("generate.unique", true)?;
        }
        if let Some(seed) = overrides.seed {
            loader = loader.set("generate.seed", seed)?;
        }
        if let Some(format) = &overrides.format {
            loader = loader.set("output.format", format.as_str())?;
        }
        Ok(loader)
    }

    fn set(mut self, key: &str, value: impl Into<ValueKind>) -> Result<Self, ZatlinError> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ZatlinConfig, ZatlinError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}
