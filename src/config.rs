use crate::util::diff::{BuiltinDiff, DEFAULT_IGNORE_FIELDS, ExternalDiff, HeaderIgnore, RawDiff};
use anyhow::Context;
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub diff: DiffConfig,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_label")]
    pub label: String,
    /// Report file (.yml, .yaml, .json or .md); derived from CI_JOB_NAME when unset
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            output: None,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct DiffConfig {
    #[serde(default)]
    pub backend: DiffBackend,
    /// Program run by the external backend
    #[serde(default = "default_program")]
    pub program: String,
    /// Header fields excluded from the raw comparison
    #[serde(default = "default_ignore_fields")]
    pub ignore_fields: Vec<String>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            backend: DiffBackend::default(),
            program: default_program(),
            ignore_fields: default_ignore_fields(),
        }
    }
}

impl DiffConfig {
    pub fn build(&self) -> anyhow::Result<Box<dyn RawDiff>> {
        let ignore = HeaderIgnore::new(&self.ignore_fields)?;
        Ok(match self.backend {
            DiffBackend::Builtin => Box::new(BuiltinDiff::new(ignore)),
            DiffBackend::External => Box::new(ExternalDiff::new(self.program.clone(), ignore)),
        })
    }
}

/// Raw diff implementation
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiffBackend {
    /// Compare in process
    #[default]
    Builtin,
    /// Run an external `diff -I` program
    External,
}

fn default_label() -> String {
    "Lint summary".to_string()
}

fn default_program() -> String {
    "diff".to_string()
}

fn default_ignore_fields() -> Vec<String> {
    DEFAULT_IGNORE_FIELDS.iter().map(|s| s.to_string()).collect()
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path))?;
        let config =
            toml::from_str(&content).with_context(|| format!("Failed to parse config {}", path))?;
        Ok(config)
    }
}
