//! Optional YAML configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use gp_generate::GridSpec;

/// Settings that command-line flags may override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Registry directories, searched in order; the first receives installs.
    pub data_paths: Vec<PathBuf>,
    /// Where new sets are written before installation.
    pub work_dir: Option<PathBuf>,
    /// Nodes for synthetic parents.
    pub grid: GridSpec,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml_ng::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.grid.validate()?;
        Ok(config)
    }
}
