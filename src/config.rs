//! Boundary table and target file resolution.
//!
//! An explicit `--config` file wins, then a `sectionstrip.toml` in the working
//! directory, then the built-in knowledge-base table.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    boundary::{self, Boundary, Policy},
    error::StripError,
};

pub const DEFAULT_CONFIG: &str = "sectionstrip.toml";
pub const DEFAULT_TARGET: &str = "src/components/admin/knowledge-base.tsx";

#[derive(Debug, Deserialize)]
pub struct Config {
    /// File to strip when none is given on the command line.
    pub path: Option<PathBuf>,
    pub boundaries: Vec<Boundary>,
}

impl Config {
    pub fn builtin(policy: Policy) -> Self {
        Self {
            path: None,
            boundaries: boundary::with_policy(policy),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, StripError> {
        let contents = fs::read_to_string(path).map_err(|e| StripError::io(path, e))?;
        let config: Self = toml::from_str(&contents).map_err(|source| StripError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        boundary::validate(&config.boundaries)?;
        Ok(config)
    }

    pub fn load(explicit: Option<&Path>, policy: Policy) -> Result<Self, StripError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let local = Path::new(DEFAULT_CONFIG);
        if local.is_file() {
            log::debug!("using boundaries from {}", local.display());
            return Self::from_file(local);
        }
        Ok(Self::builtin(policy))
    }

    /// The file to operate on: command line, then config, then the default target.
    pub fn target(&self, cli_path: Option<PathBuf>) -> PathBuf {
        cli_path
            .or_else(|| self.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET))
    }
}
