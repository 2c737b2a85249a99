use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StripError {
    #[error("could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: found marker `{found}` while section `{open}` is still open")]
    MalformedInput {
        line: usize,
        found: String,
        open: String,
    },

    #[error("line {line}: marker `{found}` appears after `{after}`, which is configured later")]
    OutOfOrder {
        line: usize,
        found: String,
        after: String,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),
}

impl StripError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
