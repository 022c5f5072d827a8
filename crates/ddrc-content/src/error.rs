//! Errors raised while reading the known relative paths (SPEC_FULL.md §7)
//! into a [`crate::loaders::Ruleset`]. Unlike most of `ddrc-core`, I/O
//! genuinely can fail here — a missing `Character.txt` is a programmer/
//! deployment misconfiguration, not malformed game data, so it propagates
//! as `Err` rather than degrading to a warning.

use std::path::PathBuf;

use ddrc_core::error::{ErrorSeverity, GameError};
use ddrc_core::registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("{kind} registry: {source}")]
    Registry { kind: String, source: RegistryError },

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoadError {
    pub(crate) fn registry(kind: &str, source: RegistryError) -> Self {
        Self::Registry { kind: kind.to_string(), source }
    }
}

impl GameError for LoadError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io { .. } => ErrorSeverity::Fatal,
            Self::Registry { .. } => ErrorSeverity::Validation,
            Self::Config(_) => ErrorSeverity::Validation,
            Self::Other(_) => ErrorSeverity::Internal,
        }
    }
}
