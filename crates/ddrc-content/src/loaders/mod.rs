//! Content loaders: read the known relative file layout (SPEC_FULL.md §7)
//! from a directory into `ddrc-core`'s raw text reader, then hand the
//! parsed records to [`ddrc_core::registry::Registry::build`].
//!
//! Mirrors the teacher's `loaders` module shape: one loader struct per
//! content kind, a shared `read_file` helper, a `LoadResult` alias.

pub mod action_resources;
pub mod config;
pub mod factory;
pub mod passives;
pub mod stat_blocks;
pub mod statuses;

pub use action_resources::ActionResourceLoader;
pub use config::ConfigLoader;
pub use factory::{ContentFactory, Ruleset, load_ruleset};
pub use passives::PassiveLoader;
pub use stat_blocks::StatBlockLoader;
pub use statuses::StatusLoader;

use std::path::{Path, PathBuf};

use crate::LoadError;

/// Common result type for loaders.
pub type LoadResult<T> = Result<T, LoadError>;

/// Reads a file's contents, wrapping the I/O error with the offending
/// path — the same role `loaders::read_file` plays in the teacher crate.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}

/// Lists files directly under `dir` whose name matches `prefix*.txt`, in
/// sorted order — used for `Status_*.txt`, since status definitions are
/// split across one file per status family rather than a single file.
pub(crate) fn glob_txt(dir: &Path, prefix: &str) -> LoadResult<Vec<PathBuf>> {
    let mut matches = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io { path: dir.to_path_buf(), source })?;
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io { path: dir.to_path_buf(), source })?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        if name.starts_with(prefix) && name.ends_with(".txt") {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches)
}
