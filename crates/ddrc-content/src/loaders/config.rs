//! Tunables loader: reads `config.toml` into [`DdrcConfig`], falling back
//! to its `Default` for any field the file omits.

use std::path::Path;

use ddrc_core::config::DdrcConfig;

use crate::loaders::{LoadResult, read_file};

/// Mirrors `config.toml`'s shape field-for-field; every field is optional
/// so a deployment's file only needs to override what it cares about.
#[derive(serde::Deserialize, Default)]
struct DdrcConfigFile {
    auto_miss_at_or_below: Option<u32>,
    auto_crit_at_or_above: Option<u32>,
    numeric_epsilon: Option<f64>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<DdrcConfig> {
        let content = read_file(path)?;
        let file: DdrcConfigFile = toml::from_str(&content)?;
        let defaults = DdrcConfig::default();
        Ok(DdrcConfig {
            auto_miss_at_or_below: file.auto_miss_at_or_below.unwrap_or(defaults.auto_miss_at_or_below),
            auto_crit_at_or_above: file.auto_crit_at_or_above.unwrap_or(defaults.auto_crit_at_or_above),
            numeric_epsilon: file.numeric_epsilon.unwrap_or(defaults.numeric_epsilon),
        })
    }
}
