//! Stat-block loader: reads `Character.txt`, `Weapon.txt`, `Armor.txt`,
//! and `Object.txt` into a single [`Registry<StatBlock>`] — all four
//! share one namespace because a weapon or armor record's `using` chain
//! is free to reach into `Object.txt`'s base entries (spec.md §4.B).

use std::path::Path;

use ddrc_core::definitions::StatBlock;
use ddrc_core::registry::Registry;
use ddrc_core::statblock;

use crate::LoadError;
use crate::loaders::{LoadResult, read_file};

pub struct StatBlockLoader;

impl StatBlockLoader {
    /// Reads every path in `paths` (in order) and builds one combined
    /// registry. Per-file parse warnings and per-record coercion warnings
    /// are logged at `warn`/`debug` rather than failing the load — only an
    /// inheritance cycle across the combined record set is fatal.
    pub fn load(paths: &[&Path]) -> LoadResult<Registry<StatBlock>> {
        let mut records = Vec::new();
        for path in paths {
            let content = read_file(path)?;
            let outcome = statblock::read(&content);
            for warning in &outcome.warnings {
                tracing::warn!(path = %path.display(), %warning, "stat-block parse warning");
            }
            records.extend(outcome.records);
        }

        let outcome = Registry::build(records, |id, kind, parent, merged| {
            let (sb, warnings) = StatBlock::coerce(id, kind, parent, merged);
            (sb, warnings)
        })
        .map_err(|e| LoadError::registry("stat_blocks", e))?;

        for warning in &outcome.warnings {
            tracing::debug!(%warning, "stat-block coercion warning");
        }
        Ok(outcome.registry)
    }
}
