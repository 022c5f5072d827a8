//! Content factory: assembles every definition registry from the known
//! relative paths under a data directory (spec.md §6.4) into one
//! [`Ruleset`], the frozen, read-only snapshot the embedding game loads
//! once at process start (spec.md §3 "Definitions ... loaded at process
//! start, read-only thereafter").

use std::path::{Path, PathBuf};

use ddrc_core::config::DdrcConfig;
use ddrc_core::definitions::{ActionResourceDefinition, PassiveDefinition, StatBlock, StatusDefinition};
use ddrc_core::registry::Registry;

use crate::loaders::{ActionResourceLoader, ConfigLoader, LoadResult, PassiveLoader, StatBlockLoader, StatusLoader};

/// Every definition registry the rules core needs, loaded once and shared
/// read-only for the lifetime of the process (spec.md §3 lifecycle,
/// invariant 5 "complete before any runtime query runs").
pub struct Ruleset {
    pub stat_blocks: Registry<StatBlock>,
    pub statuses: Registry<StatusDefinition>,
    pub passives: Registry<PassiveDefinition>,
    pub action_resources: Registry<ActionResourceDefinition>,
    pub config: DdrcConfig,
}

/// Points at a directory containing the files named in spec.md §6.4
/// (`Character.txt`, `Weapon.txt`, `Armor.txt`, `Object.txt`,
/// `Status_*.txt`, `Passive.txt`, an action-resource file, `config.toml`)
/// and builds a [`Ruleset`] from them.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads `Character.txt`, `Weapon.txt`, `Armor.txt`, and `Object.txt`
    /// as one combined registry (spec.md §4.B: weapons/armors may inherit
    /// from `Object.txt`'s base entries).
    pub fn load_stat_blocks(&self) -> LoadResult<Registry<StatBlock>> {
        let paths = ["Character.txt", "Weapon.txt", "Armor.txt", "Object.txt"].map(|name| self.data_dir.join(name));
        StatBlockLoader::load(&paths.iter().map(PathBuf::as_path).collect::<Vec<_>>())
    }

    /// Loads every `Status_*.txt` file under the data directory.
    pub fn load_statuses(&self) -> LoadResult<Registry<StatusDefinition>> {
        StatusLoader::load(&self.data_dir)
    }

    /// Loads `Passive.txt`.
    pub fn load_passives(&self) -> LoadResult<Registry<PassiveDefinition>> {
        PassiveLoader::load(&self.data_dir.join("Passive.txt"))
    }

    /// Loads the action-resource definitions file.
    pub fn load_action_resources(&self) -> LoadResult<Registry<ActionResourceDefinition>> {
        ActionResourceLoader::load(&self.data_dir.join("ActionResourceDefinitions.txt"))
    }

    /// Loads `config.toml`.
    pub fn load_config(&self) -> LoadResult<DdrcConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Loads every registry and assembles the [`Ruleset`]. Individual
    /// registries degrade gracefully on malformed data (spec.md §7); only
    /// a missing file or an inheritance cycle surfaces as `Err` here.
    pub fn load_ruleset(&self) -> LoadResult<Ruleset> {
        Ok(Ruleset {
            stat_blocks: self.load_stat_blocks()?,
            statuses: self.load_statuses()?,
            passives: self.load_passives()?,
            action_resources: self.load_action_resources()?,
            config: self.load_config()?,
        })
    }
}

/// Convenience entry point (spec.md §6.1 `load(path) -> registry`):
/// `ContentFactory::new(path).load_ruleset()`.
pub fn load_ruleset(data_dir: impl Into<PathBuf>) -> LoadResult<Ruleset> {
    ContentFactory::new(data_dir).load_ruleset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_a_full_ruleset_from_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "Character.txt",
            r#"
            new entry "Fighter_Base"
            type "Character"
            data "Strength" "16"
            data "ArmorClass" "10"
            "#,
        );
        write(dir.path(), "Weapon.txt", "");
        write(
            dir.path(),
            "Armor.txt",
            r#"
            new entry "Plate"
            type "Armor"
            data "ArmorClass" "16"
            data "ArmorClassAbilityCap" "0"
            data "Boosts" "AC(2)"
            "#,
        );
        write(dir.path(), "Object.txt", "");
        write(
            dir.path(),
            "Status_Boost.txt",
            r#"
            new entry "BLESS"
            data "Duration" "10"
            "#,
        );
        write(
            dir.path(),
            "Passive.txt",
            r#"
            new entry "SneakAttack"
            data "Boosts" "DamageBonus(2d6, Piercing)"
            "#,
        );
        write(
            dir.path(),
            "ActionResourceDefinitions.txt",
            r#"
            new entry "SpellSlot"
            data "ReplenishType" "LongRest"
            data "MaxLevel" "9"
            "#,
        );
        write(dir.path(), "config.toml", "auto_crit_at_or_above = 19");

        let ruleset = load_ruleset(dir.path()).unwrap();
        assert!(ruleset.stat_blocks.contains("Fighter_Base"));
        assert!(ruleset.stat_blocks.contains("Plate"));
        assert!(ruleset.statuses.contains("BLESS"));
        assert!(ruleset.passives.contains("SneakAttack"));
        assert!(ruleset.action_resources.contains("SpellSlot"));
        assert_eq!(ruleset.config.auto_crit_at_or_above, 19);

        let sneak_attack = ruleset.passives.get("SneakAttack").unwrap();
        let boosts = ddrc_core::boost::parse_boosts(&sneak_attack.boosts);
        assert!(
            boosts.iter().all(|t| !matches!(t.value, ddrc_core::boost::BoostValue::Unrecognized(..))),
            "SneakAttack's Boosts field should parse cleanly, got {:?}",
            boosts.iter().map(|t| &t.value).collect::<Vec<_>>()
        );
    }

    #[test]
    fn missing_file_surfaces_as_load_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_ruleset(dir.path()).is_err());
    }
}
