//! Passive loader: reads `Passive.txt` into a [`Registry<PassiveDefinition>`].

use std::path::Path;

use ddrc_core::definitions::PassiveDefinition;
use ddrc_core::registry::Registry;
use ddrc_core::statblock;

use crate::LoadError;
use crate::loaders::{LoadResult, read_file};

pub struct PassiveLoader;

impl PassiveLoader {
    pub fn load(path: &Path) -> LoadResult<Registry<PassiveDefinition>> {
        let content = read_file(path)?;
        let outcome = statblock::read(&content);
        for warning in &outcome.warnings {
            tracing::warn!(path = %path.display(), %warning, "passive parse warning");
        }

        let built = Registry::build(outcome.records, |id, _kind, _parent, merged| PassiveDefinition::coerce(id, merged))
            .map_err(|e| LoadError::registry("passives", e))?;

        for warning in &built.warnings {
            tracing::debug!(%warning, "passive coercion warning");
        }
        Ok(built.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_toggled_passive_with_group() {
        let file = write_tmp(
            r#"
            new entry "GreatWeaponFighting"
            type "PassiveData"
            data "ToggledPassive" "1"
            data "ToggleGroup" "CombatStyle"
            data "Boosts" "RollBonus(Damage,1)"
            "#,
        );
        let registry = PassiveLoader::load(file.path()).unwrap();
        let def = registry.get("GreatWeaponFighting").unwrap();
        assert!(def.is_toggled);
        assert_eq!(def.toggle_group.as_deref(), Some("CombatStyle"));
    }
}
