//! Action-resource loader: reads the action-resource definitions file
//! (spec.md §6.4) into a [`Registry<ActionResourceDefinition>`] — Action,
//! BonusAction, Reaction, Movement, SpellSlot, and class-specific pools
//! all share this one file and format.

use std::path::Path;

use ddrc_core::definitions::ActionResourceDefinition;
use ddrc_core::registry::Registry;
use ddrc_core::statblock;

use crate::LoadError;
use crate::loaders::{LoadResult, read_file};

pub struct ActionResourceLoader;

impl ActionResourceLoader {
    pub fn load(path: &Path) -> LoadResult<Registry<ActionResourceDefinition>> {
        let content = read_file(path)?;
        let outcome = statblock::read(&content);
        for warning in &outcome.warnings {
            tracing::warn!(path = %path.display(), %warning, "action resource parse warning");
        }

        let built = Registry::build(outcome.records, |id, _kind, _parent, merged| ActionResourceDefinition::coerce(id, merged))
            .map_err(|e| LoadError::registry("action_resources", e))?;

        for warning in &built.warnings {
            tracing::debug!(%warning, "action resource coercion warning");
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
    fn loads_leveled_spell_slot_resource() {
        let file = write_tmp(
            r#"
            new entry "SpellSlot"
            data "ReplenishType" "LongRest"
            data "MaxLevel" "9"
            data "IsSpellResource" "1"
            "#,
        );
        let registry = ActionResourceLoader::load(file.path()).unwrap();
        let def = registry.get("SpellSlot").unwrap();
        assert_eq!(def.max_level, 9);
        assert!(def.is_spell_resource);
        assert_eq!(def.replenish_trigger, ddrc_core::definitions::ReplenishTrigger::LongRest);
    }
}
