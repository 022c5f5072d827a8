//! Status loader: reads every `Status_*.txt` file in a directory (the
//! source splits status families across multiple files rather than one
//! `Status.txt`, spec.md §6.4) into a single [`Registry<StatusDefinition>`].

use std::path::Path;

use ddrc_core::definitions::StatusDefinition;
use ddrc_core::registry::Registry;
use ddrc_core::statblock;

use crate::LoadError;
use crate::loaders::{LoadResult, glob_txt, read_file};

pub struct StatusLoader;

impl StatusLoader {
    /// Reads every `Status_*.txt` under `dir`, in sorted filename order.
    pub fn load(dir: &Path) -> LoadResult<Registry<StatusDefinition>> {
        let mut records = Vec::new();
        for path in glob_txt(dir, "Status_")? {
            let content = read_file(&path)?;
            let outcome = statblock::read(&content);
            for warning in &outcome.warnings {
                tracing::warn!(path = %path.display(), %warning, "status parse warning");
            }
            records.extend(outcome.records);
        }

        let outcome = Registry::build(records, |id, _kind, _parent, merged| StatusDefinition::coerce(id, merged))
            .map_err(|e| LoadError::registry("statuses", e))?;

        for warning in &outcome.warnings {
            tracing::debug!(%warning, "status coercion warning");
        }
        Ok(outcome.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_named(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_across_multiple_status_files() {
        let dir = tempfile::tempdir().unwrap();
        write_named(
            dir.path(),
            "Status_Boost.txt",
            r#"
            new entry "BLESS"
            type "StatusData"
            data "StatusType" "Boost"
            data "Duration" "10"
            data "Boosts" "RollBonus(Attack,1d4);RollBonus(SavingThrow,1d4)"
            "#,
        );
        write_named(
            dir.path(),
            "Status_Incapacitated.txt",
            r#"
            new entry "DOWNED"
            type "StatusData"
            data "StatusType" "Incapacitated"
            data "Duration" "-1"
            "#,
        );
        // An unrelated file must not be picked up by the glob.
        write_named(dir.path(), "Character.txt", r#"new entry "Ignored""#);

        let registry = StatusLoader::load(dir.path()).unwrap();
        assert!(registry.contains("BLESS"));
        assert!(registry.contains("DOWNED"));
        assert!(!registry.contains("Ignored"));
        assert_eq!(registry.len(), 2);
    }
}
