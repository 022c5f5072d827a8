//! `PassiveDefinition`: like a status but permanent and duration-less —
//! the same boost + functor machinery, grants from class/equipment
//! rather than applications (spec.md §3, Glossary "Passive").

use crate::statblock::RawRecord;

use super::coerce::num_or_default;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassiveDefinition {
    pub id: String,
    pub display_name: String,
    pub boosts: String,
    pub is_toggled: bool,
    pub is_hidden: bool,
    pub is_highlighted: bool,
    pub toggle_group: Option<String>,
    /// Functor string fired on the passive's event hook (e.g. on-turn, on
    /// taking damage) — the precise trigger is named by the source data
    /// and passed through opaquely; the status runtime's event dispatch
    /// decides when to invoke it.
    pub on_event: Option<String>,
}

impl PassiveDefinition {
    pub fn coerce(id: &str, record: &RawRecord) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let def = Self {
            id: id.to_string(),
            display_name: record.get("DisplayName").unwrap_or(id).to_string(),
            boosts: record.get("Boosts").unwrap_or_default().to_string(),
            is_toggled: num_or_default(record, "ToggledPassive", 0, &mut warnings) != 0,
            is_hidden: num_or_default(record, "Hidden", 0, &mut warnings) != 0,
            is_highlighted: num_or_default(record, "Highlighted", 0, &mut warnings) != 0,
            toggle_group: record.get("ToggleGroup").map(str::to_string),
            on_event: record.get("OnEventFunctors").map(str::to_string),
        };
        (def, warnings)
    }
}
