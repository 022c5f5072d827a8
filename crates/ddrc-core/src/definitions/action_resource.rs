//! `ActionResourceDefinition`: action/bonus/reaction economy plus leveled
//! spell slots, each with a replenishment trigger (spec.md §3, §4.H).

use std::str::FromStr;

use crate::statblock::RawRecord;

use super::coerce::num_or_default;

/// When an action resource automatically refills. Matched against the
/// combat loop's own turn/rest events — `ddrc-core` only stores which
/// trigger applies, the embedding game drives when each trigger fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ReplenishTrigger {
    Turn,
    ShortRest,
    LongRest,
    Never,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionResourceDefinition {
    pub name: String,
    pub display_name: String,
    pub replenish_trigger: ReplenishTrigger,
    /// `0` for a flat (non-leveled) resource such as Action/BonusAction;
    /// `1..=9` for the highest spell level a leveled resource like
    /// `SpellSlot` tracks.
    pub max_level: u8,
    pub absolute_cap: Option<i32>,
    pub is_spell_resource: bool,
    pub is_party_wide: bool,
    pub is_hidden: bool,
}

impl ActionResourceDefinition {
    pub fn coerce(name: &str, record: &RawRecord) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let replenish_trigger = match record.get("ReplenishType") {
            None => ReplenishTrigger::Never,
            Some(raw) => ReplenishTrigger::from_str(raw.trim()).unwrap_or_else(|_| {
                warnings.push(format!("resource '{name}' has unrecognized ReplenishType '{raw}', defaulting to Never"));
                ReplenishTrigger::Never
            }),
        };

        let def = Self {
            name: name.to_string(),
            display_name: record.get("DisplayName").unwrap_or(name).to_string(),
            replenish_trigger,
            max_level: num_or_default(record, "MaxLevel", 0, &mut warnings).clamp(0, 9) as u8,
            absolute_cap: record.get("MaxValue").and_then(|v| v.trim().parse().ok()),
            is_spell_resource: num_or_default(record, "IsSpellResource", 0, &mut warnings) != 0,
            is_party_wide: num_or_default(record, "IsPartyWide", 0, &mut warnings) != 0,
            is_hidden: num_or_default(record, "Hidden", 0, &mut warnings) != 0,
        };
        (def, warnings)
    }
}
