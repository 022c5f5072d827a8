//! `StatBlock`: characters, weapons, armor, and objects all share one
//! flat, data-only record (spec.md §9: "re-architect as data-only
//! resolution, no runtime virtual dispatch"). The field set is a superset
//! covering every kind; fields that don't apply to a given kind are left
//! at their default rather than modeled as kind-specific subtypes, which
//! mirrors how the source data itself overlays the same `data "Key"
//! "Value"` lines across all four kinds.

use std::str::FromStr;

use crate::dice::{self, DiceExpr};
use crate::statblock::RawRecord;
use crate::types::{DamageType, ResistanceLevel};

use super::coerce::{num_or_default, semicolon_list};

/// Which of the four stat-block kinds a record belongs to. An unrecognized
/// `type "..."` line becomes `Other` rather than rejecting the record —
/// the reader that produced it already warned about the overlay, this is
/// one layer further down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum StatBlockKind {
    Character,
    Weapon,
    Armor,
    Object,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self { strength: 10, dexterity: 10, constitution: 10, intelligence: 10, wisdom: 10, charisma: 10 }
    }
}

impl AbilityScores {
    /// Standard d20-system modifier: `floor((score - 10) / 2)`.
    pub fn modifier(score: i32) -> i32 {
        (score - 10).div_euclid(2)
    }

    pub fn get(&self, ability: &str) -> Option<i32> {
        match ability.to_ascii_lowercase().as_str() {
            "strength" | "str" => Some(self.strength),
            "dexterity" | "dex" => Some(self.dexterity),
            "constitution" | "con" => Some(self.constitution),
            "intelligence" | "int" => Some(self.intelligence),
            "wisdom" | "wis" => Some(self.wisdom),
            "charisma" | "cha" => Some(self.charisma),
            _ => None,
        }
    }
}

/// The flat, fully-resolved record for a character, weapon, armor, or
/// object entry. Produced by [`crate::registry::Registry`] after
/// inheritance resolution (parent fields folded in first, child's
/// overriding) and per-field coercion.
#[derive(Clone, Debug)]
pub struct StatBlock {
    pub id: String,
    pub parent_id: Option<String>,
    pub kind: StatBlockKind,
    pub abilities: AbilityScores,
    /// Base armor class before any boost aggregation.
    pub armor_class: i32,
    /// Armor's cap on how much of the wearer's ability modifier applies
    /// to AC (e.g. heavy armor caps it at 0, medium at 2). `None` means
    /// uncapped (light armor, no-armor baseline).
    pub armor_class_ability_cap: Option<i32>,
    pub armor_class_ability: String,
    /// Max hit points for a character, or a weapon/armor/object's own
    /// destructible vitality.
    pub vitality: i32,
    pub resistances: Vec<(DamageType, ResistanceLevel)>,
    /// Action-resource ids this stat block grants on acquisition, e.g.
    /// class levels granting extra spell slots.
    pub granted_action_resources: Vec<String>,
    pub passives: Vec<String>,
    /// Weapon/object base damage, if any.
    pub damage: Option<DiceExpr>,
    pub damage_type: Option<DamageType>,
    pub weapon_properties: Vec<String>,
    pub proficiency_groups: Vec<String>,
    /// The raw `Boosts` field, kept unparsed here: boost terms need their
    /// own `IF(...)` conditions compiled, which the registry does lazily
    /// per-term rather than duplicating condition storage in every
    /// `StatBlock`.
    pub boosts: String,
}

impl StatBlock {
    /// Builds a `StatBlock` from an already inheritance-merged field map
    /// (parent fields overlaid by the child's own, per spec.md §4.B step
    /// 2). Never fails: malformed fields degrade to defaults and are
    /// reported as warnings.
    pub fn coerce(id: &str, kind_hint: Option<&str>, parent_id: Option<&str>, record: &RawRecord) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let kind = kind_hint
            .and_then(|k| StatBlockKind::from_str(k).ok())
            .unwrap_or_else(|| {
                if kind_hint.is_some() {
                    warnings.push(format!("unrecognized stat-block kind '{}', defaulting to Character", kind_hint.unwrap()));
                }
                StatBlockKind::Character
            });

        let abilities = AbilityScores {
            strength: num_or_default(record, "Strength", 10, &mut warnings),
            dexterity: num_or_default(record, "Dexterity", 10, &mut warnings),
            constitution: num_or_default(record, "Constitution", 10, &mut warnings),
            intelligence: num_or_default(record, "Intelligence", 10, &mut warnings),
            wisdom: num_or_default(record, "Wisdom", 10, &mut warnings),
            charisma: num_or_default(record, "Charisma", 10, &mut warnings),
        };

        let damage = record.get("Damage").and_then(dice::parse_dice);
        if record.get("Damage").is_some() && damage.is_none() {
            warnings.push(format!("field 'Damage' = '{}' is not a valid dice expression", record.get("Damage").unwrap()));
        }
        let damage_type = super::coerce::parse_enum(record, "DamageType", &mut warnings);

        let resistances = semicolon_list(record, "Resistances")
            .into_iter()
            .filter_map(|entry| {
                let (dmg, level) = entry.split_once(':')?;
                let dmg = DamageType::from_str(dmg.trim()).ok()?;
                let level = match level.trim().to_ascii_lowercase().as_str() {
                    "resistant" => ResistanceLevel::Resistant,
                    "vulnerable" => ResistanceLevel::Vulnerable,
                    "immune" => ResistanceLevel::Immune,
                    _ => return None,
                };
                Some((dmg, level))
            })
            .collect();

        let stat_block = Self {
            id: id.to_string(),
            parent_id: parent_id.map(str::to_string),
            kind,
            abilities,
            armor_class: num_or_default(record, "ArmorClass", 10, &mut warnings),
            armor_class_ability_cap: record.get("ArmorClassAbilityCap").and_then(|v| v.trim().parse().ok()),
            armor_class_ability: record.get("ArmorClassAbility").unwrap_or("Dexterity").to_string(),
            vitality: num_or_default(record, "Vitality", 0, &mut warnings),
            resistances,
            granted_action_resources: semicolon_list(record, "ActionResources"),
            passives: semicolon_list(record, "PassivesOnEquip").into_iter().chain(semicolon_list(record, "Passives")).collect(),
            damage,
            damage_type,
            weapon_properties: semicolon_list(record, "WeaponProperties"),
            proficiency_groups: semicolon_list(record, "ProficiencyGroups"),
            boosts: record.get("Boosts").unwrap_or_default().to_string(),
        };
        (stat_block, warnings)
    }
}
