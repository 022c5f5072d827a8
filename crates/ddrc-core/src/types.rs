//! Small shared vocabulary types used across every DDRC component.
//!
//! Kept deliberately tiny and dependency-free so `condition`, `boost`,
//! `functor`, and `status` can all reference them without creating module
//! cycles — the same role `state::EntityId`/`Position` play in the
//! teacher crate.

use std::fmt;

/// Identifies a combatant for the lifetime of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the encounter a combatant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Faction {
    Player,
    Hostile,
    Neutral,
}

/// A combatant's current life state. Determines which statuses survive
/// death and whether the combatant can act.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum LifeState {
    Alive,
    Downed,
    Unconscious,
    Dead,
}

/// Damage types used by resistance/vulnerability boosts and damage rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum DamageType {
    Slashing,
    Piercing,
    Bludgeoning,
    Fire,
    Cold,
    Lightning,
    Acid,
    Poison,
    Necrotic,
    Radiant,
    Force,
    Psychic,
    Thunder,
    True,
}

/// How a resistance/vulnerability level resolves, in strict precedence
/// order `Immune > Vulnerable > Resistant`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResistanceLevel {
    None,
    Resistant,
    Vulnerable,
    Immune,
}

impl ResistanceLevel {
    /// Combine two levels from stacked sources using Immune > Vulnerable >
    /// Resistant precedence (spec.md §8 "resistance precedence").
    pub fn combine(self, other: Self) -> Self {
        self.max(other)
    }

    /// Apply this resistance level to a raw damage amount.
    pub fn apply(self, amount: u32) -> u32 {
        match self {
            Self::None => amount,
            Self::Resistant => amount / 2,
            Self::Vulnerable => amount.saturating_mul(2),
            Self::Immune => 0,
        }
    }
}

/// The flavor of an attack: melee/ranged crossed with weapon/spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum AttackFlavor {
    MeleeWeapon,
    RangedWeapon,
    MeleeSpell,
    RangedSpell,
}

impl AttackFlavor {
    pub fn is_melee(self) -> bool {
        matches!(self, Self::MeleeWeapon | Self::MeleeSpell)
    }

    pub fn is_ranged(self) -> bool {
        matches!(self, Self::RangedWeapon | Self::RangedSpell)
    }

    pub fn is_weapon(self) -> bool {
        matches!(self, Self::MeleeWeapon | Self::RangedWeapon)
    }

    pub fn is_spell(self) -> bool {
        matches!(self, Self::MeleeSpell | Self::RangedSpell)
    }
}

/// The kind of d20 roll a boost's Advantage/Disadvantage/RollBonus targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum RollKind {
    AttackRoll,
    SavingThrow,
    AbilityCheck,
    Damage,
    DamageType(DamageTypeRoll),
}

/// Wrapper so `RollKind::DamageType` can still derive the simple
/// string-enum traits above without pulling `DamageType` into the same
/// derive (damage-type-specific roll kinds are written as
/// `RollBonus(Fire, 1d4)` in source data, matched separately).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTypeRoll(pub DamageType);

/// Net advantage/disadvantage state for a roll kind after aggregating all
/// active sources — both present cancels to `Normal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdvantageState {
    Advantage,
    Disadvantage,
    #[default]
    Normal,
}

impl AdvantageState {
    pub fn combine(advantage_count: u32, disadvantage_count: u32) -> Self {
        match (advantage_count > 0, disadvantage_count > 0) {
            (true, true) => Self::Normal,
            (true, false) => Self::Advantage,
            (false, true) => Self::Disadvantage,
            (false, false) => Self::Normal,
        }
    }
}

/// Source attribution categories for boosts, ordered by the tie-break
/// precedence spec.md §5 defines: Equipment < Passive < Status < Spell <
/// Misc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumString, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum SourceKind {
    Equipment,
    Passive,
    Status,
    Spell,
    Misc,
}

/// Identifies exactly which source installed a boost: a kind plus the id
/// of the status/passive/spell/equipment slot responsible. Held by value,
/// never by pointer, so removing a source is just a filter over ids
/// (spec.md §9 design note).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostSource {
    pub kind: SourceKind,
    pub id: String,
}

impl BoostSource {
    pub fn new(kind: SourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}
