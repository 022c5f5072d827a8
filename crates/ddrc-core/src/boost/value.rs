//! The closed set of boost kinds plus the `Unrecognized` escape hatch for
//! terms that parse syntactically but name an unknown boost.

use std::fmt;

use crate::dice::DiceExpr;
use crate::types::{DamageType, ResistanceLevel, RollKind};

#[derive(Clone, Debug, PartialEq)]
pub enum BoostValue {
    /// Flat armor class modifier.
    Ac(i32),
    /// Flat ability score modifier, e.g. `Ability(Strength, 2)`.
    Ability(String, i32),
    /// Resistance/vulnerability/immunity to a damage type.
    Resistance(DamageType, ResistanceLevel),
    Advantage(RollKind),
    Disadvantage(RollKind),
    /// Extra dice added to a roll of the given kind.
    RollBonus(RollKind, DiceExpr),
    /// Bonus damage of a type added on top of a hit, e.g. a flaming
    /// weapon's `DamageBonus(1d4, Fire)`.
    DamageBonus(DamageType, DiceExpr),
    /// Flat initiative modifier.
    InitiativeBonus(i32),
    /// Immunity to a named status id (applying it is a silent no-op).
    StatusImmunity(String),
    /// Immunity to ever rolling a critical hit.
    CriticalHitImmunity,
    /// Proficiency bonus override/addend applied to a named skill or save.
    ProficiencyBonus(String, i32),
    /// A syntactically valid term (`Name(args...)`) whose name isn't in
    /// the closed catalog above. Carries the raw name and argument text
    /// so callers can log it without losing information.
    Unrecognized(String, Vec<String>),
}

impl BoostValue {
    pub fn kind_name(&self) -> &str {
        match self {
            BoostValue::Ac(_) => "AC",
            BoostValue::Ability(..) => "Ability",
            BoostValue::Resistance(..) => "Resistance",
            BoostValue::Advantage(_) => "Advantage",
            BoostValue::Disadvantage(_) => "Disadvantage",
            BoostValue::RollBonus(..) => "RollBonus",
            BoostValue::DamageBonus(..) => "DamageBonus",
            BoostValue::InitiativeBonus(_) => "InitiativeBonus",
            BoostValue::StatusImmunity(_) => "StatusImmunity",
            BoostValue::CriticalHitImmunity => "CriticalHitImmunity",
            BoostValue::ProficiencyBonus(..) => "ProficiencyBonus",
            BoostValue::Unrecognized(name, _) => name,
        }
    }
}

impl fmt::Display for BoostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoostValue::Ac(n) => write!(f, "AC({n})"),
            BoostValue::Ability(name, n) => write!(f, "Ability({name},{n})"),
            BoostValue::Resistance(dmg, level) => write!(f, "Resistance({dmg},{level:?})"),
            BoostValue::Advantage(kind) => write!(f, "Advantage({kind})"),
            BoostValue::Disadvantage(kind) => write!(f, "Disadvantage({kind})"),
            BoostValue::RollBonus(kind, dice) => write!(f, "RollBonus({kind},{dice})"),
            BoostValue::DamageBonus(dmg, dice) => write!(f, "DamageBonus({dice},{dmg})"),
            BoostValue::InitiativeBonus(n) => write!(f, "InitiativeBonus({n})"),
            BoostValue::StatusImmunity(id) => write!(f, "StatusImmunity({id})"),
            BoostValue::CriticalHitImmunity => write!(f, "CriticalHitImmunity()"),
            BoostValue::ProficiencyBonus(name, n) => write!(f, "ProficiencyBonus({name},{n})"),
            BoostValue::Unrecognized(name, args) => write!(f, "{name}({})", args.join(",")),
        }
    }
}
