//! Combat query layer (component G): the stateless arithmetic — attack
//! rolls, saving throws, ability checks, armor class, damage rolls — that
//! reads a combatant's resolved stat block plus active boosts and turns
//! it into a d20-resolved outcome. Everything here is a pure function of
//! its inputs plus an injected [`QueryRng`]; no query method mutates
//! combatant state itself (that's the status/resource runtime's job).

mod combat;
mod rng;

pub use combat::{
    ability_check, armor_class, attack_roll, damage_roll, saving_throw, AbilityCheckInput, ArmorClassInput,
    AttackRollInput, AttackRollOutput, D20RollOutput, DamageRollInput, SavingThrowInput,
};
pub use rng::{PcgRng, QueryRng, ScriptedRng};
