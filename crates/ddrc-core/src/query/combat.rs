//! The five combat queries (spec.md §4.G): attack rolls, saving throws,
//! ability checks, damage rolls, and armor class. Each is a pure function
//! of its resolved inputs plus an injected RNG — none of them touch a
//! `Combatant` type directly, so the caller (the owner of boosts/status
//! state) is responsible for aggregating boost effects into the inputs
//! below before calling.

use crate::dice::DiceExpr;
use crate::types::{AdvantageState, DamageType, ResistanceLevel};

use super::rng::QueryRng;

/// Outcome of drawing one or two d20s under an [`AdvantageState`]. Both
/// rolls are reported even under Advantage/Disadvantage so callers can
/// surface "rolled [5, 17], took 17" to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct D20RollOutput {
    pub rolls: Vec<u32>,
    pub natural: u32,
}

/// Draws the natural d20 result for `advantage`, per spec.md §4.G: two
/// rolls when Advantage xor Disadvantage is net-active, max/min picked
/// accordingly; a single roll when Normal.
fn roll_d20(advantage: AdvantageState, rng: &mut dyn QueryRng) -> D20RollOutput {
    match advantage {
        AdvantageState::Normal => {
            let r = rng.roll_d20();
            D20RollOutput { rolls: vec![r], natural: r }
        }
        AdvantageState::Advantage => {
            let a = rng.roll_d20();
            let b = rng.roll_d20();
            D20RollOutput { rolls: vec![a, b], natural: a.max(b) }
        }
        AdvantageState::Disadvantage => {
            let a = rng.roll_d20();
            let b = rng.roll_d20();
            D20RollOutput { rolls: vec![a, b], natural: a.min(b) }
        }
    }
}

/// Inputs to [`attack_roll`]: the resolved modifier and advantage state,
/// the target's AC, and the auto-miss/auto-crit thresholds (spec.md §4.G,
/// [`crate::config::DdrcConfig`]).
#[derive(Clone, Debug, PartialEq)]
pub struct AttackRollInput {
    pub modifier: i32,
    pub advantage: AdvantageState,
    pub target_ac: i32,
    pub auto_miss_at_or_below: u32,
    pub auto_crit_at_or_above: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttackRollOutput {
    pub rolls: Vec<u32>,
    pub natural: u32,
    pub total: i32,
    pub hit: bool,
    pub critical: bool,
}

/// Resolves an attack roll: draws the natural d20 under advantage, adds
/// the modifier, and compares to target AC — a natural roll at or below
/// `auto_miss_at_or_below` always misses; at or above
/// `auto_crit_at_or_above` always hits and crits, regardless of total.
pub fn attack_roll(input: &AttackRollInput, rng: &mut dyn QueryRng) -> AttackRollOutput {
    let d20 = roll_d20(input.advantage, rng);
    let total = d20.natural as i32 + input.modifier;
    let critical = d20.natural >= input.auto_crit_at_or_above;
    let auto_miss = d20.natural <= input.auto_miss_at_or_below;
    let hit = critical || (!auto_miss && total >= input.target_ac);
    AttackRollOutput { rolls: d20.rolls, natural: d20.natural, total, hit, critical }
}

/// Inputs to [`saving_throw`]: the resolved modifier and advantage state,
/// the DC to beat.
#[derive(Clone, Debug, PartialEq)]
pub struct SavingThrowInput {
    pub modifier: i32,
    pub advantage: AdvantageState,
    pub dc: i32,
}

/// Resolves a saving throw. Unlike attacks, saves have no auto-crit/miss
/// rule (spec.md §4.G names it only for attack rolls) — success is purely
/// total-vs-DC.
pub fn saving_throw(input: &SavingThrowInput, rng: &mut dyn QueryRng) -> D20RollSuccessOutput {
    let d20 = roll_d20(input.advantage, rng);
    let total = d20.natural as i32 + input.modifier;
    D20RollSuccessOutput { rolls: d20.rolls, natural: d20.natural, total, success: total >= input.dc }
}

/// Inputs to [`ability_check`]: identical shape to a saving throw, kept as
/// a distinct type so call sites read clearly and can diverge later
/// (e.g. if contested checks need a second input).
pub type AbilityCheckInput = SavingThrowInput;

/// Shared output shape for saves and ability checks: both reduce to "d20
/// plus modifier versus a target number".
#[derive(Clone, Debug, PartialEq)]
pub struct D20RollSuccessOutput {
    pub rolls: Vec<u32>,
    pub natural: u32,
    pub total: i32,
    pub success: bool,
}

/// Resolves an ability check — mechanically identical to a saving throw.
pub fn ability_check(input: &AbilityCheckInput, rng: &mut dyn QueryRng) -> D20RollSuccessOutput {
    saving_throw(input, rng)
}

/// Inputs to [`armor_class`]: base armor AC, the wearer's relevant ability
/// modifier (already capped by the armor's `AbilityModifierCap` if any),
/// and the sum of active `AC(n)` boosts.
#[derive(Clone, Debug, PartialEq)]
pub struct ArmorClassInput {
    pub base_ac: i32,
    pub ability_modifier: i32,
    pub ability_modifier_cap: Option<i32>,
    pub boost_total: i32,
}

/// Computes armor class: base AC + (ability modifier, capped if the
/// armor defines a cap) + summed `AC(n)` boosts.
pub fn armor_class(input: &ArmorClassInput) -> i32 {
    let capped_modifier = match input.ability_modifier_cap {
        Some(cap) => input.ability_modifier.min(cap),
        None => input.ability_modifier,
    };
    input.base_ac + capped_modifier + input.boost_total
}

/// Inputs to [`damage_roll`]: base dice, a flat static bonus, per-damage-
/// type bonus dice already filtered to the active damage type, whether
/// the triggering attack crit, and the target's resolved resistance.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageRollInput {
    pub base_dice: DiceExpr,
    pub static_bonus: i32,
    pub bonus_dice: Vec<DiceExpr>,
    pub is_critical: bool,
    pub target_resistance: ResistanceLevel,
    pub damage_type: DamageType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DamageRollOutput {
    pub raw: u32,
    pub after_resistance: u32,
    pub damage_type: DamageType,
}

/// Resolves a damage roll: doubles the dice *count* on a crit (bonuses
/// unchanged, spec.md §8 "critical hit"), sums base + bonus dice + the
/// static modifier, then applies the target's resistance.
pub fn damage_roll(input: &DamageRollInput, rng: &mut dyn QueryRng) -> DamageRollOutput {
    let mut base = input.base_dice;
    if input.is_critical {
        base.count *= 2;
    }
    let mut raw = base.roll(rng) as i32 + input.static_bonus;
    for bonus in &input.bonus_dice {
        raw += bonus.roll(rng) as i32;
    }
    let raw = raw.max(0) as u32;
    let after_resistance = input.target_resistance.apply(raw);
    DamageRollOutput { raw, after_resistance, damage_type: input.damage_type }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::rng::ScriptedRng;

    #[test]
    fn advantage_picks_max_of_two_rolls() {
        let mut rng = ScriptedRng::new(vec![5, 17]);
        let out = roll_d20(AdvantageState::Advantage, &mut rng);
        assert_eq!(out.rolls, vec![5, 17]);
        assert_eq!(out.natural, 17);
    }

    #[test]
    fn disadvantage_picks_min_of_two_rolls() {
        let mut rng = ScriptedRng::new(vec![5, 17]);
        let out = roll_d20(AdvantageState::Disadvantage, &mut rng);
        assert_eq!(out.natural, 5);
    }

    #[test]
    fn normal_draws_a_single_d20() {
        let mut rng = ScriptedRng::new(vec![11]);
        let out = roll_d20(AdvantageState::Normal, &mut rng);
        assert_eq!(out.rolls, vec![11]);
    }

    #[test]
    fn attack_roll_advantage_beats_ac() {
        let input = AttackRollInput {
            modifier: 5,
            advantage: AdvantageState::Advantage,
            target_ac: 20,
            auto_miss_at_or_below: 1,
            auto_crit_at_or_above: 20,
        };
        let mut rng = ScriptedRng::new(vec![5, 17]);
        let out = attack_roll(&input, &mut rng);
        assert_eq!(out.total, 22);
        assert!(out.hit);
        assert!(!out.critical);
    }

    #[test]
    fn natural_one_always_misses_regardless_of_modifier() {
        let input = AttackRollInput {
            modifier: 50,
            advantage: AdvantageState::Normal,
            target_ac: 5,
            auto_miss_at_or_below: 1,
            auto_crit_at_or_above: 20,
        };
        let mut rng = ScriptedRng::new(vec![1]);
        let out = attack_roll(&input, &mut rng);
        assert!(!out.hit);
    }

    #[test]
    fn natural_twenty_always_hits_and_crits() {
        let input = AttackRollInput {
            modifier: -10,
            advantage: AdvantageState::Normal,
            target_ac: 100,
            auto_miss_at_or_below: 1,
            auto_crit_at_or_above: 20,
        };
        let mut rng = ScriptedRng::new(vec![20]);
        let out = attack_roll(&input, &mut rng);
        assert!(out.hit);
        assert!(out.critical);
    }

    #[test]
    fn armor_class_respects_ability_cap() {
        let input = ArmorClassInput { base_ac: 16, ability_modifier: 4, ability_modifier_cap: Some(0), boost_total: 2 };
        assert_eq!(armor_class(&input), 18);
    }

    #[test]
    fn plate_armor_ignores_dex_entirely() {
        let input = ArmorClassInput { base_ac: 16, ability_modifier: 3, ability_modifier_cap: Some(0), boost_total: 0 };
        assert_eq!(armor_class(&input), 16);
    }

    #[test]
    fn critical_hit_doubles_dice_count_not_modifier() {
        let base = crate::dice::parse_dice("2d6").unwrap();
        let input = DamageRollInput {
            base_dice: base,
            static_bonus: 3,
            bonus_dice: vec![],
            is_critical: true,
            target_resistance: ResistanceLevel::None,
            damage_type: DamageType::Fire,
        };
        let mut rng = ScriptedRng::new(vec![6, 6, 6, 6]);
        let out = damage_roll(&input, &mut rng);
        assert_eq!(out.raw, 27);
    }

    #[test]
    fn resistance_halves_damage_with_integer_floor() {
        let base = crate::dice::parse_dice("2d6").unwrap();
        let input = DamageRollInput {
            base_dice: base,
            static_bonus: 3,
            bonus_dice: vec![crate::dice::parse_dice("0").unwrap()],
            is_critical: false,
            target_resistance: ResistanceLevel::Resistant,
            damage_type: DamageType::Fire,
        };
        let mut rng = ScriptedRng::new(vec![3, 4]);
        let out = damage_roll(&input, &mut rng);
        assert_eq!(out.raw, 10);
        assert_eq!(out.after_resistance, 5);
    }

    #[test]
    fn immune_zeroes_out_damage_regardless_of_vulnerable() {
        let level = ResistanceLevel::Resistant.combine(ResistanceLevel::Vulnerable).combine(ResistanceLevel::Immune);
        assert_eq!(level, ResistanceLevel::Immune);
        assert_eq!(level.apply(40), 0);
    }

    #[test]
    fn saving_throw_succeeds_when_total_meets_dc() {
        let input = SavingThrowInput { modifier: 2, advantage: AdvantageState::Normal, dc: 15 };
        let mut rng = ScriptedRng::new(vec![13]);
        let out = saving_throw(&input, &mut rng);
        assert!(out.success);
    }
}
