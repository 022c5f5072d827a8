//! Parses a `Boosts` field value — a semicolon-separated list of terms —
//! into [`BoostValue`]s. Syntax the closed catalog doesn't recognize never
//! fails the whole field: each term parses independently and an
//! unrecognized one degrades to [`BoostValue::Unrecognized`] plus a
//! warning, so one typo in a stat block doesn't sink every other boost on
//! the same line.

use std::str::FromStr;

use crate::dice::parse_dice;
use crate::dsl_common::{parse_call, split_top_level, unquote};
use crate::types::{DamageType, ResistanceLevel, RollKind};

use super::value::BoostValue;

/// A parsed term plus any warning produced while coercing its arguments.
pub struct ParsedTerm {
    pub value: BoostValue,
    pub warning: Option<String>,
}

/// Parses a full `Boosts` field into individual terms.
pub fn parse_boosts(field: &str) -> Vec<ParsedTerm> {
    split_top_level(field, ';').into_iter().map(parse_term).collect()
}

fn parse_term(term: &str) -> ParsedTerm {
    let Some((name, args)) = parse_call(term) else {
        return ParsedTerm {
            value: BoostValue::Unrecognized(term.to_string(), Vec::new()),
            warning: Some(format!("could not parse boost term '{term}'")),
        };
    };
    let args: Vec<&str> = args.iter().map(|a| unquote(a)).collect();

    let unrecognized = |msg: Option<String>| ParsedTerm {
        value: BoostValue::Unrecognized(name.to_string(), args.iter().map(|s| s.to_string()).collect()),
        warning: msg,
    };

    match name.to_ascii_lowercase().as_str() {
        "ac" => match args.first().and_then(|a| a.parse::<i32>().ok()) {
            Some(n) => ok(BoostValue::Ac(n)),
            None => unrecognized(Some(format!("AC requires one integer argument, got '{term}'"))),
        },
        "ability" => match (args.first(), args.get(1).and_then(|a| a.parse::<i32>().ok())) {
            (Some(ability), Some(n)) => ok(BoostValue::Ability(ability.to_string(), n)),
            _ => unrecognized(Some(format!("Ability requires (name, integer), got '{term}'"))),
        },
        "resistance" => match (args.first().and_then(|a| DamageType::from_str(a).ok()), args.get(1)) {
            (Some(dmg), Some(level)) => match parse_resistance_level(level) {
                Some(lvl) => ok(BoostValue::Resistance(dmg, lvl)),
                None => unrecognized(Some(format!("unknown resistance level '{level}' in '{term}'"))),
            },
            _ => unrecognized(Some(format!("Resistance requires (DamageType, Level), got '{term}'"))),
        },
        "advantage" => match args.first().and_then(|a| RollKind::from_str(a).ok()) {
            Some(kind) => ok(BoostValue::Advantage(kind)),
            None => unrecognized(Some(format!("unknown roll kind in Advantage '{term}'"))),
        },
        "disadvantage" => match args.first().and_then(|a| RollKind::from_str(a).ok()) {
            Some(kind) => ok(BoostValue::Disadvantage(kind)),
            None => unrecognized(Some(format!("unknown roll kind in Disadvantage '{term}'"))),
        },
        "rollbonus" => match (args.first().and_then(|a| RollKind::from_str(a).ok()), args.get(1).and_then(|a| parse_dice(a))) {
            (Some(kind), Some(dice)) => ok(BoostValue::RollBonus(kind, dice)),
            _ => unrecognized(Some(format!("RollBonus requires (RollKind, dice), got '{term}'"))),
        },
        "damagebonus" => match (args.first().and_then(|a| parse_dice(a)), args.get(1).and_then(|a| DamageType::from_str(a).ok())) {
            (Some(dice), Some(dmg)) => ok(BoostValue::DamageBonus(dmg, dice)),
            _ => unrecognized(Some(format!("DamageBonus requires (dice, DamageType), got '{term}'"))),
        },
        "initiativebonus" => match args.first().and_then(|a| a.parse::<i32>().ok()) {
            Some(n) => ok(BoostValue::InitiativeBonus(n)),
            None => unrecognized(Some(format!("InitiativeBonus requires one integer argument, got '{term}'"))),
        },
        "statusimmunity" => match args.first() {
            Some(id) => ok(BoostValue::StatusImmunity(id.to_string())),
            None => unrecognized(Some(format!("StatusImmunity requires a status id, got '{term}'"))),
        },
        "criticalhitimmunity" => ok(BoostValue::CriticalHitImmunity),
        "proficiencybonus" => match (args.first(), args.get(1).and_then(|a| a.parse::<i32>().ok())) {
            (Some(skill), Some(n)) => ok(BoostValue::ProficiencyBonus(skill.to_string(), n)),
            _ => unrecognized(Some(format!("ProficiencyBonus requires (name, integer), got '{term}'"))),
        },
        _ => unrecognized(None),
    }
}

fn ok(value: BoostValue) -> ParsedTerm {
    ParsedTerm { value, warning: None }
}

fn parse_resistance_level(s: &str) -> Option<ResistanceLevel> {
    match s.to_ascii_lowercase().as_str() {
        "resistant" => Some(ResistanceLevel::Resistant),
        "vulnerable" => Some(ResistanceLevel::Vulnerable),
        "immune" => Some(ResistanceLevel::Immune),
        "none" => Some(ResistanceLevel::None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_terms() {
        let terms = parse_boosts("AC(2);Resistance(Fire,Resistant);Advantage(AttackRoll)");
        assert_eq!(terms.len(), 3);
        assert_eq!(terms[0].value, BoostValue::Ac(2));
        assert!(terms.iter().all(|t| t.warning.is_none()));
    }

    #[test]
    fn unrecognized_term_does_not_block_others() {
        let terms = parse_boosts("AC(2);TotallyMadeUp(1,2);Advantage(AttackRoll)");
        assert_eq!(terms.len(), 3);
        assert!(matches!(terms[1].value, BoostValue::Unrecognized(..)));
        assert_eq!(terms[0].value, BoostValue::Ac(2));
        assert_eq!(terms[2].value, BoostValue::Advantage(RollKind::AttackRoll));
    }

    #[test]
    fn malformed_args_degrade_to_unrecognized_with_warning() {
        let terms = parse_boosts("AC(notanumber)");
        assert!(matches!(terms[0].value, BoostValue::Unrecognized(..)));
        assert!(terms[0].warning.is_some());
    }

    #[test]
    fn roll_bonus_parses_dice_argument() {
        let terms = parse_boosts("RollBonus(Damage,1d4)");
        assert_eq!(terms[0].value, BoostValue::RollBonus(RollKind::Damage, parse_dice("1d4").unwrap()));
    }

    #[test]
    fn damage_bonus_parses_dice_then_damage_type() {
        // spec.md §4.C / seed scenario 4: `DamageBonus(+3 Fire)` names dice
        // (or a flat bonus) first, damage type second.
        let terms = parse_boosts("DamageBonus(2d6,Piercing)");
        assert_eq!(terms[0].value, BoostValue::DamageBonus(DamageType::Piercing, parse_dice("2d6").unwrap()));
        assert!(terms[0].warning.is_none());
    }

    #[test]
    fn damage_bonus_in_reversed_order_degrades_to_unrecognized() {
        let terms = parse_boosts("DamageBonus(Piercing,2d6)");
        assert!(matches!(terms[0].value, BoostValue::Unrecognized(..)));
    }

    #[test]
    fn initiative_bonus_parses_integer_argument() {
        let terms = parse_boosts("InitiativeBonus(3)");
        assert_eq!(terms[0].value, BoostValue::InitiativeBonus(3));
        assert!(terms[0].warning.is_none());
    }
}
