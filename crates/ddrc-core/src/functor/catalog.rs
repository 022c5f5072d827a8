//! The closed functor catalog (spec.md §4.E table) plus the argument
//! shapes each one takes. Parsing never fails: an unrecognized name
//! becomes [`FunctorKind::Unknown`] and is only logged when the executor
//! actually reaches it, never at parse time (a functor chain with one bad
//! term downstream of several valid ones must not lose the valid ones).

use crate::dice::{self, DiceExpr};

/// A single dice/level-table damage amount. `DealDamage` (and nothing
/// else in the catalog) may reference a class-level table instead of a
/// literal dice expression, via `LevelMapValue(name)` indirection.
#[derive(Clone, Debug, PartialEq)]
pub enum DamageAmount {
    Dice(DiceExpr),
    LevelMap(String),
}

impl DamageAmount {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(inner) = raw.strip_prefix("LevelMapValue(").and_then(|s| s.strip_suffix(')')) {
            return Some(Self::LevelMap(crate::dsl_common::unquote(inner).to_string()));
        }
        dice::parse_dice(raw).map(Self::Dice)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceOrigin {
    SourceToTarget,
    TargetToEntity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationMode {
    Add,
    Set,
}

/// The closed functor catalog from spec.md §4.E, plus `Unknown` for any
/// name outside it.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctorKind {
    DealDamage { amount: DamageAmount, damage_type: String },
    ApplyStatus { status_id: String, chance_percent: f64, duration: Option<i32> },
    RemoveStatus { status_id: String },
    RegainHitPoints { amount: DamageAmount },
    RestoreResource { resource: String, amount: i32, level: Option<u8> },
    BreakConcentration { reason: Option<String> },
    Stabilize,
    Force { distance: i32, origin: ForceOrigin },
    SetStatusDuration { status_id: String, value: i32, mode: DurationMode },
    UseAttack,
    /// A syntactically valid term whose name isn't in the catalog, or a
    /// catalog entry whose arguments didn't coerce. Carries enough of the
    /// original text to log meaningfully at execution time.
    Unknown { name: String, args: Vec<String> },
}

impl FunctorKind {
    pub fn parse(name: &str, args: &[&str]) -> Self {
        let unknown = || FunctorKind::Unknown { name: name.to_string(), args: args.iter().map(|s| s.to_string()).collect() };

        match name.to_ascii_lowercase().as_str() {
            "dealdamage" => match (args.first().and_then(|a| DamageAmount::parse(a)), args.get(1)) {
                (Some(amount), Some(dmg_type)) => FunctorKind::DealDamage { amount, damage_type: dmg_type.to_string() },
                _ => unknown(),
            },
            "applystatus" => match args.first() {
                Some(status_id) => FunctorKind::ApplyStatus {
                    status_id: status_id.to_string(),
                    chance_percent: args.get(1).and_then(|a| a.trim_end_matches('%').parse().ok()).unwrap_or(100.0),
                    duration: args.get(2).and_then(|a| a.trim().parse().ok()),
                },
                None => unknown(),
            },
            "removestatus" => match args.first() {
                Some(status_id) => FunctorKind::RemoveStatus { status_id: status_id.to_string() },
                None => unknown(),
            },
            "regainhitpoints" => match args.first().and_then(|a| DamageAmount::parse(a)) {
                Some(amount) => FunctorKind::RegainHitPoints { amount },
                None => unknown(),
            },
            "restoreresource" => match (args.first(), args.get(1).and_then(|a| a.trim().parse::<i32>().ok())) {
                (Some(resource), Some(amount)) => FunctorKind::RestoreResource {
                    resource: resource.to_string(),
                    amount,
                    level: args.get(2).and_then(|a| a.trim().parse().ok()),
                },
                _ => unknown(),
            },
            "breakconcentration" => FunctorKind::BreakConcentration { reason: args.first().map(|s| s.to_string()) },
            "stabilize" => FunctorKind::Stabilize,
            "force" => match args.first().and_then(|a| a.trim().parse::<i32>().ok()) {
                Some(distance) => {
                    let origin = match args.get(1).map(|s| s.trim()) {
                        Some("TargetToEntity") => ForceOrigin::TargetToEntity,
                        _ => ForceOrigin::SourceToTarget,
                    };
                    FunctorKind::Force { distance, origin }
                }
                None => unknown(),
            },
            "setstatusduration" => match (args.first(), args.get(1).and_then(|a| a.trim().parse::<i32>().ok())) {
                (Some(status_id), Some(value)) => {
                    let mode = match args.get(2).map(|s| s.trim()) {
                        Some("Add") => DurationMode::Add,
                        _ => DurationMode::Set,
                    };
                    FunctorKind::SetStatusDuration { status_id: status_id.to_string(), value, mode }
                }
                _ => unknown(),
            },
            "useattack" => FunctorKind::UseAttack,
            _ => unknown(),
        }
    }
}
