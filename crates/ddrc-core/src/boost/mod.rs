//! Boost DSL (component C): parses `Boosts` field strings into typed
//! [`BoostValue`]s and stores them per-combatant in a [`BoostContainer`]
//! with source attribution, so removing a source removes precisely the
//! boosts it installed (spec.md §3 invariant 1).
//!
//! A `BoostContainer` holds only identifiers for its source attribution,
//! never pointers to the status/passive that installed it — the status
//! runtime (`crate::status`) keeps the inverse map. That keeps rollback a
//! plain filter over ids instead of a reference-counted graph (spec.md §9
//! design note).

mod parser;
mod value;

pub use parser::{ParsedTerm, parse_boosts};
pub use value::BoostValue;

use crate::condition::{CombatView, Condition, ConditionContext};
use crate::error::WarnOnce;
use crate::types::{AdvantageState, DamageType, ResistanceLevel, RollKind, SourceKind};

/// A boost installed on a combatant plus the source that installed it and
/// an optional gating condition (from an `IF(...)` wrapper on the boost
/// term, or inherited from the installing status/passive as a whole).
#[derive(Clone, Debug)]
pub struct BoostInstance {
    pub value: BoostValue,
    pub source: BoostSource,
    condition: Option<Condition>,
}

/// Re-exported here so callers building boosts don't need to reach into
/// `crate::types` separately.
pub use crate::types::BoostSource;

impl BoostInstance {
    pub fn new(value: BoostValue, source: BoostSource) -> Self {
        Self { value, source, condition: None }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Whether this boost counts toward an aggregate given the current
    /// query context. A boost with no attached condition is always
    /// active; one with a condition defers to 4.D (fail-closed on parse
    /// error, per spec.md §4.D).
    fn is_active(&self, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> bool {
        match &self.condition {
            None => true,
            Some(cond) => cond.evaluate(ctx, warn_once),
        }
    }
}

/// An opaque handle identifying one installed boost, returned by
/// [`BoostContainer::add`] so callers (chiefly the status runtime) can
/// track exactly which boosts a particular application installed without
/// re-deriving them from the source id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoostHandle(u64);

/// Per-combatant store of active boosts. Boosts from distinct sources
/// stack by addition; an exact duplicate `(value, source)` pair is
/// rejected by `add` rather than silently double-counted.
#[derive(Clone, Debug, Default)]
pub struct BoostContainer {
    next_id: u64,
    entries: Vec<(BoostHandle, BoostInstance)>,
}

impl BoostContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a boost. Returns `None` if an identical `(value, source)`
    /// pair is already present — spec.md §3: "duplicates from the same
    /// source are rejected".
    pub fn add(&mut self, boost: BoostInstance) -> Option<BoostHandle> {
        let duplicate = self
            .entries
            .iter()
            .any(|(_, existing)| existing.source == boost.source && existing.value == boost.value);
        if duplicate {
            return None;
        }
        let handle = BoostHandle(self.next_id);
        self.next_id += 1;
        self.entries.push((handle, boost));
        Some(handle)
    }

    /// Removes every boost attributed to `(kind, id)`. Returns how many
    /// were removed — invariant 1 guarantees this is exactly the set
    /// installed by that source.
    pub fn remove_by_source(&mut self, kind: SourceKind, id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, b)| !(b.source.kind == kind && b.source.id == id));
        before - self.entries.len()
    }

    /// Removes a single boost by handle (used to roll back a partially
    /// installed status application — spec.md §5 atomicity guarantee).
    pub fn remove_by_handle(&mut self, handle: BoostHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        before != self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoostInstance> {
        self.entries.iter().map(|(_, b)| b)
    }

    pub fn query(&self, predicate: impl Fn(&BoostValue) -> bool) -> Vec<&BoostInstance> {
        self.entries.iter().map(|(_, b)| b).filter(|b| predicate(&b.value)).collect()
    }

    pub fn query_by_source_kind(&self, kind: SourceKind) -> Vec<&BoostInstance> {
        self.entries.iter().map(|(_, b)| b).filter(|b| b.source.kind == kind).collect()
    }

    /// Boosts visible right now: insertion order, filtered by attached
    /// condition, in spec.md §5's source-kind precedence order
    /// (Equipment < Passive < Status < Spell < Misc) used as the tie-break
    /// for modifier aggregation.
    fn active(&self, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> Vec<&BoostInstance> {
        let mut visible: Vec<&BoostInstance> =
            self.entries.iter().map(|(_, b)| b).filter(|b| b.is_active(ctx, warn_once)).collect();
        visible.sort_by_key(|b| b.source.kind);
        visible
    }

    /// Sums every numeric boost matching `extract` that is currently
    /// active. `extract` maps a boost to the scalar it contributes, or
    /// `None` if this boost doesn't contribute to the aggregate at all.
    pub fn sum_numeric(
        &self,
        ctx: &ConditionContext<'_>,
        warn_once: &WarnOnce,
        extract: impl Fn(&BoostValue) -> Option<i32>,
    ) -> i32 {
        self.active(ctx, warn_once).into_iter().filter_map(|b| extract(&b.value)).sum()
    }

    /// Net advantage/disadvantage state for a roll kind — both present
    /// cancels to `Normal` (spec.md §8 "advantage cancellation").
    pub fn advantage_state(&self, roll_kind: RollKind, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> AdvantageState {
        let mut advantage = 0u32;
        let mut disadvantage = 0u32;
        for boost in self.active(ctx, warn_once) {
            match &boost.value {
                BoostValue::Advantage(k) if *k == roll_kind => advantage += 1,
                BoostValue::Disadvantage(k) if *k == roll_kind => disadvantage += 1,
                _ => {}
            }
        }
        AdvantageState::combine(advantage, disadvantage)
    }

    /// Resolves the resistance level for a damage type across every
    /// active source, using Immune > Vulnerable > Resistant precedence
    /// (spec.md §8 "resistance precedence").
    pub fn resistance_level(&self, damage_type: DamageType, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> ResistanceLevel {
        self.active(ctx, warn_once)
            .into_iter()
            .filter_map(|b| match &b.value {
                BoostValue::Resistance(dmg, level) if *dmg == damage_type => Some(*level),
                _ => None,
            })
            .fold(ResistanceLevel::None, ResistanceLevel::combine)
    }

    /// The flat set of status ids this combatant is immune to, from every
    /// active `StatusImmunity` boost.
    pub fn status_immunities(&self, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> Vec<&str> {
        self.active(ctx, warn_once)
            .into_iter()
            .filter_map(|b| match &b.value {
                BoostValue::StatusImmunity(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_critical_hit_immunity(&self, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> bool {
        self.active(ctx, warn_once).iter().any(|b| matches!(b.value, BoostValue::CriticalHitImmunity))
    }

    /// Extra dice contributed to a roll kind by `RollBonus` boosts, summed
    /// across every active source (each die expression rolled separately
    /// by the query layer, not flattened into one combined expression).
    pub fn roll_bonus_dice(&self, roll_kind: RollKind, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> Vec<crate::dice::DiceExpr> {
        self.active(ctx, warn_once)
            .into_iter()
            .filter_map(|b| match &b.value {
                BoostValue::RollBonus(k, dice) if *k == roll_kind => Some(*dice),
                _ => None,
            })
            .collect()
    }

    /// Extra damage dice contributed for a specific damage type by
    /// `DamageBonus` boosts.
    pub fn damage_bonus_dice(&self, damage_type: DamageType, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> Vec<crate::dice::DiceExpr> {
        self.active(ctx, warn_once)
            .into_iter()
            .filter_map(|b| match &b.value {
                BoostValue::DamageBonus(dmg, dice) if *dmg == damage_type => Some(*dice),
                _ => None,
            })
            .collect()
    }

    /// Sum of every active `InitiativeBonus` boost, feeding
    /// `Combatant.initiative`.
    pub fn initiative_bonus(&self, ctx: &ConditionContext<'_>, warn_once: &WarnOnce) -> i32 {
        self.sum_numeric(ctx, warn_once, |v| if let BoostValue::InitiativeBonus(n) = v { Some(*n) } else { None })
    }
}
