//! Executes a parsed functor chain against live combatant state (spec.md
//! §4.E "execution contract"). Each term runs in source order; an error
//! in one term is logged and execution continues to the next rather than
//! aborting the chain.

use crate::condition::ConditionContext;
use crate::dice::DiceExpr;
use crate::env::ForcedMovementResult;
use crate::error::WarnOnce;
use crate::types::EntityId;

use super::catalog::{DamageAmount, DurationMode, FunctorKind};
pub use super::catalog::ForceOrigin;
use super::parser::{FunctorTerm, TargetRouting};

/// The mutation surface a functor chain executes against: rolling dice,
/// dealing damage, applying/removing statuses, nudging resources, and
/// publishing presentation events. Implemented by whatever owns the live
/// encounter (an orchestration layer above `ddrc-core`'s combatant
/// model); the executor itself only calls through this trait, never
/// touches concrete state directly.
pub trait FunctorContext {
    fn source(&self) -> EntityId;
    fn target(&self) -> Option<EntityId>;

    /// Builds the condition context used to evaluate this term's `IF(...)`
    /// gate, if any — routed through whatever qualifier the chain names.
    fn condition_context(&self) -> ConditionContext<'_>;
    fn warn_once(&self) -> &WarnOnce;

    fn roll(&mut self, dice: DiceExpr) -> u32;
    /// Uniform roll in `0.0..100.0`, used for `ApplyStatus`'s chance%.
    fn roll_percent(&mut self) -> f64;
    fn level_map_value(&self, name: &str, who: EntityId) -> Option<DiceExpr>;

    fn deal_damage(&mut self, target: EntityId, amount: u32, damage_type: &str);
    fn heal(&mut self, target: EntityId, amount: u32);
    /// Returns whether the status was actually applied (it may be
    /// rejected by an immunity the status runtime tracks).
    fn apply_status(&mut self, target: EntityId, status_id: &str, duration: Option<i32>) -> bool;
    /// Implementations should route through
    /// [`crate::status::StatusSet::remove_by_id_or_group`] — `status_id`
    /// may actually name a status group (spec.md §9 Open Questions).
    fn remove_status(&mut self, target: EntityId, status_id: &str);
    fn restore_resource(&mut self, target: EntityId, resource: &str, amount: i32, level: Option<u8>);
    fn break_concentration(&mut self, target: EntityId, reason: Option<&str>);
    fn stabilize(&mut self, target: EntityId);
    fn force(&mut self, target: EntityId, distance: i32, origin: ForceOrigin) -> ForcedMovementResult;
    fn set_status_duration(&mut self, target: EntityId, status_id: &str, value: i32, mode: DurationMode);
    fn use_attack(&mut self, source: EntityId, target: EntityId);
}

/// Executes every term in `terms` against `ctx`, in order. A term whose
/// `IF(...)` gate evaluates false is skipped entirely — no dice rolled,
/// no event published (spec.md §8 "functor gating").
pub fn execute_chain(terms: &[FunctorTerm], ctx: &mut dyn FunctorContext) {
    for term in terms {
        if let Some(cond) = &term.condition {
            let gate_ctx = ctx.condition_context();
            if !cond.evaluate(&gate_ctx, ctx.warn_once()) {
                continue;
            }
        }
        execute_term(term, ctx);
    }
}

fn route(term: &FunctorTerm, ctx: &dyn FunctorContext) -> EntityId {
    match term.routing {
        TargetRouting::SelfEntity => ctx.source(),
        TargetRouting::Target => ctx.target().unwrap_or_else(|| ctx.source()),
        TargetRouting::Default => ctx.target().unwrap_or_else(|| ctx.source()),
    }
}

fn resolve_amount(amount: &DamageAmount, who: EntityId, ctx: &mut dyn FunctorContext) -> u32 {
    let dice = match amount {
        DamageAmount::Dice(d) => *d,
        DamageAmount::LevelMap(name) => match ctx.level_map_value(name, who) {
            Some(d) => d,
            None => {
                tracing::warn!(table = %name, "LevelMapValue table not found, treating as zero damage");
                DiceExpr::flat(0)
            }
        },
    };
    // `roll` draws from the RNG; the executor never samples directly
    // (spec.md §9 "randomness" — all rolling goes through one seam).
    ctx.roll(dice)
}

fn execute_term(term: &FunctorTerm, ctx: &mut dyn FunctorContext) {
    let target = route(term, ctx);
    match &term.kind {
        FunctorKind::DealDamage { amount, damage_type } => {
            let rolled = resolve_amount(amount, ctx.source(), ctx);
            ctx.deal_damage(target, rolled, damage_type);
        }
        FunctorKind::ApplyStatus { status_id, chance_percent, duration } => {
            if ctx.roll_percent() < *chance_percent {
                ctx.apply_status(target, status_id, *duration);
            }
        }
        FunctorKind::RemoveStatus { status_id } => {
            ctx.remove_status(target, status_id);
        }
        FunctorKind::RegainHitPoints { amount } => {
            let rolled = resolve_amount(amount, ctx.source(), ctx);
            ctx.heal(target, rolled);
        }
        FunctorKind::RestoreResource { resource, amount, level } => {
            ctx.restore_resource(target, resource, *amount, *level);
        }
        FunctorKind::BreakConcentration { reason } => {
            ctx.break_concentration(target, reason.as_deref());
        }
        FunctorKind::Stabilize => {
            ctx.stabilize(target);
        }
        FunctorKind::Force { distance, origin } => {
            ctx.force(target, *distance, *origin);
        }
        FunctorKind::SetStatusDuration { status_id, value, mode } => {
            ctx.set_status_duration(target, status_id, *value, *mode);
        }
        FunctorKind::UseAttack => {
            ctx.use_attack(ctx.source(), target);
        }
        FunctorKind::Unknown { name, args } => {
            tracing::debug!(name, ?args, "unknown functor, no-op");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::CombatView;
    use crate::query::{PcgRng, QueryRng};
    use crate::types::{Faction, LifeState};
    use std::collections::HashMap;

    struct EmptyView;
    impl CombatView for EmptyView {
        fn has_status(&self, _w: EntityId, _s: &str) -> bool {
            false
        }
        fn has_status_type(&self, _w: EntityId, _s: &str) -> bool {
            false
        }
        fn has_passive(&self, _w: EntityId, _s: &str) -> bool {
            false
        }
        fn life_state(&self, _w: EntityId) -> Option<LifeState> {
            Some(LifeState::Downed)
        }
        fn faction(&self, _w: EntityId) -> Option<Faction> {
            None
        }
        fn resource_current(&self, _w: EntityId, _r: &str) -> Option<i64> {
            None
        }
        fn resource_max(&self, _w: EntityId, _r: &str) -> Option<i64> {
            None
        }
        fn ability_score(&self, _w: EntityId, _a: &str) -> Option<i32> {
            None
        }
        fn ability_modifier(&self, _w: EntityId, _a: &str) -> Option<i32> {
            None
        }
        fn distance(&self, _a: EntityId, _b: EntityId) -> Option<f64> {
            None
        }
    }

    #[derive(Default)]
    struct RecordingCtx {
        source: EntityId,
        target: Option<EntityId>,
        damage_dealt: Vec<(EntityId, u32, String)>,
        healed: Vec<(EntityId, u32)>,
        statuses_applied: Vec<(EntityId, String)>,
        statuses_removed: Vec<(EntityId, String)>,
        stabilized: Vec<EntityId>,
        rng: Option<PcgRng>,
        warn: WarnOnce,
        view: EmptyView,
        level_tables: HashMap<String, DiceExpr>,
    }

    impl FunctorContext for RecordingCtx {
        fn source(&self) -> EntityId {
            self.source
        }
        fn target(&self) -> Option<EntityId> {
            self.target
        }
        fn condition_context(&self) -> ConditionContext<'_> {
            let mut c = ConditionContext::new(&self.view, self.source);
            if let Some(t) = self.target {
                c = c.with_target(t);
            }
            c
        }
        fn warn_once(&self) -> &WarnOnce {
            &self.warn
        }
        fn roll(&mut self, dice: DiceExpr) -> u32 {
            dice.roll(self.rng.as_mut().unwrap())
        }
        fn roll_percent(&mut self) -> f64 {
            (self.rng.as_mut().unwrap().roll_die(100) - 1) as f64
        }
        fn level_map_value(&self, name: &str, _who: EntityId) -> Option<DiceExpr> {
            self.level_tables.get(name).copied()
        }
        fn deal_damage(&mut self, target: EntityId, amount: u32, damage_type: &str) {
            self.damage_dealt.push((target, amount, damage_type.to_string()));
        }
        fn heal(&mut self, target: EntityId, amount: u32) {
            self.healed.push((target, amount));
        }
        fn apply_status(&mut self, target: EntityId, status_id: &str, _duration: Option<i32>) -> bool {
            self.statuses_applied.push((target, status_id.to_string()));
            true
        }
        fn remove_status(&mut self, target: EntityId, status_id: &str) {
            self.statuses_removed.push((target, status_id.to_string()));
        }
        fn restore_resource(&mut self, _target: EntityId, _resource: &str, _amount: i32, _level: Option<u8>) {}
        fn break_concentration(&mut self, _target: EntityId, _reason: Option<&str>) {}
        fn stabilize(&mut self, target: EntityId) {
            self.stabilized.push(target);
        }
        fn force(&mut self, _target: EntityId, _distance: i32, _origin: ForceOrigin) -> ForcedMovementResult {
            ForcedMovementResult::default()
        }
        fn set_status_duration(&mut self, _target: EntityId, _status_id: &str, _value: i32, _mode: DurationMode) {}
        fn use_attack(&mut self, _source: EntityId, _target: EntityId) {}
    }

    fn ctx(source: EntityId, target: Option<EntityId>) -> RecordingCtx {
        RecordingCtx { source, target, rng: Some(PcgRng::from_seed(1)), ..Default::default() }
    }

    #[test]
    fn deal_damage_and_apply_status_execute_in_order() {
        let mut c = ctx(EntityId(1), Some(EntityId(2)));
        let terms = super::super::parser::parse_chain("DealDamage(2d6,Fire);ApplyStatus('BURNING')");
        execute_chain(&terms, &mut c);
        assert_eq!(c.damage_dealt.len(), 1);
        assert_eq!(c.damage_dealt[0].0, EntityId(2));
        assert_eq!(c.damage_dealt[0].2, "Fire");
        assert_eq!(c.statuses_applied, vec![(EntityId(2), "BURNING".to_string())]);
    }

    #[test]
    fn gated_term_has_no_side_effects_when_false() {
        let mut c = ctx(EntityId(1), Some(EntityId(2)));
        let terms = super::super::parser::parse_chain("IF(HasStatus('RAGING')):DealDamage(1d8,Fire)");
        execute_chain(&terms, &mut c);
        assert!(c.damage_dealt.is_empty());
    }

    #[test]
    fn stabilize_routes_to_target_by_default() {
        let mut c = ctx(EntityId(1), Some(EntityId(2)));
        let terms = super::super::parser::parse_chain("Stabilize()");
        execute_chain(&terms, &mut c);
        assert_eq!(c.stabilized, vec![EntityId(2)]);
    }

    #[test]
    fn self_routing_overrides_default_target() {
        let mut c = ctx(EntityId(1), Some(EntityId(2)));
        let terms = super::super::parser::parse_chain("SELF:RegainHitPoints(2d4)");
        execute_chain(&terms, &mut c);
        assert_eq!(c.healed[0].0, EntityId(1));
    }

    #[test]
    fn level_map_value_resolved_through_context() {
        let mut c = ctx(EntityId(1), Some(EntityId(2)));
        c.level_tables.insert("RageDamage".to_string(), DiceExpr { count: 1, sides: 1, modifier: 2 });
        let terms = super::super::parser::parse_chain("DealDamage(LevelMapValue(RageDamage),Bludgeoning)");
        execute_chain(&terms, &mut c);
        assert_eq!(c.damage_dealt[0].1, 2);
    }

    #[test]
    fn unknown_functor_is_a_logged_no_op() {
        let mut c = ctx(EntityId(1), Some(EntityId(2)));
        let terms = super::super::parser::parse_chain("Stabilize();TotallyMadeUp(1);RegainHitPoints(1d4)");
        execute_chain(&terms, &mut c);
        assert_eq!(c.stabilized.len(), 1);
        assert_eq!(c.healed.len(), 1);
    }
}
