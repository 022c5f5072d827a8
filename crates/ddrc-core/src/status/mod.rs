//! Status runtime (component F): per-combatant lifecycle of applied
//! statuses — install/refresh/tick/remove, atomic boost install, stacking
//! by `StackId`, group removal, and save-to-remove.
//!
//! `StatusSet` does not own a `BoostContainer` itself; it's handed one by
//! the caller (the combatant wrapper that owns both) so boost aggregation
//! stays in one place (`crate::boost`) regardless of what installed a
//! given boost.

use crate::boost::{BoostContainer, BoostHandle, BoostInstance, BoostSource, BoostValue};
use crate::definitions::{DurationRule, RemoveOnSave, StatusDefinition, StatusType};
use crate::functor::{execute_chain, parse_chain, FunctorContext};
use crate::types::SourceKind;

/// How a re-applied status with a matching `StackId` resolves its
/// duration against the instance already present (spec.md §4.F
/// "stacking rule").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPolicy {
    /// Keep whichever duration is longer (the default).
    ReplaceIfLonger,
    /// Always take the incoming duration, even if shorter.
    AlwaysReplace,
}

/// When a status's `OnTick` functors fire relative to its owner's turn.
/// Every status definition currently ticks at turn end; this exists as
/// the configurable seam spec.md §4.F calls for ("configurable per
/// definition") even though no source data exercises the alternative yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickTiming {
    OwnerTurnEnd,
    OwnerTurnStart,
}

/// Lifecycle state of one status instance (spec.md §4.F state machine).
/// `SaveCleared` is folded into `Removed` — both are terminal and
/// observably identical once reached; the distinction only mattered for
/// which functor chain caused the transition, not for combatant state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Active,
    Removed,
}

/// One applied status on a combatant: its remaining duration, the boost
/// handles it installed (so removal can precisely uninstall them), and
/// the lifecycle hooks captured from its definition at apply time.
#[derive(Clone, Debug)]
pub struct StatusInstance {
    pub status_id: String,
    pub status_type: StatusType,
    pub stack_id: Option<String>,
    pub groups: Vec<String>,
    pub survives_death: bool,
    pub passives: Vec<String>,
    remove_on_save: Option<RemoveOnSave>,
    remaining: Option<u32>,
    on_tick: Option<String>,
    on_remove: Option<String>,
    boost_handles: Vec<BoostHandle>,
    lifecycle: Lifecycle,
}

impl StatusInstance {
    /// Remaining duration in turns, or `None` for an infinite status.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }
}

fn duration_to_remaining(rule: DurationRule) -> Option<u32> {
    match rule {
        DurationRule::Infinite => None,
        DurationRule::Turns(n) => Some(n),
    }
}

/// Installs every term of a status's `Boosts` field under that status's
/// source attribution. Returns the handles installed so far plus whether
/// every term coerced to a recognized `BoostValue` — a term the boost
/// parser can't recognize is logged, and the caller is responsible for
/// rolling the partial installation back (spec.md §5 "Status application
/// is atomic: if the install step partially fails ..., all already-
/// installed boosts from that status are rolled back").
fn install_boosts(status_id: &str, boosts_field: &str, container: &mut BoostContainer) -> (Vec<BoostHandle>, bool) {
    let source = BoostSource::new(SourceKind::Status, status_id.to_string());
    let mut installed = Vec::new();
    let mut all_recognized = true;
    for term in crate::boost::parse_boosts(boosts_field) {
        if let Some(warning) = &term.warning {
            tracing::debug!(status_id, warning, "status boost term dropped");
        }
        if matches!(term.value, BoostValue::Unrecognized(..)) {
            all_recognized = false;
            continue;
        }
        if let Some(handle) = container.add(BoostInstance::new(term.value, source.clone())) {
            installed.push(handle);
        }
    }
    (installed, all_recognized)
}

/// Per-combatant collection of applied statuses.
#[derive(Clone, Debug, Default)]
pub struct StatusSet {
    instances: Vec<StatusInstance>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusInstance> {
        self.instances.iter()
    }

    pub fn has(&self, status_id: &str) -> bool {
        self.instances.iter().any(|i| i.status_id == status_id)
    }

    pub fn has_type(&self, status_type: &StatusType) -> bool {
        self.instances.iter().any(|i| &i.status_type == status_type)
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.instances.iter().any(|i| i.groups.iter().any(|g| g == group))
    }

    fn find_stack_match(&self, def: &StatusDefinition) -> Option<usize> {
        self.instances.iter().position(|inst| match (&inst.stack_id, &def.stack_id) {
            (Some(a), Some(b)) => a == b,
            _ => inst.status_id == def.id,
        })
    }

    /// Applies `def`. The caller is responsible for any `StatusImmunity`
    /// check (that's a boost-container query keyed on a condition context
    /// this module doesn't have) before calling this — an immune target
    /// should never reach `apply` at all.
    ///
    /// If a matching instance already exists (same `StackId`, or same
    /// status id when neither names one), it is refreshed in place per
    /// `policy` rather than duplicated (spec.md §4.F "stacking rule").
    /// Otherwise boosts are installed, `OnApply` functors run, and a new
    /// `Active` instance is recorded.
    ///
    /// If any boost term fails to coerce, the install is rolled back in
    /// full (every handle already added is removed from `container`), no
    /// `OnApply` functor runs, and no instance is recorded — `false` is
    /// returned (spec.md §5 atomicity guarantee).
    pub fn apply(
        &mut self,
        def: &StatusDefinition,
        policy: StackPolicy,
        container: &mut BoostContainer,
        exec: &mut dyn FunctorContext,
    ) -> bool {
        if let Some(idx) = self.find_stack_match(def) {
            self.refresh(idx, def, policy);
            return true;
        }

        let (boost_handles, all_recognized) = install_boosts(&def.id, &def.boosts, container);
        if !all_recognized {
            for handle in &boost_handles {
                container.remove_by_handle(*handle);
            }
            tracing::warn!(
                status_id = %def.id,
                "status application rolled back: one or more boost terms failed to parse"
            );
            return false;
        }
        if let Some(chain) = &def.on_apply {
            execute_chain(&parse_chain(chain), exec);
        }

        self.instances.push(StatusInstance {
            status_id: def.id.clone(),
            status_type: def.status_type.clone(),
            stack_id: def.stack_id.clone(),
            groups: def.groups.clone(),
            survives_death: def.survives_death,
            passives: def.passives.clone(),
            remove_on_save: def.remove_on_save.clone(),
            remaining: duration_to_remaining(def.duration),
            on_tick: def.on_tick.clone(),
            on_remove: def.on_remove.clone(),
            boost_handles,
            lifecycle: Lifecycle::Active,
        });
        true
    }

    fn refresh(&mut self, idx: usize, def: &StatusDefinition, policy: StackPolicy) {
        let incoming = duration_to_remaining(def.duration);
        let inst = &mut self.instances[idx];
        inst.remaining = match policy {
            StackPolicy::AlwaysReplace => incoming,
            StackPolicy::ReplaceIfLonger => match (inst.remaining, incoming) {
                (None, _) | (_, None) => None,
                (Some(a), Some(b)) => Some(a.max(b)),
            },
        };
    }

    /// Removes `status_id`, firing its `OnRemove` functors and uninstalling
    /// every boost it installed. Returns `false` if no such status is
    /// present — removing a nonexistent status is a reported no-op, never
    /// a panic (spec.md §7 "RuntimeViolation").
    pub fn remove(&mut self, status_id: &str, container: &mut BoostContainer, exec: &mut dyn FunctorContext) -> bool {
        let Some(idx) = self.instances.iter().position(|i| i.status_id == status_id) else {
            return false;
        };
        let inst = self.instances.remove(idx);
        if let Some(chain) = &inst.on_remove {
            execute_chain(&parse_chain(chain), exec);
        }
        for handle in &inst.boost_handles {
            container.remove_by_handle(*handle);
        }
        true
    }

    /// Removes every status sharing `group` (spec.md §4.F "groups").
    pub fn remove_group(&mut self, group: &str, container: &mut BoostContainer, exec: &mut dyn FunctorContext) -> usize {
        let ids: Vec<String> =
            self.instances.iter().filter(|i| i.groups.iter().any(|g| g == group)).map(|i| i.status_id.clone()).collect();
        ids.iter().filter(|id| self.remove(id, container, exec)).count()
    }

    /// The `RemoveStatus` functor's routing rule (spec.md §9 Open
    /// Questions: "current data is ambiguous; implement id-first,
    /// group-fallback, and log matches from the fallback"). Tries an exact
    /// status-id match first; if none is present, treats `name` as a group
    /// id and removes every member, logging that the fallback fired.
    /// Returns the count of statuses actually removed.
    pub fn remove_by_id_or_group(&mut self, name: &str, container: &mut BoostContainer, exec: &mut dyn FunctorContext) -> usize {
        if self.remove(name, container, exec) {
            return 1;
        }
        let removed = self.remove_group(name, container, exec);
        if removed > 0 {
            tracing::debug!(name, removed, "RemoveStatus matched no status id, removed by group fallback");
        }
        removed
    }

    /// Advances every active status by one tick: fires `OnTick`, decrements
    /// non-infinite durations, and removes any that reach zero. Returns the
    /// ids removed this tick, in removal order.
    pub fn tick(&mut self, container: &mut BoostContainer, exec: &mut dyn FunctorContext) -> Vec<String> {
        let mut expired = Vec::new();
        for inst in &mut self.instances {
            if let Some(chain) = inst.on_tick.clone() {
                execute_chain(&parse_chain(&chain), exec);
            }
            if let Some(remaining) = inst.remaining {
                let next = remaining.saturating_sub(1);
                inst.remaining = Some(next);
                if next == 0 {
                    expired.push(inst.status_id.clone());
                }
            }
        }
        let mut removed = Vec::new();
        for id in expired {
            if self.remove(&id, container, exec) {
                removed.push(id);
            }
        }
        removed
    }

    /// Handles a reported save result: removes every status whose
    /// `RemoveEvent` names this exact `(ability, dc)` pair and the save
    /// succeeded (spec.md §4.F "save-to-remove"). Returns the ids removed.
    pub fn handle_save_result(
        &mut self,
        ability: &str,
        dc: i32,
        success: bool,
        container: &mut BoostContainer,
        exec: &mut dyn FunctorContext,
    ) -> Vec<String> {
        if !success {
            return Vec::new();
        }
        let ids: Vec<String> = self
            .instances
            .iter()
            .filter(|i| matches!(&i.remove_on_save, Some(r) if r.ability.eq_ignore_ascii_case(ability) && r.dc == dc))
            .map(|i| i.status_id.clone())
            .collect();
        ids.into_iter().filter(|id| self.remove(id, container, exec)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{CombatView, ConditionContext};
    use crate::dice::DiceExpr;
    use crate::env::ForcedMovementResult;
    use crate::error::WarnOnce;
    use crate::functor::DurationMode;
    use crate::functor::ForceOrigin;
    use crate::query::PcgRng;
    use crate::statblock::RawRecord;
    use crate::types::{EntityId, Faction, LifeState};
    use std::collections::BTreeMap;

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
            None
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

    struct InertCtx {
        rng: PcgRng,
        warn: WarnOnce,
        view: EmptyView,
    }

    impl FunctorContext for InertCtx {
        fn source(&self) -> EntityId {
            EntityId(1)
        }
        fn target(&self) -> Option<EntityId> {
            Some(EntityId(1))
        }
        fn condition_context(&self) -> ConditionContext<'_> {
            ConditionContext::new(&self.view, EntityId(1))
        }
        fn warn_once(&self) -> &WarnOnce {
            &self.warn
        }
        fn roll(&mut self, dice: DiceExpr) -> u32 {
            dice.roll(&mut self.rng)
        }
        fn roll_percent(&mut self) -> f64 {
            0.0
        }
        fn level_map_value(&self, _name: &str, _who: EntityId) -> Option<DiceExpr> {
            None
        }
        fn deal_damage(&mut self, _target: EntityId, _amount: u32, _damage_type: &str) {}
        fn heal(&mut self, _target: EntityId, _amount: u32) {}
        fn apply_status(&mut self, _target: EntityId, _status_id: &str, _duration: Option<i32>) -> bool {
            true
        }
        fn remove_status(&mut self, _target: EntityId, _status_id: &str) {}
        fn restore_resource(&mut self, _t: EntityId, _r: &str, _a: i32, _l: Option<u8>) {}
        fn break_concentration(&mut self, _t: EntityId, _r: Option<&str>) {}
        fn stabilize(&mut self, _t: EntityId) {}
        fn force(&mut self, _t: EntityId, _d: i32, _o: ForceOrigin) -> ForcedMovementResult {
            ForcedMovementResult::default()
        }
        fn set_status_duration(&mut self, _t: EntityId, _s: &str, _v: i32, _m: DurationMode) {}
        fn use_attack(&mut self, _s: EntityId, _t: EntityId) {}
    }

    fn inert() -> InertCtx {
        InertCtx { rng: PcgRng::from_seed(1), warn: WarnOnce::new(), view: EmptyView }
    }

    fn bless_record(duration: &str) -> RawRecord {
        let mut data = BTreeMap::new();
        data.insert("DisplayName".to_string(), "Bless".to_string());
        data.insert("Boosts".to_string(), "RollBonus(AttackRoll,1d4);RollBonus(SavingThrow,1d4)".to_string());
        data.insert("Duration".to_string(), duration.to_string());
        RawRecord { name: "Bless".to_string(), kind: Some("Status".to_string()), parent: None, data }
    }

    #[test]
    fn apply_installs_boosts_and_fires_on_apply() {
        let (def, _) = StatusDefinition::coerce("Bless", &bless_record("10"));
        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        assert!(statuses.apply(&def, StackPolicy::ReplaceIfLonger, &mut container, &mut exec));
        assert!(statuses.has("Bless"));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn tick_to_zero_removes_status_and_uninstalls_boosts() {
        let (def, _) = StatusDefinition::coerce("Bless", &bless_record("1"));
        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        statuses.apply(&def, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);
        let removed = statuses.tick(&mut container, &mut exec);
        assert_eq!(removed, vec!["Bless".to_string()]);
        assert!(!statuses.has("Bless"));
        assert!(container.is_empty());
    }

    #[test]
    fn apply_rolls_back_all_boosts_when_one_term_fails_to_parse() {
        let mut data = BTreeMap::new();
        data.insert("DisplayName".to_string(), "Botched".to_string());
        data.insert("Boosts".to_string(), "AC(2);BadTerm(xyz)".to_string());
        let record = RawRecord { name: "Botched".to_string(), kind: Some("Status".to_string()), parent: None, data };
        let (def, _) = StatusDefinition::coerce("Botched", &record);

        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        let applied = statuses.apply(&def, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);

        assert!(!applied, "a status with an unparseable boost term must not be applied");
        assert!(!statuses.has("Botched"));
        assert!(container.is_empty(), "AC(2) must be rolled back along with the failed BadTerm(xyz)");
    }

    #[test]
    fn reapplication_with_same_stack_id_refreshes_not_duplicates() {
        let (def, _) = StatusDefinition::coerce("Bless", &bless_record("10"));
        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        statuses.apply(&def, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);
        let (short_def, _) = StatusDefinition::coerce("Bless", &bless_record("3"));
        statuses.apply(&short_def, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses.iter().next().unwrap().remaining(), Some(10));
        assert_eq!(container.len(), 2, "refresh must not reinstall duplicate boosts");
    }

    #[test]
    fn always_replace_takes_the_shorter_incoming_duration() {
        let (def, _) = StatusDefinition::coerce("Bless", &bless_record("10"));
        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        statuses.apply(&def, StackPolicy::AlwaysReplace, &mut container, &mut exec);
        let (short_def, _) = StatusDefinition::coerce("Bless", &bless_record("3"));
        statuses.apply(&short_def, StackPolicy::AlwaysReplace, &mut container, &mut exec);
        assert_eq!(statuses.iter().next().unwrap().remaining(), Some(3));
    }

    #[test]
    fn infinite_duration_never_expires_on_tick() {
        let (def, _) = StatusDefinition::coerce("Bless", &bless_record("-1"));
        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        statuses.apply(&def, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);
        for _ in 0..50 {
            statuses.tick(&mut container, &mut exec);
        }
        assert!(statuses.has("Bless"));
    }

    #[test]
    fn remove_group_removes_every_member() {
        let mut data_a = BTreeMap::new();
        data_a.insert("StatusGroups".to_string(), "Concentration".to_string());
        let record_a = RawRecord { name: "SpellA".to_string(), kind: Some("Status".to_string()), parent: None, data: data_a };
        let mut data_b = BTreeMap::new();
        data_b.insert("StatusGroups".to_string(), "Concentration".to_string());
        let record_b = RawRecord { name: "SpellB".to_string(), kind: Some("Status".to_string()), parent: None, data: data_b };

        let (def_a, _) = StatusDefinition::coerce("SpellA", &record_a);
        let (def_b, _) = StatusDefinition::coerce("SpellB", &record_b);
        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        statuses.apply(&def_a, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);
        statuses.apply(&def_b, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);
        assert_eq!(statuses.remove_group("Concentration", &mut container, &mut exec), 2);
        assert!(statuses.is_empty());
    }

    #[test]
    fn remove_by_id_or_group_prefers_exact_id() {
        let mut data = BTreeMap::new();
        data.insert("StatusGroups".to_string(), "BLESS".to_string());
        let record = RawRecord { name: "BLESS".to_string(), kind: Some("Status".to_string()), parent: None, data };
        let (def, _) = StatusDefinition::coerce("BLESS", &record);
        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        statuses.apply(&def, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);
        assert_eq!(statuses.remove_by_id_or_group("BLESS", &mut container, &mut exec), 1);
        assert!(statuses.is_empty());
    }

    #[test]
    fn remove_by_id_or_group_falls_back_to_group() {
        let mut data_a = BTreeMap::new();
        data_a.insert("StatusGroups".to_string(), "Concentration".to_string());
        let record_a = RawRecord { name: "SpellA".to_string(), kind: Some("Status".to_string()), parent: None, data: data_a };
        let mut data_b = BTreeMap::new();
        data_b.insert("StatusGroups".to_string(), "Concentration".to_string());
        let record_b = RawRecord { name: "SpellB".to_string(), kind: Some("Status".to_string()), parent: None, data: data_b };
        let (def_a, _) = StatusDefinition::coerce("SpellA", &record_a);
        let (def_b, _) = StatusDefinition::coerce("SpellB", &record_b);
        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        statuses.apply(&def_a, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);
        statuses.apply(&def_b, StackPolicy::ReplaceIfLonger, &mut container, &mut exec);
        // "Concentration" isn't a status id, so this only removes anything
        // via the group fallback.
        assert_eq!(statuses.remove_by_id_or_group("Concentration", &mut container, &mut exec), 2);
        assert!(statuses.is_empty());
    }

    #[test]
    fn malformed_boost_term_is_dropped_not_fatal() {
        let mut data = BTreeMap::new();
        data.insert("Boosts".to_string(), "AC(2);TotallyMadeUp(1)".to_string());
        let record = RawRecord { name: "Shaky".to_string(), kind: Some("Status".to_string()), parent: None, data };
        let (def, _) = StatusDefinition::coerce("Shaky", &record);
        let mut statuses = StatusSet::new();
        let mut container = BoostContainer::new();
        let mut exec = inert();
        assert!(statuses.apply(&def, StackPolicy::ReplaceIfLonger, &mut container, &mut exec));
        assert_eq!(container.len(), 1);
    }
}
