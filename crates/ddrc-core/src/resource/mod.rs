//! Resource accounting (component H): per-combatant action economy and
//! leveled spell slots. `ActionResourcePool` stores current/max arrays
//! indexed by spell level `0..=9` (index 0 is the flat, non-leveled case
//! — Action, BonusAction, Reaction, Movement); replenishment resets
//! `current` to `max` for whichever resources match a fired trigger.

use std::collections::HashMap;

use crate::definitions::{ActionResourceDefinition, ReplenishTrigger};

const LEVELS: usize = 10;

#[derive(Clone, Debug)]
struct ResourceState {
    current: [i32; LEVELS],
    max: [i32; LEVELS],
    replenish_trigger: ReplenishTrigger,
}

impl ResourceState {
    fn new(replenish_trigger: ReplenishTrigger) -> Self {
        Self { current: [0; LEVELS], max: [0; LEVELS], replenish_trigger }
    }
}

/// Per-combatant store of named, leveled resources.
#[derive(Clone, Debug, Default)]
pub struct ActionResourcePool {
    resources: HashMap<String, ResourceState>,
}

impl ActionResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource by name with zeroed current/max arrays,
    /// carrying its replenishment trigger from the definition. Call
    /// [`Self::set_max`] afterward to size it for a given combatant
    /// (spell slot maxes are character-level-dependent, not part of the
    /// shared definition).
    pub fn register(&mut self, def: &ActionResourceDefinition) {
        self.resources.entry(def.name.clone()).or_insert_with(|| ResourceState::new(def.replenish_trigger));
    }

    /// Sets both max and current to `amount` for `(name, level)` — the
    /// usual way a newly registered resource is sized for a combatant.
    pub fn set_max(&mut self, name: &str, level: u8, amount: i32) {
        if let Some(state) = self.resources.get_mut(name) {
            let idx = level as usize;
            if idx < LEVELS {
                state.max[idx] = amount;
                state.current[idx] = amount;
            }
        }
    }

    pub fn max(&self, name: &str, level: u8) -> i32 {
        self.resources.get(name).map(|s| s.max[level as usize]).unwrap_or(0)
    }

    pub fn current(&self, name: &str, level: u8) -> i32 {
        self.resources.get(name).map(|s| s.current[level as usize]).unwrap_or(0)
    }

    /// Whether `amount` is available at `level` without consuming it.
    /// An unregistered resource always reports insufficient — fail-closed,
    /// spec.md §7's "unknown data must never silently grant a benefit"
    /// applies here too.
    pub fn has(&self, name: &str, amount: i32, level: u8) -> bool {
        self.current(name, level) >= amount
    }

    /// Consumes `amount` at `level` if available; returns whether it
    /// succeeded. On failure, state is left unchanged.
    pub fn consume(&mut self, name: &str, amount: i32, level: u8) -> bool {
        if !self.has(name, amount, level) {
            return false;
        }
        if let Some(state) = self.resources.get_mut(name) {
            state.current[level as usize] -= amount;
        }
        true
    }

    /// Restores `amount` at `level`, clamped at the resource's max.
    pub fn restore(&mut self, name: &str, amount: i32, level: u8) {
        if let Some(state) = self.resources.get_mut(name) {
            let idx = level as usize;
            state.current[idx] = (state.current[idx] + amount).min(state.max[idx]);
        }
    }

    /// Resets `current` to `max`, for every level, of every resource whose
    /// replenish trigger matches `trigger` (spec.md §4.H "replenishment").
    pub fn replenish(&mut self, trigger: ReplenishTrigger) {
        for state in self.resources.values_mut() {
            if state.replenish_trigger == trigger {
                state.current = state.max;
            }
        }
    }
}

/// The aggregate cost of using an ability: an action-economy cost plus an
/// optional leveled slot cost plus any number of named extra costs
/// (material components tracked as a resource, class-specific resources,
/// …). Validated atomically — either every component can be paid and all
/// are consumed, or nothing is (spec.md §4.H "validate before executing").
#[derive(Clone, Debug, Default)]
pub struct SpellUseCost {
    pub action_resource: Option<String>,
    pub action_amount: i32,
    pub slot_resource: Option<String>,
    pub slot_level: u8,
    pub slot_count: i32,
    pub extra: Vec<(String, i32, u8)>,
}

impl SpellUseCost {
    fn components(&self) -> Vec<(&str, i32, u8)> {
        let mut out = Vec::new();
        if let Some(name) = &self.action_resource {
            out.push((name.as_str(), self.action_amount, 0));
        }
        if let Some(name) = &self.slot_resource {
            out.push((name.as_str(), self.slot_count, self.slot_level));
        }
        out.extend(self.extra.iter().map(|(n, a, l)| (n.as_str(), *a, *l)));
        out
    }

    /// Whether every component of this cost is currently affordable.
    pub fn can_afford(&self, pool: &ActionResourcePool) -> bool {
        self.components().into_iter().all(|(name, amount, level)| pool.has(name, amount, level))
    }

    /// Consumes every component if (and only if) all are affordable.
    /// Returns `false` — with no state mutated — if any component can't be
    /// paid.
    pub fn consume(&self, pool: &mut ActionResourcePool) -> bool {
        if !self.can_afford(pool) {
            return false;
        }
        for (name, amount, level) in self.components() {
            pool.consume(name, amount, level);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statblock::RawRecord;
    use std::collections::BTreeMap;

    fn spell_slot_def() -> ActionResourceDefinition {
        let mut data = BTreeMap::new();
        data.insert("ReplenishType".to_string(), "LongRest".to_string());
        data.insert("MaxLevel".to_string(), "9".to_string());
        data.insert("IsSpellResource".to_string(), "1".to_string());
        let record = RawRecord { name: "SpellSlot".to_string(), kind: None, parent: None, data };
        ActionResourceDefinition::coerce("SpellSlot", &record).0
    }

    #[test]
    fn wizard_spends_down_spell_slots_by_level() {
        let mut pool = ActionResourcePool::new();
        pool.register(&spell_slot_def());
        pool.set_max("SpellSlot", 1, 4);
        pool.set_max("SpellSlot", 2, 3);
        pool.set_max("SpellSlot", 3, 2);

        assert!(pool.consume("SpellSlot", 1, 2));
        assert!(pool.consume("SpellSlot", 1, 2));
        assert!(pool.consume("SpellSlot", 1, 2));
        assert!(!pool.consume("SpellSlot", 1, 2), "fourth cast at level 2 must fail, only 3 slots");
        assert_eq!(pool.current("SpellSlot", 1), 4, "level 1 slots untouched");
    }

    #[test]
    fn consume_is_atomic_across_cost_components() {
        let mut pool = ActionResourcePool::new();
        pool.register(&spell_slot_def());
        pool.set_max("SpellSlot", 2, 1);

        let mut data = BTreeMap::new();
        data.insert("ReplenishType".to_string(), "Turn".to_string());
        data.insert("MaxLevel".to_string(), "0".to_string());
        let action_def =
            ActionResourceDefinition::coerce("ActionPoint", &RawRecord { name: "ActionPoint".into(), kind: None, parent: None, data }).0;
        pool.register(&action_def);
        pool.set_max("ActionPoint", 0, 0);

        let cost = SpellUseCost {
            action_resource: Some("ActionPoint".to_string()),
            action_amount: 1,
            slot_resource: Some("SpellSlot".to_string()),
            slot_level: 2,
            slot_count: 1,
            extra: Vec::new(),
        };
        assert!(!cost.consume(&mut pool), "ActionPoint is at zero, whole cost must fail");
        assert_eq!(pool.current("SpellSlot", 2), 1, "slot must be untouched when the action cost fails");
    }

    #[test]
    fn replenish_only_touches_matching_trigger() {
        let mut pool = ActionResourcePool::new();
        let turn_def = {
            let mut data = BTreeMap::new();
            data.insert("ReplenishType".to_string(), "Turn".to_string());
            ActionResourceDefinition::coerce("Action", &RawRecord { name: "Action".into(), kind: None, parent: None, data }).0
        };
        pool.register(&turn_def);
        pool.set_max("Action", 0, 1);
        pool.register(&spell_slot_def());
        pool.set_max("SpellSlot", 1, 4);

        pool.consume("Action", 1, 0);
        pool.consume("SpellSlot", 2, 1);
        pool.replenish(ReplenishTrigger::Turn);

        assert_eq!(pool.current("Action", 0), 1, "Turn trigger refills Action");
        assert_eq!(pool.current("SpellSlot", 1), 2, "LongRest resource untouched by a Turn replenish");
    }

    #[test]
    fn unregistered_resource_is_never_affordable() {
        let pool = ActionResourcePool::new();
        assert!(!pool.has("Nonexistent", 1, 0));
    }
}
