//! The read-only snapshot a condition expression evaluates against.
//!
//! `ConditionContext` carries the trigger-specific facts (is this a melee
//! attack? did it crit?) while `CombatView` is the narrow query surface
//! into combatant state (status/passive membership, resources, abilities)
//! that condition functions dispatch through. Evaluation never mutates
//! either — a condition is a pure predicate over a fixed snapshot, exactly
//! as spec.md requires.

use crate::types::{AttackFlavor, DamageType, EntityId, Faction, LifeState};

/// Narrow read interface into combatant state, implemented by whatever
/// owns the live roster (an encounter/world type outside this crate's
/// concern — `ddrc-core` only needs the trait).
pub trait CombatView {
    fn has_status(&self, who: EntityId, status_id: &str) -> bool;
    fn has_status_type(&self, who: EntityId, status_type: &str) -> bool;
    fn has_passive(&self, who: EntityId, passive_id: &str) -> bool;
    fn life_state(&self, who: EntityId) -> Option<LifeState>;
    fn faction(&self, who: EntityId) -> Option<Faction>;
    fn resource_current(&self, who: EntityId, resource_id: &str) -> Option<i64>;
    fn resource_max(&self, who: EntityId, resource_id: &str) -> Option<i64>;
    fn ability_score(&self, who: EntityId, ability: &str) -> Option<i32>;
    fn ability_modifier(&self, who: EntityId, ability: &str) -> Option<i32>;
    fn distance(&self, a: EntityId, b: EntityId) -> Option<f64>;
}

/// Which combatant a qualified condition function (`context.Source.Fn` /
/// `context.Target.Fn`) reads. Unqualified calls default to `Source`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Qualifier {
    Source,
    Target,
}

/// The trigger-scoped facts a condition expression is evaluated against.
/// Built fresh per evaluation by the caller (query layer, status runtime,
/// or functor executor) from whatever action is in flight.
pub struct ConditionContext<'a> {
    pub view: &'a dyn CombatView,
    pub source: EntityId,
    pub target: Option<EntityId>,
    pub attack_flavor: Option<AttackFlavor>,
    pub damage_type: Option<DamageType>,
    pub is_hit: Option<bool>,
    pub is_critical: Option<bool>,
    pub spell_level: Option<u8>,
    pub spell_school: Option<String>,
}

impl<'a> ConditionContext<'a> {
    pub fn new(view: &'a dyn CombatView, source: EntityId) -> Self {
        Self {
            view,
            source,
            target: None,
            attack_flavor: None,
            damage_type: None,
            is_hit: None,
            is_critical: None,
            spell_level: None,
            spell_school: None,
        }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_attack_flavor(mut self, flavor: AttackFlavor) -> Self {
        self.attack_flavor = Some(flavor);
        self
    }

    pub fn with_hit(mut self, hit: bool, critical: bool) -> Self {
        self.is_hit = Some(hit);
        self.is_critical = Some(critical);
        self
    }

    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = Some(damage_type);
        self
    }

    pub fn with_spell(mut self, level: u8, school: impl Into<String>) -> Self {
        self.spell_level = Some(level);
        self.spell_school = Some(school.into());
        self
    }

    /// Resolves a qualifier to the entity it names. `Target` with no
    /// target bound falls back to `Source` — most predicates about a
    /// targetless trigger (e.g. end-of-turn ticks) still want *someone*.
    pub fn resolve(&self, qualifier: Qualifier) -> EntityId {
        match qualifier {
            Qualifier::Source => self.source,
            Qualifier::Target => self.target.unwrap_or(self.source),
        }
    }
}
