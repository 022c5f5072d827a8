//! Combat context accessor (spec.md §6.2): the narrow set of collaborators
//! `ddrc-core` consumes from the embedding game rather than owning itself
//! — the 3D presentation layer, scene/world state, and anything else
//! outside the rules core's concern. `ddrc-core` only defines the trait
//! (plus a test double); the embedding game implements it over its own
//! world/encounter state.

use crate::dice::DiceExpr;
use crate::functor::ForceOrigin;
use crate::types::EntityId;

/// Outcome of a forced-movement attempt, reported back so `Force` can
/// note actual distance moved and whatever blocked it (spec.md §4.E
/// `Force` functor: "reports actual distance moved and blockers").
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForcedMovementResult {
    pub distance_moved: i32,
    pub blocked_by: Option<EntityId>,
}

/// The environment the rules core queries for everything it doesn't own:
/// the live roster, the surface manager, concentration, extra attacks,
/// and forced movement. All default-method bodies are inert no-ops so a
/// minimal embedder (or a unit test) can implement just the handful of
/// methods a given scenario actually exercises.
pub trait CombatEnv {
    /// All combatant ids currently in the encounter, in initiative order.
    fn list_all(&self) -> Vec<EntityId>;

    /// Opaque handle to the surface manager (fire/water/poison terrain),
    /// consumed by functors and conditions that reference surfaces.
    /// `ddrc-core` never inspects its contents.
    fn surface_manager(&self) -> Option<&dyn std::any::Any> {
        None
    }

    /// Breaks `who`'s concentration, if any, for the given reason.
    fn break_concentration(&mut self, who: EntityId, reason: Option<&str>) {
        let _ = (who, reason);
    }

    /// Triggers one extra attack `source` -> `target` through the
    /// embedding game's combat system (the `UseAttack` functor).
    fn extra_attack(&mut self, source: EntityId, target: EntityId) {
        let _ = (source, target);
    }

    /// Pushes or pulls `target` by `distance` along `origin`'s axis.
    fn forced_movement(&mut self, target: EntityId, origin: ForceOrigin, distance: i32) -> ForcedMovementResult {
        let _ = (target, origin, distance);
        ForcedMovementResult::default()
    }

    /// Resolves `DealDamage`'s `LevelMapValue(name)` indirection: looks up
    /// `who`'s class level in the table named `name` and returns the dice
    /// expression for that level (e.g. Barbarian Rage damage by level).
    fn level_map_value(&self, name: &str, who: EntityId) -> Option<DiceExpr> {
        let _ = (name, who);
        None
    }
}

/// A `CombatEnv` with an empty roster and every collaborator inert — for
/// tests that only exercise functors/queries which don't reach the
/// environment at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEnv;

impl CombatEnv for NullEnv {
    fn list_all(&self) -> Vec<EntityId> {
        Vec::new()
    }
}
