//! `Combatant` (spec.md §3 "Runtime entities"): the mutable per-encounter
//! state one participant owns — identity, life state, position, resolved
//! stat block, and the four subsystems (`BoostContainer`, `PassiveManager`,
//! `StatusSet`, `ActionResourcePool`) that track everything installed on
//! it. `ddrc-core` defines this as plain data; the roster, turn order, and
//! anything implementing `CombatView`/`CombatEnv` over a collection of
//! these belongs to the embedding game (spec.md §6 "consumed" interfaces).

use crate::boost::{BoostContainer, BoostInstance, BoostSource};
use crate::definitions::StatBlock;
use crate::passive::PassiveManager;
use crate::resource::ActionResourcePool;
use crate::status::StatusSet;
use crate::types::{EntityId, Faction, LifeState, SourceKind};

/// A position in the encounter's grid/world space, used only for distance
/// queries (`CombatView::distance`, range-gated conditions). `ddrc-core`
/// never interprets coordinates beyond straight-line distance.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// One combatant's full runtime state.
pub struct Combatant {
    pub id: EntityId,
    pub faction: Faction,
    pub life_state: LifeState,
    pub position: Position,
    pub initiative: i32,
    /// The resolved character/creature sheet (class levels, proficiencies,
    /// ability scores, max HP) this combatant is built from.
    pub sheet: StatBlock,
    pub current_hit_points: i32,
    pub equipment: Vec<StatBlock>,
    pub boosts: BoostContainer,
    pub passives: PassiveManager,
    pub statuses: StatusSet,
    pub resources: ActionResourcePool,
}

impl Combatant {
    /// Builds a fresh combatant from its resolved sheet, with full HP and
    /// no boosts/passives/statuses installed yet — callers equip
    /// starting gear and grant innate passives via [`Self::equip`] /
    /// [`PassiveManager::grant`] afterward.
    pub fn new(id: EntityId, faction: Faction, sheet: StatBlock) -> Self {
        let current_hit_points = sheet.vitality;
        Self {
            id,
            faction,
            life_state: LifeState::Alive,
            position: Position::default(),
            initiative: 0,
            sheet,
            current_hit_points,
            equipment: Vec::new(),
            boosts: BoostContainer::new(),
            passives: PassiveManager::new(),
            statuses: StatusSet::new(),
            resources: ActionResourcePool::new(),
        }
    }

    /// Installs an equipped item's `Boosts` field under
    /// `SourceKind::Equipment`, attributed by the item's own id — removing
    /// the item later is `unequip(item_id)`. Malformed boost terms are
    /// dropped with a warning rather than blocking the rest of the item's
    /// boosts (spec.md §7 "DslError").
    pub fn equip(&mut self, item: StatBlock) {
        let source = BoostSource::new(SourceKind::Equipment, item.id.clone());
        for term in crate::boost::parse_boosts(&item.boosts) {
            if let Some(warning) = &term.warning {
                tracing::debug!(item_id = %item.id, warning, "equipment boost term dropped");
            }
            if matches!(term.value, crate::boost::BoostValue::Unrecognized(..)) {
                continue;
            }
            self.boosts.add(BoostInstance::new(term.value, source.clone()));
        }
        self.equipment.push(item);
    }

    /// Uninstalls every boost attributed to `item_id` and drops it from the
    /// equipped list. Returns `false` if nothing by that id was equipped.
    pub fn unequip(&mut self, item_id: &str) -> bool {
        let Some(idx) = self.equipment.iter().position(|e| e.id == item_id) else {
            return false;
        };
        self.equipment.remove(idx);
        self.boosts.remove_by_source(SourceKind::Equipment, item_id) > 0
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.life_state, LifeState::Alive | LifeState::Downed)
    }

    /// Applies incoming damage, clamping at zero, and transitions life
    /// state from `Alive` to `Downed` at zero HP (the death-saves/Dead
    /// transition beyond that point is driven by the embedding combat
    /// loop, which tracks death saves outside this crate's scope).
    pub fn apply_damage(&mut self, amount: u32) {
        self.current_hit_points = (self.current_hit_points - amount as i32).max(0);
        if self.current_hit_points == 0 && self.life_state == LifeState::Alive {
            self.life_state = LifeState::Downed;
        }
    }

    /// Heals, clamping at the sheet's max vitality. Does not revive a
    /// `Dead` combatant — only the embedding game's resurrection effects
    /// would transition out of `Dead`, and that's outside this crate.
    pub fn heal(&mut self, amount: u32) {
        if self.life_state == LifeState::Dead {
            return;
        }
        self.current_hit_points = (self.current_hit_points + amount as i32).min(self.sheet.vitality);
        if self.current_hit_points > 0 && matches!(self.life_state, LifeState::Downed | LifeState::Unconscious) {
            self.life_state = LifeState::Alive;
        }
    }

    /// `Stabilize` functor semantics (spec.md §4.E): a Downed combatant
    /// becomes Unconscious at 0 HP with death saves cleared; no-op
    /// otherwise.
    pub fn stabilize(&mut self) {
        if self.life_state == LifeState::Downed {
            self.life_state = LifeState::Unconscious;
            self.current_hit_points = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::AbilityScores;

    fn sheet() -> StatBlock {
        StatBlock {
            id: "Fighter".to_string(),
            parent_id: None,
            kind: crate::definitions::StatBlockKind::Character,
            abilities: AbilityScores::default(),
            armor_class: 10,
            armor_class_ability_cap: None,
            armor_class_ability: "Dexterity".to_string(),
            vitality: 20,
            resistances: Vec::new(),
            granted_action_resources: Vec::new(),
            passives: Vec::new(),
            damage: None,
            damage_type: None,
            weapon_properties: Vec::new(),
            proficiency_groups: Vec::new(),
            boosts: String::new(),
        }
    }

    fn plate() -> StatBlock {
        let mut armor = sheet();
        armor.id = "Plate".to_string();
        armor.kind = crate::definitions::StatBlockKind::Armor;
        armor.armor_class = 16;
        armor.armor_class_ability_cap = Some(0);
        armor.boosts = "AC(2)".to_string();
        armor
    }

    #[test]
    fn equip_installs_boosts_unequip_removes_them() {
        let mut c = Combatant::new(EntityId(1), Faction::Player, sheet());
        c.equip(plate());
        assert_eq!(c.boosts.len(), 1);
        assert!(c.unequip("Plate"));
        assert!(c.boosts.is_empty());
    }

    #[test]
    fn damage_to_zero_downs_then_heal_revives() {
        let mut c = Combatant::new(EntityId(1), Faction::Player, sheet());
        c.apply_damage(25);
        assert_eq!(c.current_hit_points, 0);
        assert_eq!(c.life_state, LifeState::Downed);
        c.heal(5);
        assert_eq!(c.life_state, LifeState::Alive);
        assert_eq!(c.current_hit_points, 5);
    }

    #[test]
    fn stabilize_only_affects_downed_combatants() {
        let mut c = Combatant::new(EntityId(1), Faction::Player, sheet());
        c.stabilize();
        assert_eq!(c.life_state, LifeState::Alive);
        c.apply_damage(20);
        c.stabilize();
        assert_eq!(c.life_state, LifeState::Unconscious);
    }
}
