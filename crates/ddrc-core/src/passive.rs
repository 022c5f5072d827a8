//! Passive grants: the permanent, duration-less sibling of a status
//! (spec.md §3 `PassiveManager`). A non-toggled passive's boosts install
//! the moment it's granted and stay until revoked; a toggled passive
//! grants the *capability* immediately but only installs its boosts while
//! switched on, and switching one on in a toggle group switches off every
//! other member of that group.

use crate::boost::{BoostContainer, BoostHandle, BoostInstance, BoostSource, BoostValue};
use crate::definitions::PassiveDefinition;
use crate::types::SourceKind;

#[derive(Clone, Debug)]
struct GrantedPassive {
    id: String,
    toggle_group: Option<String>,
    is_toggled: bool,
    active: bool,
    boosts_field: String,
    boost_handles: Vec<BoostHandle>,
}

fn install(passive_id: &str, boosts_field: &str, container: &mut BoostContainer) -> Vec<BoostHandle> {
    let source = BoostSource::new(SourceKind::Passive, passive_id.to_string());
    let mut installed = Vec::new();
    for term in crate::boost::parse_boosts(boosts_field) {
        if let Some(warning) = &term.warning {
            tracing::debug!(passive_id, warning, "passive boost term dropped");
        }
        if matches!(term.value, BoostValue::Unrecognized(..)) {
            continue;
        }
        if let Some(handle) = container.add(BoostInstance::new(term.value, source.clone())) {
            installed.push(handle);
        }
    }
    installed
}

/// Per-combatant collection of granted passives.
#[derive(Clone, Debug, Default)]
pub struct PassiveManager {
    granted: Vec<GrantedPassive>,
}

impl PassiveManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, id: &str) -> bool {
        self.granted.iter().any(|p| p.id == id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.granted.iter().any(|p| p.id == id && p.active)
    }

    /// Grants `def`. A non-toggled passive installs its boosts
    /// immediately; a toggled one is recorded inactive until
    /// [`Self::set_toggle`] switches it on. No-op (returns `false`) if
    /// already granted.
    pub fn grant(&mut self, def: &PassiveDefinition, container: &mut BoostContainer) -> bool {
        if self.has(&def.id) {
            return false;
        }
        let boost_handles = if def.is_toggled { Vec::new() } else { install(&def.id, &def.boosts, container) };
        self.granted.push(GrantedPassive {
            id: def.id.clone(),
            toggle_group: def.toggle_group.clone(),
            is_toggled: def.is_toggled,
            active: !def.is_toggled,
            boosts_field: def.boosts.clone(),
            boost_handles,
        });
        true
    }

    /// Revokes a passive by id, uninstalling whatever boosts it currently
    /// has installed. Returns `false` if not granted.
    pub fn revoke(&mut self, id: &str, container: &mut BoostContainer) -> bool {
        let Some(idx) = self.granted.iter().position(|p| p.id == id) else {
            return false;
        };
        let granted = self.granted.remove(idx);
        for handle in &granted.boost_handles {
            container.remove_by_handle(*handle);
        }
        true
    }

    /// Switches a toggled passive on or off. Switching one on first
    /// switches off every other passive sharing its toggle group (spec.md
    /// §3 `toggle-group id`). No-op if the passive isn't toggled or isn't
    /// granted.
    pub fn set_toggle(&mut self, id: &str, on: bool, container: &mut BoostContainer) -> bool {
        let Some(idx) = self.granted.iter().position(|p| p.id == id) else {
            return false;
        };
        if !self.granted[idx].is_toggled {
            return false;
        }

        if on {
            let group = self.granted[idx].toggle_group.clone();
            if let Some(group) = group {
                let siblings: Vec<String> = self
                    .granted
                    .iter()
                    .filter(|p| p.id != id && p.toggle_group.as_deref() == Some(group.as_str()) && p.active)
                    .map(|p| p.id.clone())
                    .collect();
                for sibling in siblings {
                    self.set_toggle(&sibling, false, container);
                }
            }
        }

        let passive = &mut self.granted[idx];
        if on == passive.active {
            return true;
        }
        if on {
            passive.active = true;
            passive.boost_handles = install(&passive.id, &passive.boosts_field, container);
        } else {
            for handle in passive.boost_handles.drain(..) {
                container.remove_by_handle(handle);
            }
            passive.active = false;
        }
        true
    }
}
