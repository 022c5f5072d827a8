//! Typed definitions produced from resolved [`crate::statblock::RawRecord`]s
//! (component B, spec.md §4.B). Each kind has its own coercion function;
//! [`crate::registry::Registry`] drives inheritance resolution and calls
//! into these.

mod action_resource;
mod coerce;
mod passive;
mod stat_block;
mod status;

pub use action_resource::{ActionResourceDefinition, ReplenishTrigger};
pub use passive::PassiveDefinition;
pub use stat_block::{AbilityScores, StatBlock, StatBlockKind};
pub use status::{DurationRule, RemoveOnSave, StatusDefinition, StatusType};
