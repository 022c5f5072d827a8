//! `ddrc-content`: filesystem loaders that read the source game's
//! stat-block text files and `config.toml` (spec.md §6.4) into a
//! [`Ruleset`] of `ddrc-core` registries.
//!
//! `ddrc-core` never touches the filesystem; this crate is the thin layer
//! that reads the known relative paths, hands the raw text to
//! `ddrc_core::statblock::read`, and assembles the typed definition
//! registries via `ddrc_core::registry::Registry::build`. Mirrors the
//! teacher's `game-content` crate's `loaders` module shape.

#[cfg(feature = "loaders")]
mod error;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use error::LoadError;
#[cfg(feature = "loaders")]
pub use loaders::{
    ActionResourceLoader, ConfigLoader, ContentFactory, PassiveLoader, Ruleset, StatBlockLoader, StatusLoader,
    load_ruleset,
};
