//! Definition registries (component B, spec.md §4.B): resolves `using`
//! inheritance chains over raw stat-block records, then hands each fully
//! merged record to a per-kind coercion function to produce the typed
//! definitions in [`crate::definitions`].
//!
//! Inheritance is data-only: the resolved record is a flat field map, no
//! virtual dispatch (spec.md §9 design note). Resolution happens once,
//! in topological order, and is acyclic-or-rejected before any typed
//! coercion runs (spec.md §3 invariant 5).

mod resolve;

pub use resolve::{RegistryError, ResolvedRecord, resolve};

use std::collections::HashMap;

use crate::statblock::RawRecord;

/// A generic index over one kind of definition, built by resolving
/// inheritance then coercing each merged record with a caller-supplied
/// function. Kept generic (`Registry<T>`) rather than one struct per kind
/// so `ddrc-content` can reuse the same resolution + indexing machinery
/// for characters, weapons, armors, objects, statuses, passives, and
/// action resources alike.
#[derive(Debug, Default)]
pub struct Registry<T> {
    items: HashMap<String, T>,
    /// Topological registration order — iteration in this order means
    /// parents are always visited before children, which downstream
    /// secondary indexes (by class, by group, ...) can rely on.
    order: Vec<String>,
}

/// Everything produced by building a registry: the indexed definitions
/// plus every non-fatal warning collected along the way (unresolved
/// parents, malformed fields, unrecognized enum values).
pub struct BuildOutcome<T> {
    pub registry: Registry<T>,
    pub warnings: Vec<String>,
}

impl<T> Registry<T> {
    /// Resolves `using` inheritance over `records`, then coerces each
    /// merged record with `coerce`. `coerce` receives `(id, kind, parent_id,
    /// merged_fields)` and returns `(T, warnings)` — see
    /// [`crate::definitions::StatBlock::coerce`] and its siblings for the
    /// per-kind implementations this is built to host.
    ///
    /// Returns `Err` only for an inheritance cycle (spec.md §4.B step 1);
    /// every other malformed-input case degrades to a warning and a
    /// partially-fielded entry, per spec.md §4.B step 4.
    pub fn build<F>(records: Vec<RawRecord>, mut coerce: F) -> Result<BuildOutcome<T>, RegistryError>
    where
        F: FnMut(&str, Option<&str>, Option<&str>, &RawRecord) -> (T, Vec<String>),
    {
        let resolved = resolve(records)?;
        let mut items = HashMap::with_capacity(resolved.records.len());
        let mut order = Vec::with_capacity(resolved.records.len());
        let mut warnings = resolved.warnings;

        for rec in &resolved.records {
            let (value, coerce_warnings) =
                coerce(&rec.id, rec.kind.as_deref(), rec.parent_id.as_deref(), &rec.merged);
            warnings.extend(coerce_warnings.into_iter().map(|w| format!("{}: {w}", rec.id)));
            items.insert(rec.id.clone(), value);
            order.push(rec.id.clone());
        }

        Ok(BuildOutcome { registry: Registry { items, order }, warnings })
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates definitions in topological (parent-before-child)
    /// registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.order.iter().filter_map(move |id| self.items.get(id).map(|v| (id.as_str(), v)))
    }

    /// Builds a secondary index: groups ids by a key extracted from each
    /// definition. Definitions for which `key_of` returns `None` are
    /// omitted from every bucket (spec.md §4.B step 3: "characters by
    /// class, weapons by group, ...").
    pub fn index_by<K: Eq + std::hash::Hash + Clone>(&self, key_of: impl Fn(&T) -> Option<K>) -> HashMap<K, Vec<String>> {
        let mut index: HashMap<K, Vec<String>> = HashMap::new();
        for (id, value) in self.iter() {
            if let Some(key) = key_of(value) {
                index.entry(key).or_default().push(id.to_string());
            }
        }
        index
    }
}
