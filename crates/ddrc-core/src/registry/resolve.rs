//! Inheritance resolution: topological sort over `using` edges (Kahn's
//! algorithm), then a left-fold merge of each record's resolved ancestry
//! into a flat field map (spec.md §4.B steps 1–2, and §8 "inheritance
//! determinism": the resolved field map equals the left-fold of parents'
//! maps overlaid by the child, independent of input record order).

use std::collections::{HashMap, VecDeque};

use crate::statblock::RawRecord;

/// One record after inheritance resolution: its own identity plus the
/// fully merged field map (parent fields first, its own overlaid last).
#[derive(Clone, Debug)]
pub struct ResolvedRecord {
    pub id: String,
    pub kind: Option<String>,
    pub parent_id: Option<String>,
    pub merged: RawRecord,
}

pub struct ResolveOutcome {
    pub records: Vec<ResolvedRecord>,
    pub warnings: Vec<String>,
}

/// The only hard-failure case in definition loading (spec.md §4.B step
/// 1): a `using` chain that cycles back on itself. Every other resolution
/// problem (an unresolved parent name) degrades to a warning instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    InheritanceCycle(Vec<String>),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InheritanceCycle(nodes) => write!(f, "inheritance cycle detected among: {}", nodes.join(" -> ")),
        }
    }
}

impl std::error::Error for RegistryError {}

impl crate::error::GameError for RegistryError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Validation
    }
}

pub fn resolve(records: Vec<RawRecord>) -> Result<ResolveOutcome, RegistryError> {
    let mut by_name: HashMap<String, RawRecord> = HashMap::with_capacity(records.len());
    let mut warnings = Vec::new();

    // Later duplicate-named records overwrite earlier ones: the file
    // reader already preserves ordering, so "last one wins" here mirrors
    // its own "duplicate keys keep last" rule one level up.
    for rec in records {
        let name = rec.name.clone();
        if by_name.insert(name.clone(), rec).is_some() {
            warnings.push(format!("duplicate record name '{name}', keeping the last occurrence"));
        }
    }

    // Kahn's algorithm over `using` edges (parent -> child). An edge to a
    // name outside `by_name` isn't a dependency for cycle detection
    // purposes — it's an unresolved parent, handled during merge.
    let mut in_degree: HashMap<&str, usize> = by_name.keys().map(|k| (k.as_str(), 0)).collect();
    let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
    for rec in by_name.values() {
        if let Some(parent) = rec.parent.as_deref() {
            if by_name.contains_key(parent) {
                *in_degree.get_mut(rec.name.as_str()).unwrap() += 1;
                children_of.entry(parent).or_default().push(rec.name.as_str());
            }
        }
    }

    // Deterministic regardless of HashMap iteration order.
    let mut initial: Vec<&str> = in_degree.iter().filter(|(_, &deg)| deg == 0).map(|(name, _)| *name).collect();
    initial.sort_unstable();
    let mut queue: VecDeque<&str> = initial.into();

    let mut topo_order: Vec<String> = Vec::with_capacity(by_name.len());
    let mut remaining = in_degree.clone();
    while let Some(name) = queue.pop_front() {
        topo_order.push(name.to_string());
        if let Some(children) = children_of.get(name) {
            let mut ready = Vec::new();
            for child in children {
                let deg = remaining.get_mut(child).unwrap();
                *deg -= 1;
                if *deg == 0 {
                    ready.push(*child);
                }
            }
            ready.sort_unstable();
            for child in ready {
                queue.push_back(child);
            }
        }
    }

    if topo_order.len() != by_name.len() {
        let mut cyclic: Vec<String> =
            remaining.into_iter().filter(|(_, deg)| *deg > 0).map(|(name, _)| name.to_string()).collect();
        cyclic.sort();
        return Err(RegistryError::InheritanceCycle(cyclic));
    }

    let mut merged_fields: HashMap<String, RawRecord> = HashMap::with_capacity(by_name.len());
    let mut records_out = Vec::with_capacity(by_name.len());

    for name in &topo_order {
        let rec = by_name.get(name).expect("topo order only contains known names");
        let mut merged = RawRecord::new(rec.name.clone());

        if let Some(parent_name) = rec.parent.as_deref() {
            match merged_fields.get(parent_name) {
                Some(parent_merged) => {
                    merged.data = parent_merged.data.clone();
                }
                None => {
                    warnings.push(format!(
                        "'{}' names parent '{}' which was not found; registering with only its own fields",
                        rec.name, parent_name
                    ));
                }
            }
        }
        for (key, value) in &rec.data {
            merged.data.insert(key.clone(), value.clone());
        }

        merged_fields.insert(rec.name.clone(), merged.clone());
        records_out.push(ResolvedRecord {
            id: rec.name.clone(),
            kind: rec.kind.clone(),
            parent_id: rec.parent.clone(),
            merged,
        });
    }

    Ok(ResolveOutcome { records: records_out, warnings })
}
