// 🧩 Source Merge - rename-then-merge for colliding field names
//
// Several entities reuse column names ("age", "father_name", "ward_no").
// A blind union keeps whichever value is written last and silently drops
// the other. Instead the sources are an ordered list, most central first:
//
//   1. Resolve: walk the sources in order; the first source to use a key
//      keeps it, any later source's copy is renamed `<prefix>_<key>`
//   2. Merge: the key sets are now disjoint, so the union loses nothing

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::db::Record;

// ============================================================================
// SOURCE
// ============================================================================

/// One named field map taking part in the merge
#[derive(Debug, Clone)]
pub struct Source {
    /// Name used in logs
    pub name: &'static str,

    /// Qualifier used when this source loses a key collision
    pub prefix: &'static str,

    pub fields: Record,
}

impl Source {
    pub fn new(name: &'static str, prefix: &'static str, fields: Record) -> Self {
        Source { name, prefix, fields }
    }
}

/// A key that was renamed during collision resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub source: String,
    pub from: String,
    pub to: String,
}

// ============================================================================
// RESOLVE + MERGE
// ============================================================================

/// Pick a free name for a colliding key: `<prefix>_<key>`, then `_2`, `_3`...
fn qualified_key(prefix: &str, key: &str, claimed: &HashSet<String>) -> String {
    let base = format!("{}_{}", prefix, key);
    if !claimed.contains(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !claimed.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Rename colliding keys in later sources so every key is unique
///
/// Renamed keys are claimed too, so a later source can never take them.
/// Keys within one source are already unique (it is a map).
pub fn resolve_collisions(sources: &mut [Source]) -> Vec<Rename> {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut renames = Vec::new();

    for source in sources.iter_mut() {
        // Keys of this source that an earlier source already owns
        let colliding: Vec<String> = source
            .fields
            .keys()
            .filter(|k| claimed.contains(*k))
            .cloned()
            .collect();

        // Own keys first, so a rename target never shadows one of them
        for key in source.fields.keys() {
            if !claimed.contains(key) {
                claimed.insert(key.clone());
            }
        }

        for key in colliding {
            let target = qualified_key(source.prefix, &key, &claimed);
            if let Some(value) = source.fields.remove(&key) {
                source.fields.insert(target.clone(), value);
            }
            claimed.insert(target.clone());

            debug!(source = source.name, from = %key, to = %target, "renamed colliding field");
            renames.push(Rename {
                source: source.name.to_string(),
                from: key,
                to: target,
            });
        }
    }

    renames
}

/// Resolve collisions, then union every source into one flat map
pub fn merge_sources(mut sources: Vec<Source>) -> (Record, Vec<Rename>) {
    let renames = resolve_collisions(&mut sources);

    let mut merged = Record::new();
    for source in sources {
        for (key, value) in source.fields {
            if merged.contains_key(&key) {
                // Unreachable after resolution; keep the first value regardless
                warn!(source = source.name, key = %key, "duplicate key survived resolution");
                continue;
            }
            merged.insert(key, value);
        }
    }

    (merged, renames)
}
