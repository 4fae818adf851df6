use std::collections::HashSet;

use crate::entities::condition::ConditionRecord;

/// Name of the `copy`-th (0-based) clone of a seed record.
pub(crate) fn clone_name(seed_name: &str, copy: usize) -> String {
    if copy == 0 {
        seed_name.to_string()
    } else {
        format!("{seed_name} #{}", copy + 1)
    }
}

/// Cycles through `seed` cloning records until exactly `target` exist.
///
/// The first pass keeps the seed names; pass `n` (1-based) appends ` #n`.
/// When that name is already taken (a seed called `Flu #2` next to `Flu`),
/// the suffix is bumped to the next free number, so every name is unique.
/// Every clone carries its seed's description, symptoms, precautions and
/// medications unchanged. Seed names are expected to be unique.
pub fn expand_seed(seed: &[ConditionRecord], target: usize) -> Vec<ConditionRecord> {
    if seed.is_empty() {
        return Vec::new();
    }
    let mut taken: HashSet<String> = seed.iter().map(|r| r.name.clone()).collect();
    let mut next_copy = vec![1usize; seed.len()];

    let mut out = Vec::with_capacity(target);
    for i in 0..target {
        let slot = i % seed.len();
        let record = &seed[slot];
        if i < seed.len() {
            out.push(record.clone());
            continue;
        }
        let mut copy = next_copy[slot];
        let mut name = clone_name(&record.name, copy);
        while taken.contains(&name) {
            copy += 1;
            name = clone_name(&record.name, copy);
        }
        next_copy[slot] = copy + 1;
        taken.insert(name.clone());
        out.push(record.renamed(name));
    }
    out
}
