//! Column-name disambiguation

use super::taxonomy::GENERIC_COLUMN;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

fn normalize_label(label: &str) -> String {
    let name = label.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("nan") {
        GENERIC_COLUMN.to_string()
    } else {
        name.to_string()
    }
}

/// Make every label non-empty and unique, preserving order.
///
/// The first occurrence of a label is kept as-is; later repeats get `_1`, `_2`, ...
/// counted per label. A generated suffix never reuses a label that already
/// appears in the input or was emitted earlier.
pub fn make_unique<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let normalized: Vec<String> = labels.iter().map(|l| normalize_label(l.as_ref())).collect();
    let reserved: HashSet<&str> = normalized.iter().map(String::as_str).collect();

    let mut counters: HashMap<&str, usize> = HashMap::new();
    let mut emitted: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(normalized.len());

    for name in &normalized {
        let name = name.as_str();
        let candidate = match counters.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(0);
                name.to_string()
            }
            Entry::Occupied(mut slot) => next_free(name, slot.get_mut(), &reserved, &emitted),
        };
        emitted.insert(candidate.clone());
        out.push(candidate);
    }

    out
}

fn next_free(
    base: &str,
    count: &mut usize,
    reserved: &HashSet<&str>,
    emitted: &HashSet<String>,
) -> String {
    loop {
        *count += 1;
        let candidate = format!("{base}_{count}");
        if !reserved.contains(candidate.as_str()) && !emitted.contains(&candidate) {
            return candidate;
        }
    }
}
