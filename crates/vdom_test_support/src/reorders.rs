use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

pub const REORDERS_FORMAT_V1: &str = "vdom-reorders-v1";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
struct ReorderManifest {
    format: String,
    cases: Vec<ReorderCase>,
}

/// One keyed list update: `old` keys rendered first, then `new`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ReorderCase {
    pub id: String,
    pub old: Vec<String>,
    pub new: Vec<String>,
    /// Fewest moves any correct keyed diff can make.
    pub min_moves: usize,
    /// Exact move counts for strategies whose choice is pinned, by strategy name.
    #[serde(default)]
    pub moves: BTreeMap<String, usize>,
}

pub fn load_reorder_cases(path: &Path) -> Vec<ReorderCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read reorder fixtures {path:?}: {err}"));
    let manifest: ReorderManifest = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse reorder fixtures {path:?}: {err}"));
    assert_eq!(
        manifest.format, REORDERS_FORMAT_V1,
        "unsupported format in {path:?}"
    );

    let mut ids = BTreeSet::new();
    for case in &manifest.cases {
        assert!(ids.insert(case.id.as_str()), "duplicate case id '{}' in {path:?}", case.id);
        for (side, keys) in [("old", &case.old), ("new", &case.new)] {
            let unique: BTreeSet<&String> = keys.iter().collect();
            assert_eq!(
                unique.len(),
                keys.len(),
                "case '{}' repeats a key in its {side} list",
                case.id
            );
        }
        assert_eq!(
            case.min_moves,
            minimal_moves(&case.old, &case.new),
            "case '{}' records the wrong minimum",
            case.id
        );
    }
    manifest.cases
}

/// Shared keys minus the longest run of them already in relative order.
pub fn minimal_moves(old: &[String], new: &[String]) -> usize {
    let position: BTreeMap<&str, usize> = old
        .iter()
        .enumerate()
        .map(|(i, key)| (key.as_str(), i))
        .collect();
    let seq: Vec<usize> = new
        .iter()
        .filter_map(|key| position.get(key.as_str()).copied())
        .collect();
    let mut tails: Vec<usize> = Vec::new();
    for value in &seq {
        let slot = tails.partition_point(|t| t < value);
        if slot == tails.len() {
            tails.push(*value);
        } else {
            tails[slot] = *value;
        }
    }
    seq.len() - tails.len()
}

#[cfg(test)]
mod tests {
    use super::minimal_moves;

    fn keys(raw: &str) -> Vec<String> {
        raw.chars().map(String::from).collect()
    }

    #[test]
    fn minimum_counts_only_shared_keys() {
        assert_eq!(minimal_moves(&keys("abcd"), &keys("acbd")), 1);
        assert_eq!(minimal_moves(&keys("abcde"), &keys("edcba")), 4);
        assert_eq!(minimal_moves(&keys("abc"), &keys("xyz")), 0);
        assert_eq!(minimal_moves(&keys("abcd"), &keys("xdcy")), 1);
    }
}
