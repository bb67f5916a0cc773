//! Named-settings deduplication: §4.7 step 6. Maintains an expanded
//! dictionary of every settings variant seen so far (seeded with the
//! defaults) and, for each new settings dict, either reuses an exact match
//! or records a delta against the closest one.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

fn without_keys(dict: &Map<String, Value>, ignore: &[&str]) -> Map<String, Value> {
    dict.iter().filter(|(k, _)| !ignore.contains(&k.as_str())).map(|(k, v)| (k.clone(), v.clone())).collect()
}

/// Find the entry in `named` with the fewest differing keys from `dict`
/// (both filtered by `ignore`). Returns the matching key and the diff: an
/// empty diff means an exact match.
pub fn match_or_find_closest(
    dict: &Map<String, Value>,
    named: &BTreeMap<String, Map<String, Value>>,
    ignore: &[&str],
) -> (String, Map<String, Value>) {
    let filtered = without_keys(dict, ignore);

    let mut best_key = String::new();
    let mut best_diff = None;
    let mut fewest = usize::MAX;

    for (key, candidate) in named {
        let candidate_filtered = without_keys(candidate, ignore);
        if filtered == candidate_filtered {
            return (key.clone(), Map::new());
        }
        let mut keys: Vec<&String> = filtered.keys().chain(candidate_filtered.keys()).collect();
        keys.sort();
        keys.dedup();
        let diff: Map<String, Value> = keys
            .into_iter()
            .filter(|k| filtered.get(*k) != candidate_filtered.get(*k))
            .map(|k| (k.clone(), filtered.get(k).cloned().unwrap_or(Value::Null)))
            .collect();
        if diff.len() < fewest {
            fewest = diff.len();
            best_key = key.clone();
            best_diff = Some(diff);
        }
    }

    (best_key, best_diff.unwrap_or_default())
}

/// A running table of named settings: the expanded dictionary used for
/// matching, and the delta-only table that gets serialized into the print
/// program.
#[derive(Debug, Default)]
pub struct NamedSettingsTable {
    expanded: BTreeMap<String, Map<String, Value>>,
    deltas: BTreeMap<String, Value>,
}

impl NamedSettingsTable {
    /// Seed the table with the fully expanded defaults, under the key
    /// `"default"`.
    pub fn with_defaults(defaults: Map<String, Value>) -> Self {
        let mut expanded = BTreeMap::new();
        expanded.insert("default".to_string(), defaults);
        Self { expanded, deltas: BTreeMap::new() }
    }

    /// Resolve `dict` against the table, ignoring `ignore` keys when
    /// matching. On an exact match, returns the existing name. Otherwise
    /// synthesises `fresh_name`, records the delta under `back_reference_key`
    /// (e.g. `"Using named position settings"`) pointing at the matched
    /// parent when it isn't `"default"`, and returns the fresh name.
    pub fn resolve(
        &mut self,
        dict: &Map<String, Value>,
        ignore: &[&str],
        back_reference_key: &str,
        mut fresh_name: impl FnMut() -> String,
    ) -> Option<String> {
        let (match_key, diff) = match_or_find_closest(dict, &self.expanded, ignore);
        if diff.is_empty() {
            return if match_key == "default" { None } else { Some(match_key) };
        }

        let mut name = fresh_name();
        if self.expanded.contains_key(&name) {
            name = unique_name(&name, &self.expanded);
        }

        let mut entry = diff;
        if match_key != "default" {
            entry.insert(back_reference_key.to_string(), Value::String(match_key));
        }
        self.deltas.insert(name.clone(), Value::Object(entry));
        self.expanded.insert(name.clone(), dict.clone());
        Some(name)
    }

    /// The delta-only table, ready for `"Named position settings"` /
    /// `"Named image settings"`.
    pub fn into_deltas(self) -> BTreeMap<String, Value> {
        self.deltas
    }
}

fn unique_name(stem: &str, existing: &BTreeMap<String, Map<String, Value>>) -> String {
    let mut count = 1;
    loop {
        let candidate = format!("{stem}_{count}");
        if !existing.contains_key(&candidate) {
            return candidate;
        }
        count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dict(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn exact_match_against_default_resolves_to_none() {
        let defaults = dict(&[("a", json!(1))]);
        let mut table = NamedSettingsTable::with_defaults(defaults.clone());
        let result = table.resolve(&defaults, &[], "Using named position settings", || "fresh".to_string());
        assert_eq!(result, None);
        assert!(table.into_deltas().is_empty());
    }

    #[test]
    fn a_differing_dict_gets_a_fresh_name_and_delta() {
        let defaults = dict(&[("a", json!(1)), ("b", json!(2))]);
        let mut table = NamedSettingsTable::with_defaults(defaults);
        let differing = dict(&[("a", json!(1)), ("b", json!(99))]);
        let name = table.resolve(&differing, &[], "Using named position settings", || "custom".to_string()).unwrap();
        assert_eq!(name, "custom");
        let deltas = table.into_deltas();
        assert_eq!(deltas["custom"]["b"], json!(99));
        assert!(deltas["custom"].get("a").is_none());
    }

    #[test]
    fn colliding_fresh_names_get_a_numeric_suffix() {
        let defaults = dict(&[("a", json!(1))]);
        let mut table = NamedSettingsTable::with_defaults(defaults);
        let first = dict(&[("a", json!(2))]);
        let second = dict(&[("a", json!(3))]);
        let n1 = table.resolve(&first, &[], "Using named position settings", || "dup".to_string()).unwrap();
        let n2 = table.resolve(&second, &[], "Using named position settings", || "dup".to_string()).unwrap();
        assert_eq!(n1, "dup");
        assert_eq!(n2, "dup_1");
    }

    const BACK_REF: &str = "Using named position settings";

    /// Reconstruct the settings a reader would see for `name` by merging
    /// `defaults` with every delta along `name`'s `Using named ... settings`
    /// chain, root to leaf.
    fn expand(name: &str, deltas: &BTreeMap<String, Value>, defaults: &Map<String, Value>) -> Map<String, Value> {
        if name == "default" {
            return defaults.clone();
        }
        let delta = deltas[name].as_object().unwrap();
        let parent = delta.get(BACK_REF).and_then(|v| v.as_str()).unwrap_or("default");
        let mut merged = expand(parent, deltas, defaults);
        for (k, v) in delta {
            if k != BACK_REF {
                merged.insert(k.clone(), v.clone());
            }
        }
        merged
    }

    proptest::proptest! {
        /// Following `Using named ... settings` chains back to `"default"`
        /// always reconstructs exactly the dict that was resolved.
        #[test]
        fn expanding_a_named_chain_reconstructs_the_original_dict(
            dicts in proptest::collection::vec(
                (0u32..4, 0u32..4, 0u32..4),
                1..20,
            ),
        ) {
            let defaults = dict(&[("a", json!(0)), ("b", json!(0)), ("c", json!(0))]);
            let mut table = NamedSettingsTable::with_defaults(defaults.clone());
            let mut counter = 0u32;

            let mut expected = Vec::new();
            for (a, b, c) in &dicts {
                let d = dict(&[("a", json!(*a)), ("b", json!(*b)), ("c", json!(*c))]);
                let name = table.resolve(&d, &[], BACK_REF, || { counter += 1; format!("n{counter}") });
                expected.push((name, d));
            }

            let deltas = table.into_deltas();
            for (name, original) in expected {
                let reconstructed = match &name {
                    Some(n) => expand(n, &deltas, &defaults),
                    None => defaults.clone(),
                };
                prop_assert_eq!(reconstructed, original);
            }
        }
    }
}
