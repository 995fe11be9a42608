// Copyright 2024 The JsonCmp Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub(crate) mod fingerprint;
pub(crate) mod misc;
pub mod path;

use fingerprint::Arrangement;
use misc::{union_keys, zip_longest};
use path::{Key, Path};
use serde_json::Value;
use tracing::{debug, trace};

use crate::domain::{Change, DiffResult};

/// Computes the differences that turn `lhs` into `rhs`.
///
/// Objects are compared key by key and arrays index by index, except when
/// both arrays hold the same multiset of elements: such arrays are reported
/// as a single [`Change::Reorder`] instead of per-index changes.
pub fn diff(lhs: &Value, rhs: &Value) -> DiffResult {
    let mut acc = Accumulator::default();
    diff_with(lhs, rhs, Path::Root, &mut acc);

    debug!(
        changes = acc.changes.len(),
        reorders = acc.reorders.len(),
        "compared json documents"
    );

    DiffResult::new(acc.changes, acc.reorders)
}

#[derive(Debug, Default)]
struct Accumulator {
    changes: Vec<Change>,
    reorders: Vec<Change>,
}

fn diff_with(lhs: &Value, rhs: &Value, path: Path, acc: &mut Accumulator) {
    let mut folder = DiffFolder { rhs, path, acc };

    fold_json(lhs, &mut folder);
}

#[derive(Debug)]
struct DiffFolder<'a, 'b> {
    rhs: &'a Value,
    path: Path,
    acc: &'b mut Accumulator,
}

macro_rules! direct_compare {
    ($name:ident) => {
        fn $name(&mut self, lhs: &'a Value) {
            if self.rhs != lhs {
                self.replaced(lhs);
            }
        }
    };
}

impl<'a, 'b> DiffFolder<'a, 'b> {
    direct_compare!(on_null);
    direct_compare!(on_bool);
    direct_compare!(on_number);
    direct_compare!(on_string);

    fn on_array(&mut self, lhs: &'a Value) {
        let (Value::Array(lhs_items), Value::Array(rhs_items)) = (lhs, self.rhs) else {
            self.replaced(lhs);
            return;
        };

        match fingerprint::arrangement(lhs_items, rhs_items) {
            Arrangement::Identical => {}
            Arrangement::Reordered => {
                trace!(path = %self.path, len = lhs_items.len(), "array reordered");

                self.acc.reorders.push(Change::Reorder {
                    path: self.path.clone(),
                    old_array: lhs_items.clone(),
                    new_array: rhs_items.clone(),
                });
            }
            Arrangement::Different => {
                for (idx, lhs, rhs) in zip_longest(lhs_items, rhs_items) {
                    let path = self.path.append(Key::Idx(idx));
                    self.child(path, lhs, rhs);
                }
            }
        }
    }

    fn on_object(&mut self, lhs: &'a Value) {
        let (Value::Object(lhs_map), Value::Object(rhs_map)) = (lhs, self.rhs) else {
            self.replaced(lhs);
            return;
        };

        for key in union_keys(lhs_map, rhs_map) {
            let path = self.path.append(Key::Field(key.clone()));
            self.child(path, lhs_map.get(key), rhs_map.get(key));
        }
    }

    fn child(&mut self, path: Path, lhs: Option<&Value>, rhs: Option<&Value>) {
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => diff_with(lhs, rhs, path, self.acc),
            (None, Some(rhs)) => self.acc.changes.push(Change::Added {
                path,
                new_value: rhs.clone(),
            }),
            (Some(lhs), None) => self.acc.changes.push(Change::Deleted {
                path,
                old_value: lhs.clone(),
            }),
            (None, None) => unreachable!("at least one side should have the key"),
        }
    }

    /// The whole subtree at this path was replaced.
    fn replaced(&mut self, lhs: &Value) {
        self.acc.changes.push(Change::Updated {
            path: self.path.clone(),
            old_value: lhs.clone(),
            new_value: self.rhs.clone(),
        });
    }
}

fn fold_json<'a>(json: &'a Value, folder: &mut DiffFolder<'a, '_>) {
    match json {
        Value::Null => folder.on_null(json),
        Value::Bool(_) => folder.on_bool(json),
        Value::Number(_) => folder.on_number(json),
        Value::String(_) => folder.on_string(json),
        Value::Array(_) => folder.on_array(json),
        Value::Object(_) => folder.on_object(json),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::domain::ChangeKind;
    use proptest::prelude::*;
    use serde_json::json;
    use std::fs;

    fn load_json_from_file(file_path: &str) -> serde_json::Result<Value> {
        let data = fs::read_to_string(file_path).expect("Unable to read file");
        serde_json::from_str(&data)
    }

    fn kinds(result: &DiffResult) -> Vec<ChangeKind> {
        result.iter().map(Change::kind).collect()
    }

    fn paths(result: &DiffResult) -> Vec<String> {
        result.iter().map(Change::path_string).collect()
    }

    #[test]
    fn test_diffing_leaf_json() {
        assert!(diff(&json!(null), &json!(null)).is_empty());
        assert!(diff(&json!(false), &json!(false)).is_empty());
        assert!(diff(&json!("a"), &json!("a")).is_empty());
        assert!(diff(&json!(1), &json!(1)).is_empty());
        assert!(diff(&json!(1.0), &json!(1.0)).is_empty());

        let diffs = diff(&json!(true), &json!(false));
        assert_eq!(
            diffs.changes(),
            &[Change::Updated {
                path: Path::Root,
                old_value: json!(true),
                new_value: json!(false),
            }]
        );

        assert_eq!(diff(&json!(1), &json!(2)).len(), 1);
        assert_eq!(diff(&json!(1), &json!(1.0)).len(), 1);
        assert_eq!(diff(&json!(null), &json!("null")).len(), 1);
    }

    #[test]
    fn test_object_scenarios() {
        let diffs = diff(&json!({ "x": 1 }), &json!({ "x": 1, "y": 2 }));
        assert_eq!(
            diffs.changes(),
            &[Change::Added {
                path: Path::Root.append(Key::Field("y".to_string())),
                new_value: json!(2),
            }]
        );
        assert_eq!(paths(&diffs), vec!["y"]);

        let diffs = diff(&json!({ "x": 1 }), &json!({}));
        assert_eq!(kinds(&diffs), vec![ChangeKind::Deleted]);
        assert_eq!(paths(&diffs), vec!["x"]);
        assert_eq!(diffs.changes()[0].old_value(), Some(&json!(1)));

        let diffs = diff(&json!({ "x": 1 }), &json!({ "x": 2 }));
        assert_eq!(kinds(&diffs), vec![ChangeKind::Updated]);
        assert_eq!(paths(&diffs), vec!["x"]);
        assert_eq!(diffs.changes()[0].old_value(), Some(&json!(1)));
        assert_eq!(diffs.changes()[0].new_value(), Some(&json!(2)));
    }

    #[test]
    fn test_object_key_order_is_irrelevant() {
        let lhs: Value = serde_json::from_str(r#"{"a": 1, "b": {"c": 2, "d": 3}}"#).unwrap();
        let rhs: Value = serde_json::from_str(r#"{"b": {"d": 3, "c": 2}, "a": 1}"#).unwrap();
        assert!(diff(&lhs, &rhs).is_empty());
    }

    #[test]
    fn test_object_deep_path() {
        let diffs = diff(
            &json!({ "a": { "b": { "c": { "d": 1 } } } }),
            &json!({ "a": { "b": { "c": { "d": 2 } } } }),
        );
        assert_eq!(paths(&diffs), vec!["a.b.c.d"]);
        assert_eq!(
            diffs.changes()[0].path().keys(),
            &[
                Key::Field("a".to_string()),
                Key::Field("b".to_string()),
                Key::Field("c".to_string()),
                Key::Field("d".to_string()),
            ]
        );
    }

    #[test]
    fn test_object_key_order_of_changes() {
        let diffs = diff(
            &json!({ "keep": 1, "gone": 2, "changed": 3 }),
            &json!({ "new": 0, "changed": 4, "keep": 1 }),
        );
        assert_eq!(paths(&diffs), vec!["gone", "changed", "new"]);
        assert_eq!(
            kinds(&diffs),
            vec![ChangeKind::Deleted, ChangeKind::Updated, ChangeKind::Added]
        );
    }

    #[test]
    fn test_type_mismatch_is_replacement() {
        let diffs = diff(&json!({ "a": { "b": 1 } }), &json!({ "a": [1] }));
        assert_eq!(
            diffs.changes(),
            &[Change::Updated {
                path: Path::Root.append(Key::Field("a".to_string())),
                old_value: json!({ "b": 1 }),
                new_value: json!([1]),
            }]
        );

        let diffs = diff(&json!([1]), &json!(1));
        assert_eq!(kinds(&diffs), vec![ChangeKind::Updated]);

        let diffs = diff(&json!("x"), &json!({ "x": 1 }));
        assert_eq!(kinds(&diffs), vec![ChangeKind::Updated]);
    }

    #[test]
    fn test_diffing_array() {
        assert!(diff(&json!([]), &json!([])).is_empty());
        assert!(diff(&json!([1, 2]), &json!([1, 2])).is_empty());

        let diffs = diff(&json!([1]), &json!([1, 2]));
        assert_eq!(kinds(&diffs), vec![ChangeKind::Added]);
        assert_eq!(paths(&diffs), vec!["[1]"]);

        let diffs = diff(&json!([1, 2]), &json!([1]));
        assert_eq!(kinds(&diffs), vec![ChangeKind::Deleted]);
        assert_eq!(diffs.changes()[0].old_value(), Some(&json!(2)));

        let diffs = diff(&json!({ "list": [1, 3] }), &json!({ "list": [1, 2] }));
        assert_eq!(paths(&diffs), vec!["list[1]"]);
        assert_eq!(kinds(&diffs), vec![ChangeKind::Updated]);
    }

    #[test]
    fn test_reorder() {
        let diffs = diff(
            &json!({ "list": ["a", "b", "c"] }),
            &json!({ "list": ["c", "a", "b"] }),
        );
        assert_eq!(
            diffs.changes(),
            &[Change::Reorder {
                path: Path::Root.append(Key::Field("list".to_string())),
                old_array: vec![json!("a"), json!("b"), json!("c")],
                new_array: vec![json!("c"), json!("a"), json!("b")],
            }]
        );

        let diffs = diff(&json!(["a", "b", "c"]), &json!(["c", "a", "b"]));
        assert_eq!(kinds(&diffs), vec![ChangeKind::Reorder]);
        assert_eq!(paths(&diffs), vec!["(root)"]);
    }

    #[test]
    fn test_reorder_not_triggered() {
        let diffs = diff(&json!({ "list": ["a", "b"] }), &json!({ "list": ["a", "c"] }));
        assert_eq!(kinds(&diffs), vec![ChangeKind::Updated]);
        assert_eq!(paths(&diffs), vec!["list[1]"]);

        let diffs = diff(
            &json!({ "list": ["a", "a", "b"] }),
            &json!({ "list": ["a", "b", "b"] }),
        );
        assert_eq!(diffs.reorders().count(), 0);
        assert_eq!(kinds(&diffs), vec![ChangeKind::Updated]);
        assert_eq!(paths(&diffs), vec!["list[1]"]);

        let diffs = diff(&json!(["a", "b"]), &json!(["b", "a", "c"]));
        assert_eq!(diffs.reorders().count(), 0);
        assert_eq!(
            kinds(&diffs),
            vec![ChangeKind::Updated, ChangeKind::Updated, ChangeKind::Added]
        );
    }

    #[test]
    fn test_signed_zero_is_not_a_change() {
        assert!(diff(&json!(-0.0), &json!(0.0)).is_empty());
        assert!(diff(&json!({ "z": [0.0, -0.0] }), &json!({ "z": [-0.0, 0.0] })).is_empty());

        let diffs = diff(&json!([-0.0, 1]), &json!([1, 0.0]));
        assert_eq!(kinds(&diffs), vec![ChangeKind::Reorder]);
    }

    #[test]
    fn test_reorder_of_objects_with_shuffled_keys() {
        let lhs: Value =
            serde_json::from_str(r#"{"users": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]}"#)
                .unwrap();
        let rhs: Value =
            serde_json::from_str(r#"{"users": [{"name": "b", "id": 2}, {"name": "a", "id": 1}]}"#)
                .unwrap();

        let diffs = diff(&lhs, &rhs);
        assert_eq!(kinds(&diffs), vec![ChangeKind::Reorder]);
        assert_eq!(paths(&diffs), vec!["users"]);
    }

    #[test]
    fn test_nested_reorders() {
        let diffs = diff(
            &json!({ "a": { "tags": [1, 2] }, "b": [{ "n": [3, 4] }, 5], "c": 1 }),
            &json!({ "a": { "tags": [2, 1] }, "b": [{ "n": [4, 3] }, 6], "c": 2 }),
        );

        // non-reorder changes first, then every reorder
        assert_eq!(paths(&diffs), vec!["b[1]", "c", "a.tags", "b[0].n"]);
        assert_eq!(
            kinds(&diffs),
            vec![
                ChangeKind::Updated,
                ChangeKind::Updated,
                ChangeKind::Reorder,
                ChangeKind::Reorder,
            ]
        );
    }

    #[test]
    fn test_reorder_supersedes_nested_changes() {
        // the outer array is a pure reorder, so nothing below it is reported
        let diffs = diff(
            &json!({ "m": [[1, 2], [3, 4]] }),
            &json!({ "m": [[3, 4], [1, 2]] }),
        );
        assert_eq!(kinds(&diffs), vec![ChangeKind::Reorder]);
        assert_eq!(paths(&diffs), vec!["m"]);
    }

    #[test]
    fn test_complex_jsons() {
        let lhs_json = load_json_from_file("tests/data/left.json").expect("Error parsing left.json");
        let rhs_json =
            load_json_from_file("tests/data/right.json").expect("Error parsing right.json");

        let diffs = diff(&lhs_json, &rhs_json);
        assert_eq!(
            paths(&diffs),
            vec![
                "user.name",
                "user.profile.age",
                "user.profile.email",
                "user.profile.website",
                "user.comments[1].timestamp",
                "user.comments[2]",
                "user.roles",
                "user.settings.languages",
            ]
        );

        let stats = diffs.stats();
        assert_eq!(stats.added, 2);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.updated, 3);
        assert_eq!(stats.reorder, 2);

        for change in &diffs {
            let reachable = change.path().lookup(&lhs_json).is_some()
                || change.path().lookup(&rhs_json).is_some();
            assert!(reachable, "{} is not reachable", change.path());
        }
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            (-5i64..5).prop_map(Value::from),
            "[a-c]{0,2}".prop_map(Value::from),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_diff_with_itself_is_empty(doc in arb_json()) {
            prop_assert!(diff(&doc, &doc).is_empty());
        }

        #[test]
        fn prop_diff_is_symmetric(lhs in arb_json(), rhs in arb_json()) {
            let forward = diff(&lhs, &rhs).inverse();
            let backward = diff(&rhs, &lhs);
            prop_assert_eq!(forward.len(), backward.len());
            for change in &forward {
                prop_assert!(backward.changes().contains(change), "missing {:?}", change);
            }
        }

        #[test]
        fn prop_stats_sum_to_total(lhs in arb_json(), rhs in arb_json()) {
            let diffs = diff(&lhs, &rhs);
            prop_assert_eq!(diffs.stats().total(), diffs.len());
        }

        #[test]
        fn prop_paths_are_unique_and_reachable(lhs in arb_json(), rhs in arb_json()) {
            let diffs = diff(&lhs, &rhs);
            let mut seen = std::collections::HashSet::new();
            for change in &diffs {
                prop_assert!(seen.insert((change.path().clone(), change.kind())));
                prop_assert!(
                    change.path().lookup(&lhs).is_some() || change.path().lookup(&rhs).is_some()
                );
            }
        }
    }
}
