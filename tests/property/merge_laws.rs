//! Property-based tests for deep merge laws

use mcpmerge::{deep_merge, merge_all};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-d]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

fn arb_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-d]", arb_json(), 0..5)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>()))
}

proptest! {
    #[test]
    fn empty_object_is_identity_for_objects(x in arb_object()) {
        let empty = Value::Object(Map::new());
        prop_assert_eq!(deep_merge(&x, &empty), x.clone());
        prop_assert_eq!(deep_merge(&empty, &x), x);
    }

    #[test]
    fn merge_with_self_is_identity(x in arb_json()) {
        prop_assert_eq!(deep_merge(&x, &x), x);
    }

    #[test]
    fn inputs_are_not_mutated(a in arb_json(), b in arb_json()) {
        let (a0, b0) = (a.clone(), b.clone());
        let _ = deep_merge(&a, &b);
        prop_assert_eq!(a, a0);
        prop_assert_eq!(b, b0);
    }

    #[test]
    fn overlay_keys_always_win_at_leaves(a in arb_object(), b in arb_object()) {
        let merged = deep_merge(&a, &b);
        let merged_map = merged.as_object().unwrap();
        for (key, overlay_value) in b.as_object().unwrap() {
            let value = &merged_map[key];
            if !overlay_value.is_object() {
                prop_assert_eq!(value, overlay_value);
            }
        }
        for key in a.as_object().unwrap().keys() {
            prop_assert!(merged_map.contains_key(key));
        }
    }

    #[test]
    fn merge_all_is_a_left_fold(docs in prop::collection::vec(arb_object(), 0..5)) {
        let expected = docs
            .iter()
            .fold(Value::Object(Map::new()), |acc, d| deep_merge(&acc, d));
        prop_assert_eq!(merge_all(&docs), expected);
    }

    #[test]
    fn merge_is_deterministic(a in arb_json(), b in arb_json()) {
        prop_assert_eq!(deep_merge(&a, &b), deep_merge(&a, &b));
    }
}
