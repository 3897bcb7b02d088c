//! Value-level engine behavior: paths, absence, collisions, and the
//! content-matching nature of restore.

#![cfg(feature = "json")]

use secretive::{
    restore_value, scrub_value, scrub_value_with, Mapping, Opaque, Record, Sequence, SecretStore,
    Value,
};
use serde_json::json;

#[test]
fn path_correctness_for_indexed_leaves() {
    let value = Value::from(json!({"a": ["x", "y"]}));

    let (scrubbed, secrets) = scrub_value_with(&value, |path: &str, _: &str| {
        (path == "/a[0]").then(|| String::from("<token>"))
    });

    assert_eq!(scrubbed, Value::from(json!({"a": ["<token>", "y"]})));
    let expected: SecretStore = [("<token>", "x")].into_iter().collect();
    assert_eq!(secrets, expected);
}

#[test]
fn default_policy_tokens_carry_the_leaf_path() {
    let value = Value::from(json!({"outer": {"inner": "s"}}));
    let (scrubbed, secrets) = scrub_value(&value);

    assert_eq!(
        scrubbed,
        Value::from(json!({"outer": {"inner": "$ref-/outer/inner"}}))
    );
    assert_eq!(secrets.get("$ref-/outer/inner"), Some("s"));
}

#[test]
fn absent_and_empty_containers_are_distinguished() {
    let mut record = Record::new();
    record.push("present", Value::Sequence(Sequence::empty()));
    record.push("absent", Value::Sequence(Sequence::absent()));
    record.push("present_map", Value::Mapping(Mapping::empty()));
    record.push("absent_map", Value::Mapping(Mapping::absent()));
    let value = Value::Record(record);

    let (scrubbed, secrets) = scrub_value(&value);
    assert!(secrets.is_empty());
    assert_eq!(scrubbed, value);

    let Value::Record(scrubbed) = scrubbed else {
        panic!("expected a record");
    };
    let Some(Value::Sequence(present)) = scrubbed.get("present") else {
        panic!("expected a sequence");
    };
    assert!(!present.is_absent());
    assert!(present.is_empty());
    let Some(Value::Sequence(absent)) = scrubbed.get("absent") else {
        panic!("expected a sequence");
    };
    assert!(absent.is_absent());
    let Some(Value::Mapping(absent_map)) = scrubbed.get("absent_map") else {
        panic!("expected a mapping");
    };
    assert!(absent_map.is_absent());
}

#[test]
fn colliding_tokens_keep_the_later_visit() {
    // mapping keys are visited in order, so "second" is written last
    let value = Value::from(json!({"first": "one", "second": "two"}));

    let (scrubbed, secrets) =
        scrub_value_with(&value, |_: &str, _: &str| Some(String::from("dup")));

    assert_eq!(scrubbed, Value::from(json!({"first": "dup", "second": "dup"})));
    let expected: SecretStore = [("dup", "two")].into_iter().collect();
    assert_eq!(secrets, expected);

    // only the last-written original is recoverable, and only once
    let restored = restore_value(&scrubbed, &secrets);
    assert_eq!(restored, Value::from(json!({"first": "two", "second": "dup"})));
}

#[test]
fn restore_matches_by_content_not_by_path() {
    // "/x" was never scrubbed; the leaf merely happens to hold the token
    let value = Value::from(json!({"y": "$ref-/x"}));
    let secrets: SecretStore = [("$ref-/x", "secret")].into_iter().collect();

    let restored = restore_value(&value, &secrets);
    assert_eq!(restored, Value::from(json!({"y": "secret"})));
}

#[test]
fn each_token_restores_at_most_once_per_call() {
    let value = Value::from(json!({"a": "tok", "b": "tok"}));
    let secrets: SecretStore = [("tok", "orig")].into_iter().collect();

    let restored = restore_value(&value, &secrets);
    assert_eq!(restored, Value::from(json!({"a": "orig", "b": "tok"})));

    // the caller's store is copied, never consumed
    assert_eq!(secrets.len(), 1);
    let again = restore_value(&value, &secrets);
    assert_eq!(again, Value::from(json!({"a": "orig", "b": "tok"})));
}

#[test]
fn unknown_leaves_pass_through_restore() {
    let value = Value::from(json!({"a": "plain", "n": 3}));
    let secrets: SecretStore = [("tok", "orig")].into_iter().collect();
    assert_eq!(restore_value(&value, &secrets), value);
}

#[test]
fn inputs_are_never_mutated() {
    let value = Value::from(json!({"a": ["x"], "b": {"c": "y"}}));
    let snapshot = value.clone();

    let (_, secrets) = scrub_value(&value);
    assert_eq!(value, snapshot);

    let _ = restore_value(&value, &secrets);
    assert_eq!(value, snapshot);
}

#[test]
fn opaque_interiors_are_copied_verbatim() {
    let mut record = Record::new();
    record.push("name", Value::from("visible"));
    record.push("blob", Value::Opaque(Opaque::new(vec![1_u8, 2, 3])));
    let value = Value::Record(record);

    let (scrubbed, secrets) = scrub_value_with(&value, |path: &str, current: &str| {
        assert_eq!(path, "/name");
        Some(format!("token-for-{current}"))
    });

    assert_eq!(secrets.len(), 1);
    let Value::Record(scrubbed) = scrubbed else {
        panic!("expected a record");
    };
    let Some(Value::Opaque(blob)) = scrubbed.get("blob") else {
        panic!("expected the opaque leaf to survive");
    };
    assert_eq!(blob.downcast_ref::<Vec<u8>>(), Some(&vec![1_u8, 2, 3]));
}

#[test]
fn store_round_trips_through_json_next_to_the_payload() {
    let value = Value::from(json!({"card": "4111-1111"}));
    let (scrubbed, secrets) = scrub_value(&value);

    // ship both halves as JSON, restore on the other side
    let payload = serde_json::Value::try_from(scrubbed).unwrap();
    let table = serde_json::to_string(&secrets).unwrap();

    let shipped: SecretStore = serde_json::from_str(&table).unwrap();
    let restored = restore_value(&Value::from(payload), &shipped);
    assert_eq!(restored, value);
}
