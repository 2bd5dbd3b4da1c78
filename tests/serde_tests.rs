#![cfg(feature = "serde")]

//! Integration tests for serde support.
//!
//! These tests verify that `OrderedSet` serializes as an order-preserving
//! sequence and deserializes back through the normal insertion path.

use ordset::OrderedSet;
use rstest::rstest;

#[rstest]
fn test_serializes_as_sequence_in_insertion_order() {
    let set: OrderedSet<i32> = [3, 1, 2].into_iter().collect();
    let json = serde_json::to_string(&set).expect("serialization should succeed");
    assert_eq!(json, "[3,1,2]");
}

#[rstest]
fn test_empty_set_serializes_as_empty_sequence() {
    let set: OrderedSet<i32> = OrderedSet::new();
    let json = serde_json::to_string(&set).expect("serialization should succeed");
    assert_eq!(json, "[]");
}

#[rstest]
fn test_roundtrip_preserves_content_and_order() {
    let original: OrderedSet<String> = ["b", "a", "c"]
        .into_iter()
        .map(String::from)
        .collect();

    let json = serde_json::to_string(&original).expect("serialization should succeed");
    let restored: OrderedSet<String> =
        serde_json::from_str(&json).expect("deserialization should succeed");

    assert_eq!(restored, original);
    assert_eq!(restored.to_vec(), original.to_vec());
}

#[rstest]
fn test_deserialization_collapses_duplicates() {
    let restored: OrderedSet<i32> =
        serde_json::from_str("[1, 2, 1, 3, 2]").expect("deserialization should succeed");

    assert_eq!(restored.len(), 3);
    assert_eq!(restored.to_vec(), vec![1, 2, 3]);
}

#[rstest]
fn test_roundtrip_of_large_state_set() {
    let original: OrderedSet<i32> = (0..32).rev().collect();

    let json = serde_json::to_string(&original).expect("serialization should succeed");
    let restored: OrderedSet<i32> =
        serde_json::from_str(&json).expect("deserialization should succeed");

    assert_eq!(restored.to_vec(), original.to_vec());
}
