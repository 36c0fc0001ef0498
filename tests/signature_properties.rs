//! Property-based tests for palette signatures
//!
//! These tests verify invariants that should hold for all inputs:
//! - The signature does not depend on the order nodes were discovered in
//! - Node data hashes do not depend on node keys or labels
//! - Building the same nodes twice gives the same signature

use palettegen::core::{Category, Field, FieldKind, Node, NodeKey};
use palettegen::palette::{data_hash, BlockDag};
use palettegen::TypeLabel;
use proptest::prelude::*;
use serde_json::json;

fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}"
}

fn node_shape() -> impl Strategy<Value = (String, Vec<String>, i64)> {
    (
        "[A-Z][a-zA-Z]{0,10}",
        prop::collection::vec(field_name(), 0..4),
        -1000i64..1000,
    )
}

fn make_node(key: u64, shape: &(String, Vec<String>, i64)) -> Node {
    let (label, names, value) = shape;
    let fields = names
        .iter()
        .map(|name| Field::new(name.clone(), FieldKind::ApplicationArgument, TypeLabel::Integer, json!(value)))
        .collect();
    Node::new(NodeKey(key), Category::PyFuncApp, label.clone()).with_fields(fields)
}

proptest! {
    /// Property: shuffling nodes (and renumbering their keys) keeps the signature
    #[test]
    fn prop_signature_is_order_independent(
        shapes in prop::collection::vec(node_shape(), 1..8),
        rotation in 0usize..8
    ) {
        let forward: Vec<Node> = shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| make_node(i as u64 + 1, shape))
            .collect();

        let mut rotated_shapes = shapes.clone();
        let shift = rotation % rotated_shapes.len();
        rotated_shapes.rotate_left(shift);
        rotated_shapes.reverse();
        let shuffled: Vec<Node> = rotated_shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| make_node(100 + i as u64, shape))
            .collect();

        let a = BlockDag::build(&forward, &[]).unwrap();
        let b = BlockDag::build(&shuffled, &[]).unwrap();
        prop_assert_eq!(a.signature(), b.signature());
    }

    /// Property: the data hash ignores key and label
    #[test]
    fn prop_data_hash_ignores_identity(shape in node_shape(), key in 1u64..10_000, label in "[A-Z][a-z]{0,8}") {
        let original = make_node(1, &shape);
        let mut relabelled = make_node(key, &shape);
        relabelled.text = label;
        prop_assert_eq!(data_hash(&original).unwrap(), data_hash(&relabelled).unwrap());
    }

    /// Property: generation is idempotent
    #[test]
    fn prop_signature_is_deterministic(shapes in prop::collection::vec(node_shape(), 0..6)) {
        let nodes: Vec<Node> = shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| make_node(i as u64 + 1, shape))
            .collect();
        let first = BlockDag::build(&nodes, &[]).unwrap().signature();
        let second = BlockDag::build(&nodes, &[]).unwrap().signature();
        prop_assert_eq!(first, second);
    }
}
