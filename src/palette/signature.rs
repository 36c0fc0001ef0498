//! Content hashes of nodes and the signature of a whole palette.
//!
//! Nodes are vertices of a block DAG. A vertex's data hash covers only the
//! node content that defines its behavior, so keys, labels and discovery
//! order never change it. A block hash chains the data hash with the block
//! hashes of its parents, and the palette signature combines the block
//! hashes of all leaves in sorted order.

use crate::core::Node;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Node members that contribute to a node's data hash.
pub const HASHED_FIELDS: &[&str] = &[
    "inputPorts",
    "outputPorts",
    "applicationArgs",
    "category",
    "fields",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub data_hash: String,
    pub block_hash: String,
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    to_hex(&Sha256::digest(bytes))
}

/// Rebuild a JSON value with object keys in sorted order, recursively.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                if let Some(child) = map.get(key) {
                    sorted.insert(key.clone(), canonicalize(child));
                }
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Hash of the behavior-defining content of `node`.
pub fn data_hash(node: &Node) -> serde_json::Result<String> {
    let serialized = serde_json::to_value(node)?;
    let mut selected = serde_json::Map::new();
    for field in HASHED_FIELDS {
        if let Some(value) = serialized.get(*field) {
            selected.insert(field.to_string(), value.clone());
        }
    }
    let canonical = serde_json::to_vec(&canonicalize(&Value::Object(selected)))?;
    Ok(sha256_hex(&canonical))
}

fn block_hash(data_hash: &str, parents: &mut [String]) -> String {
    parents.sort();
    let mut hasher = Sha256::new();
    hasher.update(data_hash.as_bytes());
    for parent in parents.iter() {
        hasher.update(parent.as_bytes());
    }
    to_hex(&hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct BlockDag {
    graph: DiGraph<Block, ()>,
    vertices: Vec<NodeIndex>,
}

impl BlockDag {
    /// Build the DAG for `nodes`, in order, with edges given as index pairs.
    pub fn build(nodes: &[Node], edges: &[(usize, usize)]) -> serde_json::Result<Self> {
        let mut graph = DiGraph::new();
        let mut vertices = Vec::with_capacity(nodes.len());
        for node in nodes {
            let hash = data_hash(node)?;
            vertices.push(graph.add_node(Block {
                data_hash: hash,
                block_hash: String::new(),
            }));
        }
        for &(from, to) in edges {
            if let (Some(&a), Some(&b)) = (vertices.get(from), vertices.get(to)) {
                graph.add_edge(a, b, ());
            }
        }

        // Palettes carry no links; a cycle falls back to insertion order.
        let order = toposort(&graph, None).unwrap_or_else(|_| graph.node_indices().collect());
        for index in order {
            let mut parents: Vec<String> = graph
                .neighbors_directed(index, Direction::Incoming)
                .map(|parent| graph[parent].block_hash.clone())
                .collect();
            let hash = block_hash(&graph[index].data_hash, &mut parents);
            graph[index].block_hash = hash;
        }

        Ok(Self { graph, vertices })
    }

    /// The block for the node at `position` in the input slice.
    pub fn block(&self, position: usize) -> Option<&Block> {
        self.vertices.get(position).map(|&index| &self.graph[index])
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Combined hash of every leaf block, independent of node order.
    pub fn signature(&self) -> String {
        let mut leaves: Vec<&str> = self
            .graph
            .node_indices()
            .filter(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|index| self.graph[index].block_hash.as_str())
            .collect();
        leaves.sort_unstable();

        let mut hasher = Sha256::new();
        for leaf in leaves {
            hasher.update(leaf.as_bytes());
        }
        to_hex(&hasher.finalize())
    }
}
