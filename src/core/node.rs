use super::category::Category;
use super::field::{Field, FieldKind, FieldList};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Run-local node identity. Never part of the content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub u64);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out monotonically increasing node keys, starting at 1.
#[derive(Debug, Default)]
pub struct KeyAllocator {
    issued: u64,
}

impl KeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> NodeKey {
        self.issued += 1;
        NodeKey(self.issued)
    }
}

/// The base component a construct wrapper runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputApplication {
    #[serde(rename = "inputApplicationKey")]
    pub key: NodeKey,
    #[serde(rename = "inputApplicationName")]
    pub name: String,
    #[serde(rename = "inputApplicationType")]
    pub category: Category,
    #[serde(rename = "inputApplicationDescription")]
    pub description: String,
    #[serde(rename = "inputAppFields")]
    pub fields: FieldList,
    #[serde(rename = "inputAppArgs")]
    pub application_args: FieldList,
}

/// One component descriptor in a palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub key: NodeKey,
    pub category: Category,
    pub text: String,
    pub description: String,
    pub input_ports: FieldList,
    pub output_ports: FieldList,
    pub input_local_ports: FieldList,
    pub output_local_ports: FieldList,
    pub fields: FieldList,
    pub application_args: FieldList,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub input_application: Option<InputApplication>,
    pub repository_url: String,
    pub commit_hash: String,
    pub palette_download_url: String,
    pub data_hash: String,
}

impl Node {
    pub fn new(key: NodeKey, category: Category, text: impl Into<String>) -> Self {
        Self {
            key,
            category,
            text: text.into(),
            description: String::new(),
            input_ports: FieldList::default(),
            output_ports: FieldList::default(),
            input_local_ports: FieldList::default(),
            output_local_ports: FieldList::default(),
            fields: FieldList::default(),
            application_args: FieldList::default(),
            input_application: None,
            repository_url: String::new(),
            commit_hash: String::new(),
            palette_download_url: String::new(),
            data_hash: String::new(),
        }
    }

    /// Split fields into the collections matching their kind, keeping order.
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        let mut parameters = Vec::new();
        let mut arguments = Vec::new();
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for field in fields {
            match field.field_type {
                FieldKind::ComponentParameter => parameters.push(field),
                FieldKind::ApplicationArgument => arguments.push(field),
                FieldKind::InputPort => inputs.push(field),
                FieldKind::OutputPort => outputs.push(field),
            }
        }
        self.fields = Arc::new(parameters);
        self.application_args = Arc::new(arguments);
        self.input_ports = Arc::new(inputs);
        self.output_ports = Arc::new(outputs);
        self
    }

    /// Every field of the node, across all collections.
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .chain(self.application_args.iter())
            .chain(self.input_ports.iter())
            .chain(self.output_ports.iter())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.all_fields().find(|field| field.name == name)
    }
}
