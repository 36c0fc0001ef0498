use crate::inference::TypeLabel;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Which collection of a node a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    ComponentParameter,
    ApplicationArgument,
    InputPort,
    OutputPort,
}

impl FieldKind {
    /// Parse a field kind, including the legacy `cparam` / `aparam` spellings.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "ComponentParameter" | "cparam" => Some(Self::ComponentParameter),
            "ApplicationArgument" | "aparam" => Some(Self::ApplicationArgument),
            "InputPort" => Some(Self::InputPort),
            "OutputPort" => Some(Self::OutputPort),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ComponentParameter => "ComponentParameter",
            Self::ApplicationArgument => "ApplicationArgument",
            Self::InputPort => "InputPort",
            Self::OutputPort => "OutputPort",
        }
    }

    /// True when `text` mentions any field kind name.
    pub fn mentioned_in(text: &str) -> bool {
        [
            Self::ComponentParameter,
            Self::ApplicationArgument,
            Self::InputPort,
            Self::OutputPort,
        ]
        .iter()
        .any(|kind| text.contains(kind.as_str()))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field access, serialized as the editor's `readonly` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    ReadOnly,
    #[default]
    ReadWrite,
}

impl Access {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "readonly" => Some(Self::ReadOnly),
            "readwrite" => Some(Self::ReadWrite),
            _ => None,
        }
    }

    pub fn is_readonly(&self) -> bool {
        matches!(self, Self::ReadOnly)
    }
}

impl Serialize for Access {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_readonly())
    }
}

impl<'de> Deserialize<'de> for Access {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(if bool::deserialize(deserializer)? {
            Self::ReadOnly
        } else {
            Self::ReadWrite
        })
    }
}

/// One named attribute of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub text: String,
    pub value: Value,
    pub default_value: Value,
    pub description: String,
    #[serde(rename = "type")]
    pub type_label: TypeLabel,
    pub field_type: FieldKind,
    #[serde(rename = "readonly")]
    pub access: Access,
    pub options: Vec<String>,
    pub precious: bool,
    pub positional: bool,
}

impl Field {
    /// A read-write field whose value and default are both `value`.
    pub fn new(name: impl Into<String>, kind: FieldKind, type_label: TypeLabel, value: Value) -> Self {
        let name = name.into();
        Self {
            text: name.clone(),
            name,
            default_value: value.clone(),
            value,
            description: String::new(),
            type_label,
            field_type: kind,
            access: Access::ReadWrite,
            options: Vec::new(),
            precious: false,
            positional: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }
}

/// A node's field collection, shared between a base node and its wrapper.
pub type FieldList = Arc<Vec<Field>>;

/// Look up a field by name.
pub fn find_field<'a>(fields: &'a [Field], name: &str) -> Option<&'a Field> {
    fields.iter().find(|field| field.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_kind_aliases() {
        assert_eq!(FieldKind::parse("cparam"), Some(FieldKind::ComponentParameter));
        assert_eq!(FieldKind::parse("aparam"), Some(FieldKind::ApplicationArgument));
        assert_eq!(FieldKind::parse("OutputPort"), Some(FieldKind::OutputPort));
        assert_eq!(FieldKind::parse("Port"), None);
    }

    #[test]
    fn test_field_kind_mentioned_in() {
        assert!(FieldKind::mentioned_in("dummy/String/OutputPort/readwrite"));
        assert!(!FieldKind::mentioned_in("science"));
    }

    #[test]
    fn test_field_serializes_with_editor_names() {
        let field = Field::new("n", FieldKind::ComponentParameter, TypeLabel::Integer, json!(3))
            .with_access(Access::ReadOnly);
        let value = serde_json::to_value(&field).unwrap();

        assert_eq!(value["defaultValue"], json!(3));
        assert_eq!(value["type"], json!("Integer"));
        assert_eq!(value["fieldType"], json!("ComponentParameter"));
        assert_eq!(value["readonly"], json!(true));
        assert_eq!(value["options"], json!([]));
    }
}
