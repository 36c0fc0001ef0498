//! The closed vocabulary of parameter type labels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A resolved parameter type.
///
/// The simple variants are the labels the graph editor understands natively.
/// `Complex` carries the rendered text of a generic or unrecognized annotation
/// (namespace prefixes already stripped). `None` is the sentinel for a type
/// that could not be resolved from any signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeLabel {
    String,
    Integer,
    Float,
    Boolean,
    Object,
    Select,
    Password,
    Json,
    Python,
    List,
    Dict,
    Complex(String),
    None,
}

impl TypeLabel {
    /// Map an exact label back to its variant.
    ///
    /// Anything outside the canonical label set is kept verbatim as
    /// `Complex`, so labels authored by hand survive untouched.
    pub fn from_label(label: &str) -> Self {
        match label {
            "String" => Self::String,
            "Integer" => Self::Integer,
            "Float" => Self::Float,
            "Boolean" => Self::Boolean,
            "Object" => Self::Object,
            "Select" => Self::Select,
            "Password" => Self::Password,
            "Json" => Self::Json,
            "Python" => Self::Python,
            "List" => Self::List,
            "Dict" => Self::Dict,
            "None" => Self::None,
            other => Self::Complex(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::Object => "Object",
            Self::Select => "Select",
            Self::Password => "Password",
            Self::Json => "Json",
            Self::Python => "Python",
            Self::List => "List",
            Self::Dict => "Dict",
            Self::Complex(text) => text,
            Self::None => "None",
        }
    }

    /// True for every label except `Complex` and the `None` sentinel.
    pub fn is_canonical(&self) -> bool {
        !matches!(self, Self::Complex(_) | Self::None)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TypeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TypeLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}
