//! The canonical component model shared by every stage.

pub mod category;
pub mod field;
pub mod node;

pub use category::{Category, ConstructKind};
pub use field::{find_field, Access, Field, FieldKind, FieldList};
pub use node::{InputApplication, KeyAllocator, Node, NodeKey};

/// Source language of the documented components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    C,
    #[default]
    Python,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Python => "Python",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
