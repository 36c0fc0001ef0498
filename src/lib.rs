// Export modules for library usage
pub mod builder;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod construct;
pub mod core;
pub mod diagnostics;
pub mod discovery;
pub mod errors;
pub mod inference;
pub mod palette;
pub mod pipeline;

// Re-export commonly used types
pub use crate::builder::{BuiltComponent, ComponentMeta, NodeBuilder};
pub use crate::catalog::{LabelRegistry, NodeCatalog};
pub use crate::core::{
    Access, Category, ConstructKind, Field, FieldKind, KeyAllocator, Language, Node, NodeKey,
};
pub use crate::diagnostics::{Diagnostics, Warning, WarningKind};
pub use crate::discovery::{
    ComponentSignals, ComponentSource, DoxygenSource, ExtractionUnit, ParameterDescriptor,
    PythonModuleSource, Signal,
};
pub use crate::errors::Error;
pub use crate::inference::{infer_type, InferredType, TypeLabel, TypeSignals};
pub use crate::palette::{BlockDag, Palette};
pub use crate::pipeline::{GenerationReport, GenerationRequest, OutputMode};
