//! Type inference for component parameters.
//!
//! Resolution is a pure function of the parameter's annotation, default value
//! source text and docstring type text. It never fails: anything that cannot
//! be resolved becomes [`TypeLabel::None`].

pub mod annotation;
pub mod infer;
pub mod label;
pub mod literal;

pub use annotation::{resolve_annotation, resolve_doc_type, strip_namespaces};
pub use infer::{infer_type, InferredType, Resolution, TypeSignals};
pub use label::TypeLabel;
pub use literal::{parse_literal, Literal};
