//! The type resolution chain.

use super::annotation::{resolve_annotation, resolve_doc_type};
use super::literal::parse_literal;
use super::TypeLabel;

/// Everything known about a parameter's type before resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeSignals<'a> {
    pub name: &'a str,
    pub annotation: Option<&'a str>,
    /// Source text of the default value; `None` means no default at all,
    /// which is different from a default written as the literal `None`.
    pub default: Option<&'a str>,
    pub doc_type: Option<&'a str>,
}

/// Which step of the chain produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Annotation,
    VariadicName,
    DefaultLiteral,
    Docstring,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredType {
    pub label: TypeLabel,
    pub source: Resolution,
}

impl InferredType {
    fn new(label: TypeLabel, source: Resolution) -> Self {
        Self { label, source }
    }
}

/// Resolve a single label from weak signals, strongest first.
pub fn infer_type(signals: &TypeSignals<'_>) -> InferredType {
    if let Some(label) = signals.annotation.and_then(resolve_annotation) {
        return InferredType::new(label, Resolution::Annotation);
    }

    match signals.name {
        "args" => return InferredType::new(TypeLabel::List, Resolution::VariadicName),
        "kwargs" => return InferredType::new(TypeLabel::Dict, Resolution::VariadicName),
        _ => {}
    }

    if let Some(label) = signals
        .default
        .and_then(parse_literal)
        .and_then(|literal| literal.type_label())
    {
        return InferredType::new(label, Resolution::DefaultLiteral);
    }

    if let Some(label) = signals.doc_type.and_then(resolve_doc_type) {
        return InferredType::new(label, Resolution::Docstring);
    }

    InferredType::new(TypeLabel::None, Resolution::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals<'a>(
        name: &'a str,
        annotation: Option<&'a str>,
        default: Option<&'a str>,
        doc_type: Option<&'a str>,
    ) -> TypeSignals<'a> {
        TypeSignals {
            name,
            annotation,
            default,
            doc_type,
        }
    }

    #[test]
    fn test_annotation_beats_default_literal() {
        let inferred = infer_type(&signals("n", Some("Integer"), Some("3.5"), None));
        assert_eq!(inferred.label, TypeLabel::Integer);
        assert_eq!(inferred.source, Resolution::Annotation);
    }

    #[test]
    fn test_no_signals_yield_sentinel_not_object() {
        let inferred = infer_type(&signals("x", None, None, None));
        assert_eq!(inferred.label, TypeLabel::None);
        assert_ne!(inferred.label, TypeLabel::Object);
        assert_eq!(inferred.source, Resolution::Fallback);
    }

    #[test]
    fn test_variadic_names() {
        assert_eq!(infer_type(&signals("args", None, None, None)).label, TypeLabel::List);
        assert_eq!(infer_type(&signals("kwargs", None, None, None)).label, TypeLabel::Dict);
        // An annotation still wins over the name.
        assert_eq!(
            infer_type(&signals("args", Some("str"), None, None)).label,
            TypeLabel::String
        );
    }

    #[test]
    fn test_default_literal_types() {
        assert_eq!(infer_type(&signals("a", None, Some("3"), None)).label, TypeLabel::Integer);
        assert_eq!(infer_type(&signals("a", None, Some("'x'"), None)).label, TypeLabel::String);
        assert_eq!(infer_type(&signals("a", None, Some("{}"), None)).label, TypeLabel::Dict);
        assert_eq!(infer_type(&signals("a", None, Some("(1, 2)"), None)).label, TypeLabel::List);
    }

    #[test]
    fn test_integer_default_past_i64_is_integer() {
        let inferred = infer_type(&signals("n", None, Some("12345678901234567890"), None));
        assert_eq!(inferred.label, TypeLabel::Integer);
        assert_eq!(inferred.source, Resolution::DefaultLiteral);
    }

    #[test]
    fn test_none_default_falls_through_to_docstring() {
        let inferred = infer_type(&signals("a", None, Some("None"), Some("float, optional")));
        assert_eq!(inferred.label, TypeLabel::Float);
        assert_eq!(inferred.source, Resolution::Docstring);

        let inferred = infer_type(&signals("a", None, Some("None"), None));
        assert_eq!(inferred.label, TypeLabel::None);
    }

    #[test]
    fn test_expression_default_is_never_evaluated() {
        let inferred = infer_type(&signals("a", None, Some("os.getcwd()"), None));
        assert_eq!(inferred.source, Resolution::Fallback);
    }

    #[test]
    fn test_empty_annotation_is_ignored() {
        let inferred = infer_type(&signals("a", Some("inspect._empty"), Some("True"), None));
        assert_eq!(inferred.label, TypeLabel::Boolean);
        assert_eq!(inferred.source, Resolution::DefaultLiteral);
    }
}
