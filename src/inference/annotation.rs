//! Normalization of annotation and docstring type text into the vocabulary.

use crate::inference::TypeLabel;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Dotted (`typing.`) and scoped (`std::`) namespace qualifiers. Quoted spans
/// are matched as group 1 so they can be passed through untouched.
static NAMESPACE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"("[^"]*"|'[^']*')|\b(?:[A-Za-z_][A-Za-z0-9_]*(?:\.|::))+"#)
        .expect("valid namespace regex")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Annotation spellings that mean "no annotation was given".
const EMPTY_MARKERS: &[&str] = &["inspect._empty", "_empty", "Parameter.empty", "inspect.Parameter.empty"];

/// Strip namespace qualifiers from every identifier in `text`, leaving string
/// literals such as `Literal['a.b']` as written.
pub fn strip_namespaces(text: &str) -> String {
    NAMESPACE_PREFIX
        .replace_all(text, |caps: &Captures| {
            caps.get(1)
                .map(|quoted| quoted.as_str().to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Resolve annotation text to a type label.
///
/// Returns `None` when the text carries no type information at all.
pub fn resolve_annotation(text: &str) -> Option<TypeLabel> {
    let trimmed = text.trim();
    if trimmed.is_empty() || EMPTY_MARKERS.contains(&trimmed) {
        return None;
    }

    let stripped = strip_namespaces(trimmed);
    let normalized = normalize_c_declarator(&stripped);
    Some(simple_name_label(&normalized).unwrap_or(TypeLabel::Complex(normalized)))
}

/// Resolve free-form docstring type text such as `int, optional` or
/// `list of str` through the same vocabulary.
pub fn resolve_doc_type(text: &str) -> Option<TypeLabel> {
    let mut reduced = text.trim();
    for suffix in [", optional", " optional", ",optional"] {
        if let Some(stripped) = reduced.strip_suffix(suffix) {
            reduced = stripped.trim();
        }
    }
    if let Some((first, _)) = reduced.split_once(" or ") {
        reduced = first.trim();
    }
    if let Some((container, _)) = reduced.split_once(" of ") {
        reduced = container.trim();
    }
    resolve_annotation(reduced)
}

/// Drop C/C++ qualifiers so `const std::string &` and `double` compare by name.
fn normalize_c_declarator(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    let mut name = collapsed.as_ref();
    for qualifier in ["const ", "volatile ", "struct ", "unsigned ", "signed "] {
        if let Some(rest) = name.strip_prefix(qualifier) {
            name = rest;
        }
    }
    let name = name.trim_end_matches(['&', ' ']);
    match name.replace(' ', "").as_str() {
        "char*" | "constchar*" => "char*".to_string(),
        _ => name.trim().to_string(),
    }
}

fn simple_name_label(name: &str) -> Option<TypeLabel> {
    let label = match name {
        "String" | "Integer" | "Float" | "Boolean" | "Object" | "Select" | "Password"
        | "Json" | "Python" | "List" | "Dict" | "None" => TypeLabel::from_label(name),
        "str" | "string" | "char*" | "unicode" | "bytes" => TypeLabel::String,
        "int" | "long" | "short" | "size_t" | "int32_t" | "int64_t" | "uint32_t"
        | "uint64_t" | "integer" => TypeLabel::Integer,
        "float" | "double" | "complex" | "number" => TypeLabel::Float,
        "bool" | "boolean" => TypeLabel::Boolean,
        "list" | "tuple" | "set" | "frozenset" | "vector" | "array" | "Tuple" | "Sequence" => {
            TypeLabel::List
        }
        "dict" | "Mapping" | "map" | "OrderedDict" => TypeLabel::Dict,
        "object" | "Any" => TypeLabel::Object,
        "NoneType" => TypeLabel::None,
        _ => return None,
    };
    Some(label)
}
