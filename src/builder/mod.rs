//! Fold discovered signals into validated nodes.

pub mod defaults;
pub mod delimited;
pub mod requirements;

use crate::core::{Access, Category, ConstructKind, Field, FieldKind, KeyAllocator, Node};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::discovery::{ComponentSignals, ParameterDescriptor, ParameterKind, Signal};
use crate::inference::{infer_type, parse_literal, Literal, TypeLabel, TypeSignals};
use serde_json::Value;
use std::collections::HashSet;

pub use delimited::{parse_record, to_record, FieldRecord};
pub use requirements::required_fields;

/// Side-channel data that travels with a node but is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentMeta {
    pub tag: String,
    pub construct: Option<ConstructKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltComponent {
    pub node: Node,
    pub meta: ComponentMeta,
}

/// Collapse embedded line breaks into single spaces.
pub fn flatten_newlines(text: &str) -> String {
    if !text.contains(['\n', '\r']) {
        return text.to_string();
    }
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert hand-written default text into a JSON value of the declared type.
fn typed_value(type_label: &TypeLabel, text: &str) -> Value {
    let trimmed = text.trim();
    match type_label {
        TypeLabel::Integer => trimmed
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(text.to_string())),
        TypeLabel::Float => trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string())),
        TypeLabel::Boolean if trimmed.eq_ignore_ascii_case("true") => Value::Bool(true),
        TypeLabel::Boolean if trimmed.eq_ignore_ascii_case("false") => Value::Bool(false),
        _ => Value::String(text.to_string()),
    }
}

/// Value of an introspected default: its literal JSON form, the raw source
/// text when it is not a literal, and `""` when absent or `None`.
fn default_value(default: Option<&str>) -> Value {
    match default {
        None => Value::String(String::new()),
        Some(text) => match parse_literal(text) {
            Some(Literal::None) => Value::String(String::new()),
            Some(literal) => literal.to_json(),
            None => Value::String(text.trim().to_string()),
        },
    }
}

pub struct NodeBuilder<'a> {
    keys: &'a mut KeyAllocator,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(keys: &'a mut KeyAllocator, diagnostics: &'a mut Diagnostics) -> Self {
        Self { keys, diagnostics }
    }

    pub fn build(&mut self, component: &ComponentSignals) -> BuiltComponent {
        let label = component
            .label()
            .map(flatten_newlines)
            .unwrap_or_default();

        let mut category: Option<Category> = None;
        let mut meta = ComponentMeta::default();
        let mut description = String::new();
        let mut repository = String::new();
        let mut version = String::new();
        let mut fields: Vec<Field> = Vec::new();
        let mut seen: HashSet<(FieldKind, String)> = HashSet::new();

        for signal in &component.signals {
            match signal {
                Signal::Category(text) => category = Some(Category::parse(text)),
                Signal::Construct(text) if !text.trim().is_empty() => {
                    meta.construct = Some(ConstructKind::parse(text));
                }
                Signal::Construct(_) | Signal::Label(_) => {}
                Signal::Tag(tag) => meta.tag = tag.trim().to_string(),
                Signal::Description(text) => description = flatten_newlines(text),
                Signal::Repository(url) => repository = url.trim().to_string(),
                Signal::Version(text) => version = text.trim().to_string(),
                Signal::Parameter(parameter) => {
                    let Some(field) = self.build_field(&label, parameter) else {
                        continue;
                    };
                    if !seen.insert((field.field_type, field.name.clone())) {
                        self.diagnostics.warn(
                            WarningKind::DuplicateField,
                            &label,
                            format!("{} '{}' is defined more than once; keeping the first", field.field_type, field.name),
                        );
                        continue;
                    }
                    fields.push(field);
                }
            }
        }

        let category = category.unwrap_or_default();
        if !category.is_known() {
            self.diagnostics.warn(
                WarningKind::UnknownCategory,
                &label,
                format!("unknown category '{}'", category),
            );
        }
        for name in requirements::missing_fields(&category, fields.iter()) {
            self.diagnostics.warn(
                WarningKind::MissingRequiredField,
                &label,
                format!("component missing {} cparam", name),
            );
        }

        let mut node = Node::new(self.keys.allocate(), category, label).with_fields(fields);
        node.description = description;
        node.repository_url = repository;
        node.commit_hash = version;
        log::debug!("Built component {} (key {})", node.text, node.key);

        BuiltComponent { node, meta }
    }

    fn build_field(&mut self, label: &str, parameter: &ParameterDescriptor) -> Option<Field> {
        let field = match &parameter.record {
            Some(record) => self.field_from_record(label, &parameter.name, record)?,
            None => self.inferred_field(parameter),
        };
        self.check_options(label, &field);
        Some(field)
    }

    fn field_from_record(&mut self, label: &str, name: &str, record: &str) -> Option<Field> {
        let parsed = parse_record(record, label, self.diagnostics);

        let Some(kind) = FieldKind::parse(&parsed.field_kind) else {
            self.diagnostics.warn(
                WarningKind::UnknownFieldKind,
                label,
                format!("'{}' field_type is Unknown: {}", parsed.external_name, parsed.field_kind),
            );
            return None;
        };

        let access = Access::parse(&parsed.access).unwrap_or_else(|| {
            self.diagnostics.warn(
                WarningKind::UnknownAccess,
                label,
                format!(
                    "{} '{}' has unknown 'access' descriptor: {}",
                    kind, parsed.external_name, parsed.access
                ),
            );
            Access::ReadWrite
        });

        let type_label = TypeLabel::from_label(parsed.type_text.trim());
        let value = typed_value(&type_label, &parsed.default);
        let text = if parsed.external_name.is_empty() {
            name.to_string()
        } else {
            flatten_newlines(&parsed.external_name)
        };

        let mut field = Field::new(name, kind, type_label, value)
            .with_text(text)
            .with_description(flatten_newlines(&parsed.description))
            .with_access(access)
            .with_options(parsed.options);
        field.precious = parsed.precious;
        field.positional = parsed.positional;
        Some(field)
    }

    fn inferred_field(&mut self, parameter: &ParameterDescriptor) -> Field {
        let inferred = infer_type(&TypeSignals {
            name: &parameter.name,
            annotation: parameter.annotation.as_deref(),
            default: parameter.default.as_deref(),
            doc_type: parameter.doc_type.as_deref(),
        });
        log::trace!(
            "Type of {} resolved to {} from {:?}",
            parameter.name,
            inferred.label,
            inferred.source
        );

        let kind = parameter.field_kind.unwrap_or(FieldKind::ApplicationArgument);
        let mut description = parameter
            .doc_description
            .as_deref()
            .map(flatten_newlines)
            .unwrap_or_default();
        let mut type_label = inferred.label;
        let mut value = default_value(parameter.default.as_deref());

        if let Some(ParameterKind::Receiver { owner }) = &parameter.kind {
            let class_name = owner.rsplit('.').next().unwrap_or(owner);
            if description.is_empty() {
                description = format!("Reference to {} object", class_name);
            }
            if type_label.is_none() {
                type_label = TypeLabel::Object;
            }
            value = Value::String(owner.clone());
        }

        let mut field = Field::new(&parameter.name, kind, type_label, value)
            .with_description(description)
            .with_access(parameter.access.unwrap_or_default());
        field.positional = matches!(parameter.kind, Some(ParameterKind::PositionalOnly));
        field
    }

    fn check_options(&mut self, label: &str, field: &Field) {
        let is_select = field.type_label == TypeLabel::Select;
        if is_select && field.options.is_empty() {
            self.diagnostics.warn(
                WarningKind::SelectWithoutOptions,
                label,
                format!(
                    "{} '{}' is of type 'Select' but has no options specified",
                    field.field_type, field.text
                ),
            );
        }
        if !is_select && !field.options.is_empty() {
            self.diagnostics.warn(
                WarningKind::OptionsWithoutSelect,
                label,
                format!(
                    "{} '{}' has at least one option specified but is not of type 'Select': {}",
                    field.field_type, field.text, field.type_label
                ),
            );
        }
    }
}
