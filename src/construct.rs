//! Scatter/Gather wrapper nodes around base components.

use crate::builder::BuiltComponent;
use crate::core::{ConstructKind, Field, FieldKind, InputApplication, KeyAllocator, Node};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::inference::TypeLabel;
use serde_json::json;
use std::sync::Arc;

const SCATTER_DESCRIPTION: &str = "Specifies the number of replications that will be generated \
     of the scatter construct's contents.";
const GATHER_DESCRIPTION: &str = "Specifies the number of inputs that the gather construct will \
     merge. If it is less than the available number of inputs, the translator will automatically \
     generate additional gathers.";

fn control_field(kind: &ConstructKind) -> Option<Field> {
    let (name, text, description) = match kind {
        ConstructKind::Scatter => ("num_of_copies", "Scatter dimension", SCATTER_DESCRIPTION),
        ConstructKind::Gather => ("num_of_inputs", "Gather power", GATHER_DESCRIPTION),
        ConstructKind::Unknown(_) => return None,
    };
    Some(
        Field::new(name, FieldKind::ComponentParameter, TypeLabel::Integer, json!(4))
            .with_text(text)
            .with_description(description),
    )
}

/// Build the wrapper node for `base`.
///
/// The wrapper refers to the base node's collections instead of copying them.
pub fn wrap(
    base: &BuiltComponent,
    kind: &ConstructKind,
    keys: &mut KeyAllocator,
    diagnostics: &mut Diagnostics,
) -> BuiltComponent {
    let node = &base.node;
    let mut wrapper = Node::new(
        keys.allocate(),
        kind.category(),
        format!("{}/{}", kind, node.text),
    );
    wrapper.description = format!("A default {} construct for the {} component.", kind, node.text);
    wrapper.repository_url = node.repository_url.clone();
    wrapper.commit_hash = node.commit_hash.clone();

    match control_field(kind) {
        Some(field) => {
            wrapper.fields = Arc::new(vec![field]);
            wrapper.input_application = Some(InputApplication {
                key: node.key,
                name: node.text.clone(),
                category: node.category.clone(),
                description: node.description.clone(),
                fields: Arc::clone(&node.fields),
                application_args: Arc::clone(&node.application_args),
            });
            wrapper.input_local_ports = Arc::clone(&node.output_ports);
            wrapper.input_ports = Arc::clone(&node.input_ports);
        }
        None => {
            diagnostics.warn(
                WarningKind::UnknownConstruct,
                &node.text,
                format!("construct has unknown type '{}'; known types are Scatter, Gather", kind),
            );
        }
    }

    BuiltComponent {
        node: wrapper,
        meta: base.meta.clone(),
    }
}

/// Every base component followed by its wrapper, when it asks for one.
pub fn expand(
    components: Vec<BuiltComponent>,
    keys: &mut KeyAllocator,
    diagnostics: &mut Diagnostics,
) -> Vec<BuiltComponent> {
    let mut expanded = Vec::with_capacity(components.len());
    for component in components {
        let wrapper = component
            .meta
            .construct
            .as_ref()
            .map(|kind| wrap(&component, kind, keys, diagnostics));
        if let Some(wrapper) = &wrapper {
            log::info!("Adding component: {}", wrapper.node.text);
        }
        expanded.push(component);
        expanded.extend(wrapper);
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ComponentMeta;
    use crate::core::{Category, NodeKey};

    fn base(keys: &mut KeyAllocator, construct: Option<ConstructKind>) -> BuiltComponent {
        let port = Field::new("result", FieldKind::OutputPort, TypeLabel::Object, json!(""));
        let node = Node::new(keys.allocate(), Category::PyFuncApp, "Foo").with_fields(vec![port]);
        BuiltComponent {
            node,
            meta: ComponentMeta {
                tag: "daliuge".into(),
                construct,
            },
        }
    }

    #[test]
    fn test_scatter_wrapper() {
        let mut keys = KeyAllocator::new();
        let mut diagnostics = Diagnostics::new();
        let foo = base(&mut keys, Some(ConstructKind::Scatter));
        let expanded = expand(vec![foo], &mut keys, &mut diagnostics);

        assert_eq!(expanded.len(), 2);
        let wrapper = &expanded[1];
        assert_eq!(wrapper.node.text, "Scatter/Foo");
        assert_eq!(wrapper.node.category, Category::Scatter);
        assert_eq!(wrapper.node.key, NodeKey(2));
        assert_eq!(wrapper.meta.tag, "daliuge");

        let copies = wrapper.node.field("num_of_copies").unwrap();
        assert_eq!(copies.value, json!(4));
        assert_eq!(copies.type_label, TypeLabel::Integer);

        let application = wrapper.node.input_application.as_ref().unwrap();
        assert_eq!(application.key, NodeKey(1));
        assert!(Arc::ptr_eq(&wrapper.node.input_local_ports, &expanded[0].node.output_ports));
        assert!(Arc::ptr_eq(&application.fields, &expanded[0].node.fields));
    }

    #[test]
    fn test_gather_wrapper() {
        let mut keys = KeyAllocator::new();
        let mut diagnostics = Diagnostics::new();
        let expanded = expand(vec![base(&mut keys, Some(ConstructKind::Gather))], &mut keys, &mut diagnostics);
        assert!(expanded[1].node.field("num_of_inputs").is_some());
        assert_eq!(expanded[1].node.text, "Gather/Foo");
    }

    #[test]
    fn test_unknown_construct_is_bare() {
        let mut keys = KeyAllocator::new();
        let mut diagnostics = Diagnostics::new();
        let kind = ConstructKind::parse("Loop");
        let expanded = expand(vec![base(&mut keys, Some(kind))], &mut keys, &mut diagnostics);

        assert_eq!(expanded.len(), 2);
        assert!(expanded[1].node.input_application.is_none());
        assert!(expanded[1].node.fields.is_empty());
        assert_eq!(diagnostics.count(WarningKind::UnknownConstruct), 1);
    }

    #[test]
    fn test_no_construct_no_wrapper() {
        let mut keys = KeyAllocator::new();
        let mut diagnostics = Diagnostics::new();
        let expanded = expand(vec![base(&mut keys, None)], &mut keys, &mut diagnostics);
        assert_eq!(expanded.len(), 1);
    }
}
