//! Reading components out of doxygen `compounddef` elements.

use super::xml::{Element, XmlNode};
use crate::core::{Category, Language};
use crate::diagnostics::{Diagnostics, ExtractionFailure, OperationType, WarningKind};
use crate::discovery::callable::{receiver, Callable};
use crate::discovery::python::docstring::{parse_docstring, Docstring, ParamDoc};
use crate::discovery::{ComponentSignals, ExtractionUnit, ParameterDescriptor, Signal};
use anyhow::{anyhow, Context, Result};

const START_MARKER: &str = "EAGLE_START";
const END_MARKER: &str = "EAGLE_END";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundOptions {
    /// Also read members of compounds that carry no component markers.
    pub parse_all: bool,
    pub language: Language,
}

/// One extraction unit per class or namespace compound under `root`.
pub fn extract_units(
    root: &Element,
    options: CompoundOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<ExtractionUnit> {
    let mut units = Vec::new();
    for (index, compound) in root.children_named("compounddef").enumerate() {
        if !matches!(compound.attr("kind"), Some("class") | Some("namespace")) {
            continue;
        }
        match extract_compound(compound, options, diagnostics) {
            Ok(Some(unit)) => units.push(unit),
            Ok(None) => {}
            Err(e) => {
                let name = compound
                    .attr("id")
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("compounddef #{}", index));
                diagnostics.failure(ExtractionFailure::new(name, OperationType::CompoundParse, e));
            }
        }
    }
    units
}

fn compound_name(compound: &Element) -> Result<String> {
    let name = compound
        .child("compoundname")
        .map(|element| element.text_content().trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow!("compound has no compoundname"))?;
    Ok(name.replace("::", "."))
}

/// True when detailed description titles hold a start marker followed by an end marker.
pub fn has_component_markers(compound: &Element) -> bool {
    let titles: Vec<String> = compound
        .find_path("detaileddescription/para/simplesect/title")
        .iter()
        .map(|title| title.text_content().trim().to_string())
        .collect();
    match titles.iter().position(|title| title == START_MARKER) {
        Some(start) => titles[start + 1..].iter().any(|title| title == END_MARKER),
        None => false,
    }
}

fn extract_compound(
    compound: &Element,
    options: CompoundOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Option<ExtractionUnit>> {
    let name = compound_name(compound)?;
    let description = compound
        .child("briefdescription")
        .map(|brief| brief.text_content().trim().to_string())
        .unwrap_or_default();

    let components = if has_component_markers(compound) {
        log::debug!("Handling marked component: {}", name);
        vec![marked_component(compound, &name, diagnostics)
            .with_context(|| format!("Failed to read component in {}", name))?]
    } else if options.parse_all {
        log::info!("Handling compound: {}", name);
        member_components(compound, &name, options.language, diagnostics)
    } else {
        diagnostics.warn(
            WarningKind::UnmarkedCompound,
            &name,
            "compound carries no component markers; not parsing it (use --parse-all)",
        );
        return Ok(None);
    };

    Ok(Some(ExtractionUnit {
        name,
        description,
        components,
    }))
}

fn marked_component(
    compound: &Element,
    name: &str,
    diagnostics: &mut Diagnostics,
) -> Result<ComponentSignals> {
    let mut component = ComponentSignals::new(name);

    if let Some(first) = compound
        .child("briefdescription")
        .and_then(|brief| brief.elements().next())
    {
        let label = first.text_content();
        let label = label.trim_matches(|c| c == ' ' || c == '.' || c == '\n');
        if label.is_empty() {
            diagnostics.warn(WarningKind::MissingLabel, name, "No brief description text");
        }
        component.push(Signal::Label(label.to_string()));
    }

    let paragraphs = compound.find_path("detaileddescription/para");
    if let Some(first) = paragraphs.first() {
        component.push(Signal::Description(first.leading_text().trim().to_string()));
    }

    // Only the last paragraph carrying a parameter list counts.
    let Some(parameter_list) = paragraphs
        .iter()
        .rev()
        .find_map(|para| para.child("parameterlist"))
    else {
        return Ok(component);
    };

    for item in parameter_list.children_named("parameteritem") {
        let name_element = item
            .child("parameternamelist")
            .and_then(|names| names.child("parametername"))
            .ok_or_else(|| anyhow!("parameteritem without a parametername"))?;
        let key = name_element.text_content().trim().to_string();
        let direction = name_element.attr("direction").map(str::trim);
        let value = item
            .child("parameterdescription")
            .map(|description| description.text_content().trim().to_string())
            .unwrap_or_default();
        if value.is_empty() {
            log::warn!("{}: no text for parameter '{}'", name, key);
        }
        component.push(Signal::from_pair(&key, direction, &value));
    }
    Ok(component)
}

/// Text of an element, leaving out parameter lists and titled sections.
fn prose(element: &Element) -> String {
    let mut text = String::new();
    collect_prose(element, &mut text);
    text
}

fn collect_prose(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            XmlNode::Text(fragment) => out.push_str(fragment),
            XmlNode::Element(inner) => match inner.name.as_str() {
                "parameterlist" | "simplesect" => {}
                "para" | "linebreak" => {
                    collect_prose(inner, out);
                    out.push('\n');
                }
                _ => collect_prose(inner, out),
            },
        }
    }
}

/// Documentation of a member: its docstring plus any doxygen parameter list.
fn member_doc(member: &Element) -> Option<Docstring> {
    let detailed = member.child("detaileddescription")?;
    let mut doc = parse_docstring(&prose(detailed));

    for item in detailed.find_path("para/parameterlist/parameteritem") {
        let Some(name) = item
            .child("parameternamelist")
            .and_then(|names| names.child("parametername"))
            .map(|name| name.text_content().trim().to_string())
        else {
            continue;
        };
        if doc.param(&name).is_none() {
            let description = item
                .child("parameterdescription")
                .map(|d| d.text_content().trim().to_string())
                .unwrap_or_default();
            doc.params.push(ParamDoc {
                name,
                type_text: None,
                description,
            });
        }
    }

    let empty = doc.description.is_empty() && doc.params.is_empty() && doc.returns.is_none();
    (!empty).then_some(doc)
}

fn member_parameters(member: &Element, owner: Option<&str>) -> Vec<ParameterDescriptor> {
    let mut parameters = Vec::new();
    for (index, param) in member.children_named("param").enumerate() {
        let text_of = |name: &str| {
            param
                .child(name)
                .map(|element| element.text_content().trim().to_string())
                .filter(|text| !text.is_empty())
        };
        let Some(name) = text_of("declname").or_else(|| text_of("defname")) else {
            continue;
        };

        if index == 0 && (name == "self" || name == "cls") {
            if let Some(owner) = owner {
                parameters.push(receiver(&name, owner));
                continue;
            }
        }

        let mut parameter = ParameterDescriptor::new(name);
        parameter.annotation = text_of("type");
        parameter.default = text_of("defval");
        parameters.push(parameter);
    }
    parameters
}

fn member_components(
    compound: &Element,
    compound_name: &str,
    language: Language,
    diagnostics: &mut Diagnostics,
) -> Vec<ComponentSignals> {
    let is_class = compound.attr("kind") == Some("class");
    let class_name = compound_name.rsplit('.').next().unwrap_or(compound_name);
    let category = match language {
        Language::C => Category::DynlibApp,
        Language::Python => Category::PyFuncApp,
    };

    let mut components = Vec::new();
    for member in compound.find_path("sectiondef/memberdef") {
        if member.attr("kind") != Some("function") {
            continue;
        }
        let Some(name) = member
            .child("name")
            .map(|element| element.text_content().trim().to_string())
        else {
            continue;
        };
        if name.ends_with("Unknown") && name.starts_with('.') {
            continue;
        }
        if name.starts_with('_') && name != "__init__" {
            log::debug!("Skipping private member {}.{}", compound_name, name);
            continue;
        }

        let label = if is_class {
            format!("{}.{}", class_name, name)
        } else {
            name.clone()
        };
        // Python members report `def` as their type; only C types mean a return value.
        let returns = match language {
            Language::C => member
                .child("type")
                .map(|element| element.text_content().trim().to_string()),
            Language::Python => None,
        };

        let callable = Callable {
            label,
            func_name: format!("{}.{}", compound_name, name),
            category: category.clone(),
            brief: member
                .child("briefdescription")
                .map(|brief| brief.text_content().trim().to_string())
                .unwrap_or_default(),
            parameters: member_parameters(member, is_class.then_some(compound_name)),
            returns,
            doc: member_doc(member),
        };
        components.push(callable.into_signals(compound_name, diagnostics));
    }
    components
}
