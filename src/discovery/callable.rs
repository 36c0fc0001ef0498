//! Turn one discovered function or method into component signals.
//!
//! Shared by both front-ends once they have the parameter list and the
//! parsed documentation of a callable.

use super::python::docstring::Docstring;
use super::{ComponentSignals, ParameterDescriptor, ParameterKind, Signal};
use crate::builder::defaults::application_fields;
use crate::core::{Category, FieldKind};
use crate::diagnostics::{Diagnostics, WarningKind};

/// Return annotations that mean "returns nothing".
const NO_RETURN: &[&str] = &["None", "void", "NoReturn"];

#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    pub label: String,
    /// Full import path, stored in the `func_name` field.
    pub func_name: String,
    pub category: Category,
    pub brief: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub returns: Option<String>,
    pub doc: Option<Docstring>,
}

impl Callable {
    fn description(&self) -> String {
        let doc_text = self.doc.as_ref().map(|doc| doc.description.trim()).unwrap_or("");
        let brief = self.brief.trim();
        match (brief.is_empty(), doc_text.is_empty()) {
            (true, _) => doc_text.to_string(),
            (false, true) => brief.to_string(),
            (false, false) if doc_text.starts_with(brief) => doc_text.to_string(),
            (false, false) => format!("{} {}", brief, doc_text),
        }
    }

    fn output_port(&self) -> Option<ParameterDescriptor> {
        let annotation = self
            .returns
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty() && !NO_RETURN.contains(text));
        let documented = self.doc.as_ref().and_then(|doc| doc.returns.as_ref());
        if annotation.is_none() && documented.is_none() {
            return None;
        }

        let name = documented
            .and_then(|returns| returns.name.clone())
            .unwrap_or_else(|| "output".to_string());
        let mut port = ParameterDescriptor::new(name);
        port.annotation = annotation.map(str::to_string);
        port.doc_type = documented.and_then(|returns| returns.type_text.clone());
        port.doc_description = documented.map(|returns| returns.description.clone());
        port.field_kind = Some(FieldKind::OutputPort);
        Some(port)
    }

    pub fn into_signals(self, origin: &str, diagnostics: &mut Diagnostics) -> ComponentSignals {
        let mut component = ComponentSignals::new(origin);
        component.push(Signal::Label(self.label.clone()));
        component.push(Signal::Description(self.description()));
        component.push(Signal::Category(self.category.to_string()));

        let mut undocumented = Vec::new();
        for parameter in &self.parameters {
            let mut parameter = parameter.clone();
            if !parameter.is_receiver() {
                match self.doc.as_ref().and_then(|doc| doc.param(&parameter.name)) {
                    Some(entry) => {
                        parameter.doc_type = entry.type_text.clone();
                        parameter.doc_description = Some(entry.description.clone());
                    }
                    None if self.doc.is_some() => undocumented.push(parameter.name.clone()),
                    None => {}
                }
            }
            component.push(Signal::Parameter(parameter));
        }
        if !undocumented.is_empty() {
            diagnostics.warn(
                WarningKind::MissingDocEntry,
                &self.label,
                format!("parameters missing from the docstring: {}", undocumented.join(", ")),
            );
        }

        if let Some(port) = self.output_port() {
            component.push(Signal::Parameter(port));
        }
        for field in application_fields(&self.category, &self.func_name) {
            component.push(Signal::Parameter(field));
        }
        component
    }
}

/// A descriptor for the implicit `self`/`cls` parameter of a method.
pub fn receiver(name: &str, owner: &str) -> ParameterDescriptor {
    let mut parameter = ParameterDescriptor::new(name);
    parameter.kind = Some(ParameterKind::Receiver {
        owner: owner.to_string(),
    });
    parameter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::python::docstring::parse_docstring;

    fn callable(doc: Option<&str>, returns: Option<&str>) -> Callable {
        let mut factor = ParameterDescriptor::new("factor");
        factor.default = Some("2".into());
        Callable {
            label: "Tool.scale".into(),
            func_name: "pkg.Tool.scale".into(),
            category: Category::PyFuncApp,
            brief: String::new(),
            parameters: vec![receiver("self", "pkg.Tool"), ParameterDescriptor::new("data"), factor],
            returns: returns.map(str::to_string),
            doc: doc.map(parse_docstring),
        }
    }

    fn parameters(component: &ComponentSignals) -> Vec<&ParameterDescriptor> {
        component
            .signals
            .iter()
            .filter_map(|signal| match signal {
                Signal::Parameter(parameter) => Some(parameter),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_docstring_entries_are_merged() {
        let mut diagnostics = Diagnostics::new();
        let component = callable(
            Some("Scale.\n\n:param list data: values\n:param factor: multiplier\n"),
            None,
        )
        .into_signals("pkg", &mut diagnostics);

        let params = parameters(&component);
        assert_eq!(params[1].doc_type.as_deref(), Some("list"));
        assert_eq!(params[2].doc_description.as_deref(), Some("multiplier"));
        assert_eq!(diagnostics.warning_count(), 0);
        assert!(params.iter().any(|p| p.name == "func_name"));
    }

    #[test]
    fn test_missing_docstring_entries_warn_once() {
        let mut diagnostics = Diagnostics::new();
        callable(Some("Scale only."), None).into_signals("pkg", &mut diagnostics);
        assert_eq!(diagnostics.count(WarningKind::MissingDocEntry), 1);
        assert!(diagnostics.warnings()[0].message.contains("data, factor"));
    }

    #[test]
    fn test_no_docstring_means_no_warning() {
        let mut diagnostics = Diagnostics::new();
        let component = callable(None, None).into_signals("pkg", &mut diagnostics);
        assert_eq!(diagnostics.warning_count(), 0);
        assert!(matches!(&component.signals[1], Signal::Description(d) if d.is_empty()));
    }

    #[test]
    fn test_return_annotation_creates_output_port() {
        let mut diagnostics = Diagnostics::new();
        let component = callable(None, Some("float")).into_signals("pkg", &mut diagnostics);
        let output = parameters(&component)
            .into_iter()
            .find(|p| p.field_kind == Some(FieldKind::OutputPort))
            .unwrap();
        assert_eq!(output.name, "output");
        assert_eq!(output.annotation.as_deref(), Some("float"));

        let component = callable(None, Some("None")).into_signals("pkg", &mut diagnostics);
        assert!(parameters(&component)
            .iter()
            .all(|p| p.field_kind != Some(FieldKind::OutputPort)));
    }
}
