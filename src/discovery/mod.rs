//! Component discovery front-ends.
//!
//! Both front-ends reduce their input to the same shape: extraction units
//! holding per-component signal lists. Everything downstream of discovery
//! works on that shape only and does not know which front-end produced it.

pub mod callable;
pub mod doxygen;
pub mod python;

use crate::diagnostics::Diagnostics;
use crate::core::{Access, FieldKind};

pub use doxygen::DoxygenSource;
pub use python::PythonModuleSource;

/// How a parameter is passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    Positional,
    PositionalOnly,
    KeywordOnly,
    VarPositional,
    VarKeyword,
    /// Implicit `self`/`cls` of a method, bound to `owner`.
    Receiver { owner: String },
}

/// Everything discovered about one parameter before a field is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterDescriptor {
    pub name: String,
    pub direction: Option<String>,
    pub kind: Option<ParameterKind>,
    pub annotation: Option<String>,
    /// Source text of the default value. `None` means no default was given.
    pub default: Option<String>,
    pub doc_type: Option<String>,
    pub doc_description: Option<String>,
    /// A 9-part `/`-delimited field record authored by hand.
    pub record: Option<String>,
    pub field_kind: Option<FieldKind>,
    pub access: Option<Access>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A parameter described by a hand-written delimited record.
    pub fn from_record(name: impl Into<String>, record: impl Into<String>) -> Self {
        Self {
            record: Some(record.into()),
            ..Self::new(name)
        }
    }

    pub fn is_receiver(&self) -> bool {
        matches!(self.kind, Some(ParameterKind::Receiver { .. }))
    }
}

/// One key/value signal about a component.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Category(String),
    Construct(String),
    Tag(String),
    Label(String),
    Description(String),
    Repository(String),
    Version(String),
    Parameter(ParameterDescriptor),
}

impl Signal {
    /// Map a raw key/value pair onto a signal.
    ///
    /// Reserved keys become component-level signals; every other key names a
    /// parameter whose value is a delimited field record. A `tag` whose value
    /// mentions a field kind is a parameter called `tag`.
    pub fn from_pair(key: &str, direction: Option<&str>, value: &str) -> Self {
        match key {
            "category" => Signal::Category(value.to_string()),
            "construct" => Signal::Construct(value.to_string()),
            "tag" if !FieldKind::mentioned_in(value) => Signal::Tag(value.to_string()),
            "text" => Signal::Label(value.to_string()),
            "description" => Signal::Description(value.to_string()),
            "gitrepo" => Signal::Repository(value.to_string()),
            "version" => Signal::Version(value.to_string()),
            _ => {
                let mut parameter = ParameterDescriptor::from_record(key, value);
                parameter.direction = direction
                    .filter(|direction| !direction.is_empty())
                    .map(str::to_string);
                Signal::Parameter(parameter)
            }
        }
    }
}

/// The signals collected for one component, in discovery order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentSignals {
    /// Where the component came from, for log messages.
    pub origin: String,
    pub signals: Vec<Signal>,
}

impl ComponentSignals {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            signals: Vec::new(),
        }
    }

    pub fn push(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    pub fn label(&self) -> Option<&str> {
        self.signals.iter().find_map(|signal| match signal {
            Signal::Label(label) => Some(label.as_str()),
            _ => None,
        })
    }

    /// Components with only a label and description are not worth a node.
    pub fn is_substantive(&self) -> bool {
        self.signals.len() > 2
    }
}

/// One independently processed piece of input: a compound or a module.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractionUnit {
    pub name: String,
    pub description: String,
    pub components: Vec<ComponentSignals>,
}

/// A front-end that discovers components.
///
/// Unit-level failures are recorded in `diagnostics` and skipped; an `Err`
/// means the whole discovery failed and the run must stop.
pub trait ComponentSource {
    fn describe(&self) -> String;

    fn discover(&self, diagnostics: &mut Diagnostics) -> anyhow::Result<Vec<ExtractionUnit>>;
}
