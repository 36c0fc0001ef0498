//! Warning and failure collection for a generation run.
//!
//! Recoverable gaps and structural anomalies never stop the run. Each one is
//! logged as it happens and recorded here, so callers (and tests) can see
//! exactly what was degraded. Extraction units that fail outright are
//! recorded separately; their siblings continue.

use anyhow::Error;
use std::fmt;

/// What kind of problem a warning reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    MissingAccess,
    MissingOptions,
    MissingPrecious,
    MissingPositional,
    MissingDocEntry,
    MissingLabel,
    UnknownFieldKind,
    UnknownAccess,
    UnknownCategory,
    UnknownConstruct,
    SelectWithoutOptions,
    OptionsWithoutSelect,
    DuplicateField,
    DuplicateLabel,
    MissingRequiredField,
    UnmarkedCompound,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingAccess => "missing access",
            Self::MissingOptions => "missing options",
            Self::MissingPrecious => "missing precious",
            Self::MissingPositional => "missing positional",
            Self::MissingDocEntry => "missing docstring entry",
            Self::MissingLabel => "missing label",
            Self::UnknownFieldKind => "unknown field kind",
            Self::UnknownAccess => "unknown access",
            Self::UnknownCategory => "unknown category",
            Self::UnknownConstruct => "unknown construct",
            Self::SelectWithoutOptions => "select without options",
            Self::OptionsWithoutSelect => "options without select",
            Self::DuplicateField => "duplicate field",
            Self::DuplicateLabel => "duplicate label",
            Self::MissingRequiredField => "missing required field",
            Self::UnmarkedCompound => "unmarked compound",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    /// The component (or compound) the warning is about.
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.subject, self.kind.as_str(), self.message)
    }
}

/// Type of operation that failed for an extraction unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    ModuleRead,
    ModuleParse,
    CompoundParse,
    Other,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModuleRead => "Module read",
            Self::ModuleParse => "Module parse",
            Self::CompoundParse => "Compound parse",
            Self::Other => "Other",
        }
    }
}

/// An extraction unit that was skipped.
#[derive(Debug, Clone)]
pub struct ExtractionFailure {
    pub unit: String,
    pub operation: OperationType,
    pub error: String, // String for Clone, preserves error message
}

impl ExtractionFailure {
    pub fn new(unit: impl Into<String>, operation: OperationType, error: Error) -> Self {
        Self {
            unit: unit.into(),
            operation,
            error: format!("{:#}", error),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    failures: Vec<ExtractionFailure>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: WarningKind, subject: impl Into<String>, message: impl Into<String>) {
        let warning = Warning {
            kind,
            subject: subject.into(),
            message: message.into(),
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn failure(&mut self, failure: ExtractionFailure) {
        log::error!(
            "{} failed for {}: {}. Skipping it.",
            failure.operation.as_str(),
            failure.unit,
            failure.error
        );
        self.failures.push(failure);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn failures(&self) -> &[ExtractionFailure] {
        &self.failures
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
