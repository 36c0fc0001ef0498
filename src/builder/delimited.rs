//! The 9-part `/`-delimited field record.
//!
//! `external name / default / type / field kind / access / options /
//! precious / positional / description`, with `"` quoting. Trailing parts may
//! be left out; each omitted access, options, precious or positional part is
//! reported once.

use crate::diagnostics::{Diagnostics, WarningKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRecord {
    pub external_name: String,
    pub default: String,
    pub type_text: String,
    pub field_kind: String,
    pub access: String,
    pub options: Vec<String>,
    pub precious: bool,
    pub positional: bool,
    pub description: String,
}

impl Default for FieldRecord {
    fn default() -> Self {
        Self {
            external_name: String::new(),
            default: String::new(),
            type_text: "String".to_string(),
            field_kind: "ComponentParameter".to_string(),
            access: "readwrite".to_string(),
            options: Vec::new(),
            precious: false,
            positional: false,
            description: String::new(),
        }
    }
}

fn split_parts(record: &str) -> Vec<String> {
    let flattened = record.replace(['\r', '\n'], " ");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'/')
        .quote(b'"')
        .has_headers(false)
        .flexible(true)
        .from_reader(flattened.as_bytes());

    match reader.records().next() {
        Some(Ok(parts)) => parts.iter().map(str::to_string).collect(),
        Some(Err(e)) => {
            log::debug!("Unquoted record '{}' ({}), splitting on '/'", flattened, e);
            flattened.split('/').map(str::to_string).collect()
        }
        None => Vec::new(),
    }
}

fn parse_flag(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("true")
}

/// Parse a record, filling omitted trailing parts with their defaults.
pub fn parse_record(record: &str, subject: &str, diagnostics: &mut Diagnostics) -> FieldRecord {
    let parts = split_parts(record);
    let mut parsed = FieldRecord::default();
    let part = |index: usize| parts.get(index).map(String::as_str);

    if let Some(name) = part(0) {
        parsed.external_name = name.to_string();
    }
    if let Some(default) = part(1) {
        parsed.default = default.to_string();
    }
    if let Some(type_text) = part(2) {
        parsed.type_text = type_text.to_string();
    }
    if let Some(kind) = part(3) {
        parsed.field_kind = kind.to_string();
    }

    let heading = format!("{} ({})", parsed.field_kind, parsed.external_name);
    let mut missing = |kind: WarningKind, what: &str, default: &str| {
        diagnostics.warn(
            kind,
            subject,
            format!(
                "{} has no '{}' descriptor, using default ({}) : {}",
                heading, what, default, record
            ),
        );
    };

    match part(4) {
        Some(access) => parsed.access = access.to_string(),
        None => missing(WarningKind::MissingAccess, "access", "readwrite"),
    }
    match part(5) {
        Some(options) if options.trim().is_empty() => {}
        Some(options) => {
            parsed.options = options
                .trim()
                .split(',')
                .map(|option| option.trim().to_string())
                .collect();
        }
        None => missing(WarningKind::MissingOptions, "options", "[]"),
    }
    match part(6) {
        Some(precious) => parsed.precious = parse_flag(precious),
        None => missing(WarningKind::MissingPrecious, "precious", "False"),
    }
    match part(7) {
        Some(positional) => parsed.positional = parse_flag(positional),
        None => missing(WarningKind::MissingPositional, "positional", "False"),
    }
    if let Some(description) = part(8) {
        parsed.description = description.to_string();
    }
    parsed
}

/// Render parts as one record, quoting any part that needs it.
pub fn to_record(parts: &[&str]) -> String {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'/')
        .quote(b'"')
        .has_headers(false)
        .from_writer(Vec::new());

    let rendered = writer
        .write_record(parts)
        .ok()
        .and_then(|_| writer.into_inner().ok())
        .and_then(|bytes| String::from_utf8(bytes).ok());

    match rendered {
        Some(text) => text.trim_end_matches(['\r', '\n']).to_string(),
        None => parts.join("/"),
    }
}
