//! Source-introspection front-end: components from doxygen XML.

pub mod compound;
pub mod toolchain;
pub mod xml;

pub use compound::{extract_units, CompoundOptions};
pub use toolchain::{DoxygenSettings, Toolchain};

use super::{ComponentSource, ExtractionUnit};
use crate::diagnostics::Diagnostics;
use crate::errors::Error;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Where the combined XML comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlInput {
    /// Run the tool chain over a source tree.
    Generate(DoxygenSettings),
    /// Read an already combined XML file.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoxygenSource {
    pub input: XmlInput,
    pub options: CompoundOptions,
}

impl DoxygenSource {
    pub fn new(input: XmlInput, options: CompoundOptions) -> Self {
        Self { input, options }
    }

    fn load_xml(&self) -> Result<(String, PathBuf)> {
        match &self.input {
            XmlInput::File(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read XML file {}", path.display()))?;
                Ok((text, path.clone()))
            }
            XmlInput::Generate(settings) => {
                let toolchain = Toolchain::locate()?;
                let text = toolchain
                    .generate_xml(settings)
                    .with_context(|| format!("doxygen failed on {}", settings.input.display()))?;
                Ok((text, PathBuf::from("doxygen.xml")))
            }
        }
    }
}

impl ComponentSource for DoxygenSource {
    fn describe(&self) -> String {
        match &self.input {
            XmlInput::File(path) => format!("doxygen XML {}", path.display()),
            XmlInput::Generate(settings) => format!("sources in {}", settings.input.display()),
        }
    }

    fn discover(&self, diagnostics: &mut Diagnostics) -> Result<Vec<ExtractionUnit>> {
        let (text, path) = self.load_xml()?;
        let root = xml::parse_document(&text).map_err(|e| Error::xml(&path, format!("{:#}", e)))?;
        Ok(extract_units(&root, self.options, diagnostics))
    }
}
