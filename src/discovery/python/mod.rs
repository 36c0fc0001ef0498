//! Runtime-reflection front-end: components from a Python package.
//!
//! The package is never imported. Each module is parsed with tree-sitter and
//! read for the same facts reflection would report.

pub mod docstring;
pub mod locator;
pub mod parser;
pub mod walker;

pub use locator::{locate_module, split_search_path, ModuleLocation};
pub use walker::{walk_modules, WalkOptions};

use super::{ComponentSource, ExtractionUnit};
use crate::diagnostics::Diagnostics;
use crate::errors::Error;
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonModuleSource {
    /// Dotted path of the root module.
    pub module: String,
    /// Search roots, tried in order.
    pub roots: Vec<PathBuf>,
    pub options: WalkOptions,
}

impl PythonModuleSource {
    pub fn new(module: impl Into<String>, roots: Vec<PathBuf>, options: WalkOptions) -> Self {
        Self {
            module: module.into(),
            roots,
            options,
        }
    }
}

impl ComponentSource for PythonModuleSource {
    fn describe(&self) -> String {
        format!("module {}", self.module)
    }

    fn discover(&self, diagnostics: &mut Diagnostics) -> Result<Vec<ExtractionUnit>> {
        let location = locate_module(&self.module, &self.roots).ok_or_else(|| Error::ModuleNotFound {
            module: self.module.clone(),
            searched: self.roots.clone(),
        })?;
        log::info!("Found module {} at {}", self.module, location.file.display());
        Ok(walk_modules(location, self.options, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_module_is_fatal() {
        let dir = TempDir::new().unwrap();
        let source = PythonModuleSource::new("absent", vec![dir.path().to_path_buf()], WalkOptions::default());
        let mut diagnostics = Diagnostics::new();

        let err = source.discover(&mut diagnostics).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::ModuleNotFound { .. })));
    }

    #[test]
    fn test_discover_single_module() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tools.py"), "def run(x: int) -> int:\n    return x\n").unwrap();
        let source = PythonModuleSource::new("tools", vec![dir.path().to_path_buf()], WalkOptions::default());
        let mut diagnostics = Diagnostics::new();

        let units = source.discover(&mut diagnostics).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].components[0].label(), Some("run"));
    }
}
