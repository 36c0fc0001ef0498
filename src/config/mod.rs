//! Run configuration.
//!
//! Two sources feed a run: [`ProjectConfig`], the project identity taken
//! from the environment, and [`FileConfig`], optional settings from the
//! nearest `.palettegen.toml`.

pub mod loader;
pub mod project;

pub use loader::{load_config, load_config_from, parse_config, CONFIG_FILE_NAME};
pub use project::ProjectConfig;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub doxygen: DoxygenConfig,
    pub python: PythonConfig,
    pub palette: PaletteConfig,
}

/// Extra doxygen settings, applied after the built-in ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoxygenConfig {
    pub settings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    /// Module search roots, relative to the config file's directory.
    pub search_paths: Vec<PathBuf>,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Name recorded as the palette's last modifier.
    pub author: Option<String>,
}

impl FileConfig {
    pub(crate) fn resolve_relative_paths(&mut self, base: &Path) {
        for path in &mut self.python.search_paths {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
