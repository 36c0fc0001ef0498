use std::path::Path;

pub const DEFAULT_VERSION: &str = "0.1";

/// Project identity stamped into every palette header and node.
///
/// Read once at startup and passed explicitly to the document builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    pub version: String,
    pub repository: String,
}

impl ProjectConfig {
    /// Read `PROJECT_NAME`, `PROJECT_VERSION` and `GIT_REPO` from the process
    /// environment.
    pub fn from_env() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::from_lookup(|key| std::env::var(key).ok(), &cwd)
    }

    /// Build from any variable lookup; unset or empty values take defaults.
    pub fn from_lookup<F>(lookup: F, cwd: &Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let name = get("PROJECT_NAME").unwrap_or_else(|| {
            cwd.file_name()
                .map(|base| base.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let version = get("PROJECT_VERSION").unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let repository = get("GIT_REPO").unwrap_or_else(|| name.clone());

        Self {
            name,
            version,
            repository,
        }
    }
}
