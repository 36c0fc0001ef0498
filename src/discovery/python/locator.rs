//! Resolve dotted module paths to source files.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLocation {
    pub dotted: String,
    pub file: PathBuf,
    pub is_package: bool,
}

impl ModuleLocation {
    /// Directory holding a package's submodules.
    pub fn package_dir(&self) -> Option<&Path> {
        if self.is_package {
            self.file.parent()
        } else {
            None
        }
    }
}

/// Find `a.b` as `a/b.py` or `a/b/__init__.py` under the first root that has it.
pub fn locate_module(dotted: &str, roots: &[PathBuf]) -> Option<ModuleLocation> {
    if dotted.is_empty() || dotted.split('.').any(|part| part.is_empty()) {
        return None;
    }
    let relative: PathBuf = dotted.split('.').collect();

    roots.iter().find_map(|root| {
        let base = root.join(&relative);
        let init = base.join("__init__.py");
        if init.is_file() {
            return Some(ModuleLocation {
                dotted: dotted.to_string(),
                file: init,
                is_package: true,
            });
        }
        let file = base.with_extension("py");
        file.is_file().then(|| ModuleLocation {
            dotted: dotted.to_string(),
            file,
            is_package: false,
        })
    })
}

/// Split a `:`-separated search path list, skipping empty entries.
pub fn split_search_path(list: &str) -> Vec<PathBuf> {
    std::env::split_paths(list)
        .filter(|path| !path.as_os_str().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_locates_package_and_module() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("pkg/sub")).unwrap();
        fs::write(root.path().join("pkg/__init__.py"), "").unwrap();
        fs::write(root.path().join("pkg/sub/__init__.py"), "").unwrap();
        fs::write(root.path().join("pkg/tools.py"), "").unwrap();
        let roots = vec![root.path().to_path_buf()];

        let package = locate_module("pkg", &roots).unwrap();
        assert!(package.is_package);
        assert_eq!(package.package_dir(), Some(root.path().join("pkg").as_path()));

        let module = locate_module("pkg.tools", &roots).unwrap();
        assert!(!module.is_package);
        assert_eq!(module.file, root.path().join("pkg/tools.py"));

        assert!(locate_module("pkg.sub", &roots).unwrap().is_package);
        assert!(locate_module("pkg.missing", &roots).is_none());
        assert!(locate_module("pkg..tools", &roots).is_none());
    }

    #[test]
    fn test_first_root_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("m.py"), "").unwrap();
        fs::write(second.path().join("m.py"), "").unwrap();

        let found = locate_module("m", &[first.path().to_path_buf(), second.path().to_path_buf()])
            .unwrap();
        assert_eq!(found.file, first.path().join("m.py"));
    }

    #[test]
    fn test_split_search_path() {
        assert_eq!(
            split_search_path("/a::/b"),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }
}
