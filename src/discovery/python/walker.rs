//! Breadth-first traversal of a package and its submodules.

use super::docstring::parse_docstring;
use super::locator::ModuleLocation;
use super::parser::{
    parse_module, ClassDef, FunctionDef, MethodKind, ModuleConstant, ParsedModule, RawParameter,
};
use crate::core::{Access, Category, FieldKind};
use crate::diagnostics::{Diagnostics, ExtractionFailure, OperationType};
use crate::discovery::callable::{receiver, Callable};
use crate::discovery::{ComponentSignals, ExtractionUnit, ParameterDescriptor, Signal};
use anyhow::Context;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Depth limit of a traversal. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkOptions {
    pub recursive: bool,
    pub max_depth: Option<usize>,
}

impl WalkOptions {
    fn descends_below(&self, depth: usize) -> bool {
        self.recursive && self.max_depth.map_or(true, |max| depth < max)
    }
}

/// Visit `root` and, when recursive, its submodules.
///
/// Each module becomes one extraction unit. A module that cannot be read or
/// parsed is recorded as a failure and its subtree is skipped.
pub fn walk_modules(
    root: ModuleLocation,
    options: WalkOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<ExtractionUnit> {
    let mut units = Vec::new();
    let mut worklist = VecDeque::from([(root, 0usize)]);

    while let Some((location, depth)) = worklist.pop_front() {
        log::debug!("Inspecting module {} at depth {}", location.dotted, depth);
        let parsed = match read_module(&location.file) {
            Ok(parsed) => parsed,
            Err((operation, e)) => {
                diagnostics.failure(ExtractionFailure::new(&location.dotted, operation, e));
                continue;
            }
        };

        if options.descends_below(depth) {
            for child in submodules(&location, &parsed) {
                worklist.push_back((child, depth + 1));
            }
        }
        units.push(module_unit(&location, &parsed, diagnostics));
    }
    units
}

fn read_module(path: &Path) -> Result<ParsedModule, (OperationType, anyhow::Error)> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
        .map_err(|e| (OperationType::ModuleRead, e))?;
    parse_module(&source)
        .with_context(|| format!("Failed to parse {}", path.display()))
        .map_err(|e| (OperationType::ModuleParse, e))
}

/// Direct submodules of a package, sorted by name.
pub fn submodules(location: &ModuleLocation, parsed: &ParsedModule) -> Vec<ModuleLocation> {
    let Some(dir) = location.package_dir() else {
        return Vec::new();
    };

    let mut children: Vec<ModuleLocation> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            if entry.file_type().is_dir() {
                let init = path.join("__init__.py");
                let name = path.file_name()?.to_str()?.to_string();
                init.is_file().then(|| (name, init, true))
            } else if path.extension().and_then(|e| e.to_str()) == Some("py") {
                let name = path.file_stem()?.to_str()?.to_string();
                (name != "__init__").then(|| (name, path.to_path_buf(), false))
            } else {
                None
            }
        })
        .filter(|(name, _, _)| !name.contains('.') && parsed.exports_name(name))
        .map(|(name, file, is_package)| ModuleLocation {
            dotted: format!("{}.{}", location.dotted, name),
            file,
            is_package,
        })
        .collect();
    children.sort_by(|a, b| a.dotted.cmp(&b.dotted));
    children
}

fn module_unit(
    location: &ModuleLocation,
    parsed: &ParsedModule,
    diagnostics: &mut Diagnostics,
) -> ExtractionUnit {
    let mut components: Vec<ComponentSignals> = Vec::new();

    for function in &parsed.functions {
        if !parsed.exports_name(&function.name) {
            continue;
        }
        let callable = function_callable(function, &location.dotted, function.name.clone(), None);
        components.push(callable.into_signals(&location.dotted, diagnostics));
    }

    for class in &parsed.classes {
        if !parsed.exports_name(&class.name) {
            continue;
        }
        for method in class_methods(class) {
            let owner = format!("{}.{}", location.dotted, class.name);
            let label = format!("{}.{}", class.name, method.name);
            let callable = function_callable(method, &owner, label, Some((&owner, class)));
            components.push(callable.into_signals(&location.dotted, diagnostics));
        }
    }

    // Exported constants are shared module state, visible to every component.
    let constants: Vec<ParameterDescriptor> =
        parsed.exported_constants().map(constant_descriptor).collect();
    for component in &mut components {
        for constant in &constants {
            component.push(Signal::Parameter(constant.clone()));
        }
    }

    ExtractionUnit {
        name: location.dotted.clone(),
        description: parsed
            .docstring
            .as_deref()
            .map(|doc| parse_docstring(doc).description)
            .unwrap_or_default(),
        components,
    }
}

fn class_methods(class: &ClassDef) -> impl Iterator<Item = &FunctionDef> {
    class
        .methods
        .iter()
        .filter(|method| method.name == "__init__" || !method.name.starts_with('_'))
}

fn descriptor(raw: &RawParameter) -> ParameterDescriptor {
    let mut parameter = ParameterDescriptor::new(&raw.name);
    parameter.kind = Some(raw.kind.clone());
    parameter.annotation = raw.annotation.clone();
    parameter.default = raw.default.clone();
    parameter
}

fn constant_descriptor(constant: &ModuleConstant) -> ParameterDescriptor {
    let mut parameter = ParameterDescriptor::new(&constant.name);
    parameter.default = Some(constant.value.clone());
    parameter.field_kind = Some(FieldKind::ApplicationArgument);
    parameter.access = Some(Access::ReadOnly);
    parameter.doc_description = Some("Module constant".to_string());
    parameter
}

fn function_callable(
    function: &FunctionDef,
    path: &str,
    label: String,
    class: Option<(&str, &ClassDef)>,
) -> Callable {
    let mut raw = function.parameters.iter();
    let mut parameters = Vec::with_capacity(function.parameters.len());

    if let Some((owner, _)) = class {
        if function.method_kind != MethodKind::Static {
            if let Some(first) = raw.next() {
                parameters.push(receiver(&first.name, owner));
            }
        }
    }
    parameters.extend(raw.map(descriptor));

    // Constructors document their parameters on the class when they have no docstring.
    let docstring = function.docstring.as_deref().or_else(|| {
        class
            .filter(|_| function.name == "__init__")
            .and_then(|(_, class)| class.docstring.as_deref())
    });

    Callable {
        label,
        func_name: format!("{}.{}", path, function.name),
        category: Category::PyFuncApp,
        brief: String::new(),
        parameters,
        returns: function.returns.clone(),
        doc: docstring.map(parse_docstring),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, contents: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn package() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "pkg/__init__.py", "\"\"\"Top package.\"\"\"\n");
        write(
            dir.path(),
            "pkg/alpha.py",
            indoc! {r#"
                def scale(data, factor: float = 2.0) -> list:
                    """Scale values.

                    :param data: the values
                    :param factor: multiplier
                    """
                    return [x * factor for x in data]

                def _private():
                    pass

                class Tool:
                    def __init__(self, size=3):
                        pass

                    def run(self, count: int):
                        pass

                    @staticmethod
                    def helper(x):
                        pass
            "#},
        );
        write(dir.path(), "pkg/broken.py", "def oops(:\n");
        write(dir.path(), "pkg/sub/__init__.py", "");
        write(dir.path(), "pkg/sub/deep.py", "def leaf():\n    pass\n");
        dir
    }

    fn root(dir: &TempDir) -> ModuleLocation {
        ModuleLocation {
            dotted: "pkg".into(),
            file: dir.path().join("pkg/__init__.py"),
            is_package: true,
        }
    }

    fn labels(unit: &ExtractionUnit) -> Vec<&str> {
        unit.components.iter().filter_map(|c| c.label()).collect()
    }

    #[test]
    fn test_breadth_first_with_failure_isolation() {
        let dir = package();
        let mut diagnostics = Diagnostics::new();
        let options = WalkOptions {
            recursive: true,
            max_depth: None,
        };
        let units = walk_modules(root(&dir), options, &mut diagnostics);

        let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["pkg", "pkg.alpha", "pkg.sub", "pkg.sub.deep"]);
        assert_eq!(units[0].description, "Top package.");
        assert_eq!(diagnostics.failure_count(), 1);
        assert_eq!(diagnostics.failures()[0].unit, "pkg.broken");
    }

    #[test]
    fn test_depth_bound() {
        let dir = package();
        let mut diagnostics = Diagnostics::new();
        let options = WalkOptions {
            recursive: true,
            max_depth: Some(1),
        };
        let units = walk_modules(root(&dir), options, &mut diagnostics);
        assert!(units.iter().all(|u| u.name != "pkg.sub.deep"));
    }

    #[test]
    fn test_not_recursive_visits_root_only() {
        let dir = package();
        let mut diagnostics = Diagnostics::new();
        let units = walk_modules(root(&dir), WalkOptions::default(), &mut diagnostics);
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn test_module_members() {
        let dir = package();
        let location = ModuleLocation {
            dotted: "pkg.alpha".into(),
            file: dir.path().join("pkg/alpha.py"),
            is_package: false,
        };
        let mut diagnostics = Diagnostics::new();
        let units = walk_modules(location, WalkOptions::default(), &mut diagnostics);

        assert_eq!(
            labels(&units[0]),
            vec!["scale", "Tool.__init__", "Tool.run", "Tool.helper"]
        );

        let run = &units[0].components[2];
        let first = run.signals.iter().find_map(|s| match s {
            Signal::Parameter(p) => Some(p),
            _ => None,
        });
        assert!(first.is_some_and(|p| p.is_receiver() && p.name == "self"));

        let helper = &units[0].components[3];
        assert!(helper.signals.iter().all(|s| match s {
            Signal::Parameter(p) => !p.is_receiver(),
            _ => true,
        }));
    }

    #[test]
    fn test_exported_constants_become_read_only_arguments() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "consts.py",
            indoc! {r#"
                __all__ = ["RATE", "apply"]
                RATE = 0.5
                HIDDEN = 7

                def apply(x):
                    pass
            "#},
        );
        let location = ModuleLocation {
            dotted: "consts".into(),
            file: dir.path().join("consts.py"),
            is_package: false,
        };
        let mut diagnostics = Diagnostics::new();
        let units = walk_modules(location, WalkOptions::default(), &mut diagnostics);

        let constants: Vec<&ParameterDescriptor> = units[0].components[0]
            .signals
            .iter()
            .filter_map(|s| match s {
                Signal::Parameter(p) if p.access == Some(Access::ReadOnly) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(constants.len(), 1);
        assert_eq!(constants[0].name, "RATE");
        assert_eq!(constants[0].default.as_deref(), Some("0.5"));
        assert_eq!(constants[0].field_kind, Some(FieldKind::ApplicationArgument));
    }

    #[test]
    fn test_exports_limit_submodules() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "pkg/__init__.py", "__all__ = ['alpha']\n");
        write(dir.path(), "pkg/alpha.py", "");
        write(dir.path(), "pkg/beta.py", "");
        let location = ModuleLocation {
            dotted: "pkg".into(),
            file: dir.path().join("pkg/__init__.py"),
            is_package: true,
        };
        let parsed = read_module(&location.file).map_err(|(_, e)| e).unwrap();
        let children = submodules(&location, &parsed);

        assert_eq!(children.len(), 1);
        assert_eq!(children[0].file, PathBuf::from(dir.path().join("pkg/alpha.py")));
    }
}
