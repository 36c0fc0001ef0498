//! Static introspection of one Python module with tree-sitter.
//!
//! Reads the information reflection would give: module docstring, export
//! list, top-level functions and classes, ordered parameters with kind,
//! default source text and annotation, and docstrings.

use crate::discovery::ParameterKind;
use crate::inference::{parse_literal, Literal};
use anyhow::{bail, Context, Result};
use tree_sitter::{Node, Parser};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameter {
    pub name: String,
    pub kind: ParameterKind,
    pub annotation: Option<String>,
    pub default: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Instance,
    Class,
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub docstring: Option<String>,
    pub parameters: Vec<RawParameter>,
    pub returns: Option<String>,
    pub method_kind: MethodKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub docstring: Option<String>,
    pub methods: Vec<FunctionDef>,
}

/// A top-level `NAME = <literal>` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConstant {
    pub name: String,
    /// Source text of the assigned literal.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedModule {
    pub docstring: Option<String>,
    /// Names listed in `__all__`, when the module declares it.
    pub exports: Option<Vec<String>>,
    pub functions: Vec<FunctionDef>,
    pub classes: Vec<ClassDef>,
    /// Literal constants in assignment order; a reassigned name keeps its last value.
    pub constants: Vec<ModuleConstant>,
}

impl ParsedModule {
    /// Whether `name` is a public member of this module.
    pub fn exports_name(&self, name: &str) -> bool {
        match &self.exports {
            Some(exports) => exports.iter().any(|export| export == name),
            None => is_public_name(name),
        }
    }

    /// Constants named in `__all__`. Without an export list none are exported.
    pub fn exported_constants(&self) -> impl Iterator<Item = &ModuleConstant> {
        let exports = self.exports.as_deref().unwrap_or_default();
        self.constants
            .iter()
            .filter(move |constant| exports.contains(&constant.name))
    }
}

/// Names starting with `_` or `test` are private unless exported.
pub fn is_public_name(name: &str) -> bool {
    !name.starts_with('_') && !name.starts_with("test")
}

pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

pub fn parse_module(source: &str) -> Result<ParsedModule> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .context("Failed to set tree-sitter language")?;
    let tree = parser
        .parse(source, None)
        .context("Failed to parse source code")?;
    let root = tree.root_node();
    if root.has_error() {
        bail!("Python syntax error in module");
    }

    let mut module = ParsedModule {
        docstring: block_docstring(&root, source),
        ..ParsedModule::default()
    };

    let mut cursor = root.walk();
    for statement in root.named_children(&mut cursor) {
        let (definition, decorators) = unwrap_decorated(&statement, source);
        match definition.kind() {
            "function_definition" => {
                if let Some(function) = function_def(&definition, source, &decorators, false) {
                    module.functions.push(function);
                }
            }
            "class_definition" => {
                if let Some(class) = class_def(&definition, source) {
                    module.classes.push(class);
                }
            }
            "expression_statement" => {
                if let Some(exports) = export_list(&definition, source) {
                    module.exports = Some(exports);
                } else if let Some(constant) = module_constant(&definition, source) {
                    module.constants.retain(|existing| existing.name != constant.name);
                    module.constants.push(constant);
                }
            }
            _ => {}
        }
    }
    Ok(module)
}

fn unwrap_decorated<'t>(statement: &Node<'t>, source: &str) -> (Node<'t>, Vec<String>) {
    if statement.kind() != "decorated_definition" {
        return (*statement, Vec::new());
    }
    let mut decorators = Vec::new();
    let mut cursor = statement.walk();
    for child in statement.named_children(&mut cursor) {
        if child.kind() == "decorator" {
            decorators.push(node_text(&child, source).trim_start_matches('@').trim().to_string());
        }
    }
    let definition = statement
        .child_by_field_name("definition")
        .unwrap_or(*statement);
    (definition, decorators)
}

/// The docstring of a module node or of a definition's body block.
fn block_docstring(block: &Node, source: &str) -> Option<String> {
    let mut cursor = block.walk();
    let first = block.named_children(&mut cursor).find(|n| n.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expression = first.named_child(0)?;
    if expression.kind() != "string" {
        return None;
    }
    match parse_literal(node_text(&expression, source)) {
        Some(Literal::Str(text)) => Some(text),
        _ => None,
    }
}

fn export_list(statement: &Node, source: &str) -> Option<Vec<String>> {
    let assignment = statement.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }
    let left = assignment.child_by_field_name("left")?;
    if node_text(&left, source) != "__all__" {
        return None;
    }
    let right = assignment.child_by_field_name("right")?;
    match parse_literal(node_text(&right, source))? {
        Literal::List(items) | Literal::Tuple(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Literal::Str(name) => Some(name),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

fn module_constant(statement: &Node, source: &str) -> Option<ModuleConstant> {
    let assignment = statement.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }
    let left = assignment.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    let value = node_text(&assignment.child_by_field_name("right")?, source);
    match parse_literal(value)? {
        Literal::None => None,
        _ => Some(ModuleConstant {
            name: node_text(&left, source).to_string(),
            value: value.to_string(),
        }),
    }
}

fn class_def(node: &Node, source: &str) -> Option<ClassDef> {
    let name = node_text(&node.child_by_field_name("name")?, source).to_string();
    let body = node.child_by_field_name("body")?;

    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for statement in body.named_children(&mut cursor) {
        let (definition, decorators) = unwrap_decorated(&statement, source);
        if definition.kind() == "function_definition" {
            if let Some(method) = function_def(&definition, source, &decorators, true) {
                methods.push(method);
            }
        }
    }

    Some(ClassDef {
        name,
        docstring: block_docstring(&body, source),
        methods,
    })
}

fn function_def(
    node: &Node,
    source: &str,
    decorators: &[String],
    is_method: bool,
) -> Option<FunctionDef> {
    let name = node_text(&node.child_by_field_name("name")?, source).to_string();
    let method_kind = if !is_method || decorators.iter().any(|d| d == "staticmethod") {
        MethodKind::Static
    } else if decorators.iter().any(|d| d == "classmethod") {
        MethodKind::Class
    } else {
        MethodKind::Instance
    };

    let parameters = node
        .child_by_field_name("parameters")
        .map(|list| parameter_list(&list, source))
        .unwrap_or_default();
    let returns = node
        .child_by_field_name("return_type")
        .map(|annotation| node_text(&annotation, source).to_string());
    let docstring = node
        .child_by_field_name("body")
        .and_then(|body| block_docstring(&body, source));

    Some(FunctionDef {
        name,
        docstring,
        parameters,
        returns,
        method_kind,
    })
}

fn parameter_list(list: &Node, source: &str) -> Vec<RawParameter> {
    let mut parameters: Vec<RawParameter> = Vec::new();
    let mut keyword_only = false;

    let mut cursor = list.walk();
    for child in list.named_children(&mut cursor) {
        let default_kind = if keyword_only {
            ParameterKind::KeywordOnly
        } else {
            ParameterKind::Positional
        };
        let text = |node: Option<Node>| node.map(|n| node_text(&n, source).to_string());

        let parameter = match child.kind() {
            "identifier" => RawParameter {
                name: node_text(&child, source).to_string(),
                kind: default_kind,
                annotation: None,
                default: None,
            },
            "default_parameter" => RawParameter {
                name: text(child.child_by_field_name("name")).unwrap_or_default(),
                kind: default_kind,
                annotation: None,
                default: text(child.child_by_field_name("value")),
            },
            "typed_default_parameter" => RawParameter {
                name: text(child.child_by_field_name("name")).unwrap_or_default(),
                kind: default_kind,
                annotation: text(child.child_by_field_name("type")),
                default: text(child.child_by_field_name("value")),
            },
            "typed_parameter" => {
                let Some(target) = child.named_child(0) else {
                    continue;
                };
                let (name, kind) = splat_or_plain(&target, source, default_kind);
                if kind == ParameterKind::VarPositional {
                    keyword_only = true;
                }
                RawParameter {
                    name,
                    kind,
                    annotation: text(child.child_by_field_name("type")),
                    default: None,
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                let (name, kind) = splat_or_plain(&child, source, default_kind);
                if kind == ParameterKind::VarPositional {
                    keyword_only = true;
                }
                RawParameter {
                    name,
                    kind,
                    annotation: None,
                    default: None,
                }
            }
            "positional_separator" => {
                for earlier in parameters.iter_mut() {
                    if earlier.kind == ParameterKind::Positional {
                        earlier.kind = ParameterKind::PositionalOnly;
                    }
                }
                continue;
            }
            "keyword_separator" => {
                keyword_only = true;
                continue;
            }
            _ => continue,
        };
        if !parameter.name.is_empty() {
            parameters.push(parameter);
        }
    }
    parameters
}

fn splat_or_plain(node: &Node, source: &str, plain: ParameterKind) -> (String, ParameterKind) {
    let name = node_text(node, source).trim_start_matches('*').trim().to_string();
    let kind = match node.kind() {
        "list_splat_pattern" => ParameterKind::VarPositional,
        "dictionary_splat_pattern" => ParameterKind::VarKeyword,
        _ => plain,
    };
    (name, kind)
}
