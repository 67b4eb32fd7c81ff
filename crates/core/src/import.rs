//! Import statement extraction from Python source files.
//!
//! Statements are captured losslessly (aliases, relative levels, star
//! imports, source ranges) and only flattened into graph targets by
//! [`ImportStatement::targets`].
//!
//! # Example
//!
//! ```
//! use import_graph_core::import::{self, ImportStatement};
//!
//! # fn main() -> Result<(), import_graph_core::Error> {
//! let imports = import::extract_imports_from_source("import os\nfrom . import util\n")?;
//!
//! for import in &imports {
//!     match import {
//!         ImportStatement::Import { items, range } => {
//!             println!("Line {}: import {}", range.start_line,
//!                 items.iter().map(|m| m.name.clone()).collect::<Vec<_>>().join(", "));
//!         }
//!         ImportStatement::ImportFrom { module, level, names, range } => {
//!             let dots = ".".repeat(*level as usize);
//!             println!("Line {}: from {}{} import {}",
//!                 range.start_line, dots,
//!                 module.as_deref().unwrap_or(""),
//!                 names.len());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tree_sitter::{Node, Parser as TsParser, Tree};
use tree_sitter_python::LANGUAGE;

use crate::error::{Error, Result};
use crate::resolve;

/// A single import statement from a Python file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportStatement {
    /// `import module [as alias]`
    /// Also supports: `import a, b as c`
    Import {
        /// Example: `import os, sys as system` → two ImportedModule items.
        items: Vec<ImportedModule>,
        range: SourceRange,
    },

    /// `from module import name [as alias]`
    /// Also supports: `from . import foo`, `from x import *`
    ImportFrom {
        /// Module name (None for `from . import foo`).
        module: Option<String>,
        /// Relative import level (0 = absolute, 1 = `.`, 2 = `..`).
        level: u8,
        /// Imported symbols (may include star import).
        names: Vec<ImportedName>,
        range: SourceRange,
    },
}

/// A single module imported via `import` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedModule {
    /// Module name (e.g., "os", "os.path", "numpy").
    pub name: String,
    /// Alias if present (e.g., `import numpy as np` → Some("np")).
    pub alias: Option<String>,
}

/// A single symbol imported via `from ... import` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedName {
    /// Symbol name (e.g., "path", "join", or "*" for star imports).
    pub name: String,
    /// Alias if present (e.g., `from os import path as p` → Some("p")).
    pub alias: Option<String>,
    /// Whether this is a star import (`from module import *`).
    #[serde(default)]
    pub is_star: bool,
}

/// Statement-level source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRange {
    /// Byte offset of start (0-based).
    pub start_byte: usize,
    /// Byte offset of end (0-based).
    pub end_byte: usize,
    /// Start line (1-indexed for human readability).
    pub start_line: usize,
    /// End line (1-indexed for human readability).
    pub end_line: usize,
}

impl SourceRange {
    fn of(node: &Node) -> Self {
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: node.start_position().row + 1,
            end_line: node.end_position().row + 1,
        }
    }
}

impl ImportStatement {
    /// Dotted names this statement imports, as seen from `importer`
    ///
    /// - `import a.b as c` → `a.b`
    /// - `from m import x` → `m.x`
    /// - `from m import *` → `m`
    /// - `from .m import x` inside `pkg.mod` → `pkg.m.x`
    pub fn targets(&self, importer: &str) -> Vec<String> {
        match self {
            ImportStatement::Import { items, .. } => {
                items.iter().map(|item| item.name.clone()).collect()
            }
            ImportStatement::ImportFrom {
                module,
                level,
                names,
                ..
            } => {
                let base = if *level > 0 {
                    resolve::resolve_relative(importer, usize::from(*level), module.as_deref())
                } else {
                    module.clone().unwrap_or_default()
                };

                names
                    .iter()
                    .map(|name| {
                        if name.is_star {
                            base.clone()
                        } else {
                            resolve::join(&base, &name.name)
                        }
                    })
                    .filter(|target| !target.is_empty())
                    .collect()
            }
        }
    }
}

/// Extract import statements from a Python file.
///
/// # Errors
///
/// Returns an error if the file cannot be read as UTF-8 or if it does not
/// parse as valid Python (see [`extract_imports_from_source`]).
pub fn extract_imports(path: &Path) -> Result<Vec<ImportStatement>> {
    let source = std::fs::read_to_string(path)?;
    extract_imports_from_source(&source)
}

/// Extract import statements from Python source text.
///
/// Every import in the file counts, including those nested in functions,
/// classes, conditionals and `try` blocks. Statements are returned in
/// source order.
///
/// # Errors
///
/// [`Error::Syntax`] when tree-sitter reports an error or missing node
/// anywhere in the tree. Partial results are discarded in that case.
pub fn extract_imports_from_source(source: &str) -> Result<Vec<ImportStatement>> {
    let tree = parse(source)?;
    let root = tree.root_node();

    if root.has_error() {
        return Err(Error::Syntax {
            line: first_error_line(&root).unwrap_or(1),
        });
    }

    let source = source.as_bytes();
    let mut imports = Vec::new();
    let mut cursor = root.walk();

    // Pre-order walk; import statements never contain further imports
    'walk: loop {
        let node = cursor.node();
        let statement = match node.kind() {
            "import_statement" => Some(parse_import(&node, source)),
            "import_from_statement" => Some(parse_import_from(&node, source)),
            "future_import_statement" => Some(parse_future_import(&node, source)),
            _ => None,
        };

        let descend = match statement {
            Some(statement) => {
                imports.push(statement);
                false
            }
            None => true,
        };

        if descend && cursor.goto_first_child() {
            continue;
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    Ok(imports)
}

fn parse(source: &str) -> Result<Tree> {
    let mut parser = TsParser::new();
    parser
        .set_language(&LANGUAGE.into())
        .map_err(|err| Error::Parser(err.to_string()))?;

    parser
        .parse(source, None)
        .ok_or_else(|| Error::Parser("tree-sitter returned no tree".to_string()))
}

fn first_error_line(root: &Node) -> Option<usize> {
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Source text of a node with any interior whitespace removed
///
/// `import a . b` is legal Python and names `a.b`.
fn dotted_text(node: &Node, source: &[u8]) -> Option<String> {
    node.utf8_text(source)
        .ok()
        .map(|text| text.split_whitespace().collect())
}

fn field_text(node: &Node, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|child| dotted_text(&child, source))
}

/// Split a `name:` child into name and optional alias
fn name_and_alias(node: &Node, source: &[u8]) -> Option<(String, Option<String>)> {
    match node.kind() {
        "aliased_import" => {
            let name = field_text(node, "name", source)?;
            Some((name, field_text(node, "alias", source)))
        }
        _ => dotted_text(node, source).map(|name| (name, None)),
    }
}

fn parse_import(node: &Node, source: &[u8]) -> ImportStatement {
    let mut cursor = node.walk();
    let items = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|child| name_and_alias(&child, source))
        .map(|(name, alias)| ImportedModule { name, alias })
        .collect();

    ImportStatement::Import {
        items,
        range: SourceRange::of(node),
    }
}

fn imported_names(node: &Node, source: &[u8]) -> Vec<ImportedName> {
    let mut cursor = node.walk();
    let mut names: Vec<ImportedName> = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|child| name_and_alias(&child, source))
        .map(|(name, alias)| ImportedName {
            name,
            alias,
            is_star: false,
        })
        .collect();

    let mut cursor = node.walk();
    let has_star = node
        .children(&mut cursor)
        .any(|child| child.kind() == "wildcard_import");
    if has_star {
        names.push(ImportedName {
            name: "*".to_string(),
            alias: None,
            is_star: true,
        });
    }

    names
}

fn parse_import_from(node: &Node, source: &[u8]) -> ImportStatement {
    let (module, level) = match node.child_by_field_name("module_name") {
        Some(module_node) if module_node.kind() == "relative_import" => {
            relative_module(&module_node, source)
        }
        Some(module_node) => (dotted_text(&module_node, source), 0),
        None => (None, 0),
    };

    ImportStatement::ImportFrom {
        module,
        level,
        names: imported_names(node, source),
        range: SourceRange::of(node),
    }
}

/// `..pkg.mod` → (Some("pkg.mod"), 2); `.` → (None, 1)
fn relative_module(node: &Node, source: &[u8]) -> (Option<String>, u8) {
    let mut level = 0usize;
    let mut module = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "import_prefix" => {
                level += child
                    .utf8_text(source)
                    .map(|dots| dots.chars().filter(|c| *c == '.').count())
                    .unwrap_or(0);
            }
            "dotted_name" => module = dotted_text(&child, source),
            _ => {}
        }
    }

    (module, u8::try_from(level).unwrap_or(u8::MAX))
}

fn parse_future_import(node: &Node, source: &[u8]) -> ImportStatement {
    ImportStatement::ImportFrom {
        module: Some("__future__".to_string()),
        level: 0,
        names: imported_names(node, source),
        range: SourceRange::of(node),
    }
}
