use rustpython_ast::{self as ast, Stmt};
use std::collections::HashMap;

/// A single import binding: a local name mapped to its originating
/// qualified path.
///
/// Examples:
/// - `import mock` -> {"mock", ["mock"], module_alias}
/// - `import unittest.mock as um` -> {"um", ["unittest", "mock"], module_alias}
/// - `from unittest.mock import MagicMock as MM` ->
///   {"MM", ["unittest", "mock", "MagicMock"], not module_alias}
#[derive(Debug, Clone)]
pub struct ImportBinding {
    /// The name the import binds in the file.
    pub local_name: String,
    /// Dotted path segments of the imported target.
    pub qualified_path: Vec<String>,
    /// True for `import X [as Y]`, false for `from X import Y [as Z]`.
    pub is_module_alias: bool,
}

impl ImportBinding {
    /// Last segment of the qualified path (the imported symbol itself for
    /// `from` imports).
    pub fn trailing_segment(&self) -> Option<&str> {
        self.qualified_path.last().map(String::as_str)
    }
}

/// Flat, whole-file import namespace.
///
/// Python's nested and rebindable scoping is deliberately not modeled: all
/// import statements contribute to one mapping regardless of where they
/// appear, and a later binding for the same local name wins. Unusual forms
/// (`from x import *`) simply contribute nothing. This pass never produces
/// violations.
pub struct ImportResolver {
    bindings: HashMap<String, ImportBinding>,
}

impl ImportResolver {
    /// Builds the resolver by walking every statement in the module body,
    /// including imports nested inside function and class bodies.
    pub fn from_module(body: &[Stmt]) -> Self {
        let mut resolver = Self {
            bindings: HashMap::new(),
        };
        for stmt in body {
            resolver.visit_stmt(stmt);
        }
        resolver
    }

    /// Looks up the binding for a local name, if any import introduced one.
    pub fn resolve(&self, local_name: &str) -> Option<&ImportBinding> {
        self.bindings.get(local_name)
    }

    /// Number of collected bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when no import statement contributed a binding.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn add_binding(&mut self, binding: ImportBinding) {
        self.bindings.insert(binding.local_name.clone(), binding);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Import(node) => {
                for alias in &node.names {
                    let local = alias
                        .asname
                        .as_ref()
                        .unwrap_or(&alias.name)
                        .to_string();
                    let path: Vec<String> =
                        alias.name.split('.').map(str::to_string).collect();
                    self.add_binding(ImportBinding {
                        local_name: local,
                        qualified_path: path,
                        is_module_alias: true,
                    });
                }
            }
            Stmt::ImportFrom(node) => {
                for alias in &node.names {
                    // `from x import *` binds nothing we can name.
                    if alias.name.as_str() == "*" {
                        continue;
                    }
                    let local = alias
                        .asname
                        .as_ref()
                        .unwrap_or(&alias.name)
                        .to_string();
                    let mut path: Vec<String> = node
                        .module
                        .as_ref()
                        .map(|m| m.split('.').map(str::to_string).collect())
                        .unwrap_or_default();
                    path.push(alias.name.to_string());
                    self.add_binding(ImportBinding {
                        local_name: local,
                        qualified_path: path,
                        is_module_alias: false,
                    });
                }
            }
            // Imports may appear inside any block; recurse through bodies.
            Stmt::FunctionDef(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFunctionDef(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::ClassDef(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::If(node) => {
                for stmt in node.body.iter().chain(&node.orelse) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::For(node) => {
                for stmt in node.body.iter().chain(&node.orelse) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFor(node) => {
                for stmt in node.body.iter().chain(&node.orelse) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::While(node) => {
                for stmt in node.body.iter().chain(&node.orelse) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::With(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncWith(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::Try(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for handler in &node.handlers {
                    let ast::ExceptHandler::ExceptHandler(handler_node) = handler;
                    for stmt in &handler_node.body {
                        self.visit_stmt(stmt);
                    }
                }
                for stmt in node.orelse.iter().chain(&node.finalbody) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::TryStar(node) => {
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
                for handler in &node.handlers {
                    let ast::ExceptHandler::ExceptHandler(handler_node) = handler;
                    for stmt in &handler_node.body {
                        self.visit_stmt(stmt);
                    }
                }
                for stmt in node.orelse.iter().chain(&node.finalbody) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::Match(node) => {
                for case in &node.cases {
                    for stmt in &case.body {
                        self.visit_stmt(stmt);
                    }
                }
            }
            _ => {}
        }
    }
}
