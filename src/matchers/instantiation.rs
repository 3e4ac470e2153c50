use crate::resolver::ImportResolver;
use crate::utils::LineIndex;
use crate::violation::{Category, Violation};
use rustpython_ast::{self as ast, Expr, Stmt};
use std::collections::HashSet;

lazy_static::lazy_static! {
    /// The mock-family class names this matcher recognizes.
    static ref MOCK_CLASSES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("Mock");
        s.insert("MagicMock");
        s.insert("AsyncMock");
        s.insert("PropertyMock");
        s
    };
}

/// Detects calls whose callee is one of the mock-family classes.
///
/// Two callee shapes are matched:
/// - a bare identifier call (`Mock()`), by name or through an import alias
///   (`from unittest.mock import MagicMock as MM; MM()`);
/// - a qualified attribute call whose trailing attribute is a mock class
///   (`mock.MagicMock()`, `unittest.mock.Mock()`), with any receiver chain.
///
/// Only call-expression callees are examined. A variable merely named `mock`
/// or an assignment target like `mock_data = ...` never matches.
pub struct InstantiationMatcher<'a> {
    /// Collected violations, one per matching call, anchored at the call line.
    pub findings: Vec<Violation>,
    resolver: &'a ImportResolver,
    line_index: &'a LineIndex,
}

impl<'a> InstantiationMatcher<'a> {
    /// Creates a new `InstantiationMatcher`.
    pub fn new(resolver: &'a ImportResolver, line_index: &'a LineIndex) -> Self {
        Self {
            findings: Vec::new(),
            resolver,
            line_index,
        }
    }

    /// Resolves a callee expression to a mock class name, if it is one.
    fn mock_class_name(&self, callee: &Expr) -> Option<String> {
        match callee {
            Expr::Name(node) => {
                let id = node.id.as_str();
                if MOCK_CLASSES.contains(id) {
                    return Some(id.to_string());
                }
                // An aliased `from` import still denotes the class.
                let binding = self.resolver.resolve(id)?;
                if binding.is_module_alias {
                    return None;
                }
                let trailing = binding.trailing_segment()?;
                if MOCK_CLASSES.contains(trailing) {
                    Some(trailing.to_string())
                } else {
                    None
                }
            }
            Expr::Attribute(node) => {
                let attr = node.attr.as_str();
                if MOCK_CLASSES.contains(attr) {
                    Some(attr.to_string())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn check_call(&mut self, call: &ast::ExprCall) {
        if let Some(class_name) = self.mock_class_name(&call.func) {
            let line = self.line_index.line_index(call.range.start());
            self.findings
                .push(Violation::new(line, Category::MockInstantiation, class_name));
        }
    }

    /// Visits statements, recursing into every block that can hold a call.
    pub fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(node) => {
                for decorator in &node.decorator_list {
                    self.visit_expr(decorator);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFunctionDef(node) => {
                for decorator in &node.decorator_list {
                    self.visit_expr(decorator);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::ClassDef(node) => {
                for decorator in &node.decorator_list {
                    self.visit_expr(decorator);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::Expr(node) => self.visit_expr(&node.value),
            Stmt::Assign(node) => self.visit_expr(&node.value),
            Stmt::AugAssign(node) => self.visit_expr(&node.value),
            Stmt::AnnAssign(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Return(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Stmt::Assert(node) => {
                self.visit_expr(&node.test);
                if let Some(msg) = &node.msg {
                    self.visit_expr(msg);
                }
            }
            Stmt::If(node) => {
                self.visit_expr(&node.test);
                for stmt in node.body.iter().chain(&node.orelse) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::For(node) => {
                self.visit_expr(&node.iter);
                for stmt in node.body.iter().chain(&node.orelse) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFor(node) => {
                self.visit_expr(&node.iter);
                for stmt in node.body.iter().chain(&node.orelse) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::While(node) => {
                self.visit_expr(&node.test);
                for stmt in node.body.iter().chain(&node.orelse) {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::With(node) => {
                for item in &node.items {
                    self.visit_expr(&item.context_expr);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncWith(node) => {
                for item in &node.items {
                    self.visit_expr(&item.context_expr);
                }
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
                self.visit_expr(&node.subject);
                for case in &node.cases {
                    if let Some(guard) = &case.guard {
                        self.visit_expr(guard);
                    }
                    for stmt in &case.body {
                        self.visit_stmt(stmt);
                    }
                }
            }
            Stmt::Raise(node) => {
                if let Some(exc) = &node.exc {
                    self.visit_expr(exc);
                }
                if let Some(cause) = &node.cause {
                    self.visit_expr(cause);
                }
            }
            _ => {}
        }
    }

    /// Visits expressions, checking calls and recursing into subexpressions.
    pub fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Call(node) => {
                self.check_call(node);
                self.visit_expr(&node.func);
                for arg in &node.args {
                    self.visit_expr(arg);
                }
                for keyword in &node.keywords {
                    self.visit_expr(&keyword.value);
                }
            }
            Expr::Attribute(node) => self.visit_expr(&node.value),
            Expr::BoolOp(node) => {
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::BinOp(node) => {
                self.visit_expr(&node.left);
                self.visit_expr(&node.right);
            }
            Expr::UnaryOp(node) => self.visit_expr(&node.operand),
            Expr::Lambda(node) => self.visit_expr(&node.body),
            Expr::IfExp(node) => {
                self.visit_expr(&node.test);
                self.visit_expr(&node.body);
                self.visit_expr(&node.orelse);
            }
            Expr::Dict(node) => {
                for (key, value) in node.keys.iter().zip(&node.values) {
                    if let Some(k) = key {
                        self.visit_expr(k);
                    }
                    self.visit_expr(value);
                }
            }
            Expr::Set(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::List(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::Tuple(node) => {
                for elt in &node.elts {
                    self.visit_expr(elt);
                }
            }
            Expr::ListComp(node) => {
                self.visit_expr(&node.elt);
                for gen in &node.generators {
                    self.visit_expr(&gen.iter);
                    for if_expr in &gen.ifs {
                        self.visit_expr(if_expr);
                    }
                }
            }
            Expr::SetComp(node) => {
                self.visit_expr(&node.elt);
                for gen in &node.generators {
                    self.visit_expr(&gen.iter);
                    for if_expr in &gen.ifs {
                        self.visit_expr(if_expr);
                    }
                }
            }
            Expr::DictComp(node) => {
                self.visit_expr(&node.key);
                self.visit_expr(&node.value);
                for gen in &node.generators {
                    self.visit_expr(&gen.iter);
                    for if_expr in &gen.ifs {
                        self.visit_expr(if_expr);
                    }
                }
            }
            Expr::GeneratorExp(node) => {
                self.visit_expr(&node.elt);
                for gen in &node.generators {
                    self.visit_expr(&gen.iter);
                    for if_expr in &gen.ifs {
                        self.visit_expr(if_expr);
                    }
                }
            }
            Expr::Await(node) => self.visit_expr(&node.value),
            Expr::Yield(node) => {
                if let Some(value) = &node.value {
                    self.visit_expr(value);
                }
            }
            Expr::YieldFrom(node) => self.visit_expr(&node.value),
            Expr::Compare(node) => {
                self.visit_expr(&node.left);
                for comparator in &node.comparators {
                    self.visit_expr(comparator);
                }
            }
            Expr::Subscript(node) => {
                self.visit_expr(&node.value);
                self.visit_expr(&node.slice);
            }
            Expr::Starred(node) => self.visit_expr(&node.value),
            Expr::NamedExpr(node) => self.visit_expr(&node.value),
            Expr::FormattedValue(node) => self.visit_expr(&node.value),
            Expr::JoinedStr(node) => {
                for value in &node.values {
                    self.visit_expr(value);
                }
            }
            Expr::Slice(node) => {
                if let Some(lower) = &node.lower {
                    self.visit_expr(lower);
                }
                if let Some(upper) = &node.upper {
                    self.visit_expr(upper);
                }
                if let Some(step) = &node.step {
                    self.visit_expr(step);
                }
            }
            _ => {}
        }
    }
}
