use crate::utils::LineIndex;
use crate::violation::{Category, Violation};
use rustpython_ast::{self as ast, Expr, Stmt};

/// Detects test functions that declare and use a mocking fixture parameter.
///
/// One instance handles `mocker` (pytest-mock), another `monkeypatch`
/// (pytest); the two runs are fully independent, so a function taking both
/// parameters yields two violations on the same `def` line.
///
/// The gate is "declared and referenced": the parameter must appear in the
/// signature AND the body must access it (attribute lookup or call). A
/// signature-only `mocker` that the body never touches is not reported.
/// However many times the body uses the fixture, the function yields at most
/// one violation, anchored at the `def` line.
pub struct FixtureMatcher<'a> {
    /// Collected violations, at most one per function definition.
    pub findings: Vec<Violation>,
    fixture: &'static str,
    category: Category,
    line_index: &'a LineIndex,
}

impl<'a> FixtureMatcher<'a> {
    /// Matcher for the pytest-mock `mocker` fixture.
    pub fn mocker(line_index: &'a LineIndex) -> Self {
        Self {
            findings: Vec::new(),
            fixture: "mocker",
            category: Category::MockerFixture,
            line_index,
        }
    }

    /// Matcher for the pytest `monkeypatch` fixture.
    pub fn monkeypatch(line_index: &'a LineIndex) -> Self {
        Self {
            findings: Vec::new(),
            fixture: "monkeypatch",
            category: Category::MonkeypatchFixture,
            line_index,
        }
    }

    fn check_function(
        &mut self,
        args: &ast::Arguments,
        body: &[Stmt],
        range_start: rustpython_ast::TextSize,
    ) {
        if declares_parameter(args, self.fixture)
            && body.iter().any(|stmt| stmt_references(stmt, self.fixture))
        {
            let line = self.line_index.line_index(range_start);
            self.findings
                .push(Violation::new(line, self.category, self.fixture));
        }
    }

    /// Visits statements, checking every function definition it encounters.
    pub fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(node) => {
                self.check_function(&node.args, &node.body, node.range.start());
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFunctionDef(node) => {
                self.check_function(&node.args, &node.body, node.range.start());
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

/// Checks positional-only, positional, and keyword-only parameters for the
/// fixture name. `*args`/`**kwargs` cannot carry a fixture.
fn declares_parameter(args: &ast::Arguments, name: &str) -> bool {
    args.posonlyargs
        .iter()
        .chain(&args.args)
        .chain(&args.kwonlyargs)
        .any(|arg| arg.def.arg.as_str() == name)
}

/// True if the statement contains a use of the fixture: an attribute access
/// (`mocker.patch(...)`) or a direct call (`mocker(...)`). A bare mention of
/// the name (e.g. passing it along) does not count.
fn stmt_references(stmt: &Stmt, name: &str) -> bool {
    match stmt {
        Stmt::Expr(node) => expr_references(&node.value, name),
        Stmt::Assign(node) => expr_references(&node.value, name),
        Stmt::AugAssign(node) => expr_references(&node.value, name),
        Stmt::AnnAssign(node) => node
            .value
            .as_ref()
            .map_or(false, |value| expr_references(value, name)),
        Stmt::Return(node) => node
            .value
            .as_ref()
            .map_or(false, |value| expr_references(value, name)),
        Stmt::Assert(node) => {
            expr_references(&node.test, name)
                || node
                    .msg
                    .as_ref()
                    .map_or(false, |msg| expr_references(msg, name))
        }
        Stmt::If(node) => {
            expr_references(&node.test, name)
                || node
                    .body
                    .iter()
                    .chain(&node.orelse)
                    .any(|stmt| stmt_references(stmt, name))
        }
        Stmt::For(node) => {
            expr_references(&node.iter, name)
                || node
                    .body
                    .iter()
                    .chain(&node.orelse)
                    .any(|stmt| stmt_references(stmt, name))
        }
        Stmt::AsyncFor(node) => {
            expr_references(&node.iter, name)
                || node
                    .body
                    .iter()
                    .chain(&node.orelse)
                    .any(|stmt| stmt_references(stmt, name))
        }
        Stmt::While(node) => {
            expr_references(&node.test, name)
                || node
                    .body
                    .iter()
                    .chain(&node.orelse)
                    .any(|stmt| stmt_references(stmt, name))
        }
        Stmt::With(node) => {
            node.items
                .iter()
                .any(|item| expr_references(&item.context_expr, name))
                || node.body.iter().any(|stmt| stmt_references(stmt, name))
        }
        Stmt::AsyncWith(node) => {
            node.items
                .iter()
                .any(|item| expr_references(&item.context_expr, name))
                || node.body.iter().any(|stmt| stmt_references(stmt, name))
        }
        Stmt::Try(node) => {
            node.body.iter().any(|stmt| stmt_references(stmt, name))
                || node.handlers.iter().any(|handler| {
                    let ast::ExceptHandler::ExceptHandler(handler_node) = handler;
                    handler_node
                        .body
                        .iter()
                        .any(|stmt| stmt_references(stmt, name))
                })
                || node
                    .orelse
                    .iter()
                    .chain(&node.finalbody)
                    .any(|stmt| stmt_references(stmt, name))
        }
        Stmt::TryStar(node) => {
            node.body.iter().any(|stmt| stmt_references(stmt, name))
                || node.handlers.iter().any(|handler| {
                    let ast::ExceptHandler::ExceptHandler(handler_node) = handler;
                    handler_node
                        .body
                        .iter()
                        .any(|stmt| stmt_references(stmt, name))
                })
                || node
                    .orelse
                    .iter()
                    .chain(&node.finalbody)
                    .any(|stmt| stmt_references(stmt, name))
        }
        Stmt::Match(node) => {
            expr_references(&node.subject, name)
                || node.cases.iter().any(|case| {
                    case.guard
                        .as_ref()
                        .map_or(false, |guard| expr_references(guard, name))
                        || case.body.iter().any(|stmt| stmt_references(stmt, name))
                })
        }
        Stmt::Raise(node) => {
            node.exc
                .as_ref()
                .map_or(false, |exc| expr_references(exc, name))
                || node
                    .cause
                    .as_ref()
                    .map_or(false, |cause| expr_references(cause, name))
        }
        Stmt::FunctionDef(node) => {
            node.body.iter().any(|stmt| stmt_references(stmt, name))
        }
        Stmt::AsyncFunctionDef(node) => {
            node.body.iter().any(|stmt| stmt_references(stmt, name))
        }
        _ => false,
    }
}

fn expr_references(expr: &Expr, name: &str) -> bool {
    match expr {
        Expr::Attribute(node) => {
            if let Expr::Name(base) = &*node.value {
                if base.id.as_str() == name {
                    return true;
                }
            }
            expr_references(&node.value, name)
        }
        Expr::Call(node) => {
            if let Expr::Name(func) = &*node.func {
                if func.id.as_str() == name {
                    return true;
                }
            }
            expr_references(&node.func, name)
                || node.args.iter().any(|arg| expr_references(arg, name))
                || node
                    .keywords
                    .iter()
                    .any(|keyword| expr_references(&keyword.value, name))
        }
        Expr::Await(node) => expr_references(&node.value, name),
        Expr::BoolOp(node) => node.values.iter().any(|value| expr_references(value, name)),
        Expr::BinOp(node) => {
            expr_references(&node.left, name) || expr_references(&node.right, name)
        }
        Expr::UnaryOp(node) => expr_references(&node.operand, name),
        Expr::Compare(node) => {
            expr_references(&node.left, name)
                || node
                    .comparators
                    .iter()
                    .any(|comparator| expr_references(comparator, name))
        }
        Expr::Subscript(node) => expr_references(&node.value, name),
        Expr::Starred(node) => expr_references(&node.value, name),
        Expr::IfExp(node) => {
            expr_references(&node.test, name)
                || expr_references(&node.body, name)
                || expr_references(&node.orelse, name)
        }
        Expr::Tuple(node) => node.elts.iter().any(|elt| expr_references(elt, name)),
        Expr::List(node) => node.elts.iter().any(|elt| expr_references(elt, name)),
        Expr::Set(node) => node.elts.iter().any(|elt| expr_references(elt, name)),
        Expr::Dict(node) => {
            node.keys
                .iter()
                .flatten()
                .any(|key| expr_references(key, name))
                || node.values.iter().any(|value| expr_references(value, name))
        }
        _ => false,
    }
}
