use crate::utils::LineIndex;
use crate::violation::{Category, Violation};
use rustpython_ast::{self as ast, Expr, Ranged, Stmt};

/// Attribute forms of `patch` that are treated like `patch` itself.
const PATCH_VARIANTS: [&str; 3] = ["object", "multiple", "dict"];

/// A recognized patch-family callee shape.
struct PatchForm {
    /// "patch", "patch.object", "patch.multiple" or "patch.dict".
    form: String,
    /// Full dotted callee, e.g. ["unittest", "mock", "patch"].
    path: Vec<String>,
    /// Number of module-qualifying segments before the form.
    prefix_len: usize,
}

impl PatchForm {
    fn is_qualified(&self) -> bool {
        self.prefix_len > 0
    }

    fn dotted(&self) -> String {
        self.path.join(".")
    }
}

/// Flattens a `Name`/`Attribute` chain into dotted segments.
///
/// Returns `None` for any other receiver shape (subscripts, calls, ...),
/// which simply means "not a patch callee" rather than an error.
fn dotted_path(expr: &Expr) -> Option<Vec<String>> {
    match expr {
        Expr::Name(node) => Some(vec![node.id.to_string()]),
        Expr::Attribute(node) => {
            let mut path = dotted_path(&node.value)?;
            path.push(node.attr.to_string());
            Some(path)
        }
        _ => None,
    }
}

/// Recognizes a callee ending in `patch` or `patch.<variant>`, with any
/// dotted module prefix.
fn patch_form(callee: &Expr) -> Option<PatchForm> {
    let path = dotted_path(callee)?;
    let last = path.last()?.as_str();

    if last == "patch" {
        return Some(PatchForm {
            form: "patch".to_string(),
            prefix_len: path.len() - 1,
            path,
        });
    }

    if path.len() >= 2 && PATCH_VARIANTS.contains(&last) && path[path.len() - 2] == "patch" {
        return Some(PatchForm {
            form: format!("patch.{}", last),
            prefix_len: path.len() - 2,
            path,
        });
    }

    None
}

/// Detects the `patch` family in its three syntactic positions.
///
/// 1. Decorators on function definitions: bare or qualified, one violation
///    per decorator at the decorator's own line.
/// 2. `with` items: each matching item reported independently at its line.
/// 3. Any other call, reported only when the callee carries a qualifying
///    module prefix (`mock.patch(...)`). A fully bare `patch(...)` expression
///    call is indistinguishable from a user-defined function named `patch`,
///    so it is never reported in this position.
///
/// A call already reported as a decorator or `with` item is not re-reported
/// in call position; its arguments are still scanned.
pub struct PatchMatcher<'a> {
    /// Collected violations.
    pub findings: Vec<Violation>,
    line_index: &'a LineIndex,
}

impl<'a> PatchMatcher<'a> {
    /// Creates a new `PatchMatcher`.
    pub fn new(line_index: &'a LineIndex) -> Self {
        Self {
            findings: Vec::new(),
            line_index,
        }
    }

    /// Checks one decorator expression, call-shaped or bare.
    fn check_decorator(&mut self, decorator: &Expr) {
        let callee = match decorator {
            Expr::Call(call) => &*call.func,
            other => other,
        };

        if let Some(form) = patch_form(callee) {
            let line = self.line_index.line_index(decorator.range().start());
            self.findings.push(Violation::new(
                line,
                Category::PatchDecorator,
                format!("@{}", form.form),
            ));
            // The decorator call itself is reported; only its arguments can
            // still hold further patch usage.
            if let Expr::Call(call) = decorator {
                for arg in &call.args {
                    self.visit_expr(arg);
                }
                for keyword in &call.keywords {
                    self.visit_expr(&keyword.value);
                }
            }
        } else {
            self.visit_expr(decorator);
        }
    }

    /// Checks one `with` item.
    fn check_with_item(&mut self, item: &ast::WithItem) {
        let expr = &item.context_expr;
        let callee = match expr {
            Expr::Call(call) => &*call.func,
            other => other,
        };

        if let Some(form) = patch_form(callee) {
            let line = self.line_index.line_index(expr.range().start());
            self.findings.push(Violation::new(
                line,
                Category::PatchContextManager,
                format!("{}() context manager", form.form),
            ));
            if let Expr::Call(call) = expr {
                for arg in &call.args {
                    self.visit_expr(arg);
                }
                for keyword in &call.keywords {
                    self.visit_expr(&keyword.value);
                }
            }
        } else {
            self.visit_expr(expr);
        }
    }

    /// Visits statements; decorators and `with` items get their dedicated
    /// checks before the generic recursion continues.
    pub fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(node) => {
                for decorator in &node.decorator_list {
                    self.check_decorator(decorator);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncFunctionDef(node) => {
                for decorator in &node.decorator_list {
                    self.check_decorator(decorator);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::ClassDef(node) => {
                // Class decorators are not decorator-position matches; a
                // qualified `@mock.patch(...)` on a class still surfaces
                // through the call rule.
                for decorator in &node.decorator_list {
                    self.visit_expr(decorator);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::With(node) => {
                for item in &node.items {
                    self.check_with_item(item);
                }
                for stmt in &node.body {
                    self.visit_stmt(stmt);
                }
            }
            Stmt::AsyncWith(node) => {
                for item in &node.items {
                    self.check_with_item(item);
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

    /// Visits expressions, reporting qualified patch calls.
    pub fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Call(node) => {
                let reported = match patch_form(&node.func) {
                    Some(form) if form.is_qualified() => {
                        let line = self.line_index.line_index(node.range.start());
                        self.findings.push(Violation::new(
                            line,
                            Category::PatchCall,
                            form.dotted(),
                        ));
                        true
                    }
                    _ => false,
                };
                if !reported {
                    self.visit_expr(&node.func);
                }
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
