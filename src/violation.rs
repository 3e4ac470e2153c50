use serde::Serialize;

/// Constant tail shared by every violation message.
pub const MESSAGE_SUFFIX: &str =
    " - Use real objects, dependency injection, or integration tests";

/// The detection category a violation belongs to.
///
/// The declaration order doubles as the tie-break order when several
/// violations land on the same line: instantiations sort before patch
/// decorators, decorators before context managers, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Category {
    /// A call to one of the mock-family classes (`Mock()`, `mock.MagicMock()`).
    MockInstantiation,
    /// A `@patch`/`@patch.object`/`@patch.multiple`/`@patch.dict` decorator.
    PatchDecorator,
    /// A patch-family callee used as a `with` item.
    PatchContextManager,
    /// A module-qualified patch call outside decorator/`with` position
    /// (e.g. `mock.patch('target')` assigned to a patcher variable).
    PatchCall,
    /// A test function that declares and uses the pytest-mock `mocker` fixture.
    MockerFixture,
    /// A test function that declares and uses the pytest `monkeypatch` fixture.
    MonkeypatchFixture,
}

/// A single detected mock usage.
///
/// `line` is 1-based and anchors the construct as defined per category:
/// the call line for instantiations, the decorator's own line for decorators,
/// the `with` item's line for context managers, and the `def` line for
/// fixture findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// 1-based line number of the reported construct.
    pub line: usize,
    /// Detection category.
    pub category: Category,
    /// The concrete form matched (e.g. "Mock", "@patch.object", "mocker").
    pub subject: String,
    /// Human-readable message, fixed template per category.
    pub message: String,
}

impl Violation {
    /// Builds a violation with the per-category message template applied.
    pub fn new(line: usize, category: Category, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        let message = match category {
            Category::MockInstantiation => {
                format!("{}() instantiation detected{}", subject, MESSAGE_SUFFIX)
            }
            Category::PatchDecorator => {
                format!("{} decorator detected{}", subject, MESSAGE_SUFFIX)
            }
            Category::PatchContextManager => {
                format!("{} detected{}", subject, MESSAGE_SUFFIX)
            }
            Category::PatchCall => {
                format!("{}() call detected{}", subject, MESSAGE_SUFFIX)
            }
            Category::MockerFixture => format!(
                "pytest-mock 'mocker' fixture detected \
                 (pass dependencies as test function parameters){}",
                MESSAGE_SUFFIX
            ),
            Category::MonkeypatchFixture => format!(
                "pytest 'monkeypatch' fixture detected \
                 (pass dependencies as test function parameters){}",
                MESSAGE_SUFFIX
            ),
        };
        Self {
            line,
            category,
            subject,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_share_constant_suffix() {
        let v = Violation::new(3, Category::MockInstantiation, "Mock");
        assert_eq!(
            v.message,
            "Mock() instantiation detected - Use real objects, dependency injection, \
             or integration tests"
        );

        let v = Violation::new(2, Category::PatchDecorator, "@patch.object");
        assert!(v.message.starts_with("@patch.object decorator detected"));
        assert!(v.message.ends_with(MESSAGE_SUFFIX));

        let v = Violation::new(4, Category::MonkeypatchFixture, "monkeypatch");
        assert!(v.message.contains("pass dependencies as test function parameters"));
        assert!(v.message.ends_with(MESSAGE_SUFFIX));
    }

    #[test]
    fn test_category_tie_break_order() {
        assert!(Category::MockInstantiation < Category::PatchDecorator);
        assert!(Category::PatchDecorator < Category::PatchContextManager);
        assert!(Category::PatchContextManager < Category::PatchCall);
        assert!(Category::PatchCall < Category::MockerFixture);
        assert!(Category::MockerFixture < Category::MonkeypatchFixture);
    }
}
