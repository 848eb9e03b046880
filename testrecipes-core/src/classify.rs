//! Argument shape classification
//!
//! Every recipe decides what to do with a call by classifying its arguments
//! into one of the shapes below. A shape that is not listed is never
//! rewritten: classification returns [`Unsupported`] and the call is left
//! byte-identical.

use crate::config::AssertionAllowList;
use crate::lst::walk::{invocations_in_block, walk_block};
use crate::lst::{Block, CompilationUnit, Expr, MethodDecl, MethodInvocation, NodeRef, Stmt};
use crate::types::{attribute, Classpath};

/// The supported argument lists of `assertTrue` / `assertFalse`.
#[derive(Debug, Clone, Copy)]
pub enum BooleanAssertShape<'a> {
    /// `assertTrue(cond)`
    Condition(&'a Expr),
    /// `assertTrue(cond, "message")`
    ConditionWithMessage { condition: &'a Expr, message: &'a Expr },
    /// `assertTrue(cond, () -> "message")`
    ConditionWithSupplier { condition: &'a Expr, supplier: &'a Expr },
}

impl<'a> BooleanAssertShape<'a> {
    pub fn condition(&self) -> &'a Expr {
        match *self {
            BooleanAssertShape::Condition(condition)
            | BooleanAssertShape::ConditionWithMessage { condition, .. }
            | BooleanAssertShape::ConditionWithSupplier { condition, .. } => condition,
        }
    }

    /// Trailing message argument, plain or supplied.
    pub fn message(&self) -> Option<&'a Expr> {
        match *self {
            BooleanAssertShape::Condition(_) => None,
            BooleanAssertShape::ConditionWithMessage { message, .. } => Some(message),
            BooleanAssertShape::ConditionWithSupplier { supplier, .. } => Some(supplier),
        }
    }
}

/// Why a call was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// The condition is itself a `BooleanSupplier`
    SupplierCondition,
    Arity(usize),
    NotAComparison,
    /// An operand may have side effects
    ComplexOperand,
    NotANegation,
    NotANullCheck,
}

pub fn classify_boolean_assert(inv: &MethodInvocation) -> Result<BooleanAssertShape<'_>, Unsupported> {
    match inv.args.as_slice() {
        [first, ..] if first.is_functional() => Err(Unsupported::SupplierCondition),
        [condition] => Ok(BooleanAssertShape::Condition(condition)),
        [condition, supplier] if supplier.is_functional() => {
            Ok(BooleanAssertShape::ConditionWithSupplier { condition, supplier })
        }
        [condition, message] => Ok(BooleanAssertShape::ConditionWithMessage { condition, message }),
        args => Err(Unsupported::Arity(args.len())),
    }
}

/// `a == b` as the condition of a boolean assertion.
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    pub left: &'a Expr,
    pub right: &'a Expr,
    pub message: Option<&'a Expr>,
}

/// Only a top-level `==` between operands without side effects matches.
/// `!=`, negated comparisons and operands that call methods are left alone.
pub fn classify_comparison(inv: &MethodInvocation) -> Result<Comparison<'_>, Unsupported> {
    let shape = classify_boolean_assert(inv)?;
    match shape.condition().unparenthesized() {
        Expr::Binary { op, left, right, .. } if op == "==" => {
            if !is_simple_operand(left) || !is_simple_operand(right) {
                return Err(Unsupported::ComplexOperand);
            }
            Ok(Comparison {
                left,
                right,
                message: shape.message(),
            })
        }
        _ => Err(Unsupported::NotAComparison),
    }
}

/// Operands whose evaluation cannot change program state.
fn is_simple_operand(expr: &Expr) -> bool {
    match expr {
        Expr::Name { .. } | Expr::Literal { .. } => true,
        Expr::FieldAccess { object, .. } => is_simple_operand(object),
        Expr::Parenthesized { inner, .. } => is_simple_operand(inner),
        Expr::Unary { op, operand, .. } => op != "!" && is_simple_operand(operand),
        Expr::Binary { op, left, right, .. } => {
            matches!(op.as_str(), "+" | "-" | "*" | "/" | "%" | "&" | "|" | "^" | "<<" | ">>" | ">>>")
                && is_simple_operand(left)
                && is_simple_operand(right)
        }
        Expr::Other { kind, children, .. } => {
            matches!(
                kind.as_str(),
                "this" | "class_literal" | "array_access" | "cast_expression"
            ) && children.iter().all(is_simple_operand)
        }
        _ => false,
    }
}

/// `!x` as the condition of `assertFalse`.
#[derive(Debug, Clone, Copy)]
pub struct Negation<'a> {
    /// The negated expression, parentheses stripped
    pub operand: &'a Expr,
    pub message: Option<&'a Expr>,
}

pub fn classify_negation(inv: &MethodInvocation) -> Result<Negation<'_>, Unsupported> {
    let shape = classify_boolean_assert(inv)?;
    match shape.condition().unparenthesized() {
        Expr::Unary { op, operand, .. } if op == "!" => Ok(Negation {
            operand: operand.unparenthesized(),
            message: shape.message(),
        }),
        _ => Err(Unsupported::NotANegation),
    }
}

/// `x == null` or `null == x` as the condition of `assertFalse`.
#[derive(Debug, Clone, Copy)]
pub struct NullCheck<'a> {
    pub subject: &'a Expr,
    pub message: Option<&'a Expr>,
}

pub fn classify_null_check(inv: &MethodInvocation) -> Result<NullCheck<'_>, Unsupported> {
    let shape = classify_boolean_assert(inv)?;
    let subject = match shape.condition().unparenthesized() {
        Expr::Binary { op, left, right, .. } if op == "==" => {
            match (left.is_null_literal(), right.is_null_literal()) {
                (false, true) => &**left,
                (true, false) => &**right,
                _ => return Err(Unsupported::NotANullCheck),
            }
        }
        _ => return Err(Unsupported::NotANullCheck),
    };
    Ok(NullCheck {
        subject,
        message: shape.message(),
    })
}

/// Why a test body cannot be moved into a lambda.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    NoBody,
    EmptyBody,
    /// `return <value>;` would change meaning inside `Executable`
    ReturnsValue,
    /// Lambdas capture only effectively final locals
    AssignsParameter,
}

/// Result of scanning one test method body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssertionScan {
    pub has_assertion: bool,
    pub precondition: Option<Precondition>,
}

impl AssertionScan {
    /// A body without assertions that can be wrapped safely.
    pub fn needs_wrap(&self) -> bool {
        !self.has_assertion && self.precondition.is_none()
    }
}

pub fn scan_test_method(
    unit: &CompilationUnit,
    classpath: &Classpath,
    allow_list: &AssertionAllowList,
    method: &MethodDecl,
) -> AssertionScan {
    let body = match &method.body {
        Some(body) => body,
        None => {
            return AssertionScan {
                has_assertion: false,
                precondition: Some(Precondition::NoBody),
            }
        }
    };

    let has_assertion = invocations_in_block(body).into_iter().any(|inv| {
        attribute(unit, classpath, inv)
            .declaring_type
            .is_some_and(|ty| allow_list.is_assertion(&ty, &inv.name))
    });

    let precondition = if body.statements.is_empty() {
        Some(Precondition::EmptyBody)
    } else if body.statements.iter().any(returns_value) {
        Some(Precondition::ReturnsValue)
    } else if assigns_any(body, &method.parameters) {
        Some(Precondition::AssignsParameter)
    } else {
        None
    };

    AssertionScan {
        has_assertion,
        precondition,
    }
}

/// Statement-level search; returns inside lambdas do not count.
fn returns_value(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return { value, .. } => value.is_some(),
        Stmt::Block(block) => block.statements.iter().any(returns_value),
        Stmt::Compound { body, .. } => body.iter().any(returns_value),
        _ => false,
    }
}

fn assigns_any(body: &Block, names: &[String]) -> bool {
    if names.is_empty() {
        return false;
    }
    let is_param = |expr: &Expr| matches!(expr.unparenthesized(), Expr::Name { name, .. } if names.contains(name));
    let mut found = false;
    walk_block(body, &mut |node| {
        if let NodeRef::Expr(expr) = node {
            match expr {
                Expr::Assignment { target, .. } if is_param(target) => found = true,
                Expr::Update { operand, .. } if is_param(operand) => found = true,
                _ => {}
            }
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lst::walk::invocations;
    use crate::parser::parse_java;

    fn with_first_call<R>(call: &str, f: impl FnOnce(&CompilationUnit, &MethodInvocation) -> R) -> R {
        let source = format!("class A {{ void t(int p) {{ {} }} }}", call);
        let unit = parse_java(&source, "A.java").unwrap();
        let inv = invocations(&unit)[0];
        f(&unit, inv)
    }

    fn text_of(unit: &CompilationUnit, expr: &Expr) -> String {
        unit.text(expr.span()).to_string()
    }

    #[test]
    fn test_boolean_shapes() {
        with_first_call("assertTrue(a > 0);", |_, inv| {
            assert!(matches!(classify_boolean_assert(inv), Ok(BooleanAssertShape::Condition(_))));
        });
        with_first_call(r#"assertTrue(a > 0, "msg");"#, |unit, inv| {
            let shape = classify_boolean_assert(inv).unwrap();
            assert!(matches!(shape, BooleanAssertShape::ConditionWithMessage { .. }));
            assert_eq!(text_of(unit, shape.message().unwrap()), r#""msg""#);
        });
        with_first_call(r#"assertTrue(a > 0, () -> "msg");"#, |_, inv| {
            assert!(matches!(
                classify_boolean_assert(inv),
                Ok(BooleanAssertShape::ConditionWithSupplier { .. })
            ));
        });
    }

    #[test]
    fn test_supplier_condition_is_unsupported() {
        for call in [
            "assertTrue(() -> a > 0);",
            r#"assertTrue(() -> a > 0, "msg");"#,
            "assertTrue(this::ready, () -> \"msg\");",
        ] {
            with_first_call(call, |_, inv| {
                assert_eq!(classify_boolean_assert(inv).unwrap_err(), Unsupported::SupplierCondition);
            });
        }
        with_first_call("assertTrue();", |_, inv| {
            assert_eq!(classify_boolean_assert(inv).unwrap_err(), Unsupported::Arity(0));
        });
    }

    #[test]
    fn test_comparison() {
        with_first_call("assertTrue((a == b.c));", |unit, inv| {
            let cmp = classify_comparison(inv).unwrap();
            assert_eq!(text_of(unit, cmp.left), "a");
            assert_eq!(text_of(unit, cmp.right), "b.c");
            assert!(cmp.message.is_none());
        });
        with_first_call("assertTrue(a != b);", |_, inv| {
            assert_eq!(classify_comparison(inv).unwrap_err(), Unsupported::NotAComparison);
        });
        with_first_call("assertTrue(!(a == b));", |_, inv| {
            assert_eq!(classify_comparison(inv).unwrap_err(), Unsupported::NotAComparison);
        });
        with_first_call("assertTrue(next() == 1);", |_, inv| {
            assert_eq!(classify_comparison(inv).unwrap_err(), Unsupported::ComplexOperand);
        });
        with_first_call("assertTrue(a == b + 1, \"sum\");", |unit, inv| {
            let cmp = classify_comparison(inv).unwrap();
            assert_eq!(text_of(unit, cmp.right), "b + 1");
            assert_eq!(text_of(unit, cmp.message.unwrap()), "\"sum\"");
        });
    }

    #[test]
    fn test_negation_and_null_check() {
        with_first_call("assertFalse(!(a && b));", |unit, inv| {
            assert_eq!(text_of(unit, classify_negation(inv).unwrap().operand), "a && b");
        });
        with_first_call("assertFalse(a);", |_, inv| {
            assert_eq!(classify_negation(inv).unwrap_err(), Unsupported::NotANegation);
        });
        with_first_call("assertFalse(null == value);", |unit, inv| {
            assert_eq!(text_of(unit, classify_null_check(inv).unwrap().subject), "value");
        });
        with_first_call("assertFalse(null == null);", |_, inv| {
            assert_eq!(classify_null_check(inv).unwrap_err(), Unsupported::NotANullCheck);
        });
    }

    fn scan(source: &str) -> AssertionScan {
        let unit = parse_java(source, "A.java").unwrap();
        let method = &unit.types[0].methods[0];
        scan_test_method(&unit, &Classpath::builtin(), &AssertionAllowList::default(), method)
    }

    #[test]
    fn test_scan_finds_assertions() {
        let scan_result = scan(
            "import static org.junit.jupiter.api.Assertions.assertEquals;\n\
             class A { void t() { assertEquals(1, 1); } }",
        );
        assert!(scan_result.has_assertion);
        assert!(!scan_result.needs_wrap());

        let verified = scan(
            "import org.mockito.Mockito;\n\
             class A { void t() { Mockito.verify(service).run(); } }",
        );
        assert!(verified.has_assertion);
    }

    #[test]
    fn test_scan_ignores_non_assertion_calls() {
        let scan_result = scan(
            "import static org.mockito.Mockito.when;\n\
             class A { void t() { when(s.get()).thenReturn(1); s.get(); } }",
        );
        assert!(!scan_result.has_assertion);
        assert!(scan_result.needs_wrap());
    }

    #[test]
    fn test_scan_preconditions() {
        assert_eq!(scan("class A { void t() { } }").precondition, Some(Precondition::EmptyBody));
        assert_eq!(
            scan("class A { int t() { if (x) { return 1; } return 2; } }").precondition,
            Some(Precondition::ReturnsValue)
        );
        assert_eq!(
            scan("class A { void t(int n) { n++; run(n); } }").precondition,
            Some(Precondition::AssignsParameter)
        );
        assert_eq!(
            scan("class A { void t() { Runnable r = () -> { return; }; throw new IllegalStateException(); } }")
                .precondition,
            None
        );
        assert_eq!(scan("abstract class A { abstract void t(); }").precondition, Some(Precondition::NoBody));
    }
}
