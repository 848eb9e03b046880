use once_cell::sync::Lazy;
use tracing::debug;

use super::{rewrite_nodes, Recipe, RecipeOutput};
use crate::classify::{classify_boolean_assert, BooleanAssertShape};
use crate::config::RecipeContext;
use crate::imports::check_addition;
use crate::lst::{CompilationUnit, Expr, NodeRef};
use crate::matcher::MethodMatcher;
use crate::types::{ASSERTJ_ASSERTIONS, JUPITER_ASSERTIONS};

static ASSERT_TRUE: Lazy<MethodMatcher> = Lazy::new(|| {
    MethodMatcher::parse("org.junit.jupiter.api.Assertions assertTrue(..)").expect("valid method pattern")
});

/// `assertTrue(cond[, message])` to `assertThat(cond)[.as(message)].isTrue()`.
///
/// The result is always an unqualified call backed by a static import of
/// AssertJ's `assertThat`, whatever style the original call used.
pub struct JUnitAssertTrueToAssertThat;

impl Recipe for JUnitAssertTrueToAssertThat {
    fn name(&self) -> &'static str {
        "assertj.JUnitAssertTrueToAssertThat"
    }

    fn display_name(&self) -> &'static str {
        "JUnit `assertTrue` to AssertJ"
    }

    fn description(&self) -> &'static str {
        "Convert JUnit-style `assertTrue()` to AssertJ's `assertThat().isTrue()`."
    }

    fn visit(&self, ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
        rewrite_nodes(unit, ctx, |rw, node| {
            let NodeRef::Expr(Expr::Invocation(inv)) = node else {
                return;
            };
            if ASSERT_TRUE.resolve(rw.unit, rw.classpath(), inv).is_none() {
                return;
            }
            let shape = match classify_boolean_assert(inv) {
                Ok(shape) => shape,
                Err(reason) => {
                    debug!(line = rw.line_of(inv.span.start), ?reason, "leaving assertTrue unchanged");
                    return;
                }
            };
            if let Err(conflict) = check_addition(rw.unit, rw.classpath(), ASSERTJ_ASSERTIONS, "assertThat", None) {
                debug!(line = rw.line_of(inv.span.start), %conflict, "skipping rewrite");
                return;
            }

            let mut text = format!("assertThat({})", rw.text(shape.condition().span()));
            match shape {
                BooleanAssertShape::Condition(_) => {}
                BooleanAssertShape::ConditionWithMessage { message, .. } => {
                    text.push_str(&format!(".as({})", rw.text(message.span())));
                }
                BooleanAssertShape::ConditionWithSupplier { supplier, .. } => {
                    text.push_str(&format!(".withFailMessage({})", rw.text(supplier.span())));
                }
            }
            text.push_str(".isTrue()");

            if rw.replace(inv.span, text) {
                rw.imports.add_static(ASSERTJ_ASSERTIONS, "assertThat");
                rw.imports.maybe_remove(JUPITER_ASSERTIONS);
            }
        })
    }
}
