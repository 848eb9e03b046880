use once_cell::sync::Lazy;
use tracing::debug;

use super::{rewrite_nodes, Recipe, RecipeOutput};
use crate::config::RecipeContext;
use crate::imports::check_addition;
use crate::lst::{CompilationUnit, Expr, NodeRef};
use crate::matcher::MethodMatcher;
use crate::types::{HAMCREST_MATCHER_ASSERT, JUNIT4_ASSERT};

static ASSERT_THAT: Lazy<MethodMatcher> = Lazy::new(|| {
    MethodMatcher::parse("org.junit.Assert assertThat(*, *, ..)").expect("valid method pattern")
});

/// JUnit 4 `Assert.assertThat(..)` to Hamcrest `MatcherAssert.assertThat(..)`.
/// The argument list is kept as written, line breaks included.
pub struct AssertThatToMatcherAssert;

impl Recipe for AssertThatToMatcherAssert {
    fn name(&self) -> &'static str {
        "junit5.AssertThatToMatcherAssert"
    }

    fn display_name(&self) -> &'static str {
        "JUnit 4 `assertThat` to Hamcrest `MatcherAssert`"
    }

    fn description(&self) -> &'static str {
        "JUnit 4's `Assert.assertThat()` is deprecated; use Hamcrest's `MatcherAssert.assertThat()` instead."
    }

    fn visit(&self, ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
        rewrite_nodes(unit, ctx, |rw, node| {
            let NodeRef::Expr(Expr::Invocation(inv)) = node else {
                return;
            };
            if ASSERT_THAT.resolve(rw.unit, rw.classpath(), inv).is_none() {
                return;
            }
            let checked = check_addition(rw.unit, rw.classpath(), HAMCREST_MATCHER_ASSERT, "assertThat", Some(JUNIT4_ASSERT));
            if let Err(conflict) = checked {
                debug!(line = rw.line_of(inv.span.start), %conflict, "skipping rewrite");
                return;
            }
            let text = format!("assertThat{}", rw.text(inv.args_span));
            if rw.replace(inv.span, text) {
                rw.imports.add_static(HAMCREST_MATCHER_ASSERT, "assertThat");
                rw.imports.maybe_remove(JUNIT4_ASSERT);
            }
        })
    }
}
