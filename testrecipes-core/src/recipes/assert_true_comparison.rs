use once_cell::sync::Lazy;
use tracing::debug;

use super::{join_args, replace_jupiter_call, rewrite_nodes, Recipe, RecipeOutput};
use crate::classify::classify_comparison;
use crate::config::RecipeContext;
use crate::lst::{CompilationUnit, Expr, NodeRef};
use crate::matcher::MethodMatcher;

static ASSERT_TRUE: Lazy<MethodMatcher> = Lazy::new(|| {
    MethodMatcher::parse("org.junit.jupiter.api.Assertions assertTrue(..)").expect("valid method pattern")
});

pub struct AssertTrueComparisonToAssertEquals;

impl Recipe for AssertTrueComparisonToAssertEquals {
    fn name(&self) -> &'static str {
        "cleanup.AssertTrueComparisonToAssertEquals"
    }

    fn display_name(&self) -> &'static str {
        "Replace JUnit `assertTrue(a == b)` with `assertEquals(a, b)`"
    }

    fn description(&self) -> &'static str {
        "Using `assertEquals(a, b)` is simpler and gives a better failure message."
    }

    fn visit(&self, ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
        rewrite_nodes(unit, ctx, |rw, node| {
            let NodeRef::Expr(Expr::Invocation(inv)) = node else {
                return;
            };
            if ASSERT_TRUE.resolve(rw.unit, rw.classpath(), inv).is_none() {
                return;
            }
            let comparison = match classify_comparison(inv) {
                Ok(comparison) => comparison,
                Err(reason) => {
                    debug!(line = rw.line_of(inv.span.start), ?reason, "not a plain comparison");
                    return;
                }
            };

            let mut parts = vec![rw.text(comparison.left.span()), rw.text(comparison.right.span())];
            if let Some(message) = comparison.message {
                parts.push(rw.text(message.span()));
            }
            replace_jupiter_call(rw, inv, "assertEquals", &join_args(parts));
        })
    }
}
