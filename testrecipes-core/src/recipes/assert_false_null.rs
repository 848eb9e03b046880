use once_cell::sync::Lazy;

use super::{join_args, replace_jupiter_call, rewrite_nodes, Recipe, RecipeOutput};
use crate::classify::classify_null_check;
use crate::config::RecipeContext;
use crate::lst::{CompilationUnit, Expr, NodeRef};
use crate::matcher::MethodMatcher;

static ASSERT_FALSE: Lazy<MethodMatcher> = Lazy::new(|| {
    MethodMatcher::parse("org.junit.jupiter.api.Assertions assertFalse(..)").expect("valid method pattern")
});

/// `assertFalse(a == null)` to `assertNotNull(a)`.
pub struct AssertFalseNullToAssertNotNull;

impl Recipe for AssertFalseNullToAssertNotNull {
    fn name(&self) -> &'static str {
        "cleanup.AssertFalseNullToAssertNotNull"
    }

    fn display_name(&self) -> &'static str {
        "Replace JUnit `assertFalse(a == null)` with `assertNotNull(a)`"
    }

    fn description(&self) -> &'static str {
        "Using `assertNotNull(a)` is simpler and more clear."
    }

    fn visit(&self, ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
        rewrite_nodes(unit, ctx, |rw, node| {
            let NodeRef::Expr(Expr::Invocation(inv)) = node else {
                return;
            };
            if ASSERT_FALSE.resolve(rw.unit, rw.classpath(), inv).is_none() {
                return;
            }
            let Ok(check) = classify_null_check(inv) else {
                return;
            };

            let mut parts = vec![rw.text(check.subject.span())];
            parts.extend(check.message.map(|m| rw.text(m.span())));
            replace_jupiter_call(rw, inv, "assertNotNull", &join_args(parts));
        })
    }
}
