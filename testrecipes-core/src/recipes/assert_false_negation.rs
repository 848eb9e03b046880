use once_cell::sync::Lazy;

use super::{join_args, replace_jupiter_call, rewrite_nodes, Recipe, RecipeOutput};
use crate::classify::classify_negation;
use crate::config::RecipeContext;
use crate::lst::{CompilationUnit, Expr, NodeRef};
use crate::matcher::MethodMatcher;

static ASSERT_FALSE: Lazy<MethodMatcher> = Lazy::new(|| {
    MethodMatcher::parse("org.junit.jupiter.api.Assertions assertFalse(..)").expect("valid method pattern")
});

/// `assertFalse(!x)` to `assertTrue(x)`, message kept.
pub struct AssertFalseNegationToAssertTrue;

impl Recipe for AssertFalseNegationToAssertTrue {
    fn name(&self) -> &'static str {
        "cleanup.AssertFalseNegationToAssertTrue"
    }

    fn display_name(&self) -> &'static str {
        "Replace JUnit `assertFalse(!<boolean>)` with `assertTrue(<boolean>)`"
    }

    fn description(&self) -> &'static str {
        "Using `assertTrue` is simpler and more clear."
    }

    fn visit(&self, ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
        rewrite_nodes(unit, ctx, |rw, node| {
            let NodeRef::Expr(Expr::Invocation(inv)) = node else {
                return;
            };
            if ASSERT_FALSE.resolve(rw.unit, rw.classpath(), inv).is_none() {
                return;
            }
            let Ok(negation) = classify_negation(inv) else {
                return;
            };

            let mut parts = vec![rw.text(negation.operand.span())];
            parts.extend(negation.message.map(|m| rw.text(m.span())));
            replace_jupiter_call(rw, inv, "assertTrue", &join_args(parts));
        })
    }
}
