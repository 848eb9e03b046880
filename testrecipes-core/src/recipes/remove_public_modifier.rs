use super::{has_annotation, rewrite_nodes, Recipe, RecipeOutput};
use crate::config::RecipeContext;
use crate::lst::{CompilationUnit, NodeRef, Span};
use crate::source_utils::skip_inline_whitespace;
use crate::types::JUPITER_TEST;

/// Jupiter test methods need no `public`. Overrides keep theirs.
pub struct RemoveTestMethodPublicModifier;

impl Recipe for RemoveTestMethodPublicModifier {
    fn name(&self) -> &'static str {
        "junit5.RemoveTestMethodPublicModifier"
    }

    fn display_name(&self) -> &'static str {
        "Remove `public` from JUnit 5 test methods"
    }

    fn description(&self) -> &'static str {
        "JUnit 5 test methods do not need to be public; drop the modifier."
    }

    fn visit(&self, ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
        rewrite_nodes(unit, ctx, |rw, node| {
            let NodeRef::Method(method) = node else {
                return;
            };
            if !has_annotation(rw.unit, rw.classpath(), method, &[JUPITER_TEST])
                || method.annotations.iter().any(|a| a.name == "Override")
            {
                return;
            }
            for modifier in method.modifiers.iter().filter(|m| m.keyword == "public") {
                let end = skip_inline_whitespace(&rw.unit.source, modifier.span.end);
                rw.replace(Span::new(modifier.span.start, end), "");
            }
        })
    }
}
