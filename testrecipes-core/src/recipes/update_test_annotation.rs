use tracing::debug;

use super::{annotation_type, rewrite_nodes, Recipe, RecipeOutput};
use crate::config::RecipeContext;
use crate::lst::{CompilationUnit, NodeRef};
use crate::types::{JUNIT4_TEST, JUPITER_TEST};

/// `org.junit.Test` to `org.junit.jupiter.api.Test`.
///
/// Jupiter's `@Test` takes no attributes, so a unit using
/// `@Test(expected = ...)` or `@Test(timeout = ...)` is skipped entirely
/// rather than migrated halfway.
pub struct UpdateTestAnnotation;

impl Recipe for UpdateTestAnnotation {
    fn name(&self) -> &'static str {
        "junit5.UpdateTestAnnotation"
    }

    fn display_name(&self) -> &'static str {
        "Migrate JUnit 4 `@Test` annotations to JUnit 5"
    }

    fn description(&self) -> &'static str {
        "Update usages of JUnit 4's `@org.junit.Test` annotation to JUnit 5's `org.junit.jupiter.api.Test` annotation."
    }

    fn visit(&self, ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
        let classpath = &ctx.classpath;
        let with_attributes = unit
            .all_classes()
            .into_iter()
            .flat_map(|c| c.methods.iter())
            .flat_map(|m| m.annotations.iter())
            .any(|a| a.has_arguments && annotation_type(unit, classpath, a).as_deref() == Some(JUNIT4_TEST));
        if with_attributes {
            debug!(path = %unit.path, "JUnit 4 @Test with attributes, leaving unit unchanged");
            return RecipeOutput::default();
        }

        let mut output = rewrite_nodes(unit, ctx, |rw, node| {
            let NodeRef::Method(method) = node else {
                return;
            };
            for annotation in &method.annotations {
                if annotation.name == JUNIT4_TEST {
                    rw.replace(annotation.name_span, JUPITER_TEST);
                }
            }
        });

        if unit
            .imports
            .iter()
            .any(|i| i.simple_name().is_some() && i.path == JUNIT4_TEST)
        {
            output.imports.change_type(JUNIT4_TEST, JUPITER_TEST);
        }
        output
    }
}
