use tracing::debug;

use super::{annotation_type, rewrite_nodes, Recipe, RecipeOutput};
use crate::classify::scan_test_method;
use crate::config::RecipeContext;
use crate::imports::check_addition;
use crate::lst::{CompilationUnit, NodeRef, Span};
use crate::source_utils::{indent_at, reindent, starts_line};
use crate::types::{JUNIT4_TEST, JUPITER_ASSERTIONS, JUPITER_TEST};

const DEFAULT_INDENT: &str = "    ";

/// Wrap the body of a test without assertions in `assertDoesNotThrow`.
///
/// The body moves verbatim, comments included; only its indentation grows
/// by one level. Bodies that return a value or assign a parameter are left
/// alone since they would not compile inside a lambda, and so are tests
/// whose annotation carries `expected` or `timeout`.
pub struct TestsShouldIncludeAssertions;

impl Recipe for TestsShouldIncludeAssertions {
    fn name(&self) -> &'static str {
        "cleanup.TestsShouldIncludeAssertions"
    }

    fn display_name(&self) -> &'static str {
        "Include an assertion in tests"
    }

    fn description(&self) -> &'static str {
        "For tests not having any assertions, wrap the statements with JUnit Jupiter's `assertDoesNotThrow()`."
    }

    fn visit(&self, ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
        rewrite_nodes(unit, ctx, |rw, node| {
            let NodeRef::Method(method) = node else {
                return;
            };
            let Some(test) = method.annotations.iter().find(|a| {
                annotation_type(rw.unit, rw.classpath(), a)
                    .is_some_and(|ty| ty == JUNIT4_TEST || ty == JUPITER_TEST)
            }) else {
                return;
            };
            // `@Test(expected = ..)` and `@Test(timeout = ..)` already assert
            if test.has_arguments {
                debug!(method = %method.name, "test annotation has attributes");
                return;
            }
            let scan = scan_test_method(rw.unit, rw.classpath(), &rw.ctx.assertions, method);
            if !scan.needs_wrap() {
                debug!(method = %method.name, ?scan, "test left unchanged");
                return;
            }
            let Some(body) = method.body.as_ref() else {
                return;
            };
            let checked = check_addition(rw.unit, rw.classpath(), JUPITER_ASSERTIONS, "assertDoesNotThrow", None);
            if let Err(conflict) = checked {
                debug!(method = %method.name, %conflict, "skipping rewrite");
                return;
            }

            let source = rw.unit.source.as_str();
            let span = inner_span(source, body.span);
            let statements = rw.text(span);

            let text = if starts_line(source, span.start) {
                let indent = indent_at(source, span.start);
                let method_indent = indent_at(source, method.span.start);
                let step = match indent.strip_prefix(method_indent) {
                    Some(step) if !step.is_empty() => step,
                    _ => DEFAULT_INDENT,
                };
                format!(
                    "assertDoesNotThrow(() -> {{\n{indent}{step}{body}\n{indent}}});",
                    body = reindent(statements, step)
                )
            } else {
                format!("assertDoesNotThrow(() -> {{ {} }});", statements)
            };

            if rw.replace(span, text) {
                debug!(method = %method.name, "wrapping test body");
                rw.imports.add_static(JUPITER_ASSERTIONS, "assertDoesNotThrow");
            }
        })
    }
}

/// The block between its braces, trimmed of surrounding whitespace, so
/// comments before the first or after the last statement move too.
fn inner_span(source: &str, block: Span) -> Span {
    let inner = &source[block.start + 1..block.end - 1];
    let start = block.start + 1 + (inner.len() - inner.trim_start().len());
    let end = block.start + 1 + inner.trim_end().len();
    Span::new(start, end.max(start))
}
