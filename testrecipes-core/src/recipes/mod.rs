//! Recipes: named transformations over one compilation unit
//!
//! A recipe inspects the typed tree and returns edits plus the import
//! requirements of those edits. It never applies anything itself; the
//! driver splices the edits, re-parses and reconciles imports.
//!
//! Each recipe dispatches on [`NodeRef`] with a single `match` inside
//! [`rewrite_nodes`].

mod assert_false_negation;
mod assert_false_null;
mod assert_that_to_matcher_assert;
mod assert_true_comparison;
mod assert_true_to_assert_that;
mod remove_public_modifier;
mod tests_include_assertions;
mod update_test_annotation;

pub use assert_false_negation::AssertFalseNegationToAssertTrue;
pub use assert_false_null::AssertFalseNullToAssertNotNull;
pub use assert_that_to_matcher_assert::AssertThatToMatcherAssert;
pub use assert_true_comparison::AssertTrueComparisonToAssertEquals;
pub use assert_true_to_assert_that::JUnitAssertTrueToAssertThat;
pub use remove_public_modifier::RemoveTestMethodPublicModifier;
pub use tests_include_assertions::TestsShouldIncludeAssertions;
pub use update_test_annotation::UpdateTestAnnotation;

use tracing::debug;

use crate::config::RecipeContext;
use crate::imports::{check_addition, ImportDelta};
use crate::lst::{walk, Annotation, CompilationUnit, MethodDecl, MethodInvocation, NodeRef, Span};
use crate::rewrite::{Edit, EditSet};
use crate::types::attribution::resolve_simple_type;
use crate::types::{Classpath, JUPITER_ASSERTIONS};

pub trait Recipe: Send + Sync {
    /// Registry name, e.g. `cleanup.AssertTrueComparisonToAssertEquals`
    fn name(&self) -> &'static str;
    fn display_name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn visit(&self, ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput;
}

/// Everything one recipe wants changed in one unit.
#[derive(Debug, Clone, Default)]
pub struct RecipeOutput {
    pub edits: Vec<Edit>,
    pub imports: ImportDelta,
}

impl RecipeOutput {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.imports.is_empty()
    }
}

/// State of one visit: accepted edits and the imports they need.
pub struct Rewriter<'a> {
    pub unit: &'a CompilationUnit,
    pub ctx: &'a RecipeContext,
    pub edits: EditSet,
    pub imports: ImportDelta,
}

impl<'a> Rewriter<'a> {
    pub fn new(unit: &'a CompilationUnit, ctx: &'a RecipeContext) -> Self {
        Rewriter {
            unit,
            ctx,
            edits: EditSet::new(),
            imports: ImportDelta::default(),
        }
    }

    pub fn classpath(&self) -> &'a Classpath {
        &self.ctx.classpath
    }

    pub fn text(&self, span: Span) -> &'a str {
        self.unit.text(span)
    }

    /// Returns false if the span is already being rewritten by an
    /// enclosing match; record imports only when this returns true.
    pub fn replace(&mut self, span: Span, text: impl Into<String>) -> bool {
        let accepted = self.edits.push(Edit::replace(span, text));
        if !accepted {
            debug!(start = span.start, end = span.end, "nested match left for a later pass");
        }
        accepted
    }

    /// 1-based line of a byte offset, for log fields.
    pub fn line_of(&self, offset: usize) -> usize {
        self.unit.source[..offset].matches('\n').count() + 1
    }

    pub fn finish(self) -> RecipeOutput {
        RecipeOutput {
            edits: self.edits.into_vec(),
            imports: self.imports,
        }
    }
}

/// Walk the unit once, handing every node to `visit`.
pub fn rewrite_nodes<'a>(
    unit: &'a CompilationUnit,
    ctx: &'a RecipeContext,
    mut visit: impl FnMut(&mut Rewriter<'a>, NodeRef<'a>),
) -> RecipeOutput {
    let mut rewriter = Rewriter::new(unit, ctx);
    walk(unit, &mut |node| visit(&mut rewriter, node));
    rewriter.finish()
}

/// Replace a Jupiter `Assertions` call with another `Assertions` method,
/// keeping the call site's style: `Assertions.x(..)` stays qualified,
/// an unqualified call keeps using a static import.
pub(crate) fn replace_jupiter_call(rw: &mut Rewriter<'_>, inv: &MethodInvocation, method: &str, args: &str) {
    match &inv.select {
        Some(select) => {
            let text = format!("{}.{}({})", rw.text(select.span()), method, args);
            rw.replace(inv.span, text);
        }
        None => {
            if let Err(conflict) = check_addition(rw.unit, rw.classpath(), JUPITER_ASSERTIONS, method, None) {
                debug!(line = rw.line_of(inv.span.start), %conflict, "skipping rewrite");
                return;
            }
            if rw.replace(inv.span, format!("{}({})", method, args)) {
                rw.imports.add_static(JUPITER_ASSERTIONS, method);
                rw.imports.maybe_remove(JUPITER_ASSERTIONS);
            }
        }
    }
}

/// Join argument texts the way a call is written.
pub(crate) fn join_args<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts.into_iter().collect::<Vec<_>>().join(", ")
}

/// Fully-qualified type of an annotation, if it resolves.
pub fn annotation_type(unit: &CompilationUnit, classpath: &Classpath, annotation: &Annotation) -> Option<String> {
    if annotation.name.contains('.') {
        Some(annotation.name.clone())
    } else {
        resolve_simple_type(unit, classpath, &annotation.name)
    }
}

/// True if the method carries an annotation resolving to one of `types`.
pub fn has_annotation(unit: &CompilationUnit, classpath: &Classpath, method: &MethodDecl, types: &[&str]) -> bool {
    method.annotations.iter().any(|a| {
        annotation_type(unit, classpath, a).is_some_and(|ty| types.contains(&ty.as_str()))
    })
}
