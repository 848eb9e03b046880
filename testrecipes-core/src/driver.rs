//! Per-unit orchestration
//!
//! Each recipe runs against the output of the one before it:
//!
//! ```text
//! parse → visit → apply node edits → re-parse → reconcile imports
//!       → apply import edits → re-parse → next recipe
//! ```
//!
//! A recipe whose result does not re-parse (or whose edits collide) is
//! dropped for that unit only. The unit keeps the previous recipe's output.

use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::RecipeContext;
use crate::imports::reconcile;
use crate::lst::CompilationUnit;
use crate::parser::{parse_java, ParseError};
use crate::recipes::Recipe;
use crate::rewrite::{apply_edits, RewriteError};

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error("failed to write {path}: {source}")]
    Io { path: String, source: std::io::Error },
}

/// Outcome for one unit.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub path: String,
    #[serde(skip_serializing)]
    pub before: String,
    #[serde(skip_serializing)]
    pub after: String,
    pub changed: bool,
    /// Recipes that changed the unit, in run order
    pub applied: Vec<String>,
}

/// Run recipes over one source text.
///
/// Only an unparseable input is an error; everything a recipe does wrong is
/// contained by discarding that recipe's output.
pub fn run(
    source: &str,
    path: &str,
    recipes: &[Box<dyn Recipe>],
    ctx: &RecipeContext,
) -> Result<RunResult, DriverError> {
    let mut unit = parse_java(source, path)?;
    let mut applied = Vec::new();

    for recipe in recipes {
        match apply_recipe(recipe.as_ref(), ctx, &unit) {
            Ok(Some(next)) => {
                debug!(path, recipe = recipe.name(), "recipe applied");
                applied.push(recipe.name().to_string());
                unit = next;
            }
            Ok(None) => trace!(path, recipe = recipe.name(), "no changes"),
            Err(e) => warn!(path, recipe = recipe.name(), error = %e, "discarding recipe output"),
        }
    }

    let after = unit.source;
    Ok(RunResult {
        path: path.to_string(),
        changed: after != source,
        before: source.to_string(),
        after,
        applied,
    })
}

/// Run recipes over a file, writing the result back when `write` is set
/// and something changed.
pub fn run_file(
    path: &Path,
    recipes: &[Box<dyn Recipe>],
    ctx: &RecipeContext,
    write: bool,
) -> Result<RunResult, DriverError> {
    let path_str = path.to_string_lossy().to_string();
    let source = fs::read_to_string(path).map_err(ParseError::from)?;
    let result = run(&source, &path_str, recipes, ctx)?;
    if write && result.changed {
        fs::write(path, &result.after).map_err(|source| DriverError::Io {
            path: path_str.clone(),
            source,
        })?;
        debug!(path = %path_str, "written");
    }
    Ok(result)
}

/// One recipe's full cycle. `Ok(None)` when it has nothing to say or its
/// edits cancel out.
fn apply_recipe(
    recipe: &dyn Recipe,
    ctx: &RecipeContext,
    unit: &CompilationUnit,
) -> Result<Option<CompilationUnit>, DriverError> {
    let output = recipe.visit(ctx, unit);
    if output.is_empty() {
        return Ok(None);
    }
    trace!(recipe = recipe.name(), edits = output.edits.len(), "rewriting");

    let rewritten = apply_edits(&unit.source, &output.edits)?;
    let reparsed = parse_java(&rewritten, &unit.path)?;

    let import_edits = reconcile(&reparsed, &ctx.classpath, &output.imports);
    trace!(recipe = recipe.name(), edits = import_edits.len(), "reconciling imports");
    let final_unit = if import_edits.is_empty() {
        reparsed
    } else {
        let text = apply_edits(&reparsed.source, &import_edits)?;
        parse_java(&text, &unit.path)?
    };

    if final_unit.source == unit.source {
        return Ok(None);
    }
    Ok(Some(final_unit))
}

/// Unified diff of a result, empty when nothing changed.
pub fn unified_diff(result: &RunResult) -> String {
    if !result.changed {
        return String::new();
    }
    similar::TextDiff::from_lines(&result.before, &result.after)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", result.path), &format!("b/{}", result.path))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::ImportDelta;
    use crate::lst::Span;
    use crate::recipes::RecipeOutput;
    use crate::rewrite::Edit;

    /// Replaces the whole class body with something that does not parse.
    struct Breaks;

    impl Recipe for Breaks {
        fn name(&self) -> &'static str {
            "test.Breaks"
        }
        fn display_name(&self) -> &'static str {
            "breaks"
        }
        fn description(&self) -> &'static str {
            "produces invalid code"
        }
        fn visit(&self, _ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
            let at = unit.source.len();
            RecipeOutput {
                edits: vec![Edit::insert(at, "class {")],
                imports: ImportDelta::default(),
            }
        }
    }

    /// Renames the first class.
    struct Rename;

    impl Recipe for Rename {
        fn name(&self) -> &'static str {
            "test.Rename"
        }
        fn display_name(&self) -> &'static str {
            "rename"
        }
        fn description(&self) -> &'static str {
            "renames Foo to Bar"
        }
        fn visit(&self, _ctx: &RecipeContext, unit: &CompilationUnit) -> RecipeOutput {
            let mut output = RecipeOutput::default();
            if let Some(start) = unit.source.find("Foo") {
                output.edits.push(Edit::replace(Span::new(start, start + 3), "Bar"));
            }
            output
        }
    }

    #[test]
    fn test_broken_output_is_discarded() {
        let recipes: Vec<Box<dyn Recipe>> = vec![Box::new(Breaks), Box::new(Rename)];
        let result = run("class Foo {}\n", "Foo.java", &recipes, &RecipeContext::default()).unwrap();
        assert_eq!(result.after, "class Bar {}\n");
        assert_eq!(result.applied, vec!["test.Rename"]);
        assert!(result.changed);
    }

    #[test]
    fn test_unparseable_input_is_an_error() {
        let recipes: Vec<Box<dyn Recipe>> = vec![Box::new(Rename)];
        let result = run("class Foo {", "Foo.java", &recipes, &RecipeContext::default());
        assert!(matches!(result, Err(DriverError::Parse(_))));
    }

    #[test]
    fn test_unchanged_unit() {
        let recipes: Vec<Box<dyn Recipe>> = vec![Box::new(Rename)];
        let result = run("class Baz {}\n", "Baz.java", &recipes, &RecipeContext::default()).unwrap();
        assert!(!result.changed);
        assert!(result.applied.is_empty());
        assert_eq!(unified_diff(&result), "");
    }

    #[test]
    fn test_unified_diff() {
        let recipes: Vec<Box<dyn Recipe>> = vec![Box::new(Rename)];
        let result = run("class Foo {}\n", "Foo.java", &recipes, &RecipeContext::default()).unwrap();
        let diff = unified_diff(&result);
        assert!(diff.contains("--- a/Foo.java"));
        assert!(diff.contains("-class Foo {}"));
        assert!(diff.contains("+class Bar {}"));
    }

    #[test]
    fn test_run_file_writes_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Foo.java");
        fs::write(&path, "class Foo {}\n").unwrap();
        let recipes: Vec<Box<dyn Recipe>> = vec![Box::new(Rename)];
        let ctx = RecipeContext::default();

        let dry = run_file(&path, &recipes, &ctx, false).unwrap();
        assert!(dry.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "class Foo {}\n");

        run_file(&path, &recipes, &ctx, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "class Bar {}\n");
    }

    #[test]
    fn test_result_json_omits_sources() {
        let recipes: Vec<Box<dyn Recipe>> = vec![Box::new(Rename)];
        let result = run("class Foo {}\n", "Foo.java", &recipes, &RecipeContext::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["path"], "Foo.java");
        assert_eq!(json["changed"], true);
        assert!(json.get("before").is_none());
    }
}
