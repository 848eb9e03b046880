//! Parallel file processing using Rayon

use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use crate::config::RecipeContext;
use crate::driver::{run_file, DriverError, RunResult};
use crate::parser::detect_language;
use crate::recipes::Recipe;

/// Run recipes over many files in parallel. Units are independent; the
/// context is shared read-only. Results keep the input order.
pub fn process_files_parallel<P: AsRef<Path> + Sync>(
    files: &[P],
    recipes: &[Box<dyn Recipe>],
    ctx: &RecipeContext,
    concurrency: Option<usize>,
    write: bool,
) -> Vec<Result<RunResult, DriverError>> {
    if let Some(num_threads) = concurrency {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // already initialized
    }

    files
        .par_iter()
        .map(|path| run_file(path.as_ref(), recipes, ctx, write))
        .collect()
}

/// Expand command-line paths into the files to process.
///
/// A glob expands to the files it matches and a directory to every `.java`
/// file below it. Anything else passes through as given, so a missing file
/// still reports its own error. A path named twice is processed once.
pub fn expand_globs<S: AsRef<str>>(patterns: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    patterns
        .iter()
        .flat_map(|pattern| expand_one(pattern.as_ref()))
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

fn expand_one(pattern: &str) -> Vec<String> {
    let glob_pattern: Cow<'_, str> = if Path::new(pattern).is_dir() {
        Cow::Owned(format!("{}/**/*.java", pattern.trim_end_matches('/')))
    } else if pattern.contains(['*', '?', '[']) {
        Cow::Borrowed(pattern)
    } else {
        return vec![pattern.to_string()];
    };

    match glob::glob(&glob_pattern) {
        Ok(paths) => paths
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .filter_map(|path| path.to_str().map(str::to_string))
            .collect(),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "invalid glob pattern");
            Vec::new()
        }
    }
}

/// Keep only Java sources.
pub fn filter_supported_files(files: impl IntoIterator<Item = String>) -> Vec<String> {
    files
        .into_iter()
        .filter(|path| detect_language(path) == "java")
        .collect()
}
