//! testrecipes-core: typed-tree rewrite recipes for Java test code
//!
//! This library provides:
//! - TreeSitter-based parsing into a lossless typed tree
//! - Lightweight type attribution against a configurable classpath
//! - Recipes that migrate assertions and test annotations
//! - Import reconciliation after each rewrite

pub mod lst;
pub mod parser;
pub mod types;
pub mod matcher;
pub mod classify;
pub mod rewrite;
pub mod imports;
pub mod recipes;
pub mod registry;
pub mod driver;
pub mod parallel;
pub mod config;
pub mod source_utils;

pub use parser::{parse_java, parse_file, detect_language, ParseError, SUPPORTED_LANGUAGES};
pub use lst::{CompilationUnit, Span};
pub use types::Classpath;
pub use matcher::MethodMatcher;
pub use rewrite::{apply_edits, Edit, RewriteError};
pub use imports::{reconcile, ImportDelta};
pub use recipes::{Recipe, RecipeOutput};
pub use registry::{activate, list as list_recipes, RecipeInfo, RegistryError};
pub use driver::{run, run_file, unified_diff, DriverError, RunResult};
pub use parallel::{process_files_parallel, expand_globs, filter_supported_files};
pub use config::{Config, ConfigError, RecipeContext};
