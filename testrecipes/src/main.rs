//! testrecipes - migrate Java test code between testing idioms
//!
//! This is the main CLI entry point: it resolves recipes and configuration,
//! runs the recipes over every file in parallel and reports the results.

mod cli;

use std::io::{self, BufRead};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use testrecipes_core::{
    activate, expand_globs, filter_supported_files, list_recipes, process_files_parallel,
    unified_diff, Config, DriverError, RunResult,
};
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clap::Parser;
use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Log to stderr. `RUST_LOG` wins over the `-v` default.
fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init()
        .ok();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let format = OutputFormat::from_str(&args.output)
        .with_context(|| format!("invalid format '{}'. Valid formats: text, json", args.output))?;

    if args.list {
        return print_recipe_list(format);
    }

    let mut config = match &args.config {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::default(),
    };
    if !args.recipes.is_empty() {
        config.recipes = args.recipes.clone();
    }
    let recipes = activate(config.recipes.as_slice())?;
    let ctx = config.context();

    // Collect files
    let mut files: Vec<String> = expand_globs(&args.files);
    if files.is_empty() && !atty::is(atty::Stream::Stdin) {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let path = line.context("failed to read file list from stdin")?;
            let path = path.trim();
            if !path.is_empty() {
                files.push(path.to_string());
            }
        }
    }
    files = filter_supported_files(files);

    if files.is_empty() {
        eprintln!("Usage: testrecipes <files...> -r <recipe> [OPTIONS]");
        eprintln!("   or: git ls-files '*.java' | testrecipes -r <recipe>");
        eprintln!("\nUse --help for more information.");
        bail!("no input files");
    }

    let concurrency = args.concurrency.unwrap_or_else(num_cpus::get);
    let results = process_files_parallel(&files, &recipes, &ctx, Some(concurrency), args.write);

    let mut done = Vec::new();
    let mut write_failures = 0usize;
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(result) => done.push(result),
            Err(e @ DriverError::Io { .. }) => {
                eprintln!("error: {}", e);
                write_failures += 1;
            }
            Err(e) => eprintln!("warning: {}: {}", file, e),
        }
    }

    report(&done, format, &args)?;

    if write_failures > 0 {
        bail!("{} file(s) could not be written", write_failures);
    }
    Ok(())
}

fn report(results: &[RunResult], format: OutputFormat, args: &Args) -> anyhow::Result<()> {
    let changed: Vec<&RunResult> = results.iter().filter(|r| r.changed).collect();

    if args.diff {
        for result in &changed {
            print!("{}", unified_diff(result));
        }
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(results)?);
        }
        OutputFormat::Text => {
            if !args.diff {
                for result in &changed {
                    println!("{}: {}", result.path, result.applied.join(", "));
                }
            }
            let verb = if args.write { "changed" } else { "would change" };
            eprintln!("{} of {} file(s) {}", changed.len(), results.len(), verb);
        }
    }
    Ok(())
}

fn print_recipe_list(format: OutputFormat) -> anyhow::Result<()> {
    let recipes = list_recipes();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recipes)?),
        OutputFormat::Text => {
            let width = recipes.iter().map(|r| r.name.len()).max().unwrap_or(0);
            for recipe in &recipes {
                println!("{:width$}  {}", recipe.name, recipe.display_name, width = width);
                for member in &recipe.recipes {
                    println!("{:width$}    - {}", "", member, width = width);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    #[test]
    fn test_unknown_recipe_is_an_error() {
        let args = Args::parse_from(["testrecipes", "FooTest.java", "-r", "nope.Nothing"]);
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("unknown recipe 'nope.Nothing'"));
    }

    #[test]
    fn test_write_applies_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("FooTest.java");
        std::fs::write(
            &path,
            "class FooTest {\n    void check(boolean a) {\n        org.junit.jupiter.api.Assertions.assertFalse(!a);\n    }\n}\n",
        )
        .unwrap();
        let args = Args::parse_from([
            "testrecipes",
            path.to_str().unwrap(),
            "-r",
            "cleanup.AssertFalseNegationToAssertTrue",
            "--write",
        ]);
        run(args).unwrap();
        let after = std::fs::read_to_string(&path).unwrap();
        assert!(after.contains("org.junit.jupiter.api.Assertions.assertTrue(a);"));
    }
}
