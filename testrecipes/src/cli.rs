//! CLI argument parsing using clap

use clap::Parser;

/// Migrate Java test code between testing idioms
#[derive(Parser, Debug)]
#[command(name = "testrecipes")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Preview a JUnit 4 to JUnit 5 migration
    testrecipes "src/test/**/*.java" -r junit5.JUnit4to5Migration --diff

    # Apply it
    testrecipes "src/test/**/*.java" -r junit5.JUnit4to5Migration --write

    # Several recipes, in order
    testrecipes FooTest.java -r cleanup.AssertTrueComparisonToAssertEquals -r assertj.JUnitAssertTrueToAssertThat

    # Recipes and allow-list from a config file
    testrecipes "src/test/**/*.java" --config testrecipes.toml --write

    # File list from stdin
    git ls-files '*Test.java' | testrecipes -r cleanup.BestPractices -o json

    # Show available recipes
    testrecipes --list
"#)]
pub struct Args {
    /// Files to process (supports glob patterns like "src/**/*.java")
    #[arg()]
    pub files: Vec<String>,

    /// Recipe or composite to run; repeat to run several in order
    #[arg(short = 'r', long = "recipe")]
    pub recipes: Vec<String>,

    /// Config file (.toml, .yaml or .yml)
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Write changes back to the files (default is a dry run)
    #[arg(long = "write")]
    pub write: bool,

    /// Print a unified diff for every changed file
    #[arg(long = "diff")]
    pub diff: bool,

    /// List available recipes and exit
    #[arg(long = "list")]
    pub list: bool,

    /// Output format: text (default), json
    #[arg(short = 'o', long = "output", default_value = "text")]
    pub output: String,

    /// Number of parallel workers
    #[arg(short = 'c', long = "concurrency")]
    pub concurrency: Option<usize>,

    /// Show verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
