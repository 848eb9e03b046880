//! Name-based recipe registry
//!
//! A static table built once per process. Composites expand to a fixed,
//! ordered list of recipes; each recipe runs on the output of the previous.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::recipes::*;

type Constructor = fn() -> Box<dyn Recipe>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown recipe '{0}' (use --list to see available recipes)")]
    UnknownRecipe(String),
    #[error("no recipes selected")]
    NothingSelected,
}

struct Composite {
    display_name: &'static str,
    description: &'static str,
    recipes: &'static [&'static str],
}

static RECIPES: Lazy<BTreeMap<&'static str, Constructor>> = Lazy::new(|| {
    let constructors: [Constructor; 8] = [
        || Box::new(JUnitAssertTrueToAssertThat),
        || Box::new(AssertTrueComparisonToAssertEquals),
        || Box::new(AssertFalseNegationToAssertTrue),
        || Box::new(AssertFalseNullToAssertNotNull),
        || Box::new(TestsShouldIncludeAssertions),
        || Box::new(UpdateTestAnnotation),
        || Box::new(AssertThatToMatcherAssert),
        || Box::new(RemoveTestMethodPublicModifier),
    ];
    constructors.into_iter().map(|make| (make().name(), make)).collect()
});

static COMPOSITES: Lazy<BTreeMap<&'static str, Composite>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    map.insert(
        "junit5.JUnit4to5Migration",
        Composite {
            display_name: "JUnit Jupiter migration from JUnit 4.x",
            description: "Migrates JUnit 4.x tests to JUnit Jupiter.",
            recipes: &[
                "junit5.UpdateTestAnnotation",
                "junit5.AssertThatToMatcherAssert",
                "junit5.RemoveTestMethodPublicModifier",
                "cleanup.AssertTrueComparisonToAssertEquals",
                "cleanup.AssertFalseNegationToAssertTrue",
                "cleanup.AssertFalseNullToAssertNotNull",
                "assertj.JUnitAssertTrueToAssertThat",
                "cleanup.TestsShouldIncludeAssertions",
            ],
        },
    );
    map.insert(
        "cleanup.BestPractices",
        Composite {
            display_name: "Testing best practices",
            description: "Simplify boolean assertions and make sure every test asserts something.",
            recipes: &[
                "cleanup.AssertTrueComparisonToAssertEquals",
                "cleanup.AssertFalseNegationToAssertTrue",
                "cleanup.AssertFalseNullToAssertNotNull",
                "cleanup.TestsShouldIncludeAssertions",
            ],
        },
    );
    map
});

/// One line of `--list` output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecipeInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Member recipes, empty for a single recipe
    pub recipes: Vec<String>,
}

/// Instantiate recipes by name, expanding composites in order.
/// A recipe selected twice runs once, at its first position.
pub fn activate<S: AsRef<str>>(names: &[S]) -> Result<Vec<Box<dyn Recipe>>, RegistryError> {
    let mut expanded: Vec<&'static str> = Vec::new();
    for name in names {
        let name = name.as_ref();
        if let Some(composite) = COMPOSITES.get(name) {
            expanded.extend(composite.recipes.iter().copied());
        } else if let Some((key, _)) = RECIPES.get_key_value(name) {
            expanded.push(key);
        } else {
            return Err(RegistryError::UnknownRecipe(name.to_string()));
        }
    }

    let mut seen = Vec::new();
    let mut recipes = Vec::new();
    for name in expanded {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        let make = RECIPES
            .get(name)
            .ok_or_else(|| RegistryError::UnknownRecipe(name.to_string()))?;
        recipes.push(make());
    }

    if recipes.is_empty() {
        return Err(RegistryError::NothingSelected);
    }
    Ok(recipes)
}

/// Every registered recipe and composite, sorted by name.
pub fn list() -> Vec<RecipeInfo> {
    let singles = RECIPES.values().map(|make| {
        let recipe = make();
        RecipeInfo {
            name: recipe.name().to_string(),
            display_name: recipe.display_name().to_string(),
            description: recipe.description().to_string(),
            recipes: Vec::new(),
        }
    });
    let composites = COMPOSITES.iter().map(|(name, c)| RecipeInfo {
        name: name.to_string(),
        display_name: c.display_name.to_string(),
        description: c.description.to_string(),
        recipes: c.recipes.iter().map(|r| r.to_string()).collect(),
    });
    let mut all: Vec<RecipeInfo> = singles.chain(composites).collect();
    all.sort_by(|a, b| a.name.cmp(&b.name));
    all
}
