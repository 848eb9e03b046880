//! Configuration file support
//!
//! A config file is TOML or YAML, picked by extension:
//!
//! ```toml
//! recipes = ["junit5.JUnit4to5Migration"]
//! assertion_types = ["com.example.CustomAssert"]
//! verification_methods = ["org.mockito.BDDMockito.then"]
//!
//! [[classpath]]
//! name = "com.example.CustomAssert"
//! members = ["assertValid"]
//! ```
//!
//! `assertion_types` and `verification_methods` extend the built-in
//! allow-list; they never replace it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::lst::split_last;
use crate::types::{
    Classpath, TypeEntry, ASSERTJ_ASSERTIONS, HAMCREST_MATCHER_ASSERT, JUNIT4_ASSERT,
    JUPITER_ASSERTIONS, MOCKITO,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config format '{0}', expected .toml, .yaml or .yml")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recipes (or composites) to activate
    pub recipes: Vec<String>,
    /// Types whose every static method counts as an assertion
    pub assertion_types: Vec<String>,
    /// Single methods that count as verification, `type.method`
    pub verification_methods: Vec<String>,
    /// Extra classpath metadata
    pub classpath: Vec<TypeEntry>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.to_string_lossy().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Err(ConfigError::UnsupportedFormat(path_str)),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn allow_list(&self) -> AssertionAllowList {
        let mut list = AssertionAllowList::default();
        for ty in &self.assertion_types {
            list.add_type(ty);
        }
        for method in &self.verification_methods {
            let (ty, name) = split_last(method);
            list.add_method(ty, name);
        }
        list
    }

    pub fn classpath(&self) -> Classpath {
        Classpath::builtin().with_entries(&self.classpath)
    }

    /// Shared, read-only context for one pass over many units.
    pub fn context(&self) -> RecipeContext {
        RecipeContext {
            classpath: Arc::new(self.classpath()),
            assertions: Arc::new(self.allow_list()),
        }
    }
}

/// Which calls count as an assertion or a verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionAllowList {
    types: BTreeSet<String>,
    methods: BTreeSet<(String, String)>,
}

impl Default for AssertionAllowList {
    fn default() -> Self {
        let mut list = AssertionAllowList {
            types: BTreeSet::new(),
            methods: BTreeSet::new(),
        };
        for ty in [JUPITER_ASSERTIONS, JUNIT4_ASSERT, ASSERTJ_ASSERTIONS, HAMCREST_MATCHER_ASSERT] {
            list.add_type(ty);
        }
        for name in ["verify", "verifyNoMoreInteractions", "verifyNoInteractions"] {
            list.add_method(MOCKITO, name);
        }
        list
    }
}

impl AssertionAllowList {
    pub fn add_type(&mut self, type_name: &str) {
        self.types.insert(type_name.to_string());
    }

    pub fn add_method(&mut self, type_name: &str, method: &str) {
        self.methods.insert((type_name.to_string(), method.to_string()));
    }

    pub fn is_assertion(&self, declaring_type: &str, method: &str) -> bool {
        self.types.contains(declaring_type)
            || self
                .methods
                .contains(&(declaring_type.to_string(), method.to_string()))
    }
}

/// Read-only state every recipe sees.
#[derive(Debug, Clone)]
pub struct RecipeContext {
    pub classpath: Arc<Classpath>,
    pub assertions: Arc<AssertionAllowList>,
}

impl Default for RecipeContext {
    fn default() -> Self {
        Config::default().context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allow_list() {
        let list = AssertionAllowList::default();
        assert!(list.is_assertion(JUPITER_ASSERTIONS, "assertEquals"));
        assert!(list.is_assertion(HAMCREST_MATCHER_ASSERT, "assertThat"));
        assert!(list.is_assertion(MOCKITO, "verify"));
        assert!(!list.is_assertion(MOCKITO, "when"));
    }

    #[test]
    fn test_toml_config_extends_defaults() {
        let config = Config::from_toml_str(
            r#"
recipes = ["cleanup.BestPractices"]
assertion_types = ["com.example.CustomAssert"]
verification_methods = ["org.mockito.BDDMockito.then"]

[[classpath]]
name = "com.example.CustomAssert"
members = ["assertValid"]
"#,
        )
        .unwrap();
        assert_eq!(config.recipes, vec!["cleanup.BestPractices"]);

        let list = config.allow_list();
        assert!(list.is_assertion("com.example.CustomAssert", "assertValid"));
        assert!(list.is_assertion("org.mockito.BDDMockito", "then"));
        assert!(list.is_assertion(JUPITER_ASSERTIONS, "assertTrue"));

        let cp = config.classpath();
        assert_eq!(cp.has_member("com.example.CustomAssert", "assertValid"), Some(true));
    }

    #[test]
    fn test_yaml_config() {
        let config = Config::from_yaml_str("recipes:\n  - junit5.JUnit4to5Migration\n").unwrap();
        assert_eq!(config.recipes, vec!["junit5.JUnit4to5Migration"]);
        assert!(config.assertion_types.is_empty());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(&path, "x").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.toml");
        fs::write(&path, "recipes = [\"cleanup.AssertTrueComparisonToAssertEquals\"]\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.recipes.len(), 1);
    }
}
