//! Type metadata and call-site attribution
//!
//! The [`Classpath`] is immutable during a pass and shared between units
//! through an `Arc`; attribution reads it without locking.

pub mod attribution;

pub use attribution::{attribute, CallStyle, ResolvedCall};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub const JUPITER_ASSERTIONS: &str = "org.junit.jupiter.api.Assertions";
pub const JUNIT4_ASSERT: &str = "org.junit.Assert";
pub const ASSERTJ_ASSERTIONS: &str = "org.assertj.core.api.Assertions";
pub const HAMCREST_MATCHER_ASSERT: &str = "org.hamcrest.MatcherAssert";
pub const MOCKITO: &str = "org.mockito.Mockito";
pub const JUNIT4_TEST: &str = "org.junit.Test";
pub const JUPITER_TEST: &str = "org.junit.jupiter.api.Test";

/// A known type and its static members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

static BUILTIN_TYPES: &[(&str, &[&str])] = &[
    (
        JUPITER_ASSERTIONS,
        &[
            "assertTrue", "assertFalse", "assertEquals", "assertNotEquals", "assertNull",
            "assertNotNull", "assertSame", "assertNotSame", "assertThrows", "assertThrowsExactly",
            "assertDoesNotThrow", "assertAll", "assertArrayEquals", "assertIterableEquals",
            "assertLinesMatch", "assertTimeout", "assertTimeoutPreemptively", "assertInstanceOf",
            "fail",
        ],
    ),
    (
        JUNIT4_ASSERT,
        &[
            "assertTrue", "assertFalse", "assertEquals", "assertNotEquals", "assertNull",
            "assertNotNull", "assertSame", "assertNotSame", "assertThat", "assertArrayEquals",
            "assertThrows", "fail",
        ],
    ),
    (
        ASSERTJ_ASSERTIONS,
        &[
            "assertThat", "assertThatThrownBy", "assertThatCode", "assertThatExceptionOfType",
            "assertThatNoException", "assertThatObject", "catchThrowable", "fail", "within",
            "offset", "entry", "tuple", "atIndex",
        ],
    ),
    (HAMCREST_MATCHER_ASSERT, &["assertThat"]),
    (
        "org.hamcrest.Matchers",
        &[
            "equalTo", "is", "not", "nullValue", "notNullValue", "containsInAnyOrder",
            "contains", "hasItem", "hasItems", "hasSize", "instanceOf", "anyOf", "allOf",
            "greaterThan", "lessThan", "empty", "containsString", "startsWith", "endsWith",
        ],
    ),
    (
        "org.hamcrest.CoreMatchers",
        &["equalTo", "is", "not", "nullValue", "notNullValue", "instanceOf", "anyOf", "allOf"],
    ),
    (
        MOCKITO,
        &[
            "verify", "when", "mock", "spy", "times", "never", "atLeast", "atLeastOnce",
            "atMost", "only", "doReturn", "doThrow", "doNothing", "doAnswer",
            "verifyNoMoreInteractions", "verifyNoInteractions", "inOrder", "reset",
        ],
    ),
    (
        "org.mockito.ArgumentMatchers",
        &["any", "eq", "anyString", "anyInt", "anyLong", "anyList", "argThat", "isNull"],
    ),
    ("java.util.Arrays", &["asList", "stream", "sort", "fill", "copyOf"]),
    ("java.util.Collections", &["emptyList", "singletonList", "unmodifiableList", "sort"]),
    (JUNIT4_TEST, &[]),
    (JUPITER_TEST, &[]),
    ("java.lang.Math", &["abs", "max", "min", "round"]),
    ("java.lang.System", &["currentTimeMillis", "nanoTime", "arraycopy", "getProperty"]),
    ("java.lang.Integer", &["valueOf", "parseInt", "toString"]),
    ("java.lang.String", &["valueOf", "format", "join"]),
];

/// Read-only table of known types and their static members.
#[derive(Debug, Clone, Default)]
pub struct Classpath {
    types: HashMap<String, BTreeSet<String>>,
}

static BUILTIN: Lazy<Classpath> = Lazy::new(|| {
    let mut classpath = Classpath::empty();
    for (name, members) in BUILTIN_TYPES {
        classpath.add_type(name, members.iter().copied());
    }
    classpath
});

impl Classpath {
    pub fn empty() -> Self {
        Classpath {
            types: HashMap::new(),
        }
    }

    /// Classpath with the testing libraries the recipes know about.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Add a type, or extend its member set if already known.
    pub fn add_type<'a>(&mut self, name: &str, members: impl IntoIterator<Item = &'a str>) {
        let entry = self.types.entry(name.to_string()).or_default();
        entry.extend(members.into_iter().map(str::to_string));
    }

    pub fn with_entries(mut self, entries: &[TypeEntry]) -> Self {
        for entry in entries {
            self.add_type(&entry.name, entry.members.iter().map(String::as_str));
        }
        self
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// `None` if the type is unknown.
    pub fn has_member(&self, type_name: &str, member: &str) -> Option<bool> {
        self.types.get(type_name).map(|members| members.contains(member))
    }

    pub fn members(&self, type_name: &str) -> Option<&BTreeSet<String>> {
        self.types.get(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_members() {
        let cp = Classpath::builtin();
        assert_eq!(cp.has_member(JUPITER_ASSERTIONS, "assertTrue"), Some(true));
        assert_eq!(cp.has_member(JUPITER_ASSERTIONS, "assertThrowsExactly"), Some(true));
        assert_eq!(cp.has_member(JUPITER_ASSERTIONS, "assertThat"), Some(false));
        assert_eq!(cp.has_member(JUNIT4_ASSERT, "assertNotEquals"), Some(true));
        assert_eq!(cp.has_member("com.example.Unknown", "x"), None);
    }

    #[test]
    fn test_entries_extend_existing_types() {
        let cp = Classpath::builtin().with_entries(&[TypeEntry {
            name: MOCKITO.to_string(),
            members: vec!["lenient".to_string()],
        }]);
        assert_eq!(cp.has_member(MOCKITO, "lenient"), Some(true));
        assert_eq!(cp.has_member(MOCKITO, "verify"), Some(true));
    }
}
