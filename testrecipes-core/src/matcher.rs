//! Method signature matching
//!
//! A [`MethodMatcher`] is written as `"<declaring type> <method>(<args>)"`,
//! e.g. `"org.junit.jupiter.api.Assertions assertTrue(..)"`. The argument
//! list is `..` for any arity, or a comma list where each `*` (or a type
//! name) stands for one argument and a `..` element for any remaining ones.
//!
//! Matching uses the attributed declaring type, never the simple name, so
//! `Assertions.assertTrue` on an unrelated `Assertions` class does not match.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::lst::{CompilationUnit, MethodInvocation};
use crate::types::{attribute, Classpath, ResolvedCall};

static SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_$][\w$.]*)\s+([A-Za-z_$*][\w$*]*)\s*\((.*)\)\s*$")
        .expect("signature pattern is valid")
});

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MatcherError {
    #[error("invalid method pattern '{0}', expected '<type> <method>(<args>)'")]
    InvalidPattern(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMatcher {
    pub type_name: String,
    /// `*` matches any method name
    pub method_name: String,
    pub min_args: usize,
    pub max_args: Option<usize>,
}

impl MethodMatcher {
    pub fn parse(pattern: &str) -> Result<Self, MatcherError> {
        let caps = SIGNATURE
            .captures(pattern)
            .ok_or_else(|| MatcherError::InvalidPattern(pattern.to_string()))?;

        let args = caps[3].trim();
        let (min_args, max_args) = if args.is_empty() {
            (0, Some(0))
        } else {
            let mut min = 0;
            let mut unbounded = false;
            for part in args.split(',').map(str::trim) {
                match part {
                    ".." => unbounded = true,
                    "" => return Err(MatcherError::InvalidPattern(pattern.to_string())),
                    _ => min += 1,
                }
            }
            (min, if unbounded { None } else { Some(min) })
        };

        Ok(MethodMatcher {
            type_name: caps[1].to_string(),
            method_name: caps[2].to_string(),
            min_args,
            max_args,
        })
    }

    /// Match by name and arity against an already attributed call.
    pub fn matches_resolved(&self, resolved: &ResolvedCall, inv: &MethodInvocation) -> bool {
        let arity = inv.args.len();
        resolved.declaring_type.as_deref() == Some(self.type_name.as_str())
            && (self.method_name == "*" || self.method_name == inv.name)
            && arity >= self.min_args
            && self.max_args.map_or(true, |max| arity <= max)
    }

    pub fn matches(&self, unit: &CompilationUnit, classpath: &Classpath, inv: &MethodInvocation) -> bool {
        self.resolve(unit, classpath, inv).is_some()
    }

    /// Attribute the call and return the resolution if it matches.
    pub fn resolve(&self, unit: &CompilationUnit, classpath: &Classpath, inv: &MethodInvocation) -> Option<ResolvedCall> {
        if self.method_name != "*" && self.method_name != inv.name {
            return None;
        }
        let resolved = attribute(unit, classpath, inv);
        self.matches_resolved(&resolved, inv).then_some(resolved)
    }
}
