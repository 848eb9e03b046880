//! Resolve the declaring type of a method invocation
//!
//! Resolution follows Java scoping: methods declared in the unit shadow
//! static imports, single static imports beat wildcards, and a simple
//! qualifier resolves through single-type imports, the unit's own package,
//! `java.lang` and package wildcards, in that order.

use crate::lst::{split_last, CompilationUnit, MethodInvocation};

use super::Classpath;

/// How a call site names its method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStyle {
    /// `assertTrue(x)` through `import static ...assertTrue` or a wildcard
    StaticImport { wildcard: bool },
    /// `Assertions.assertTrue(x)`
    Qualified,
    /// `org.junit.jupiter.api.Assertions.assertTrue(x)`
    FullyQualified,
    /// Unqualified call to a method declared in this unit
    Local,
    /// Call on an instance expression
    Receiver,
    /// Unqualified call nothing in scope explains
    Unresolved,
}

impl CallStyle {
    /// True if the call names its declaring type at the call site.
    pub fn is_qualified(&self) -> bool {
        matches!(self, CallStyle::Qualified | CallStyle::FullyQualified)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCall {
    pub declaring_type: Option<String>,
    pub style: CallStyle,
}

impl ResolvedCall {
    fn new(declaring_type: impl Into<String>, style: CallStyle) -> Self {
        ResolvedCall {
            declaring_type: Some(declaring_type.into()),
            style,
        }
    }

    fn unknown(style: CallStyle) -> Self {
        ResolvedCall {
            declaring_type: None,
            style,
        }
    }
}

/// Attribute a call site against the unit's imports and the classpath.
pub fn attribute(unit: &CompilationUnit, classpath: &Classpath, inv: &MethodInvocation) -> ResolvedCall {
    match &inv.select {
        None => attribute_unqualified(unit, classpath, &inv.name),
        Some(select) => match select.qualified_name() {
            Some(qualifier) => attribute_qualified(unit, classpath, &qualifier),
            None => ResolvedCall::unknown(CallStyle::Receiver),
        },
    }
}

/// Resolve an unqualified method name.
pub fn attribute_unqualified(unit: &CompilationUnit, classpath: &Classpath, name: &str) -> ResolvedCall {
    if let Some(class) = unit
        .all_classes()
        .into_iter()
        .find(|c| c.methods.iter().any(|m| m.name == name))
    {
        return ResolvedCall::new(unit.qualify(&class.name), CallStyle::Local);
    }

    if let Some(import) = unit
        .imports
        .iter()
        .find(|i| i.is_static && !i.wildcard && i.member() == Some(name))
    {
        return ResolvedCall::new(import.type_name(), CallStyle::StaticImport { wildcard: false });
    }

    if let Some(import) = unit.imports.iter().find(|i| {
        i.is_static && i.wildcard && classpath.has_member(i.type_name(), name) == Some(true)
    }) {
        return ResolvedCall::new(import.type_name(), CallStyle::StaticImport { wildcard: true });
    }

    ResolvedCall::unknown(CallStyle::Unresolved)
}

fn attribute_qualified(unit: &CompilationUnit, classpath: &Classpath, qualifier: &str) -> ResolvedCall {
    if qualifier.contains('.') {
        if classpath.has_type(qualifier) || looks_like_type_name(qualifier) {
            return ResolvedCall::new(qualifier, CallStyle::FullyQualified);
        }
        return ResolvedCall::unknown(CallStyle::Receiver);
    }

    match resolve_simple_type(unit, classpath, qualifier) {
        Some(fqn) => ResolvedCall::new(fqn, CallStyle::Qualified),
        None => ResolvedCall::unknown(CallStyle::Receiver),
    }
}

/// Resolve a simple type name the way `javac` would for this unit.
pub fn resolve_simple_type(unit: &CompilationUnit, classpath: &Classpath, simple: &str) -> Option<String> {
    if let Some(import) = unit
        .imports
        .iter()
        .find(|i| i.simple_name() == Some(simple))
    {
        return Some(import.path.clone());
    }

    if unit.all_classes().iter().any(|c| c.name == simple) {
        return Some(unit.qualify(simple));
    }

    let same_package = unit.qualify(simple);
    if classpath.has_type(&same_package) {
        return Some(same_package);
    }

    let lang = format!("java.lang.{}", simple);
    if classpath.has_type(&lang) {
        return Some(lang);
    }

    unit.imports
        .iter()
        .filter(|i| !i.is_static && i.wildcard)
        .map(|i| format!("{}.{}", i.path, simple))
        .find(|candidate| classpath.has_type(candidate))
}

/// `org.example.Type`: lowercase package segments, capitalized last segment.
fn looks_like_type_name(qualifier: &str) -> bool {
    let (package, simple) = split_last(qualifier);
    !package.is_empty()
        && simple.chars().next().is_some_and(char::is_uppercase)
        && package
            .split('.')
            .all(|seg| seg.chars().next().is_some_and(char::is_lowercase))
}
