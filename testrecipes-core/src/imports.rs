//! Import synchronization
//!
//! Node rewrites never edit imports. They return an [`ImportDelta`]; once all
//! node edits of a recipe are applied and the unit is re-parsed, [`reconcile`]
//! turns the delta into edits against that final tree, so usage scans see
//! exactly the code that will be written.
//!
//! Placement of new static imports:
//! - among the remaining static imports, in sorted order
//! - else where the first removed static import was
//! - else after the last import, separated by a blank line
//! - else after the package declaration, or at the top of the file

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::lst::walk::invocations;
use crate::lst::{CompilationUnit, Import, Span};
use crate::rewrite::Edit;
use crate::source_utils::{
    is_blank_line_at, line_end_inclusive, line_start, skip_inline_whitespace, starts_line,
};
use crate::types::attribution::{attribute_unqualified, CallStyle};
use crate::types::Classpath;

/// A static member to import: `import static <type_name>.<member>;`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StaticMember {
    pub type_name: String,
    pub member: String,
}

impl StaticMember {
    pub fn new(type_name: &str, member: &str) -> Self {
        StaticMember {
            type_name: type_name.to_string(),
            member: member.to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("import static {}.{};", self.type_name, self.member)
    }
}

/// Replace a single-type import in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeChange {
    pub from: String,
    pub to: String,
}

/// Import requirements collected while rewriting one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDelta {
    pub additions: Vec<StaticMember>,
    /// Types whose imports go away if nothing uses them anymore
    pub removals: Vec<String>,
    pub changes: Vec<TypeChange>,
}

impl ImportDelta {
    pub fn add_static(&mut self, type_name: &str, member: &str) {
        let addition = StaticMember::new(type_name, member);
        if !self.additions.contains(&addition) {
            self.additions.push(addition);
        }
    }

    pub fn maybe_remove(&mut self, type_name: &str) {
        if !self.removals.iter().any(|t| t == type_name) {
            self.removals.push(type_name.to_string());
        }
    }

    pub fn change_type(&mut self, from: &str, to: &str) {
        let change = TypeChange {
            from: from.to_string(),
            to: to.to_string(),
        };
        if !self.changes.contains(&change) {
            self.changes.push(change);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty() && self.changes.is_empty()
    }
}

/// A static import that cannot be added without changing what a name means.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportConflict {
    #[error("'{member}' is already statically imported from {existing}")]
    MemberImportedElsewhere { member: String, existing: String },
    #[error("'{0}' is declared in this unit and would shadow a static import")]
    ShadowedByLocalMethod(String),
    #[error("'{member}' is still called through the wildcard import of {wildcard}")]
    HidesWildcardMember { member: String, wildcard: String },
}

/// Check, before rewriting a node, that an unqualified call to
/// `type_name.member` would resolve to that member once imported.
///
/// `replacing` names the type whose calls the rewrite migrates away from;
/// a static import of `member` from that type is expected to go with them.
/// A single static import beats every wildcard, so other calls to `member`
/// that resolve through another type's wildcard would change meaning.
pub fn check_addition(
    unit: &CompilationUnit,
    classpath: &Classpath,
    type_name: &str,
    member: &str,
    replacing: Option<&str>,
) -> Result<(), ImportConflict> {
    let foreign = |ty: &str| ty != type_name && Some(ty) != replacing;

    if let Some(existing) = unit
        .imports
        .iter()
        .find(|i| i.member() == Some(member) && foreign(i.type_name()))
    {
        return Err(ImportConflict::MemberImportedElsewhere {
            member: member.to_string(),
            existing: existing.type_name().to_string(),
        });
    }
    if unit.declares_method(member) {
        return Err(ImportConflict::ShadowedByLocalMethod(member.to_string()));
    }

    let called = invocations(unit)
        .into_iter()
        .any(|inv| inv.select.is_none() && inv.name == member);
    if !called {
        return Ok(());
    }
    let resolved = attribute_unqualified(unit, classpath, member);
    let hidden = match (resolved.style, resolved.declaring_type.as_deref()) {
        (CallStyle::StaticImport { wildcard: true }, Some(ty)) if foreign(ty) => Some(ty.to_string()),
        // a wildcard of a type we know nothing about may be what provides it
        (CallStyle::Unresolved, _) => unit
            .imports
            .iter()
            .find(|i| {
                i.is_static
                    && i.wildcard
                    && foreign(i.type_name())
                    && classpath.has_member(i.type_name(), member).is_none()
            })
            .map(|i| i.type_name().to_string()),
        _ => None,
    };
    match hidden {
        Some(wildcard) => Err(ImportConflict::HidesWildcardMember {
            member: member.to_string(),
            wildcard,
        }),
        None => Ok(()),
    }
}

/// True if anything in the unit still needs this import.
///
/// Names in `superseded` are being imported from another type, so a
/// reference to them does not keep this import alive. Package wildcards are
/// kept. So are static wildcards of a type the classpath does not know, and
/// any static wildcard while an unqualified call resolves to nothing, since
/// member tables can be incomplete.
pub fn is_import_used(
    unit: &CompilationUnit,
    classpath: &Classpath,
    import: &Import,
    superseded: &[&str],
) -> bool {
    let live = |name: &str| !superseded.contains(&name) && unit.references_name(name);
    if import.is_static {
        match import.member() {
            Some(member) => live(member),
            None => match classpath.members(import.type_name()) {
                Some(members) => {
                    members.iter().any(|m| live(m.as_str())) || has_unresolved_call(unit, classpath, superseded)
                }
                None => true,
            },
        }
    } else {
        match import.simple_name() {
            Some(simple) => unit.references_name(simple),
            None => true,
        }
    }
}

fn has_unresolved_call(unit: &CompilationUnit, classpath: &Classpath, superseded: &[&str]) -> bool {
    invocations(unit).into_iter().any(|inv| {
        inv.select.is_none()
            && !superseded.contains(&inv.name.as_str())
            && attribute_unqualified(unit, classpath, &inv.name).style == CallStyle::Unresolved
    })
}

/// Turn a delta into edits against the re-parsed unit.
pub fn reconcile(unit: &CompilationUnit, classpath: &Classpath, delta: &ImportDelta) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut changed = vec![false; unit.imports.len()];
    let mut removed = vec![false; unit.imports.len()];

    for change in &delta.changes {
        let mut target_present = unit
            .imports
            .iter()
            .any(|i| i.simple_name().is_some() && i.path == change.to);
        for (idx, import) in unit.imports.iter().enumerate() {
            if changed[idx] || import.simple_name().is_none() || import.path != change.from {
                continue;
            }
            changed[idx] = true;
            if target_present {
                removed[idx] = true;
            } else {
                debug!(from = %change.from, to = %change.to, "changing import");
                edits.push(Edit::replace(import.span, format!("import {};", change.to)));
                target_present = true;
            }
        }
    }

    for type_name in &delta.removals {
        let superseded: Vec<&str> = delta
            .additions
            .iter()
            .filter(|a| a.type_name != *type_name)
            .map(|a| a.member.as_str())
            .collect();
        for (idx, import) in unit.imports.iter().enumerate() {
            if changed[idx] || removed[idx] {
                continue;
            }
            let about_type = if import.is_static {
                import.type_name() == type_name
            } else {
                !import.wildcard && import.path == *type_name
            };
            if about_type && !is_import_used(unit, classpath, import, &superseded) {
                debug!(import = %import.render(), "removing unused import");
                removed[idx] = true;
            }
        }
    }

    let mut pending: Vec<&StaticMember> = delta
        .additions
        .iter()
        .filter(|a| !is_covered(unit, classpath, &removed, a))
        .collect();
    pending.sort();
    pending.dedup();

    let inserts = place_additions(unit, &removed, &pending);
    let anchors: Vec<usize> = inserts.iter().map(|(at, _)| *at).collect();
    edits.extend(removal_edits(unit, &removed, &anchors));
    edits.extend(inserts.into_iter().map(|(at, text)| Edit::insert(at, text)));

    if !edits.is_empty() {
        debug!(path = %unit.path, edits = edits.len(), "reconciled imports");
    }
    edits
}

/// An exact static import, or a wildcard of the same type that no other
/// static wildcard competes with for this member name.
fn is_covered(unit: &CompilationUnit, classpath: &Classpath, removed: &[bool], add: &StaticMember) -> bool {
    let live: Vec<&Import> = unit
        .imports
        .iter()
        .enumerate()
        .filter(|(idx, i)| !removed[*idx] && i.is_static)
        .map(|(_, i)| i)
        .collect();

    if live
        .iter()
        .any(|i| !i.wildcard && i.covers_member(&add.type_name, &add.member))
    {
        return true;
    }

    let own_wildcard = live
        .iter()
        .any(|i| i.wildcard && i.type_name() == add.type_name);
    let competing = live.iter().any(|i| {
        i.wildcard
            && i.type_name() != add.type_name
            && classpath.has_member(i.type_name(), &add.member) == Some(true)
    });
    own_wildcard && !competing
}

fn place_additions(unit: &CompilationUnit, removed: &[bool], pending: &[&StaticMember]) -> Vec<(usize, String)> {
    if pending.is_empty() {
        return Vec::new();
    }
    let source = unit.source.as_str();
    let lines: String = pending.iter().map(|a| format!("{}\n", a.render())).collect();

    let live: Vec<&Import> = unit
        .imports
        .iter()
        .enumerate()
        .filter(|(idx, _)| !removed[*idx])
        .map(|(_, i)| i)
        .collect();
    let live_statics: Vec<&Import> = live.iter().copied().filter(|i| i.is_static).collect();

    if let Some(last_static) = live_statics.last() {
        let mut groups: BTreeMap<usize, String> = BTreeMap::new();
        for addition in pending {
            let line = addition.render();
            let at = match live_statics.iter().find(|i| i.render() > line) {
                Some(next) => line_start(source, next.span.start),
                None => line_end_inclusive(source, last_static.span.end),
            };
            let text = groups.entry(at).or_default();
            if at == source.len() && !source.ends_with('\n') && text.is_empty() {
                text.push('\n');
            }
            text.push_str(&line);
            text.push('\n');
        }
        return groups.into_iter().collect();
    }

    let first_removed_static = unit
        .imports
        .iter()
        .enumerate()
        .find(|(idx, i)| removed[*idx] && i.is_static)
        .map(|(_, i)| i);
    if let Some(first) = first_removed_static {
        return vec![(line_start(source, first.span.start), lines)];
    }

    let anchor = live
        .last()
        .map(|i| i.span.end)
        .or_else(|| unit.package_span.map(|s| s.end));
    match anchor {
        Some(end) => {
            let at = line_end_inclusive(source, end);
            let mut text = String::from("\n");
            if at == source.len() && !source.ends_with('\n') {
                text.insert(0, '\n');
            }
            text.push_str(&lines);
            if !is_blank_line_at(source, at) {
                text.push('\n');
            }
            vec![(at, text)]
        }
        None => vec![(0, format!("{}\n", lines))],
    }
}

/// Whole lines go when an import is alone on its line. A blank line left
/// doubled by removing a group is dropped too, unless a new import lands there.
fn removal_edits(unit: &CompilationUnit, removed: &[bool], anchors: &[usize]) -> Vec<Edit> {
    let source = unit.source.as_str();
    let mut edits = Vec::new();
    let mut lines: Vec<Span> = Vec::new();

    for (idx, import) in unit.imports.iter().enumerate() {
        if !removed[idx] {
            continue;
        }
        let end = line_end_inclusive(source, import.span.end);
        let alone = starts_line(source, import.span.start) && source[import.span.end..end].trim().is_empty();
        if alone {
            lines.push(Span::new(line_start(source, import.span.start), end));
        } else {
            let stop = skip_inline_whitespace(source, import.span.end);
            edits.push(Edit::delete(Span::new(import.span.start, stop)));
        }
    }

    let mut runs: Vec<Span> = Vec::new();
    for span in lines {
        match runs.last_mut() {
            Some(last) if last.end == span.start => last.end = span.end,
            _ => runs.push(span),
        }
    }

    for mut run in runs {
        let blank_before = run.start == 0 || is_blank_line_at(source, line_start(source, run.start - 1));
        let anchored = anchors.iter().any(|&at| at >= run.start && at <= run.end);
        if blank_before && !anchored && is_blank_line_at(source, run.end) {
            run.end = line_end_inclusive(source, run.end);
        }
        edits.push(Edit::delete(run));
    }
    edits
}
