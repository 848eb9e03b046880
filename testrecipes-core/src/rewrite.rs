//! Byte-range edits over a unit's source
//!
//! Rewrites never mutate the tree. They produce [`Edit`]s that splice new
//! text over a span of the original source; everything between edits is
//! copied through untouched.

use thiserror::Error;

use crate::lst::Span;

/// Replace `span` of the original source with `replacement`.
/// An empty span is a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

impl Edit {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Edit {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Edit::replace(Span::new(at, at), text)
    }

    pub fn delete(span: Span) -> Self {
        Edit::replace(span, "")
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RewriteError {
    #[error("overlapping edits at {}..{} and {}..{}, rewrite is ambiguous", .first.start, .first.end, .second.start, .second.end)]
    OverlappingEdits { first: Span, second: Span },
    /// An edit points outside the source or splits a character.
    #[error("edit {}..{} is outside the source ({len} bytes)", .span.start, .span.end)]
    OutOfBounds { span: Span, len: usize },
}

/// Apply edits in a single ascending pass.
///
/// Identical duplicate edits collapse into one. Insertions at the same
/// offset keep their relative order.
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, RewriteError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    let mut sorted: Vec<&Edit> = edits.iter().collect();
    // stable: equal spans keep caller order
    sorted.sort_by_key(|e| (e.span.start, e.span.end));
    sorted.dedup_by(|a, b| a == b);

    for edit in &sorted {
        let span = edit.span;
        if span.start > span.end
            || span.end > source.len()
            || !source.is_char_boundary(span.start)
            || !source.is_char_boundary(span.end)
        {
            return Err(RewriteError::OutOfBounds {
                span,
                len: source.len(),
            });
        }
    }

    for pair in sorted.windows(2) {
        let (current, next) = (pair[0].span, pair[1].span);
        if current.end > next.start || (!current.is_empty() && current == next) {
            return Err(RewriteError::OverlappingEdits {
                first: current,
                second: next,
            });
        }
    }

    let mut result = String::with_capacity(source.len());
    let mut last_end = 0;
    for edit in sorted {
        result.push_str(&source[last_end..edit.span.start]);
        result.push_str(&edit.replacement);
        last_end = edit.span.end;
    }
    result.push_str(&source[last_end..]);
    Ok(result)
}

/// Edits collected during one visit. An edit overlapping one already
/// accepted is dropped, so the outermost rewrite of a nested match wins.
#[derive(Debug, Default, Clone)]
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the edit was dropped.
    pub fn push(&mut self, edit: Edit) -> bool {
        let conflicts = self.edits.iter().any(|e| {
            e.span.overlaps(edit.span) || (!e.span.is_empty() && e.span == edit.span)
        });
        if conflicts {
            return false;
        }
        self.edits.push(edit);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn into_vec(self) -> Vec<Edit> {
        self.edits
    }
}
