//! Source text helpers
//!
//! Line and indentation lookups on byte offsets, shared by the rewriter and
//! the import synchronizer.

/// Byte offset of the start of the line containing `offset`.
pub fn line_start(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .rfind('\n')
        .map_or(0, |i| i + 1)
}

/// Byte offset just past the newline ending the line containing `offset`,
/// or the end of the source on the last line.
pub fn line_end_inclusive(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i + 1)
}

/// Leading whitespace of the line containing `offset`.
pub fn indent_at(source: &str, offset: usize) -> &str {
    let start = line_start(source, offset);
    let line = &source[start..];
    let len = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..len]
}

/// True if only whitespace precedes `offset` on its line.
pub fn starts_line(source: &str, offset: usize) -> bool {
    source[line_start(source, offset)..offset]
        .chars()
        .all(|c| c == ' ' || c == '\t')
}

/// True if the line starting at `offset` is empty or whitespace only.
pub fn is_blank_line_at(source: &str, offset: usize) -> bool {
    if offset >= source.len() {
        return false;
    }
    let end = line_end_inclusive(source, offset);
    source[offset..end].trim().is_empty()
}

/// Indent every line after the first by `extra`. Blank lines stay empty.
pub fn reindent(text: &str, extra: &str) -> String {
    let mut out = String::with_capacity(text.len() + extra.len() * 4);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.trim().is_empty() {
                out.push_str(extra);
            }
        }
        out.push_str(line);
    }
    out
}

/// Skip spaces and tabs forward from `offset`.
pub fn skip_inline_whitespace(source: &str, offset: usize) -> usize {
    let rest = &source[offset..];
    offset + rest.find(|c: char| c != ' ' && c != '\t').unwrap_or(rest.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bounds() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_start(source, 0), 0);
        assert_eq!(line_start(source, 8), 6);
        assert_eq!(line_end_inclusive(source, 8), 12);
        assert_eq!(line_end_inclusive(source, 13), source.len());
    }

    #[test]
    fn test_indent_at() {
        let source = "class A {\n    void t() {\n\tx();\n";
        assert_eq!(indent_at(source, 15), "    ");
        assert_eq!(indent_at(source, 27), "\t");
        assert!(starts_line(source, 14));
        assert!(!starts_line(source, 19));
    }

    #[test]
    fn test_reindent_skips_blank_lines() {
        assert_eq!(reindent("a();\n\n    b();", "  "), "a();\n\n      b();");
    }

    #[test]
    fn test_blank_line_detection() {
        let source = "a\n\n  \nb";
        assert!(!is_blank_line_at(source, 0));
        assert!(is_blank_line_at(source, 2));
        assert!(is_blank_line_at(source, 3));
        assert!(!is_blank_line_at(source, source.len()));
    }
}
