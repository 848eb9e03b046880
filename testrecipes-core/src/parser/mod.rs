//! TreeSitter-based Java parser
//!
//! Turns Java source into the typed tree in [`crate::lst`]. Files that do not
//! parse cleanly are rejected so recipes never rewrite a half-understood file.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::lst::build::UnitBuilder;
use crate::lst::CompilationUnit;

/// Supported languages and their extensions
pub static SUPPORTED_LANGUAGES: &[(&str, &[&str])] = &[("java", &["java"])];

/// Errors that can occur during parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse: {0}")]
    Parse(String),
    #[error("{path}: syntax error at {line}:{column}")]
    Syntax { path: String, line: usize, column: usize },
    #[error("TreeSitter error: {0}")]
    TreeSitter(String),
}

/// Detect language from file path extension
pub fn detect_language(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext.to_lowercase().as_str() {
        "java" => "java",
        _ => "unknown",
    }
}

/// Parse Java source into a compilation unit.
pub fn parse_java(source: &str, file_path: &str) -> Result<CompilationUnit, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| ParseError::TreeSitter(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Parse("Failed to parse source".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, column) = first_error_position(root);
        return Err(ParseError::Syntax {
            path: file_path.to_string(),
            line,
            column,
        });
    }

    Ok(UnitBuilder::new(source).build(root, file_path))
}

/// Parse a Java file from disk.
pub fn parse_file(path: &Path) -> Result<CompilationUnit, ParseError> {
    let path_str = path.to_string_lossy();
    let lang = detect_language(&path_str);
    if lang != "java" {
        return Err(ParseError::UnsupportedLanguage(path_str.to_string()));
    }
    let source = fs::read_to_string(path)?;
    parse_java(&source, &path_str)
}

/// 1-based position of the first ERROR or MISSING node.
fn first_error_position(node: tree_sitter::Node) -> (usize, usize) {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return (pos.row + 1, pos.column + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    for child in children {
        if child.has_error() {
            return first_error_position(child);
        }
    }
    let pos = node.start_position();
    (pos.row + 1, pos.column + 1)
}
