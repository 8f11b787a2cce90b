//! Core traits for language analysis.

use std::path::Path;

use super::{FileFacts, Result};

/// Text projected for nodes whose span cannot be recovered.
pub const INVALID_TEXT: &str = "<invalid>";

/// Holds a parsed tree-sitter tree and the buffer it was parsed from.
///
/// Never mutated after creation; all text projection goes through
/// `node_text` so every rendered snippet is an exact slice of `source`.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The source buffer (kept for node text extraction).
    pub source: Vec<u8>,
    /// The display path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Exact source text spanned by a node, trimmed.
    ///
    /// Returns `<invalid>` for empty or out-of-range spans.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        self.span_text(node.start_byte(), node.end_byte())
    }

    /// Source text between two byte offsets, trimmed.
    pub fn span_text(&self, start: usize, end: usize) -> &str {
        if start >= end || end > self.source.len() {
            return INVALID_TEXT;
        }
        match std::str::from_utf8(&self.source[start..end]) {
            Ok(text) => text.trim(),
            Err(_) => INVALID_TEXT,
        }
    }

    /// 1-based line on which a node starts.
    pub fn line_of(&self, node: tree_sitter::Node) -> usize {
        node.start_position().row + 1
    }
}

/// Language-specific analyzer trait.
///
/// # Thread Safety
///
/// tree_sitter::Parser is not Sync, so implementations create a parser
/// per `parse` call.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "go").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse a source buffer into a tree.
    ///
    /// Unlike plain tree-sitter parsing this is strict: a tree that contains
    /// ERROR or MISSING nodes is rejected with `AnalysisError::Parse`.
    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile>;

    /// Extract types, methods and control flow from a parsed file.
    fn extract_facts(&self, parsed: &ParsedFile) -> FileFacts;

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}
