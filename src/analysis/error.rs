//! Errors raised while loading and analyzing source files.

use thiserror::Error;

/// Errors that abort the analysis of a single file.
///
/// Receivers that do not resolve to a known type and expressions the
/// renderer does not understand are not errors; they are absorbed into
/// best-effort output.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{path}:{line}:{column}: syntax error: {message}")]
    Parse {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("parser produced no tree for {0}")]
    NoTree(String),
    #[error("no analyzer for {0}")]
    Unsupported(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
