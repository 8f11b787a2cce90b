//! AST-backed code analysis module.
//!
//! This module turns a Go source file into `FileFacts`: the package name,
//! the struct types declared at top level, their methods and the branching
//! constructs in each method body.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source Files    │────▶│ Analyzer     │────▶│ FileFacts     │
//! └─────────────────┘     │ (parse, then │     │ (types,       │
//!                         │  extract)    │     │  methods,     │
//!                         └──────────────┘     │  branches)    │
//!                                              └───────────────┘
//!                                                      │
//!                                                      ▼
//!                         ┌──────────────┐     ┌───────────────┐
//!                         │ Scaffold /   │◀────│AnalysisContext│
//!                         │ Report       │     │ (Cached Facts)│
//!                         └──────────────┘     └───────────────┘
//! ```
//!
//! Parsing is strict: a file with syntax errors produces
//! `AnalysisError::Parse` and no facts. Extraction itself never fails.

mod context;
mod error;
mod facts;
mod languages;
mod traits;

pub use context::{collect_go_files, AnalysisContext};
pub use error::{AnalysisError, Result};
pub use facts::{
    is_exported, Branch, BranchRole, ControlFlowKind, ControlFlowStatement, FileFacts, LoopKind,
    MethodFacts, TypeFacts, NO_PARAMETERS, NO_RESULTS,
};
pub use languages::{get_analyzer, register_analyzers, GoAnalyzer};
pub use traits::{LanguageAnalyzer, ParsedFile, INVALID_TEXT};

use std::path::Path;

/// Parse and analyze one in-memory buffer.
///
/// `path` is only used for error messages and `FileFacts::path`.
pub fn analyze_source(path: &Path, source: &[u8]) -> Result<FileFacts> {
    let analyzer = GoAnalyzer::new();
    let parsed = analyzer.parse(path, source)?;
    Ok(analyzer.extract_facts(&parsed))
}
