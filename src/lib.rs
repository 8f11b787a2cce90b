//! suitegen - testify suite scaffolds for Go struct types.
//!
//! suitegen parses Go source files, finds the struct types declared at top
//! level and the methods bound to them, and extracts the branching
//! constructs of each method body. From those facts it writes one testify
//! suite per type, with a test method per method and a sub-test per branch,
//! and merges newly added methods into suites that already exist.
//!
//! # Architecture
//!
//! The codebase uses tree-sitter for AST-based analysis:
//!
//! - `analysis`: parsing and fact extraction (types, signatures, branches)
//! - `scaffold`: suite rendering and merging into existing files
//! - `config`: YAML configuration schema
//! - `report`: `inspect` output (pretty, JSON)
//! - `cli`: subcommands and exit codes
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let source = std::fs::read("server.go").unwrap();
//! let facts = suitegen::analyze_source(Path::new("server.go"), &source).unwrap();
//! for ty in &facts.types {
//!     let text = suitegen::scaffold::render_suite(&facts.package_name, ty, &Default::default());
//!     println!("{}", text);
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod report;
pub mod scaffold;

pub use analysis::{
    analyze_source, register_analyzers, AnalysisContext, AnalysisError, FileFacts, GoAnalyzer,
    LanguageAnalyzer, MethodFacts, TypeFacts,
};
pub use config::Config;
pub use scaffold::{merge_into_existing, render_suite, MergeOutcome, ScaffoldError};
