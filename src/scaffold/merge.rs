//! Merging new test methods into an existing scaffold file.

use std::collections::BTreeSet;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::{render_test_method, selected_methods, suite_name, ScaffoldError};
use crate::analysis::{GoAnalyzer, LanguageAnalyzer, Result as AnalysisResult, TypeFacts};
use crate::config::Config;

lazy_static! {
    static ref ENTRY_POINT: Regex =
        Regex::new(r"(?m)^func\s+Test(\w+)Suite\s*\(\s*\w+\s+\*testing\.T\s*\)\s*\{").unwrap();
}

/// Result of reconciling a type against its existing scaffold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Every test method is already present.
    Unchanged,
    /// New test methods were inserted before the suite entry function.
    Updated {
        source: String,
        /// Names of the inserted test methods, in declaration order.
        added: Vec<String>,
    },
}

/// What an existing scaffold file already declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingScaffold {
    pub package_name: String,
    /// Methods on any receiver named `*TestSuite`.
    pub test_methods: BTreeSet<String>,
}

/// Read the package and suite methods of an existing scaffold.
///
/// The file is parsed with the same loader as production code, so a scaffold
/// with syntax errors fails with `AnalysisError::Parse`. The suite struct may
/// be declared in another file of the package.
pub fn read_existing(path: &Path, source: &str) -> AnalysisResult<ExistingScaffold> {
    let analyzer = GoAnalyzer::new();
    let parsed = analyzer.parse(path, source.as_bytes())?;

    let test_methods = analyzer
        .receiver_methods(&parsed)
        .into_iter()
        .filter(|(receiver, _)| receiver.ends_with("TestSuite"))
        .map(|(_, name)| name)
        .collect();

    Ok(ExistingScaffold {
        package_name: analyzer.extract_package(&parsed).unwrap_or_default(),
        test_methods,
    })
}

/// Names of the test methods already declared on `*TestSuite` types.
pub fn existing_test_methods(path: &Path, source: &str) -> AnalysisResult<BTreeSet<String>> {
    Ok(read_existing(path, source)?.test_methods)
}

/// Insert test methods for the methods of `ty` that have none yet.
///
/// The existing file must belong to `package`.
pub fn merge_into_existing(
    path: &Path,
    existing: &str,
    package: &str,
    ty: &TypeFacts,
    config: &Config,
) -> Result<MergeOutcome, ScaffoldError> {
    let scaffold = read_existing(path, existing)?;
    if scaffold.package_name != package {
        return Err(ScaffoldError::PackageMismatch {
            path: path.display().to_string(),
            expected: package.to_string(),
            found: scaffold.package_name,
        });
    }
    let present = scaffold.test_methods;
    let suite = suite_name(&ty.name);

    let missing: Vec<_> = selected_methods(ty, config)
        .filter(|m| !present.contains(&m.test_name()))
        .collect();
    if missing.is_empty() {
        return Ok(MergeOutcome::Unchanged);
    }

    let offset = ENTRY_POINT
        .captures_iter(existing)
        .find(|caps| &caps[1] == ty.name)
        .and_then(|caps| caps.get(0))
        .map(|m| m.start())
        .ok_or_else(|| ScaffoldError::MissingEntryPoint {
            type_name: ty.name.clone(),
        })?;

    let mut inserted = String::new();
    for method in &missing {
        inserted.push_str(&render_test_method(&suite, method, config));
        inserted.push('\n');
    }

    let mut source = String::with_capacity(existing.len() + inserted.len());
    source.push_str(&existing[..offset]);
    source.push_str(&inserted);
    source.push_str(&existing[offset..]);

    let added: Vec<String> = missing.iter().map(|m| m.test_name()).collect();
    tracing::debug!(path = %path.display(), suite = %suite, ?added, "merged test methods");

    Ok(MergeOutcome::Updated { source, added })
}
