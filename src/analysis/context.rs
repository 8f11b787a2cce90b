//! Analysis context for caching extracted facts.
//!
//! The AnalysisContext provides:
//! - Caching of extracted facts per file
//! - Sequential and parallel multi-file analysis
//! - Directory walking for Go sources

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use walkdir::WalkDir;

use crate::analysis::{get_analyzer, AnalysisError, FileFacts, Result};

/// Analysis context for a set of files.
///
/// Each file is parsed and analyzed independently; the only shared state is
/// the facts cache.
pub struct AnalysisContext {
    /// Base directory for relative path resolution.
    base_dir: PathBuf,
    /// Cached file facts, keyed by absolute path.
    facts_cache: RwLock<HashMap<PathBuf, FileFacts>>,
}

impl AnalysisContext {
    /// Create a new analysis context.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            facts_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Analyze a file and cache the results.
    ///
    /// Returns cached facts if already analyzed.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<FileFacts> {
        let abs_path = self.absolute(path.as_ref());

        {
            let cache = self.facts_cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(facts) = cache.get(&abs_path) {
                return Ok(facts.clone());
            }
        }

        let ext = abs_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let analyzer = get_analyzer(ext)
            .ok_or_else(|| AnalysisError::Unsupported(abs_path.display().to_string()))?;

        // Errors and facts both carry the path relative to the base directory.
        let rel_path = abs_path
            .strip_prefix(&self.base_dir)
            .unwrap_or(&abs_path)
            .to_path_buf();

        let source = fs::read(&abs_path)?;
        let parsed = analyzer.parse(&rel_path, &source)?;
        let facts = analyzer.extract_facts(&parsed);

        tracing::debug!(path = %facts.path, types = facts.types.len(), "analyzed file");

        {
            let mut cache = self.facts_cache.write().unwrap_or_else(PoisonError::into_inner);
            cache.insert(abs_path, facts.clone());
        }

        Ok(facts)
    }

    /// Analyze multiple files.
    ///
    /// Files that fail to parse are logged and skipped. Results are sorted by
    /// path for deterministic ordering.
    pub fn analyze_files(&self, paths: &[PathBuf]) -> Vec<FileFacts> {
        let results: Vec<_> = paths.iter().map(|p| self.analyze_file(p)).collect();
        collect_successes(results)
    }

    /// Analyze multiple files in parallel.
    ///
    /// Uses rayon; each file owns its own tree, so no state is shared besides
    /// the cache. Results are sorted by path.
    pub fn analyze_files_parallel(&self, paths: &[PathBuf]) -> Vec<FileFacts> {
        use rayon::prelude::*;

        let results: Vec<_> = paths.par_iter().map(|p| self.analyze_file(p)).collect();
        collect_successes(results)
    }
}

fn collect_successes(results: Vec<Result<FileFacts>>) -> Vec<FileFacts> {
    let mut all_facts = Vec::new();
    for result in results {
        match result {
            Ok(facts) => all_facts.push(facts),
            Err(e) => tracing::warn!("failed to analyze file: {}", e),
        }
    }

    all_facts.sort_by(|a, b| a.path.cmp(&b.path));
    all_facts
}

/// Collect Go source files under `root`, sorted.
///
/// Skips hidden directories, `vendor` and `testdata`. `_test.go` files are
/// skipped unless `include_test_files` is set.
pub fn collect_go_files(root: &Path, include_test_files: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if !e.file_type().is_dir() || e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !(name.starts_with('.') || name == "vendor" || name == "testdata")
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if !include_test_files && name.ends_with("_test.go") {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_go_file() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("shape.go");
        fs::write(
            &file_path,
            r#"
package geometry

type Circle struct {
    r float64
}

func (c *Circle) Area() float64 {
    return 3.14 * c.r * c.r
}
"#,
        )
        .unwrap();

        let ctx = AnalysisContext::new(temp.path());
        let facts = ctx.analyze_file(&file_path).unwrap();

        assert_eq!(facts.path, "shape.go");
        assert_eq!(facts.package_name, "geometry");
        assert_eq!(facts.types.len(), 1);
        assert_eq!(facts.types[0].methods[0].results, "float64");
    }

    #[test]
    fn test_caching() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("main.go");
        fs::write(&file_path, "package main\ntype T struct{}\n").unwrap();

        let ctx = AnalysisContext::new(temp.path());
        let facts1 = ctx.analyze_file(&file_path).unwrap();

        // Changing the file does not invalidate the cache.
        fs::write(&file_path, "package other\n").unwrap();
        let facts2 = ctx.analyze_file(&file_path).unwrap();
        assert_eq!(facts1, facts2);
        assert_eq!(ctx.analyze_file("main.go").unwrap(), facts1);

        let fresh = AnalysisContext::new(temp.path());
        assert_eq!(fresh.analyze_file(&file_path).unwrap().package_name, "other");
    }

    #[test]
    fn test_parse_error_reports_relative_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("bad.go");
        fs::write(&file_path, "package main\nfunc {\n").unwrap();

        let ctx = AnalysisContext::new(temp.path());
        match ctx.analyze_file(&file_path) {
            Err(AnalysisError::Parse { path, .. }) => assert_eq!(path, "bad.go"),
            other => panic!("expected parse error, got {:?}", other.map(|f| f.path)),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("notes.txt");
        fs::write(&file_path, "hello").unwrap();

        let ctx = AnalysisContext::new(temp.path());
        assert!(matches!(
            ctx.analyze_file(&file_path),
            Err(AnalysisError::Unsupported(_))
        ));
    }

    #[test]
    fn test_multi_file_skips_failures_and_sorts() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.go"), "package p\ntype B struct{}\n").unwrap();
        fs::write(temp.path().join("a.go"), "package p\ntype A struct{}\n").unwrap();
        fs::write(temp.path().join("c.go"), "package p\ntype {\n").unwrap();

        let paths = vec![
            temp.path().join("b.go"),
            temp.path().join("c.go"),
            temp.path().join("a.go"),
        ];

        let ctx = AnalysisContext::new(temp.path());
        let sequential: Vec<_> = ctx.analyze_files(&paths).into_iter().map(|f| f.path).collect();
        assert_eq!(sequential, vec!["a.go", "b.go"]);

        let ctx = AnalysisContext::new(temp.path());
        let parallel: Vec<_> = ctx
            .analyze_files_parallel(&paths)
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_collect_go_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("pkg")).unwrap();
        fs::create_dir_all(root.join("vendor/dep")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("testdata")).unwrap();
        for file in [
            "main.go",
            "main_test.go",
            "pkg/util.go",
            "vendor/dep/dep.go",
            ".git/x.go",
            "testdata/fixture.go",
            "README.md",
        ] {
            fs::write(root.join(file), "package main\n").unwrap();
        }

        let files = collect_go_files(root, false).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(rel, vec!["main.go", "pkg/util.go"]);

        let with_tests = collect_go_files(root, true).unwrap();
        assert_eq!(with_tests.len(), 3);
    }
}
