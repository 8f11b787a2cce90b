//! Configuration file schema for suitegen.
//!
//! Every field is optional; a missing file means all defaults.

use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names searched for in the current directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["suitegen.yaml", ".suitegen.yaml"];

/// Commented default configuration written by `suitegen init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("templates/suitegen.yaml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Directory scaffold files are written to (default: next to the input).
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Generate `Test_<name>` methods for unexported methods (default: true)
    #[serde(default = "default_true")]
    pub include_unexported: bool,
    /// Skip struct types that have no methods (default: false)
    #[serde(default)]
    pub skip_types_without_methods: bool,
    /// Emit one `suite.Run` sub-test per extracted branch (default: true)
    #[serde(default = "default_true")]
    pub sub_tests: bool,
    /// Analyze `_test.go` files when given a directory (default: false)
    #[serde(default)]
    pub include_test_files: bool,
    /// Glob patterns for type names that never get a scaffold (e.g. "*Mock")
    #[serde(default)]
    pub excluded_types: Vec<String>,
    /// `excluded_types` compiled on first use.
    #[serde(skip)]
    excluded_set: OnceCell<GlobSet>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            include_unexported: true,
            skip_types_without_methods: false,
            sub_tests: true,
            include_test_files: false,
            excluded_types: Vec::new(),
            excluded_set: OnceCell::new(),
        }
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.output_dir == other.output_dir
            && self.include_unexported == other.include_unexported
            && self.skip_types_without_methods == other.skip_types_without_methods
            && self.sub_tests == other.sub_tests
            && self.include_test_files == other.include_test_files
            && self.excluded_types == other.excluded_types
    }
}

impl Eq for Config {}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a configuration from YAML text. Empty text gives the defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load the explicit config file, or the first default-named file found
    /// in `dir`, or the defaults. Returns the path that was read, if any.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = Self::parse_file(path)?;
            validate(&config)?;
            return Ok((config, Some(path.to_path_buf())));
        }

        for name in DEFAULT_CONFIG_NAMES {
            let path = dir.join(name);
            if path.exists() {
                let config = Self::parse_file(&path)?;
                validate(&config)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Check if a type is excluded by `excluded_types`.
    ///
    /// Patterns are compiled into one `GlobSet` on the first call; invalid
    /// patterns (rejected by `validate`) never match.
    pub fn is_type_excluded(&self, type_name: &str) -> bool {
        if self.excluded_types.is_empty() {
            return false;
        }
        self.excluded_set
            .get_or_init(|| {
                let mut builder = GlobSetBuilder::new();
                for pattern in &self.excluded_types {
                    if let Ok(glob) = Glob::new(pattern) {
                        builder.add(glob);
                    }
                }
                builder.build().unwrap_or_else(|_| GlobSet::empty())
            })
            .is_match(type_name)
    }
}

fn default_true() -> bool {
    true
}

/// Validate a configuration for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    for pattern in &config.excluded_types {
        Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_types pattern {:?}: {}", pattern, e))?;
    }

    if let Some(dir) = &config.output_dir {
        if dir.trim().is_empty() {
            anyhow::bail!("output_dir must not be empty");
        }
    }

    Ok(())
}
