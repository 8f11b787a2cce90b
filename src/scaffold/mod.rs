//! Testify suite scaffolds.
//!
//! One scaffold file per struct type: a `<Type>TestSuite` with the testify
//! lifecycle hooks, one test method per method of the type, and the
//! `Test<Type>Suite` entry function that `go test` runs. With sub-tests
//! enabled each extracted branch gets its own `suite.Run` block.

mod merge;

pub use merge::{existing_test_methods, merge_into_existing, MergeOutcome};

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::analysis::{AnalysisError, BranchRole, ControlFlowStatement, MethodFacts, TypeFacts};
use crate::config::Config;

/// Import path of the testify suite package.
pub const SUITE_IMPORT: &str = "github.com/stretchr/testify/suite";

/// Errors raised while rendering or merging scaffolds.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("suite entry function func Test{type_name}Suite(t *testing.T) not found")]
    MissingEntryPoint { type_name: String },
    #[error("{path} belongs to package {found}, not {expected}")]
    PackageMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Name of the suite struct for a type.
pub fn suite_name(type_name: &str) -> String {
    format!("{}TestSuite", type_name)
}

/// Name of the `go test` entry function for a type.
pub fn entry_point_name(type_name: &str) -> String {
    format!("Test{}Suite", type_name)
}

/// File name of the scaffold for a type: `Config` -> `config_test.go`.
pub fn output_file_name(type_name: &str) -> String {
    format!("{}_test.go", type_name.to_lowercase())
}

/// Whether a scaffold should be produced for `ty` at all.
pub fn should_scaffold(ty: &TypeFacts, config: &Config) -> bool {
    if config.is_type_excluded(&ty.name) {
        return false;
    }
    !(config.skip_types_without_methods && selected_methods(ty, config).next().is_none())
}

/// Methods that get a test method, in declaration order.
pub fn selected_methods<'a>(
    ty: &'a TypeFacts,
    config: &'a Config,
) -> impl Iterator<Item = &'a MethodFacts> + 'a {
    ty.methods
        .iter()
        .filter(move |m| m.is_exported || config.include_unexported)
}

/// What writing the scaffold for one type at `target` amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldPlan {
    /// No file exists yet; write this text.
    Create(String),
    /// The file exists and gains the listed test methods.
    Merge { source: String, added: Vec<String> },
    /// The file exists and already covers every method.
    Unchanged,
}

/// Decide how the scaffold for `ty` lands at `target`, reading any existing file.
pub fn plan_scaffold(
    package: &str,
    ty: &TypeFacts,
    target: &Path,
    config: &Config,
) -> Result<ScaffoldPlan, ScaffoldError> {
    if !target.exists() {
        return Ok(ScaffoldPlan::Create(render_suite(package, ty, config)));
    }

    let existing = fs::read_to_string(target)?;
    Ok(match merge_into_existing(target, &existing, package, ty, config)? {
        MergeOutcome::Unchanged => ScaffoldPlan::Unchanged,
        MergeOutcome::Updated { source, added } => ScaffoldPlan::Merge { source, added },
    })
}

/// Render a complete scaffold file for one type.
pub fn render_suite(package: &str, ty: &TypeFacts, config: &Config) -> String {
    let suite = suite_name(&ty.name);
    let mut out = String::new();

    out.push_str(&format!("package {}\n\n", package));
    out.push_str(&format!("import (\n\t\"testing\"\n\n\t\"{}\"\n)\n\n", SUITE_IMPORT));
    out.push_str(&format!("type {} struct {{\n\tsuite.Suite\n}}\n", suite));

    for (hook, args, comment) in LIFECYCLE_HOOKS {
        out.push('\n');
        out.push_str(&format!("// {} {}\n", hook, comment));
        out.push_str(&format!("func (suite *{}) {}({}) {{\n}}\n", suite, hook, args));
    }

    for method in selected_methods(ty, config) {
        out.push('\n');
        out.push_str(&render_test_method(&suite, method, config));
    }

    out.push('\n');
    out.push_str(&render_entry_point(&ty.name));
    out
}

/// Render one test method, terminated by a newline.
pub fn render_test_method(suite: &str, method: &MethodFacts, config: &Config) -> String {
    let mut out = format!("func (suite *{}) {}() {{\n", suite, method.test_name());
    if method.is_exported {
        out.push_str(&format!("\t// TODO: implement test cases for {}\n", method.name));
    } else {
        out.push_str(&format!(
            "\t// TODO: implement test cases for unexported method {}\n",
            method.name
        ));
    }
    out.push_str(&format!("\t// params: {}\n", method.params));
    out.push_str(&format!("\t// results: {}\n", method.results));
    out.push_str(&format!(
        "\tsuite.T().Logf({})\n",
        go_quote(&format!("testing {}", method.name))
    ));

    if config.sub_tests {
        for statement in &method.control_flow {
            for label in sub_test_labels(statement) {
                out.push('\n');
                out.push_str(&format!("\tsuite.Run({}, func() {{\n", go_quote(&label)));
                out.push_str("\t\t// TODO: cover this branch\n");
                out.push_str("\t})\n");
            }
        }
    }

    out.push_str("}\n");
    out
}

fn render_entry_point(type_name: &str) -> String {
    format!(
        "func {}(t *testing.T) {{\n\tsuite.Run(t, new({}))\n}}\n",
        entry_point_name(type_name),
        suite_name(type_name)
    )
}

/// Sub-test names for every branch of a statement: `"<kind> L<line>: <role> <text>"`.
///
/// `else` and `default` arms carry their role as text; it is not repeated.
pub fn sub_test_labels(statement: &ControlFlowStatement) -> Vec<String> {
    statement
        .branches
        .iter()
        .map(|branch| {
            let arm = match branch.role {
                BranchRole::Else | BranchRole::Default if branch.text == branch.role.as_str() => {
                    branch.role.as_str().to_string()
                }
                _ => format!("{} {}", branch.role, branch.text),
            };
            format!("{} L{}: {}", statement.kind, statement.line, arm)
        })
        .collect()
}

/// Quote `s` as an interpreted Go string literal.
pub fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// testify hooks: name, parameter list, doc comment.
const LIFECYCLE_HOOKS: [(&str, &str, &str); 8] = [
    ("SetupSuite", "", "runs once before the first test in the suite."),
    ("SetupTest", "", "runs before each test."),
    ("TearDownTest", "", "runs after each test."),
    ("TearDownSuite", "", "runs once after the last test in the suite."),
    ("SetupSubTest", "", "runs before each suite.Run sub-test."),
    ("TearDownSubTest", "", "runs after each suite.Run sub-test."),
    (
        "BeforeTest",
        "suiteName, testName string",
        "runs right before each test method.",
    ),
    (
        "AfterTest",
        "suiteName, testName string",
        "runs right after each test method.",
    ),
];
