//! Output formatting for `suitegen inspect`.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the extracted facts, for programmatic consumption

use colored::*;

use crate::analysis::{ControlFlowStatement, FileFacts, MethodFacts, TypeFacts};

/// Output format of the inspect command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            other => Err(format!(
                "invalid format {:?}, must be 'pretty' or 'json'",
                other
            )),
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Render facts as JSON.
///
/// A single file renders as one object; several files render as an array
/// sorted by path.
pub fn render_json(files: &[FileFacts]) -> anyhow::Result<String> {
    let json = match files {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(many)?,
    };
    Ok(json)
}

/// Write facts in JSON format to stdout.
pub fn write_json(files: &[FileFacts]) -> anyhow::Result<()> {
    println!("{}", render_json(files)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write facts in pretty (human-readable) format to stdout.
pub fn write_pretty(path: &str, files: &[FileFacts]) {
    print!("{}", render_pretty(path, files));
}

/// Render facts in pretty format.
pub fn render_pretty(path: &str, files: &[FileFacts]) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!(
        "  {} v{}\n",
        "suitegen".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    ));
    out.push('\n');
    out.push_str(&format!("  {}{}\n", "Inspecting: ".dimmed(), path));
    out.push('\n');

    for file in files {
        write_file(&mut out, file);
    }

    let types: usize = files.iter().map(|f| f.types.len()).sum();
    let methods: usize = files.iter().map(|f| f.methods().count()).sum();
    let branches: usize = files
        .iter()
        .flat_map(|f| f.methods())
        .map(MethodFacts::branch_count)
        .sum();
    let totals = format!(
        "{} file{}, {} type{}, {} method{}, {} branch{}",
        files.len(),
        plural(files.len(), "s"),
        types,
        plural(types, "s"),
        methods,
        plural(methods, "s"),
        branches,
        plural(branches, "es"),
    );
    out.push_str(&format!("  {}\n", totals.dimmed()));
    out
}

fn write_file(out: &mut String, file: &FileFacts) {
    out.push_str(&format!(
        "  {}  {}\n",
        file.path.blue(),
        format!("package {}", file.package_name).dimmed()
    ));

    if file.types.is_empty() {
        out.push_str(&format!("    {}\n", "(no struct types)".dimmed()));
    }
    for ty in &file.types {
        write_type(out, ty);
    }
    out.push('\n');
}

fn write_type(out: &mut String, ty: &TypeFacts) {
    let name = if ty.is_exported {
        ty.name.bold()
    } else {
        ty.name.normal()
    };
    out.push_str(&format!(
        "    {} {}\n",
        name,
        format!("({} method{})", ty.methods.len(), plural(ty.methods.len(), "s")).dimmed()
    ));

    for method in &ty.methods {
        out.push_str(&format!(
            "      {}{}\n",
            method.name.green(),
            format!(":{}", method.line).dimmed()
        ));
        out.push_str(&format!("        {} {}\n", "params: ".dimmed(), method.params));
        out.push_str(&format!("        {} {}\n", "results:".dimmed(), method.results));
        for statement in &method.control_flow {
            write_statement(out, statement);
        }
    }
}

fn write_statement(out: &mut String, statement: &ControlFlowStatement) {
    out.push_str(&format!(
        "        {:<12}{} {}\n",
        statement.kind.as_str().yellow(),
        format!("L{}", statement.line).dimmed(),
        statement.header
    ));
    for branch in &statement.branches {
        out.push_str(&format!(
            "          {:<8} {}\n",
            branch.role.as_str().cyan(),
            branch.text
        ));
    }
}

fn plural(count: usize, suffix: &'static str) -> &'static str {
    if count == 1 {
        ""
    } else {
        suffix
    }
}
