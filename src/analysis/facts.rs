//! Fact structures extracted from AST analysis.
//!
//! These are the only types handed to the scaffold renderer and the report
//! writers. They are plain data: built once per file, never updated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel rendered for an empty parameter list.
pub const NO_PARAMETERS: &str = "no parameters";

/// Sentinel rendered for an empty result list.
pub const NO_RESULTS: &str = "no results";

/// Whether an identifier is exported (first character is uppercase).
pub fn is_exported(name: &str) -> bool {
    name.chars().next().map(char::is_uppercase).unwrap_or(false)
}

/// The loop construct a loop-guarded conditional was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// `for init; cond; post {}`, `for cond {}` or `for {}`.
    For,
    /// `for k, v := range x {}`.
    Range,
}

/// Kind of branching construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlFlowKind {
    /// An `if` with its `else if` / `else` continuations.
    Conditional,
    /// A conditional chain found directly inside a loop body.
    LoopConditional { loop_kind: LoopKind },
    /// `switch x { case ... }`.
    ValueSwitch,
    /// `switch v := x.(type) { case ... }`.
    TypeSwitch,
}

impl ControlFlowKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlFlowKind::Conditional => "if",
            ControlFlowKind::LoopConditional {
                loop_kind: LoopKind::For,
            } => "for-if",
            ControlFlowKind::LoopConditional {
                loop_kind: LoopKind::Range,
            } => "range-if",
            ControlFlowKind::ValueSwitch => "switch",
            ControlFlowKind::TypeSwitch => "type-switch",
        }
    }
}

impl fmt::Display for ControlFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ControlFlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "if" => Ok(ControlFlowKind::Conditional),
            "for-if" => Ok(ControlFlowKind::LoopConditional {
                loop_kind: LoopKind::For,
            }),
            "range-if" => Ok(ControlFlowKind::LoopConditional {
                loop_kind: LoopKind::Range,
            }),
            "switch" => Ok(ControlFlowKind::ValueSwitch),
            "type-switch" => Ok(ControlFlowKind::TypeSwitch),
            other => Err(format!("unknown control flow kind {:?}", other)),
        }
    }
}

impl Serialize for ControlFlowKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ControlFlowKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Role of a branch within its statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchRole {
    #[serde(rename = "if")]
    If,
    #[serde(rename = "else if")]
    ElseIf,
    #[serde(rename = "else")]
    Else,
    #[serde(rename = "case")]
    Case,
    #[serde(rename = "default")]
    Default,
}

impl BranchRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchRole::If => "if",
            BranchRole::ElseIf => "else if",
            BranchRole::Else => "else",
            BranchRole::Case => "case",
            BranchRole::Default => "default",
        }
    }
}

impl fmt::Display for BranchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One arm of a control-flow statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub role: BranchRole,
    /// Condition, case label, or the literal `else` / `default`.
    pub text: String,
}

impl Branch {
    pub fn new(role: BranchRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// Catch-all `else` arm.
    pub fn otherwise() -> Self {
        Self::new(BranchRole::Else, "else")
    }

    /// Catch-all `default` arm.
    pub fn default_arm() -> Self {
        Self::new(BranchRole::Default, "default")
    }
}

/// One branching construct and its arms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlowStatement {
    pub kind: ControlFlowKind,
    /// Statement text up to, not including, the opening `{` of its body.
    pub header: String,
    /// Start line (1-indexed).
    pub line: usize,
    pub branches: Vec<Branch>,
}

/// A method bound to one of the file's struct types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodFacts {
    pub name: String,
    pub is_exported: bool,
    /// Receiver base type name (pointer stripped).
    pub receiver: String,
    /// Declaration line (1-indexed).
    pub line: usize,
    /// Rendered parameters, or `NO_PARAMETERS`.
    pub params: String,
    /// Rendered results, or `NO_RESULTS`.
    pub results: String,
    pub control_flow: Vec<ControlFlowStatement>,
}

impl MethodFacts {
    /// Name of the scaffold test method for this method.
    ///
    /// `Validate` -> `TestValidate`, `reset` -> `Test_reset`.
    pub fn test_name(&self) -> String {
        if self.is_exported {
            format!("Test{}", self.name)
        } else {
            format!("Test_{}", self.name)
        }
    }

    /// Total number of branches across all statements.
    pub fn branch_count(&self) -> usize {
        self.control_flow.iter().map(|s| s.branches.len()).sum()
    }
}

/// A struct type and its methods, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeFacts {
    pub name: String,
    pub is_exported: bool,
    pub methods: Vec<MethodFacts>,
}

impl TypeFacts {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_exported: is_exported(name),
            methods: Vec::new(),
        }
    }

    /// Find a method by name.
    pub fn find_method(&self, name: &str) -> Option<&MethodFacts> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// All facts extracted from a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacts {
    /// Display path.
    pub path: String,
    pub package_name: String,
    pub types: Vec<TypeFacts>,
}

impl FileFacts {
    /// Find a type by name.
    pub fn find_type(&self, name: &str) -> Option<&TypeFacts> {
        self.types.iter().find(|t| t.name == name)
    }

    /// All methods across all types.
    pub fn methods(&self) -> impl Iterator<Item = &MethodFacts> {
        self.types.iter().flat_map(|t| t.methods.iter())
    }
}
