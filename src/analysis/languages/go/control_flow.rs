//! Branch extraction from Go method bodies.
//!
//! Only the body's own statement list is scanned, plus the statement list of
//! each `for` loop found there. `if` chains, expression switches and type
//! switches become one `ControlFlowStatement` each; anything nested deeper is
//! left alone.

use std::collections::HashSet;

use tree_sitter::Node;

use crate::analysis::{
    Branch, BranchRole, ControlFlowKind, ControlFlowStatement, LoopKind, ParsedFile, INVALID_TEXT,
};

/// Extract the control-flow statements of one function body.
pub(super) fn extract(parsed: &ParsedFile, body: Node) -> Vec<ControlFlowStatement> {
    let mut extractor = Extractor::new(parsed);

    for stmt in block_statements(body) {
        match stmt.kind() {
            "if_statement" => extractor.conditional_chain(stmt, ControlFlowKind::Conditional),
            "expression_switch_statement" => {
                extractor.switch(stmt, ControlFlowKind::ValueSwitch)
            }
            "type_switch_statement" => extractor.switch(stmt, ControlFlowKind::TypeSwitch),
            "for_statement" => extractor.loop_body(stmt),
            _ => {}
        }
    }

    extractor.statements
}

struct Extractor<'a> {
    parsed: &'a ParsedFile,
    /// Ids of `if_statement` nodes already consumed into a chain.
    visited: HashSet<usize>,
    statements: Vec<ControlFlowStatement>,
}

impl<'a> Extractor<'a> {
    fn new(parsed: &'a ParsedFile) -> Self {
        Self {
            parsed,
            visited: HashSet::new(),
            statements: Vec::new(),
        }
    }

    /// Record an `if` and every `else if` / `else` hanging off it.
    fn conditional_chain(&mut self, stmt: Node, kind: ControlFlowKind) {
        if !self.visited.insert(stmt.id()) {
            return;
        }

        let mut branches = vec![Branch::new(BranchRole::If, self.condition(stmt))];

        let mut alternative = stmt.child_by_field_name("alternative");
        while let Some(alt) = alternative {
            if alt.kind() != "if_statement" {
                branches.push(Branch::otherwise());
                break;
            }
            if self.visited.insert(alt.id()) {
                branches.push(Branch::new(BranchRole::ElseIf, self.condition(alt)));
            }
            alternative = alt.child_by_field_name("alternative");
        }

        self.statements.push(ControlFlowStatement {
            kind,
            header: self.header(stmt, stmt.child_by_field_name("consequence")),
            line: self.parsed.line_of(stmt),
            branches,
        });
    }

    /// Record an expression or type switch with one branch per arm.
    fn switch(&mut self, stmt: Node, kind: ControlFlowKind) {
        let mut branches = Vec::new();

        let mut cursor = stmt.walk();
        for arm in stmt.named_children(&mut cursor) {
            match arm.kind() {
                "expression_case" | "type_case" => {
                    branches.push(Branch::new(BranchRole::Case, self.case_label(arm)));
                }
                "default_case" => branches.push(Branch::default_arm()),
                _ => {}
            }
        }

        self.statements.push(ControlFlowStatement {
            kind,
            header: self.header(stmt, opening_brace(stmt)),
            line: self.parsed.line_of(stmt),
            branches,
        });
    }

    /// Record the `if` statements that sit directly in a loop body.
    fn loop_body(&mut self, stmt: Node) {
        let Some(body) = stmt.child_by_field_name("body") else {
            return;
        };
        let kind = ControlFlowKind::LoopConditional {
            loop_kind: loop_kind(stmt),
        };

        for inner in block_statements(body) {
            if inner.kind() == "if_statement" {
                self.conditional_chain(inner, kind);
            }
        }
    }

    fn condition(&self, stmt: Node) -> String {
        stmt.child_by_field_name("condition")
            .map(|c| self.parsed.node_text(c))
            .unwrap_or(INVALID_TEXT)
            .to_string()
    }

    /// Statement text from its first byte up to the body's opening brace.
    fn header(&self, stmt: Node, body_open: Option<Node>) -> String {
        if let Some(open) = body_open {
            return self
                .parsed
                .span_text(stmt.start_byte(), open.start_byte())
                .to_string();
        }

        let full = self.parsed.node_text(stmt);
        match full.find('{') {
            Some(idx) if idx > 0 => full[..idx].trim().to_string(),
            _ => full.to_string(),
        }
    }

    /// Label expressions of a case arm, between `case` and `:`.
    fn case_label(&self, arm: Node) -> String {
        let mut cursor = arm.walk();
        let tokens: Vec<Node> = arm.children(&mut cursor).collect();
        let keyword = tokens.iter().find(|t| t.kind() == "case");
        let colon = tokens.iter().find(|t| t.kind() == ":");

        if let (Some(keyword), Some(colon)) = (keyword, colon) {
            return self
                .parsed
                .span_text(keyword.end_byte(), colon.start_byte())
                .to_string();
        }

        let text = self.parsed.node_text(arm);
        let head = text.split(':').next().unwrap_or(text).trim();
        head.strip_prefix("case").unwrap_or(head).trim().to_string()
    }
}

/// Statements directly inside a block, comments skipped.
///
/// Newer grammars wrap them in a `statement_list` node; older ones put them
/// straight under the block.
fn block_statements<'t>(block: Node<'t>) -> Vec<Node<'t>> {
    let mut statements = Vec::new();
    let mut cursor = block.walk();
    for child in block.named_children(&mut cursor) {
        match child.kind() {
            "comment" => {}
            "statement_list" => {
                let mut list_cursor = child.walk();
                statements.extend(
                    child
                        .named_children(&mut list_cursor)
                        .filter(|s| s.kind() != "comment"),
                );
            }
            _ => statements.push(child),
        }
    }
    statements
}

fn loop_kind(stmt: Node) -> LoopKind {
    let mut cursor = stmt.walk();
    let is_range = stmt
        .named_children(&mut cursor)
        .any(|c| c.kind() == "range_clause");
    if is_range {
        LoopKind::Range
    } else {
        LoopKind::For
    }
}

fn opening_brace(stmt: Node) -> Option<Node> {
    let mut cursor = stmt.walk();
    let brace = stmt.children(&mut cursor).find(|c| c.kind() == "{");
    brace
}
