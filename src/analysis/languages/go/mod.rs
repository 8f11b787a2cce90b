//! Go language analyzer using tree-sitter.
//!
//! Extracts:
//! - The package name
//! - Struct type declarations (top level, declaration order)
//! - Methods bound to those structs, with rendered signatures
//! - Branching constructs in each method body

mod control_flow;
mod signature;

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::{
    is_exported, AnalysisError, FileFacts, LanguageAnalyzer, MethodFacts, ParsedFile, Result,
};

/// Tree-sitter query for package declaration.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Go language analyzer.
pub struct GoAnalyzer {
    language: Language,
}

impl GoAnalyzer {
    /// Create a new Go analyzer.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Create a new parser for this thread.
    fn create_parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Extract the package name from a parsed file.
    pub fn extract_package(&self, parsed: &ParsedFile) -> Option<String> {
        let query = Query::new(&self.language, PACKAGE_QUERY).ok()?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return Some(parsed.node_text(capture.node).to_string());
                }
            }
        }
        None
    }

    /// `(receiver type, method name)` for every top-level method whose
    /// receiver resolves, whether or not the receiver type is declared in
    /// this file.
    pub fn receiver_methods(&self, parsed: &ParsedFile) -> Vec<(String, String)> {
        let root = parsed.tree.root_node();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter(|decl| decl.kind() == "method_declaration")
            .filter_map(|decl| {
                let receiver = signature::receiver_type_name(parsed, decl)?;
                let name = parsed.node_text(decl.child_by_field_name("name")?);
                Some((receiver.to_string(), name.to_string()))
            })
            .collect()
    }

    /// Build the record for one method declaration.
    fn method_facts(&self, parsed: &ParsedFile, decl: Node, receiver: &str) -> MethodFacts {
        let name = decl
            .child_by_field_name("name")
            .map(|n| parsed.node_text(n))
            .unwrap_or_default()
            .to_string();

        let control_flow = decl
            .child_by_field_name("body")
            .map(|body| control_flow::extract(parsed, body))
            .unwrap_or_default();

        MethodFacts {
            is_exported: is_exported(&name),
            name,
            receiver: receiver.to_string(),
            line: parsed.line_of(decl),
            params: signature::render_parameters(parsed, decl.child_by_field_name("parameters")),
            results: signature::render_results(parsed, decl.child_by_field_name("result")),
            control_flow,
        }
    }
}

impl Default for GoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for GoAnalyzer {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile> {
        let display = path.to_string_lossy().to_string();
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::NoTree(display.clone()))?;

        let root = tree.root_node();
        if let Some(bad) = first_syntax_error(root) {
            let pos = bad.start_position();
            let message = if bad.is_missing() {
                format!("missing {}", bad.kind())
            } else {
                let snippet = std::str::from_utf8(&source[bad.start_byte()..bad.end_byte()])
                    .unwrap_or("")
                    .lines()
                    .next()
                    .unwrap_or("");
                format!("unexpected {:?}", snippet)
            };
            return Err(AnalysisError::Parse {
                path: display,
                line: pos.row + 1,
                column: pos.column + 1,
                message,
            });
        }

        let has_package = {
            let mut cursor = root.walk();
            let found = root
                .named_children(&mut cursor)
                .any(|n| n.kind() == "package_clause");
            found
        };
        if !has_package {
            return Err(AnalysisError::Parse {
                path: display,
                line: 1,
                column: 1,
                message: "expected 'package' clause".to_string(),
            });
        }

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: display,
        })
    }

    fn extract_facts(&self, parsed: &ParsedFile) -> FileFacts {
        let package_name = self.extract_package(parsed).unwrap_or_default();
        let mut types = signature::struct_types(parsed);

        let root = parsed.tree.root_node();
        let mut cursor = root.walk();
        for decl in root.named_children(&mut cursor) {
            if decl.kind() != "method_declaration" {
                continue;
            }

            let Some(receiver) = signature::receiver_type_name(parsed, decl) else {
                tracing::trace!(line = parsed.line_of(decl), "skipping method with unsupported receiver");
                continue;
            };
            let Some(owner) = types.iter_mut().find(|t| t.name == receiver) else {
                tracing::trace!(receiver, "skipping method of unknown type");
                continue;
            };

            owner.methods.push(self.method_facts(parsed, decl, receiver));
        }

        tracing::debug!(
            path = %parsed.path,
            package = %package_name,
            types = types.len(),
            "extracted facts"
        );

        FileFacts {
            path: parsed.path.clone(),
            package_name,
            types,
        }
    }
}

/// First ERROR or MISSING node in document order, if any.
fn first_syntax_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_syntax_error(child) {
            return Some(found);
        }
    }
    // has_error() without a flagged descendant; report the node itself.
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{BranchRole, ControlFlowKind, LoopKind, NO_PARAMETERS, NO_RESULTS};

    fn parse_go(source: &str) -> (GoAnalyzer, ParsedFile) {
        let analyzer = GoAnalyzer::new();
        let parsed = analyzer
            .parse(Path::new("test.go"), source.as_bytes())
            .unwrap();
        (analyzer, parsed)
    }

    fn facts(source: &str) -> FileFacts {
        let (analyzer, parsed) = parse_go(source);
        analyzer.extract_facts(&parsed)
    }

    #[test]
    fn test_extract_package() {
        let (analyzer, parsed) = parse_go("package main\n");
        let pkg = analyzer.extract_package(&parsed);
        assert_eq!(pkg, Some("main".to_string()));
    }

    #[test]
    fn test_receiver_methods_without_type_declaration() {
        let (analyzer, parsed) = parse_go(
            r#"
package store

func (suite *StoreTestSuite) TestPut() {}

func (s StoreTestSuite) helper() {}

func (o *Other[T]) Skip() {}

func TestStoreSuite(t *testing.T) {}
"#,
        );

        assert_eq!(
            analyzer.receiver_methods(&parsed),
            vec![
                ("StoreTestSuite".to_string(), "TestPut".to_string()),
                ("StoreTestSuite".to_string(), "helper".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_error_is_fatal() {
        let analyzer = GoAnalyzer::new();
        let err = analyzer
            .parse(Path::new("broken.go"), b"package main\n\nfunc (c *C) Run( {\n")
            .err()
            .expect("broken source should not parse");

        match err {
            AnalysisError::Parse { path, line, .. } => {
                assert_eq!(path, "broken.go");
                assert!(line >= 3, "error reported on line {}", line);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_package_clause_is_parse_error() {
        let analyzer = GoAnalyzer::new();
        let result = analyzer.parse(Path::new("empty.go"), b"");
        assert!(matches!(result, Err(AnalysisError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_scenario_single_if_else() {
        let facts = facts(
            r#"
package shapes

type Square struct {
    side int
}

func (s *Square) Check() {
    if s.side > 0 {
        println("ok")
    } else {
        println("bad")
    }
}
"#,
        );

        assert_eq!(facts.package_name, "shapes");
        let square = facts.find_type("Square").unwrap();
        assert!(square.is_exported);
        assert_eq!(square.methods.len(), 1);

        let check = &square.methods[0];
        assert_eq!(check.params, NO_PARAMETERS);
        assert_eq!(check.results, NO_RESULTS);
        assert_eq!(check.receiver, "Square");
        assert_eq!(check.line, 8);
        assert_eq!(check.control_flow.len(), 1);

        let stmt = &check.control_flow[0];
        assert_eq!(stmt.kind, ControlFlowKind::Conditional);
        let roles: Vec<_> = stmt.branches.iter().map(|b| b.role).collect();
        assert_eq!(roles, vec![BranchRole::If, BranchRole::Else]);
    }

    #[test]
    fn test_scenario_value_switch_two_cases() {
        let facts = facts(
            r#"
package main

type Light struct{ color string }

func (l Light) Next() string {
    switch l.color {
    case "red":
        return "green"
    case "green":
        return "red"
    }
    return ""
}
"#,
        );

        let next = facts.find_type("Light").unwrap().find_method("Next").unwrap();
        assert_eq!(next.results, "string");
        assert_eq!(next.control_flow.len(), 1);
        let stmt = &next.control_flow[0];
        assert_eq!(stmt.kind, ControlFlowKind::ValueSwitch);
        assert_eq!(stmt.branches.len(), 2);
        assert!(stmt.branches.iter().all(|b| b.role == BranchRole::Case));
    }

    #[test]
    fn test_scenario_counting_loop_if_not_double_counted() {
        let facts = facts(
            r#"
package main

type Counter struct{ n int }

func (c *Counter) Count(limit int) int {
    for i := 0; i < limit; i++ {
        if i > c.n {
            break
        }
    }
    return c.n
}
"#,
        );

        let count = &facts.types[0].methods[0];
        assert_eq!(count.params, "limit int");
        assert_eq!(count.control_flow.len(), 1);
        assert_eq!(
            count.control_flow[0].kind,
            ControlFlowKind::LoopConditional {
                loop_kind: LoopKind::For
            }
        );
    }

    #[test]
    fn test_scenario_unknown_receiver_is_dropped() {
        let facts = facts(
            r#"
package main

type Known struct{}

type Celsius float64

func (c Celsius) String() string { return "" }

func (o *Other) Run() {}

func helper() {}

func (k *Known) Ok() {}
"#,
        );

        assert_eq!(facts.types.len(), 1);
        let names: Vec<_> = facts.methods().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Ok"]);
    }

    #[test]
    fn test_methods_in_declaration_order_across_types() {
        let facts = facts(
            r#"
package main

type B struct{}
type A struct{}

func (a *A) zeta() {}
func (b B) Beta() {}
func (a A) Alpha() {}
func (a *A) mid() {}
"#,
        );

        let names: Vec<_> = facts.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        let a: Vec<_> = facts.find_type("A").unwrap().methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(a, vec!["zeta", "Alpha", "mid"]);
        assert!(!facts.find_type("A").unwrap().methods[0].is_exported);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let source = r#"
package main

type S struct{}

func (s *S) Do(x int, v interface{}) (int, error) {
    if x > 1 {
    } else if x > 0 {
    }
    switch y := v.(type) {
    case int:
        _ = y
    default:
    }
    for _, n := range []int{x} {
        if n == 0 {
        }
    }
    return x, nil
}
"#;
        let first = serde_json::to_string(&facts(source)).unwrap();
        let second = serde_json::to_string(&facts(source)).unwrap();
        assert_eq!(first, second);
    }
}
