//! Integration tests for Go fact extraction.
//!
//! These tests run the analyzer over the testdata/inventory fixtures and
//! check types, signatures and branches end to end.

use std::fs;
use std::path::{Path, PathBuf};

use suitegen::analysis::{
    analyze_source, collect_go_files, AnalysisContext, AnalysisError, BranchRole,
    ControlFlowKind, FileFacts, LoopKind, NO_PARAMETERS, NO_RESULTS,
};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/inventory")
}

fn inventory() -> FileFacts {
    let ctx = AnalysisContext::new(fixture_dir());
    ctx.analyze_file("inventory.go").expect("fixture should parse")
}

fn branch_texts(facts: &FileFacts, ty: &str, method: &str) -> Vec<(BranchRole, String)> {
    facts
        .find_type(ty)
        .and_then(|t| t.find_method(method))
        .map(|m| {
            m.control_flow
                .iter()
                .flat_map(|s| s.branches.iter().map(|b| (b.role, b.text.clone())))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Types and signatures
// =============================================================================

#[test]
fn test_struct_types_in_declaration_order() {
    let facts = inventory();
    assert_eq!(facts.path, "inventory.go");
    assert_eq!(facts.package_name, "inventory");

    let names: Vec<_> = facts.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Item", "Store"]);
}

#[test]
fn test_methods_attach_to_their_receiver() {
    let facts = inventory();

    let store = facts.find_type("Store").unwrap();
    let methods: Vec<_> = store.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["Add", "Get", "Restock", "describe"]);
    assert!(store.methods.iter().all(|m| m.receiver == "Store"));

    let item = facts.find_type("Item").unwrap();
    let methods: Vec<_> = item.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["Level", "Tagged"]);

    // Kind is not a struct, NewStore is not a method.
    assert!(facts.methods().all(|m| m.name != "String" && m.name != "NewStore"));
}

#[test]
fn test_signatures() {
    let facts = inventory();
    let store = facts.find_type("Store").unwrap();

    let add = store.find_method("Add").unwrap();
    assert_eq!(add.params, "sku string, count int");
    assert_eq!(add.results, "error");
    assert_eq!(add.line, 34);
    assert!(add.is_exported);
    assert_eq!(add.test_name(), "TestAdd");

    let get = store.find_method("Get").unwrap();
    assert_eq!(get.results, "*Item, error");

    let restock = store.find_method("Restock").unwrap();
    assert_eq!(restock.params, "skus []string, n int");
    assert_eq!(restock.results, NO_RESULTS);

    let describe = store.find_method("describe").unwrap();
    assert!(!describe.is_exported);
    assert_eq!(describe.params, "v interface{}");
    assert_eq!(describe.test_name(), "Test_describe");

    let level = facts.find_type("Item").unwrap().find_method("Level").unwrap();
    assert_eq!(level.params, NO_PARAMETERS);
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn test_else_if_chain() {
    let facts = inventory();
    let add = facts.find_type("Store").unwrap().find_method("Add").unwrap();

    assert_eq!(add.control_flow.len(), 1);
    let chain = &add.control_flow[0];
    assert_eq!(chain.kind, ControlFlowKind::Conditional);
    assert_eq!(chain.line, 35);
    assert_eq!(chain.header, "if sku == \"\"");
    assert_eq!(
        branch_texts(&facts, "Store", "Add"),
        vec![
            (BranchRole::If, "sku == \"\"".to_string()),
            (BranchRole::ElseIf, "count <= 0".to_string()),
        ]
    );
}

#[test]
fn test_range_loop_conditional() {
    let facts = inventory();
    let restock = facts.find_type("Store").unwrap().find_method("Restock").unwrap();

    assert_eq!(restock.control_flow.len(), 1);
    let statement = &restock.control_flow[0];
    assert_eq!(
        statement.kind,
        ControlFlowKind::LoopConditional {
            loop_kind: LoopKind::Range
        }
    );
    assert_eq!(statement.line, 56);
    assert_eq!(statement.header, "if item, ok := s.items[sku]; ok");
    assert_eq!(statement.branches.len(), 1);
    assert_eq!(statement.branches[0].text, "ok");
}

#[test]
fn test_counting_loop_conditional() {
    let facts = inventory();
    let tagged = facts.find_type("Item").unwrap().find_method("Tagged").unwrap();

    assert_eq!(tagged.control_flow.len(), 1);
    assert_eq!(tagged.control_flow[0].kind.as_str(), "for-if");
    assert_eq!(tagged.control_flow[0].line, 85);
}

#[test]
fn test_type_switch() {
    let facts = inventory();
    let describe = facts.find_type("Store").unwrap().find_method("describe").unwrap();

    assert_eq!(describe.control_flow.len(), 1);
    let switch = &describe.control_flow[0];
    assert_eq!(switch.kind, ControlFlowKind::TypeSwitch);
    assert_eq!(switch.header, "switch t := v.(type)");
    assert_eq!(
        branch_texts(&facts, "Store", "describe"),
        vec![
            (BranchRole::Case, "*Item".to_string()),
            (BranchRole::Case, "string, fmt.Stringer".to_string()),
            (BranchRole::Default, "default".to_string()),
        ]
    );
}

#[test]
fn test_tagless_switch_without_default() {
    let facts = inventory();
    let level = facts.find_type("Item").unwrap().find_method("Level").unwrap();

    assert_eq!(level.control_flow.len(), 1);
    assert_eq!(level.control_flow[0].kind, ControlFlowKind::ValueSwitch);
    assert_eq!(level.control_flow[0].header, "switch");
    assert_eq!(
        branch_texts(&facts, "Item", "Level"),
        vec![
            (BranchRole::Case, "i.Count == 0".to_string()),
            (BranchRole::Case, "i.Count < 10".to_string()),
        ]
    );
}

#[test]
fn test_analysis_is_deterministic() {
    let source = fs::read(fixture_dir().join("inventory.go")).unwrap();
    let first = analyze_source(Path::new("inventory.go"), &source).unwrap();
    let second = analyze_source(Path::new("inventory.go"), &source).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// =============================================================================
// Directories
// =============================================================================

#[test]
fn test_directory_analysis() {
    let files = collect_go_files(&fixture_dir(), false).unwrap();
    assert_eq!(files.len(), 2);

    let ctx = AnalysisContext::new(fixture_dir());
    let facts = ctx.analyze_files_parallel(&files);
    let paths: Vec<_> = facts.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["inventory.go", "ledger.go"]);

    let ledger = facts[1].find_type("Ledger").unwrap();
    assert_eq!(ledger.find_method("Record").unwrap().params, "at time.Time, delta int");
    assert_eq!(ledger.find_method("Total").unwrap().results, "int");
    // A range loop without a conditional contributes nothing.
    assert!(ledger.find_method("Total").unwrap().control_flow.is_empty());

    let entry = facts[1].find_type("entry").unwrap();
    assert!(!entry.is_exported);
    assert!(entry.methods.is_empty());
}

#[test]
fn test_syntax_error_is_reported_with_position() {
    let source = b"package inventory\n\nfunc (s *Store) Add( {\n}\n";
    match analyze_source(Path::new("broken.go"), source) {
        Err(AnalysisError::Parse { path, line, .. }) => {
            assert_eq!(path, "broken.go");
            assert_eq!(line, 3);
        }
        other => panic!("expected parse error, got {:?}", other.map(|f| f.types.len())),
    }
}
