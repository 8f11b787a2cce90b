//! Struct discovery, receiver resolution and signature rendering.

use tree_sitter::Node;

use crate::analysis::{ParsedFile, TypeFacts, NO_PARAMETERS, NO_RESULTS};

/// Rendered for any type shape without a dedicated rendering.
pub(super) const PLACEHOLDER_TYPE: &str = "interface{}";

/// Struct types declared at the top level of the file, in declaration order.
///
/// Both `type T struct{}` and grouped `type ( ... )` specs are collected, as
/// are aliases whose right-hand side is a struct literal type.
pub(super) fn struct_types(parsed: &ParsedFile) -> Vec<TypeFacts> {
    let root = parsed.tree.root_node();
    let mut types = Vec::new();

    let mut cursor = root.walk();
    for decl in root.named_children(&mut cursor) {
        if decl.kind() != "type_declaration" {
            continue;
        }

        let mut spec_cursor = decl.walk();
        for spec in decl.named_children(&mut spec_cursor) {
            if !matches!(spec.kind(), "type_spec" | "type_alias") {
                continue;
            }
            let is_struct = spec
                .child_by_field_name("type")
                .map(|t| t.kind() == "struct_type")
                .unwrap_or(false);
            if !is_struct {
                continue;
            }
            if let Some(name) = spec.child_by_field_name("name") {
                types.push(TypeFacts::new(parsed.node_text(name)));
            }
        }
    }

    types
}

/// Base type name of a method's receiver.
///
/// Unwraps at most one pointer: `(c *Config)` and `(c Config)` both give
/// `Config`. Returns None for any other shape (generic receivers, `**T`,
/// parenthesized types) and for receiver lists without exactly one entry.
pub(super) fn receiver_type_name<'a>(parsed: &'a ParsedFile, method: Node<'a>) -> Option<&'a str> {
    let receiver = method.child_by_field_name("receiver")?;
    let params = parameter_declarations(receiver);
    let [param] = params.as_slice() else {
        return None;
    };

    let mut ty = param.child_by_field_name("type")?;
    if ty.kind() == "pointer_type" {
        ty = ty.named_child(0)?;
    }

    if ty.kind() == "type_identifier" {
        Some(parsed.node_text(ty))
    } else {
        None
    }
}

/// Render a parameter list as `name type, ...`.
///
/// Grouped names (`a, b int`) render one entry per name; unnamed parameters
/// render their type alone.
pub(super) fn render_parameters(parsed: &ParsedFile, list: Option<Node>) -> String {
    let mut rendered = Vec::new();

    if let Some(list) = list {
        for param in parameter_declarations(list) {
            let ty = parameter_type(parsed, param);

            let mut name_cursor = param.walk();
            let names: Vec<&str> = param
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| parsed.node_text(n))
                .collect();

            if names.is_empty() {
                rendered.push(ty);
            } else {
                rendered.extend(names.into_iter().map(|name| format!("{} {}", name, ty)));
            }
        }
    }

    join_or(rendered, NO_PARAMETERS)
}

/// Render a result list as `type, ...`.
///
/// The `result` field is either a bare type (`error`) or a parenthesized
/// list. Result names are dropped; each declaration contributes its type once.
pub(super) fn render_results(parsed: &ParsedFile, result: Option<Node>) -> String {
    let rendered = match result {
        None => Vec::new(),
        Some(list) if list.kind() == "parameter_list" => parameter_declarations(list)
            .into_iter()
            .map(|param| parameter_type(parsed, param))
            .collect(),
        Some(ty) => vec![render_type(parsed, Some(ty))],
    };

    join_or(rendered, NO_RESULTS)
}

/// Render a type expression.
///
/// Only names, `*T`, `[]T` / `[N]T` and `pkg.T` are rendered faithfully;
/// everything else becomes `interface{}`.
pub(super) fn render_type(parsed: &ParsedFile, node: Option<Node>) -> String {
    let Some(node) = node else {
        return PLACEHOLDER_TYPE.to_string();
    };

    match node.kind() {
        "type_identifier" | "identifier" | "package_identifier" => {
            parsed.node_text(node).to_string()
        }
        "pointer_type" => format!("*{}", render_type(parsed, node.named_child(0))),
        "slice_type" | "array_type" => {
            format!("[]{}", render_type(parsed, node.child_by_field_name("element")))
        }
        "qualified_type" => {
            let package = render_type(parsed, node.child_by_field_name("package"));
            match node.child_by_field_name("name") {
                Some(name) => format!("{}.{}", package, parsed.node_text(name)),
                None => PLACEHOLDER_TYPE.to_string(),
            }
        }
        _ => PLACEHOLDER_TYPE.to_string(),
    }
}

/// Type of one parameter declaration. Variadic `...T` has no dedicated
/// rendering and falls back to the placeholder.
fn parameter_type(parsed: &ParsedFile, param: Node) -> String {
    if param.kind() == "variadic_parameter_declaration" {
        return PLACEHOLDER_TYPE.to_string();
    }
    render_type(parsed, param.child_by_field_name("type"))
}

fn parameter_declarations<'t>(list: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|n| {
            matches!(
                n.kind(),
                "parameter_declaration" | "variadic_parameter_declaration"
            )
        })
        .collect()
}

fn join_or(parts: Vec<String>, empty: &str) -> String {
    if parts.is_empty() {
        empty.to_string()
    } else {
        parts.join(", ")
    }
}
