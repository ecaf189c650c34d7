//! Recovers constructor member-initializer lists from the native AST.

use std::collections::HashMap;

use ir::{
    ClangKind, ClangNode, Constructor, ConstructorInitializer, ConstructorInitializerKind, Node,
    NodeRef, ParseResult, SimpleType, TagUsed,
};
use serde::Serialize;
use tracing::debug;

use super::FlattenNode;

/// One user-written constructor of a native record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorRecord {
    pub name: String,
    /// clang's function type, e.g. `void (int)`.
    pub signature: String,
    pub parameter_list: Vec<ConstructorInitializer>,
    pub initializer_list: Vec<ConstructorInitializer>,
}

/// Constructors of one record, keyed by its qualified name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructConstructors {
    pub name: String,
    pub constructors: Vec<ConstructorRecord>,
}

/// Collects constructor records of every struct/class defined in the file.
/// Nested records are reported under `Outer::Inner`.
pub fn parse_struct_constructors(nodes: &[FlattenNode<'_>]) -> Vec<StructConstructors> {
    let mut out = Vec::new();
    for flat in nodes {
        collect_records(flat.node, &flat.ns, &mut out);
    }
    out
}

fn collect_records(node: &ClangNode, scope: &str, out: &mut Vec<StructConstructors>) {
    let is_record = node.is_record(TagUsed::Struct) || node.is_record(TagUsed::Class);
    if !is_record || node.is_implicit {
        return;
    }
    let name = if scope.is_empty() {
        node.name().to_string()
    } else {
        format!("{scope}::{}", node.name())
    };
    // forward declaration
    let Some(inner) = node.inner.as_deref() else {
        return;
    };

    let constructors = inner
        .iter()
        .filter(|n| n.kind == ClangKind::CxxConstructorDecl && !n.is_implicit)
        .filter_map(parse_constructor)
        .collect();
    for nested in inner {
        collect_records(nested, &name, out);
    }
    out.push(StructConstructors { name, constructors });
}

/// `None` for constructors without a body (`= default`, declared only).
fn parse_constructor(decl: &ClangNode) -> Option<ConstructorRecord> {
    let inner = decl.inner.as_deref()?;
    let parameter_list = inner
        .iter()
        .filter(|n| n.kind == ClangKind::ParmVarDecl)
        .map(|p| ConstructorInitializer {
            kind: ConstructorInitializerKind::Parameter,
            name: p.name().to_string(),
            ty: p.qual_type().unwrap_or_default().to_string(),
            values: vec![p.name().to_string()],
        })
        .collect();
    let initializer_list = inner
        .iter()
        .filter(|n| n.kind == ClangKind::CxxCtorInitializer)
        .map(parse_initializer)
        .collect();
    Some(ConstructorRecord {
        name: decl.name().to_string(),
        signature: decl.qual_type().unwrap_or_default().to_string(),
        parameter_list,
        initializer_list,
    })
}

fn parse_initializer(init: &ClangNode) -> ConstructorInitializer {
    let (mut kind, values) = parse_inner_values(init.inner());
    if init.inner().first().is_some_and(is_explicit_construction) {
        kind = ConstructorInitializerKind::Construct;
    }
    let member = init.any_init.clone().unwrap_or_default();
    ConstructorInitializer {
        kind,
        name: member.name,
        ty: member.ty.qual_type,
        values,
    }
}

fn is_explicit_construction(node: &ClangNode) -> bool {
    matches!(
        node.kind,
        ClangKind::CxxConstructExpr | ClangKind::CxxTemporaryObjectExpr
    ) && !node.is_implicit
}

/// Interprets an initializer expression list into a kind and its values.
///
/// Literals, implicit casts, `NULL`, `nullptr`, references to enum constants
/// and parameters, unary operators and explicit constructions are
/// understood. Anything else contributes no value.
pub fn parse_inner_values(inner: &[ClangNode]) -> (ConstructorInitializerKind, Vec<String>) {
    inner_values(inner, 0)
}

/// Expressions nested deeper than this contribute nothing.
const MAX_EXPR_DEPTH: usize = 256;

fn inner_values(inner: &[ClangNode], depth: usize) -> (ConstructorInitializerKind, Vec<String>) {
    let mut kind = ConstructorInitializerKind::Value;
    let mut values = Vec::new();
    if depth > MAX_EXPR_DEPTH {
        debug!(depth, "Initializer expression too deep, skipped");
        return (kind, values);
    }
    for node in inner {
        match node.kind {
            ClangKind::CxxBoolLiteralExpr | ClangKind::IntegerLiteral | ClangKind::FloatingLiteral => {
                if let Some(v) = node.value_text() {
                    values.push(v);
                }
            }
            ClangKind::ImplicitCastExpr => {
                let (k, vs) = inner_values(node.inner(), depth + 1);
                kind = k;
                values.extend(vs);
            }
            ClangKind::GnuNullExpr => values.push("NULL".to_string()),
            ClangKind::CxxNullPtrLiteralExpr => values.push("std::nullptr_t".to_string()),
            ClangKind::DeclRefExpr => {
                let Some(decl) = &node.referenced_decl else {
                    continue;
                };
                match decl.kind {
                    ClangKind::EnumConstantDecl => {
                        kind = ConstructorInitializerKind::Value;
                        values.push(format!("{}::{}", decl.ty.qual_type, decl.name));
                    }
                    ClangKind::ParmVarDecl => {
                        kind = ConstructorInitializerKind::Parameter;
                        values.push(decl.name.clone());
                    }
                    _ => {
                        kind = ConstructorInitializerKind::Value;
                        values.push(decl.name.clone());
                    }
                }
            }
            ClangKind::UnaryOperator => {
                let (_, vs) = inner_values(node.inner(), depth + 1);
                if let Some(first) = vs.first() {
                    values.push(format!("{}{first}", node.opcode.as_deref().unwrap_or_default()));
                }
            }
            ClangKind::CxxConstructExpr | ClangKind::CxxTemporaryObjectExpr => {
                if !node.is_implicit && node.inner.is_some() {
                    let (_, vs) = inner_values(node.inner(), depth + 1);
                    kind = ConstructorInitializerKind::Construct;
                    values.extend(vs);
                }
            }
            _ => {}
        }
    }
    (kind, values)
}

/// Signature of a normalized constructor in clang's spelling:
/// `void (<param types>)`.
pub fn constructor_signature(constructor: &Constructor) -> String {
    let params = constructor
        .parameters
        .iter()
        .map(|p| type_to_string(&p.ty))
        .collect::<Vec<_>>()
        .join(", ");
    format!("void ({params})")
}

fn type_to_string(ty: &SimpleType) -> String {
    if ty.base.namespaces.is_empty() {
        ty.base.name.clone()
    } else {
        format!("{}::{}", ty.base.namespace(), ty.real_name())
    }
}

/// Copies initializer lists onto the graph's struct constructors, matched by
/// struct full name and constructor signature. Returns how many
/// constructors were filled.
///
/// Unmatched constructors keep an empty list. When several records share a
/// name the last one wins.
pub fn fill_constructor_initializers(
    result: &mut ParseResult,
    records: &[StructConstructors],
) -> usize {
    let by_name: HashMap<&str, &StructConstructors> =
        records.iter().map(|r| (r.name.as_str(), r)).collect();

    let mut updates = Vec::new();
    for (fi, file) in result.files.iter().enumerate() {
        for (ni, node) in file.nodes.iter().enumerate() {
            let Node::Clazz(s) = node else {
                continue;
            };
            if !s.is_struct() {
                continue;
            }
            let full_name = result.full_name(NodeRef::Clazz(s));
            let Some(record) = by_name.get(full_name.as_str()) else {
                continue;
            };
            for (ci, ctor) in s.constructors.iter().enumerate() {
                let signature = constructor_signature(ctor);
                match record.constructors.iter().find(|c| c.signature == signature) {
                    Some(found) => updates.push((fi, ni, ci, found.initializer_list.clone())),
                    None => debug!(
                        record = %full_name,
                        signature = %signature,
                        "No native constructor matches"
                    ),
                }
            }
        }
    }

    let filled = updates.len();
    for (fi, ni, ci, list) in updates {
        if let Node::Clazz(s) = &mut result.files[fi].nodes[ni] {
            s.constructors[ci].initializer_list = list;
        }
    }
    filled
}
