//! Recovers compiler-qualified type spellings for method parameters and
//! return types.
//!
//! Entries are keyed by `<scope>::<name>`. Methods use
//! `<name>::<mangled name>` as their name and open a scope of the same
//! spelling for their parameters, which keeps overloads apart.

use std::collections::HashMap;

use ir::{ClangKind, ClangNode, Clazz, MemberFunction, Node, NodeRef, ParseResult, TagUsed};
use tracing::debug;

use super::FlattenNode;

const UNDEFINED: &str = "Undefined";
const NO_MANGLED_NAME: &str = "undefined";

#[derive(Debug, Clone, Default)]
pub struct QualTypeMap {
    map: HashMap<String, Vec<String>>,
}

impl QualTypeMap {
    pub fn key(scope: Option<&str>, name: Option<&str>) -> String {
        format!("{}::{}", scope.unwrap_or(UNDEFINED), name.unwrap_or(UNDEFINED))
    }

    /// Records `qual_type` under `key`. A repeated key keeps its first value;
    /// a conflicting value is logged and kept aside.
    pub fn insert(&mut self, key: String, qual_type: &str) {
        match self.map.get_mut(&key) {
            None => {
                self.map.insert(key, vec![qual_type.to_string()]);
            }
            Some(values) => {
                if values.iter().any(|v| v == qual_type) {
                    return;
                }
                debug!(key = %key, "Duplicate qualified type key");
                values.push(qual_type.to_string());
            }
        }
    }

    /// First value registered for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// Folds `other` into `self`; keys already present keep their value.
    pub fn merge(&mut self, other: QualTypeMap) {
        for (key, values) in other.map {
            for value in values {
                self.insert(key.clone(), &value);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Return-type entry of a method declared in `scope`.
    pub fn method_key(scope: &str, method: &MemberFunction) -> String {
        Self::key(Some(scope), Some(&method_identity(&method.base.name, &method.mangled_name)))
    }

    /// Parameter entry under a method scope.
    pub fn parameter_key(method_scope: &str, mangled_name: &str, param: &str) -> String {
        let scope = format!("{method_scope}::{}", mangled_or_placeholder(mangled_name));
        Self::key(Some(&scope), Some(param))
    }
}

fn mangled_or_placeholder(mangled: &str) -> &str {
    if mangled.is_empty() {
        NO_MANGLED_NAME
    } else {
        mangled
    }
}

fn method_identity(name: &str, mangled: &str) -> String {
    format!("{name}::{}", mangled_or_placeholder(mangled))
}

/// Builds the lookup table for one file's flattened declarations.
pub fn parse_qual_types(nodes: &[FlattenNode<'_>]) -> QualTypeMap {
    let mut map = QualTypeMap::default();
    for flat in nodes {
        collect(flat.node, &flat.ns, &mut map);
    }
    map
}

/// Pre-order walk with an explicit stack; each entry carries the scope key
/// its node is declared in.
fn collect(root: &ClangNode, scope: &str, map: &mut QualTypeMap) {
    let mut pending = vec![(root, scope.to_string())];
    while let Some((node, mut scope)) = pending.pop() {
        match node.kind {
            ClangKind::ParmVarDecl => {
                if let Some(qual_type) = node.qual_type() {
                    map.insert(QualTypeMap::key(Some(&scope), node.name.as_deref()), qual_type);
                }
            }
            ClangKind::CxxMethodDecl => {
                let identity =
                    method_identity(node.name(), node.mangled_name.as_deref().unwrap_or_default());
                if let Some(qual_type) = node.qual_type() {
                    map.insert(QualTypeMap::key(Some(&scope), Some(&identity)), qual_type);
                }
                scope = format!("{scope}::{identity}");
            }
            ClangKind::CxxRecordDecl
                if !node.is_implicit
                    && (node.is_record(TagUsed::Class) || node.is_record(TagUsed::Struct)) =>
            {
                scope = if scope.is_empty() {
                    node.name().to_string()
                } else {
                    format!("{scope}::{}", node.name())
                };
            }
            _ => {}
        }
        pending.extend(node.inner().iter().rev().map(|child| (child, scope.clone())));
    }
}

/// Assigns `clang_qualtype` on every class and struct method's return type
/// and parameter types. Missing entries become empty strings. Returns the
/// number of types that found an entry.
///
/// Scopes come from `parent_full_scope_name`; when the dump leaves it empty
/// the method scope is the owning record's full name, and the parameter
/// scope is `<method scope>::<method name>`.
pub fn fill_qual_types(result: &mut ParseResult, map: &QualTypeMap) -> usize {
    let mut updates = Vec::new();
    for (fi, file) in result.files.iter().enumerate() {
        for (ni, node) in file.nodes.iter().enumerate() {
            let Node::Clazz(c) = node else {
                continue;
            };
            updates.push((fi, ni, lookup_record(result, c, map)));
        }
    }

    let mut found = 0;
    for (fi, ni, methods) in updates {
        let Node::Clazz(c) = &mut result.files[fi].nodes[ni] else {
            continue;
        };
        for (method, (ret, params)) in c.methods.iter_mut().zip(methods) {
            found += usize::from(ret.is_some());
            method.return_type.clang_qualtype = ret.unwrap_or_default();
            for (param, qual_type) in method.parameters.iter_mut().zip(params) {
                found += usize::from(qual_type.is_some());
                param.ty.clang_qualtype = qual_type.unwrap_or_default();
            }
        }
    }
    found
}

type MethodQualTypes = (Option<String>, Vec<Option<String>>);

fn lookup_record(result: &ParseResult, clazz: &Clazz, map: &QualTypeMap) -> Vec<MethodQualTypes> {
    let record_scope = result.full_name(NodeRef::Clazz(clazz));
    clazz
        .methods
        .iter()
        .map(|method| {
            let scope = non_empty_or(&method.base.parent_full_scope_name, &record_scope);
            let ret = map
                .get(&QualTypeMap::method_key(&scope, method))
                .map(str::to_string);
            let default_param_scope = format!("{scope}::{}", method.base.name);
            let params = method
                .parameters
                .iter()
                .map(|p| {
                    let param_scope = non_empty_or(&p.base.parent_full_scope_name, &default_param_scope);
                    map.get(&QualTypeMap::parameter_key(
                        &param_scope,
                        &method.mangled_name,
                        &p.base.name,
                    ))
                    .map(str::to_string)
                })
                .collect();
            (ret, params)
        })
        .collect()
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
