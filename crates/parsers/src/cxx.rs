//! Ingestion of the C++ front-end dump and parent linking.

use anyhow::{Context, Result};
use ir::{files_from_json, NameIndex, NodeId, ParseResult, TerraNode};
use tracing::debug;

/// Decodes a dump (JSON array of files) into a linked [`ParseResult`].
///
/// # Example
/// ```
/// let dump = r#"[{"__TYPE": "CXXFile", "file_path": "a.h", "nodes": []}]"#;
/// let result = parsers::parse_result_from_json(dump).unwrap();
/// assert_eq!(result.files.len(), 1);
/// ```
pub fn parse_result_from_json(content: &str) -> Result<ParseResult> {
    let files = files_from_json(content).context("Failed to decode AST dump")?;
    let mut result = ParseResult::new(files);
    link_parents(&mut result);
    Ok(result)
}

/// Wires every node's `parent`.
///
/// Top-level declarations are attached to the declaration named by their
/// `parent_full_scope_name`, or to their file when that name is empty or
/// does not resolve. Declarations are linked in file-then-node order, so a
/// nested declaration sees the already linked chain of its enclosing ones.
/// Owned sub-entities point at their immediate owner.
pub fn link_parents(result: &mut ParseResult) {
    let index = result.name_index();
    for fi in 0..result.files.len() {
        let file_id = result.files[fi].base.id;
        for ni in 0..result.files[fi].nodes.len() {
            let (node_id, scope) = {
                let base = result.files[fi].nodes[ni].base();
                (base.id, base.parent_full_scope_name.clone())
            };
            let parent = resolve_scope(result, &index, &scope, node_id).unwrap_or_else(|| {
                if !scope.is_empty() {
                    debug!(scope = %scope, "Parent scope unresolved, attaching to file");
                }
                file_id
            });
            result.files[fi].nodes[ni].base_mut().parent = Some(parent);
        }
    }
    for node in result.files.iter_mut().flat_map(|f| f.nodes.iter_mut()) {
        node.link_children();
    }
}

fn resolve_scope(
    result: &ParseResult,
    index: &NameIndex,
    scope: &str,
    node_id: NodeId,
) -> Option<NodeId> {
    if scope.is_empty() {
        return None;
    }
    let candidate = result
        .resolve_node_by_name_indexed(index, scope, Some(node_id))?
        .id();
    // a node may not end up as its own ancestor
    if result.is_ancestor(node_id, candidate) {
        return None;
    }
    Some(candidate)
}
