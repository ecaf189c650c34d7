//! Passes over clang's native JSON AST that splice extra detail back onto
//! the normalized graph.

pub mod constructor_initializer;
pub mod qualtype;

use ir::{ClangKind, ClangLoc, ClangNode};
use std::fs;
use std::path::Path;

pub use constructor_initializer::{
    fill_constructor_initializers, parse_inner_values, parse_struct_constructors,
    ConstructorRecord, StructConstructors,
};
pub use qualtype::{fill_qual_types, parse_qual_types, QualTypeMap};

/// A top-level declaration of the parsed file with its namespace path.
#[derive(Debug, Clone)]
pub struct FlattenNode<'a> {
    /// Enclosing namespaces joined with `::`; empty at global scope.
    pub ns: String,
    pub node: &'a ClangNode,
}

/// Declarations of `parse_file` found directly under the translation unit
/// or inside namespaces, outer to inner.
///
/// Declarations from other files (includes, builtins without location) are
/// dropped, except inside a namespace opened by `parse_file`: everything in
/// it is kept.
pub fn filter_and_flatten_nodes<'a>(parse_file: &Path, root: &'a ClangNode) -> Vec<FlattenNode<'a>> {
    let mut walker = Flattener {
        target: parse_file,
        tracker: LocTracker::default(),
        ns: Vec::new(),
        out: Vec::new(),
    };
    walker.tracker.observe_node(root);
    for child in root.inner() {
        walker.visit(child, true);
    }
    walker.out
}

struct Flattener<'p, 'a> {
    target: &'p Path,
    tracker: LocTracker,
    ns: Vec<String>,
    out: Vec<FlattenNode<'a>>,
}

impl<'p, 'a> Flattener<'p, 'a> {
    fn visit(&mut self, node: &'a ClangNode, filtered: bool) {
        let file = self.tracker.observe_node(node);
        let in_target = !filtered || file.as_deref().is_some_and(|f| same_file(f, self.target));
        if node.kind == ClangKind::NamespaceDecl && in_target {
            self.ns.push(node.name().to_string());
            for child in node.inner() {
                self.visit(child, false);
            }
            self.ns.pop();
            return;
        }
        if in_target {
            self.out.push(FlattenNode {
                ns: self.ns.join("::"),
                node,
            });
        }
        for child in node.inner() {
            self.tracker.observe_tree(child);
        }
    }
}

fn same_file(loc_file: &str, target: &Path) -> bool {
    let loc_path = Path::new(loc_file);
    if loc_path == target {
        return true;
    }
    match (fs::canonicalize(loc_path), fs::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Follows clang's location compression: a `file` is only printed when it
/// differs from the last printed one, in dump order.
#[derive(Debug, Default)]
struct LocTracker {
    current: Option<String>,
}

impl LocTracker {
    /// Consumes the node's `loc` and `range`; returns the file of `loc`.
    fn observe_node(&mut self, node: &ClangNode) -> Option<String> {
        let file = node.loc.as_ref().and_then(|loc| self.observe(loc));
        if let Some(range) = &node.range {
            self.observe(&range.begin);
            self.observe(&range.end);
        }
        file
    }

    /// Pre-order walk over `node`'s subtree with an explicit stack.
    fn observe_tree(&mut self, node: &ClangNode) {
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            self.observe_node(current);
            pending.extend(current.inner().iter().rev());
        }
    }

    fn observe(&mut self, loc: &ClangLoc) -> Option<String> {
        if loc.spelling_loc.is_none() && loc.expansion_loc.is_none() {
            return self.observe_bare(loc);
        }
        if let Some(spelling) = &loc.spelling_loc {
            self.observe_bare(spelling);
        }
        match &loc.expansion_loc {
            Some(expansion) => self.observe_bare(expansion),
            None => self.current.clone(),
        }
    }

    fn observe_bare(&mut self, loc: &ClangLoc) -> Option<String> {
        if loc.is_empty() {
            return None;
        }
        if let Some(file) = &loc.file {
            self.current = Some(file.clone());
        }
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(v: serde_json::Value) -> ClangNode {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn keeps_only_target_file_declarations() {
        let root = node(json!({
            "kind": "TranslationUnitDecl",
            "inner": [
                {"kind": "TypedefDecl", "name": "__int128_t", "loc": {}, "range": {"begin": {}, "end": {}}},
                {"kind": "CXXRecordDecl", "name": "FILE", "tagUsed": "struct",
                 "loc": {"offset": 10, "file": "/usr/include/stdio.h", "line": 3, "col": 8, "tokLen": 4,
                         "includedFrom": {"file": "/tmp/a.h"}}},
                {"kind": "CXXRecordDecl", "name": "Other", "tagUsed": "struct", "loc": {"offset": 20, "line": 9}},
                {"kind": "CXXRecordDecl", "name": "Mine", "tagUsed": "struct",
                 "loc": {"offset": 30, "file": "/tmp/a.h", "line": 2}},
                {"kind": "CXXRecordDecl", "name": "Next", "tagUsed": "struct", "loc": {"offset": 50, "line": 4}}
            ]
        }));
        let nodes = filter_and_flatten_nodes(Path::new("/tmp/a.h"), &root);
        let names: Vec<&str> = nodes.iter().map(|n| n.node.name()).collect();
        assert_eq!(names, vec!["Mine", "Next"]);
    }

    #[test]
    fn namespace_children_are_not_file_filtered() {
        let root = node(json!({
            "kind": "TranslationUnitDecl",
            "inner": [{
                "kind": "NamespaceDecl", "name": "agora",
                "loc": {"offset": 1, "file": "/tmp/a.h", "line": 1},
                "inner": [{
                    "kind": "NamespaceDecl", "name": "rtc", "loc": {"offset": 5, "line": 2},
                    "inner": [
                        {"kind": "CXXRecordDecl", "name": "Engine", "tagUsed": "class", "loc": {}},
                        {"kind": "EnumDecl", "name": "Mode", "loc": {"offset": 9, "line": 3}}
                    ]
                }]
            }]
        }));
        let nodes = filter_and_flatten_nodes(Path::new("/tmp/a.h"), &root);
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.ns == "agora::rtc"));
    }

    #[test]
    fn file_state_survives_skipped_subtrees() {
        let root = node(json!({
            "kind": "TranslationUnitDecl",
            "inner": [
                {"kind": "CXXRecordDecl", "name": "Mine", "tagUsed": "struct",
                 "loc": {"offset": 1, "file": "/tmp/a.h", "line": 1},
                 "inner": [{"kind": "FieldDecl", "name": "x",
                            "loc": {"offset": 2, "file": "/tmp/b.h", "line": 1}}]},
                {"kind": "CXXRecordDecl", "name": "Theirs", "tagUsed": "struct", "loc": {"offset": 3, "line": 2}}
            ]
        }));
        let nodes = filter_and_flatten_nodes(Path::new("/tmp/a.h"), &root);
        let names: Vec<&str> = nodes.iter().map(|n| n.node.name()).collect();
        assert_eq!(names, vec!["Mine"]);
    }

    #[test]
    fn macro_locations_use_expansion_site() {
        let mut tracker = LocTracker::default();
        let loc: ClangLoc = serde_json::from_value(json!({
            "spellingLoc": {"offset": 1, "file": "/tmp/macros.h", "line": 1},
            "expansionLoc": {"offset": 9, "file": "/tmp/a.h", "line": 4}
        }))
        .unwrap();
        assert_eq!(tracker.observe(&loc).as_deref(), Some("/tmp/a.h"));
    }
}
