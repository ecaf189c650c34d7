//! The file forest of one run plus name and type resolution over it.

use std::collections::{HashMap, HashSet};

use crate::names::{get_namespace, join_scope, trim_namespace};
use crate::node::{Clazz, CxxFile, Enumz, NodeId, NodeKind, NodeRef, SimpleType, SimpleTypeKind, TerraNode};

/// All files of a run. Nodes are addressed by [`NodeId`], assigned by
/// [`ParseResult::reindex`]; `parent` links point into this index.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub files: Vec<CxxFile>,
    /// Child-index path from `files` to each node.
    index: HashMap<NodeId, Vec<usize>>,
    next_id: usize,
}

impl ParseResult {
    pub fn new(files: Vec<CxxFile>) -> Self {
        let mut result = Self {
            files,
            index: HashMap::new(),
            next_id: 0,
        };
        result.reindex();
        result
    }

    /// Assigns ids to unindexed nodes and rebuilds the path index.
    /// Existing ids are kept, so parent links stay valid.
    pub fn reindex(&mut self) {
        self.index.clear();
        let mut next = self.next_id;
        let mut index = HashMap::new();
        for (i, file) in self.files.iter_mut().enumerate() {
            assign_ids(file, vec![i], &mut next, &mut index);
        }
        self.next_id = next;
        self.index = index;
    }

    /// Number of indexed nodes, files included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let path = self.index.get(&id)?;
        let (first, rest) = path.split_first()?;
        let mut node = NodeRef::File(self.files.get(*first)?);
        for &i in rest {
            node = node.child(i)?;
        }
        Some(node)
    }

    pub fn parent_of(&self, node: NodeRef<'_>) -> Option<NodeRef<'_>> {
        node.base().parent.and_then(|p| self.get(p))
    }

    /// Top-level declarations of every file, in file-then-node order.
    pub fn top_level(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.files
            .iter()
            .flat_map(|f| f.nodes.iter().map(|n| n.node_ref()))
    }

    /// Namespace-qualified name of a node.
    ///
    /// Declarations nested in a class follow the linked parent chain.
    /// Members render as `<owner>.<name>` and types as `<owner>@type`
    /// (`@return_type` under a method). Anything unlinked falls back to
    /// `namespaces::parent_name::name`.
    pub fn full_name(&self, node: NodeRef<'_>) -> String {
        self.full_name_bounded(node, 0)
    }

    fn full_name_bounded(&self, node: NodeRef<'_>, depth: usize) -> String {
        let base = node.base();
        let parent = self
            .parent_of(node)
            .filter(|p| p.kind() != NodeKind::CxxFile && depth < 64);
        let Some(parent) = parent else {
            return match node {
                NodeRef::SimpleType(t) => join_scope([base.namespace().as_str(), t.real_name()]),
                _ => base.qualified_name(),
            };
        };
        let owner = self.full_name_bounded(parent, depth + 1);
        match node.kind() {
            NodeKind::MemberFunction | NodeKind::Variable | NodeKind::MemberVariable => {
                format!("{owner}.{}", base.name)
            }
            NodeKind::SimpleType if parent.kind() == NodeKind::MemberFunction => {
                format!("{owner}@return_type")
            }
            NodeKind::SimpleType => format!("{owner}@type"),
            _ if parent.kind().is_record() => format!("{owner}::{}", base.real_name()),
            _ => base.qualified_name(),
        }
    }

    /// Finds a top-level declaration by qualified name.
    ///
    /// A node matches on exact full name, or when its full name ends with the
    /// query and the query's last segment is the node's simple name. The
    /// `namespaces::parent_name::name` spelling is tried as well. First match
    /// in file-then-node order wins.
    pub fn resolve_node_by_name(&self, name: &str) -> Option<NodeRef<'_>> {
        self.resolve_node_by_name_excluding(name, None)
    }

    /// Like [`resolve_node_by_name`](Self::resolve_node_by_name), skipping
    /// `exclude` so a node never resolves to itself.
    pub fn resolve_node_by_name_excluding(
        &self,
        name: &str,
        exclude: Option<NodeId>,
    ) -> Option<NodeRef<'_>> {
        if name.is_empty() {
            return None;
        }
        self.top_level()
            .filter(|n| exclude.map_or(true, |id| n.id() != id))
            .find(|&node| self.name_matches(name, node))
    }

    /// Indexed form of
    /// [`resolve_node_by_name_excluding`](Self::resolve_node_by_name_excluding)
    /// with the same result. Only declarations sharing the query's simple
    /// name are checked. Member-style queries (`Owner.name`, `@type`) fall
    /// back to the full scan.
    pub fn resolve_node_by_name_indexed(
        &self,
        index: &NameIndex,
        name: &str,
        exclude: Option<NodeId>,
    ) -> Option<NodeRef<'_>> {
        let simple = trim_namespace(name);
        if simple.contains(|c| c == '.' || c == '@') {
            return self.resolve_node_by_name_excluding(name, exclude);
        }
        if name.is_empty() {
            return None;
        }
        index
            .candidates(simple)
            .iter()
            .filter(|&&id| exclude != Some(id))
            .filter_map(|&id| self.get(id))
            .find(|&node| self.name_matches(name, node))
    }

    /// Top-level declarations grouped by simple name. Stays valid while the
    /// set of top-level nodes is unchanged, parent links included.
    pub fn name_index(&self) -> NameIndex {
        let mut by_simple: HashMap<String, Vec<NodeId>> = HashMap::new();
        for node in self.top_level() {
            by_simple
                .entry(node.real_name().to_string())
                .or_default()
                .push(node.id());
        }
        NameIndex { by_simple }
    }

    /// Exact full name, or a suffix match on the same simple name, against
    /// the full name and the `namespaces::parent_name::name` spelling.
    fn name_matches(&self, name: &str, node: NodeRef<'_>) -> bool {
        let simple = trim_namespace(name);
        let matches = |candidate: &str| {
            name == candidate || (candidate.ends_with(name) && simple == node.real_name())
        };
        if matches(&self.full_name(node)) {
            return true;
        }
        let base = node.base();
        if base.parent_name.is_empty() {
            return false;
        }
        let alt = base
            .namespaces
            .iter()
            .map(String::as_str)
            .chain([base.parent_name.as_str(), base.name.as_str()])
            .collect::<Vec<_>>()
            .join("::");
        matches(&alt)
    }

    /// Resolves the declaration a type refers to.
    ///
    /// Builtins and unnamed types resolve to themselves. Templates resolve
    /// through their first argument only. Unresolved types come back
    /// unchanged so they can be used as opaque leaves.
    pub fn resolve_node_by_type<'a>(&'a self, ty: &'a SimpleType) -> NodeRef<'a> {
        let mut name = ty.base.name.as_str();
        if name.is_empty() || ty.is_builtin_type {
            return NodeRef::SimpleType(ty);
        }
        if ty.kind == SimpleTypeKind::Template {
            if let Some(first) = ty.template_arguments.first() {
                name = first;
            }
        }
        self.resolve_node_by_name(name)
            .or_else(|| self.resolve_by_namespace(name))
            .unwrap_or(NodeRef::SimpleType(ty))
    }

    /// Simple-name candidates accepted by namespace containment.
    fn resolve_by_namespace(&self, name: &str) -> Option<NodeRef<'_>> {
        let simple = trim_namespace(name);
        let query_ns = get_namespace(name);
        self.top_level()
            .filter(|n| {
                matches!(
                    n.kind(),
                    NodeKind::Clazz | NodeKind::Struct | NodeKind::Enumz | NodeKind::TypeAlias
                )
            })
            .filter(|n| n.real_name() == simple)
            .find(|n| {
                let base = n.base();
                let ns = base.namespace();
                let nested = join_scope([ns.as_str(), base.parent_name.as_str()]);
                namespace_accepts(&ns, query_ns) || namespace_accepts(&nested, query_ns)
            })
    }

    /// Legacy lookup restricted to classes.
    pub fn find_clazz(&self, name: &str) -> Option<&Clazz> {
        if name.is_empty() {
            return None;
        }
        let ns = get_namespace(name);
        let simple = trim_namespace(name);
        self.top_level()
            .filter_map(|n| n.as_clazz())
            .filter(|c| c.tag == NodeKind::Clazz)
            .find(|c| c.base.name == simple && namespace_accepts(&c.base.namespace(), ns))
    }

    /// Legacy lookup restricted to enums.
    pub fn find_enumz(&self, name: &str) -> Option<&Enumz> {
        if name.is_empty() {
            return None;
        }
        let ns = get_namespace(name);
        let simple = trim_namespace(name);
        self.top_level()
            .filter_map(|n| n.as_enumz())
            .find(|e| e.base.name == simple && namespace_accepts(&e.base.namespace(), ns))
    }

    /// Base classes of `clazz`, transitively, matched by simple name.
    pub fn find_base_clazzs(&self, clazz: &Clazz) -> Vec<&Clazz> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_bases(clazz, &mut seen, &mut out);
        out
    }

    fn collect_bases<'a>(
        &'a self,
        clazz: &Clazz,
        seen: &mut HashSet<NodeId>,
        out: &mut Vec<&'a Clazz>,
    ) {
        if clazz.base_clazzs.is_empty() {
            return;
        }
        let bases: Vec<&Clazz> = self
            .top_level()
            .filter_map(|n| n.as_clazz())
            .filter(|c| {
                clazz
                    .base_clazzs
                    .iter()
                    .any(|b| b == &c.base.name || trim_namespace(b) == c.base.name)
            })
            .collect();
        for base in bases {
            if !seen.insert(base.base.id) {
                continue;
            }
            out.push(base);
            self.collect_bases(base, seen, out);
        }
    }

    /// Whether `ancestor` appears on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.get(node).and_then(|n| n.base().parent);
        let mut steps = 0;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.index.len() {
                break;
            }
            current = self.get(id).and_then(|n| n.base().parent);
        }
        false
    }
}

/// Ids of top-level declarations keyed by simple name, in file-then-node
/// order. Built by [`ParseResult::name_index`].
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_simple: HashMap<String, Vec<NodeId>>,
}

impl NameIndex {
    pub fn candidates(&self, simple: &str) -> &[NodeId] {
        self.by_simple.get(simple).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Namespace containment accepted by the resolver: equal, unspecified, or
/// either one containing the other.
fn namespace_accepts(candidate: &str, query: &str) -> bool {
    candidate == query
        || query.is_empty()
        || candidate.contains(query)
        || (!candidate.is_empty() && query.contains(candidate))
}

fn assign_ids(
    node: &mut dyn TerraNode,
    path: Vec<usize>,
    next: &mut usize,
    index: &mut HashMap<NodeId, Vec<usize>>,
) {
    let base = node.base_mut();
    if base.id.is_unset() || index.contains_key(&base.id) {
        *next += 1;
        base.id = NodeId(*next);
    }
    index.insert(base.id, path.clone());
    for (i, child) in node.children_mut().into_iter().enumerate() {
        let mut child_path = path.clone();
        child_path.push(i);
        assign_ids(child, child_path, next, index);
    }
}
