//! Typed node model of the normalized C++ AST.
//!
//! Every entity in the dump is a JSON object tagged with `__TYPE`. Each tag
//! maps to one concrete struct here; shared fields live in [`NodeBase`],
//! which is flattened into every node when (de)serializing. The `parent`
//! back-reference and the `id` are graph bookkeeping and never serialized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::names::trim_namespace;

/// Discriminator stored in the `__TYPE` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "CXXFile")]
    CxxFile,
    IncludeDirective,
    TypeAlias,
    Clazz,
    Struct,
    Constructor,
    MemberFunction,
    Variable,
    SimpleType,
    MemberVariable,
    EnumConstant,
    Enumz,
}

impl NodeKind {
    /// Maps a raw discriminator to its kind.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "CXXFile" => NodeKind::CxxFile,
            "IncludeDirective" => NodeKind::IncludeDirective,
            "TypeAlias" => NodeKind::TypeAlias,
            "Clazz" => NodeKind::Clazz,
            "Struct" => NodeKind::Struct,
            "Constructor" => NodeKind::Constructor,
            "MemberFunction" => NodeKind::MemberFunction,
            "Variable" => NodeKind::Variable,
            "SimpleType" => NodeKind::SimpleType,
            "MemberVariable" => NodeKind::MemberVariable,
            "EnumConstant" => NodeKind::EnumConstant,
            "Enumz" => NodeKind::Enumz,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::CxxFile => "CXXFile",
            NodeKind::IncludeDirective => "IncludeDirective",
            NodeKind::TypeAlias => "TypeAlias",
            NodeKind::Clazz => "Clazz",
            NodeKind::Struct => "Struct",
            NodeKind::Constructor => "Constructor",
            NodeKind::MemberFunction => "MemberFunction",
            NodeKind::Variable => "Variable",
            NodeKind::SimpleType => "SimpleType",
            NodeKind::MemberVariable => "MemberVariable",
            NodeKind::EnumConstant => "EnumConstant",
            NodeKind::Enumz => "Enumz",
        }
    }

    /// Class-like declarations that may own nested declarations.
    pub fn is_record(&self) -> bool {
        matches!(self, NodeKind::Clazz | NodeKind::Struct)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serial identifier assigned by [`ParseResult`](crate::ParseResult).
/// `0` means the node has not been indexed yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

/// Fields shared by every node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeBase {
    pub name: String,
    pub file_path: String,
    pub namespaces: Vec<String>,
    pub parent_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_full_scope_name: String,
    pub attributes: Vec<String>,
    pub comment: String,
    pub source: String,
    #[serde(skip)]
    pub id: NodeId,
    /// Owning node. Non-owning, resolved through the graph index.
    #[serde(skip)]
    pub parent: Option<NodeId>,
}

impl NodeBase {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// `name` without any namespace baked into it.
    pub fn real_name(&self) -> &str {
        trim_namespace(&self.name)
    }

    /// Namespaces joined with `::`.
    pub fn namespace(&self) -> String {
        self.namespaces.join("::")
    }

    pub fn file_name(&self) -> String {
        Path::new(&self.file_path)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `namespaces::parent_name::realName`, skipping empty parts.
    ///
    /// Top-level declarations report their innermost namespace as
    /// `parent_name`; that segment is not repeated.
    pub fn qualified_name(&self) -> String {
        let mut fname = self.real_name().to_string();
        let repeats_namespace = self.namespaces.last() == Some(&self.parent_name);
        if !self.parent_name.is_empty() && !repeats_namespace {
            fname = format!("{}::{fname}", self.parent_name);
        }
        if !self.namespaces.is_empty() {
            fname = format!("{}::{fname}", self.namespace());
        }
        fname
    }
}

macro_rules! tagged_default {
    ($ty:ident, $kind:expr, { $($field:ident),* $(,)? }) => {
        impl Default for $ty {
            fn default() -> Self {
                Self {
                    tag: $kind,
                    base: NodeBase::default(),
                    $($field: Default::default(),)*
                }
            }
        }
    };
}

/// Shape of a referenced type occurrence. Encoded as an integer in the dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SimpleTypeKind {
    #[default]
    Value,
    Pointer,
    Reference,
    Array,
    Template,
}

impl TryFrom<u32> for SimpleTypeKind {
    type Error = String;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        match v {
            100 => Ok(SimpleTypeKind::Value),
            101 => Ok(SimpleTypeKind::Pointer),
            102 => Ok(SimpleTypeKind::Reference),
            103 => Ok(SimpleTypeKind::Array),
            104 => Ok(SimpleTypeKind::Template),
            other => Err(format!("unknown SimpleType kind {other}")),
        }
    }
}

impl From<SimpleTypeKind> for u32 {
    fn from(kind: SimpleTypeKind) -> u32 {
        match kind {
            SimpleTypeKind::Value => 100,
            SimpleTypeKind::Pointer => 101,
            SimpleTypeKind::Reference => 102,
            SimpleTypeKind::Array => 103,
            SimpleTypeKind::Template => 104,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleType {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    pub kind: SimpleTypeKind,
    pub is_const: bool,
    pub is_builtin_type: bool,
    pub template_arguments: Vec<String>,
    /// Compiler-qualified spelling, filled by the qualified-type pass.
    pub clang_qualtype: String,
}

tagged_default!(SimpleType, NodeKind::SimpleType, {
    kind,
    is_const,
    is_builtin_type,
    template_arguments,
    clang_qualtype,
});

impl SimpleType {
    /// Type name with namespaces trimmed; falls back to the source spelling.
    pub fn real_name(&self) -> &str {
        if self.base.name.is_empty() {
            trim_namespace(&self.base.source)
        } else {
            trim_namespace(&self.base.name)
        }
    }

    /// Length text of an array type: `int[10]` gives `10`.
    pub fn len_of_array_type(&self) -> String {
        if self.kind != SimpleTypeKind::Array {
            return String::new();
        }
        let src = &self.base.source;
        match (src.find('['), src.rfind(']')) {
            (Some(start), Some(end)) if start < end => src[start + 1..end].trim().to_string(),
            _ => String::new(),
        }
    }
}

/// Function or constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variable {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    #[serde(rename = "type")]
    pub ty: SimpleType,
    pub default_value: String,
    pub is_output: bool,
}

tagged_default!(Variable, NodeKind::Variable, { ty, default_value, is_output });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberVariable {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    #[serde(rename = "type")]
    pub ty: SimpleType,
    pub is_mutable: bool,
    pub access_specifier: String,
}

tagged_default!(MemberVariable, NodeKind::MemberVariable, {
    ty,
    is_mutable,
    access_specifier,
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructorInitializerKind {
    Parameter,
    #[default]
    Value,
    Construct,
}

/// One entry of a constructor's member-initializer list.
///
/// `values` holds a single item for `Parameter` and `Value`, and one item per
/// argument of the callee constructor for `Construct`. An empty list means
/// the value could not be determined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructorInitializer {
    pub kind: ConstructorInitializerKind,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constructor {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    pub parameters: Vec<Variable>,
    #[serde(rename = "initializerList")]
    pub initializer_list: Vec<ConstructorInitializer>,
}

tagged_default!(Constructor, NodeKind::Constructor, {
    parameters,
    initializer_list,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberFunction {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    pub is_virtual: bool,
    pub return_type: SimpleType,
    pub parameters: Vec<Variable>,
    pub access_specifier: String,
    pub is_overriding: bool,
    pub is_const: bool,
    pub signature: String,
    pub mangled_name: String,
}

tagged_default!(MemberFunction, NodeKind::MemberFunction, {
    is_virtual,
    return_type,
    parameters,
    access_specifier,
    is_overriding,
    is_const,
    signature,
    mangled_name,
});

/// Class or struct declaration; `tag` tells which.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clazz {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    pub constructors: Vec<Constructor>,
    pub methods: Vec<MemberFunction>,
    pub member_variables: Vec<MemberVariable>,
    pub base_clazzs: Vec<String>,
}

tagged_default!(Clazz, NodeKind::Clazz, {
    constructors,
    methods,
    member_variables,
    base_clazzs,
});

impl Clazz {
    pub fn new_struct() -> Self {
        Self {
            tag: NodeKind::Struct,
            ..Default::default()
        }
    }

    pub fn is_struct(&self) -> bool {
        self.tag == NodeKind::Struct
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumConstant {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    pub value: String,
}

tagged_default!(EnumConstant, NodeKind::EnumConstant, { value });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enumz {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    pub enum_constants: Vec<EnumConstant>,
}

tagged_default!(Enumz, NodeKind::Enumz, { enum_constants });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeAlias {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    #[serde(rename = "underlyingType")]
    pub underlying_type: SimpleType,
}

tagged_default!(TypeAlias, NodeKind::TypeAlias, { underlying_type });

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeDirective {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    pub include_file_path: String,
}

tagged_default!(IncludeDirective, NodeKind::IncludeDirective, {
    include_file_path
});

/// Root container for one header. Top-level nodes already carry their
/// namespaces, so the list is flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CxxFile {
    #[serde(rename = "__TYPE")]
    pub tag: NodeKind,
    #[serde(flatten)]
    pub base: NodeBase,
    pub nodes: Vec<Node>,
}

tagged_default!(CxxFile, NodeKind::CxxFile, { nodes });

impl CxxFile {
    pub fn new(file_path: &str) -> Self {
        let mut file = Self::default();
        file.base.file_path = file_path.to_string();
        file
    }
}

/// Any node that can appear in a file's `nodes` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    IncludeDirective(IncludeDirective),
    TypeAlias(TypeAlias),
    Clazz(Clazz),
    Constructor(Constructor),
    MemberFunction(MemberFunction),
    Variable(Variable),
    SimpleType(SimpleType),
    MemberVariable(MemberVariable),
    EnumConstant(EnumConstant),
    Enumz(Enumz),
    CxxFile(CxxFile),
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        crate::cast::cast(value).map_err(serde::de::Error::custom)
    }
}

/// Borrowed view over any node in the graph.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    File(&'a CxxFile),
    IncludeDirective(&'a IncludeDirective),
    TypeAlias(&'a TypeAlias),
    Clazz(&'a Clazz),
    Constructor(&'a Constructor),
    MemberFunction(&'a MemberFunction),
    Variable(&'a Variable),
    SimpleType(&'a SimpleType),
    MemberVariable(&'a MemberVariable),
    EnumConstant(&'a EnumConstant),
    Enumz(&'a Enumz),
}

impl<'a> NodeRef<'a> {
    pub fn base(&self) -> &'a NodeBase {
        match *self {
            NodeRef::File(n) => &n.base,
            NodeRef::IncludeDirective(n) => &n.base,
            NodeRef::TypeAlias(n) => &n.base,
            NodeRef::Clazz(n) => &n.base,
            NodeRef::Constructor(n) => &n.base,
            NodeRef::MemberFunction(n) => &n.base,
            NodeRef::Variable(n) => &n.base,
            NodeRef::SimpleType(n) => &n.base,
            NodeRef::MemberVariable(n) => &n.base,
            NodeRef::EnumConstant(n) => &n.base,
            NodeRef::Enumz(n) => &n.base,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match *self {
            NodeRef::File(n) => n.tag,
            NodeRef::IncludeDirective(n) => n.tag,
            NodeRef::TypeAlias(n) => n.tag,
            NodeRef::Clazz(n) => n.tag,
            NodeRef::Constructor(n) => n.tag,
            NodeRef::MemberFunction(n) => n.tag,
            NodeRef::Variable(n) => n.tag,
            NodeRef::SimpleType(n) => n.tag,
            NodeRef::MemberVariable(n) => n.tag,
            NodeRef::EnumConstant(n) => n.tag,
            NodeRef::Enumz(n) => n.tag,
        }
    }

    pub fn id(&self) -> NodeId {
        self.base().id
    }

    pub fn name(&self) -> &'a str {
        &self.base().name
    }

    /// Simple name as used for matching; SimpleTypes fall back to `source`.
    pub fn real_name(&self) -> &'a str {
        match *self {
            NodeRef::SimpleType(t) => t.real_name(),
            other => other.base().real_name(),
        }
    }

    pub fn as_clazz(&self) -> Option<&'a Clazz> {
        match *self {
            NodeRef::Clazz(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_enumz(&self) -> Option<&'a Enumz> {
        match *self {
            NodeRef::Enumz(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_simple_type(&self) -> Option<&'a SimpleType> {
        match *self {
            NodeRef::SimpleType(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_member_function(&self) -> Option<&'a MemberFunction> {
        match *self {
            NodeRef::MemberFunction(m) => Some(m),
            _ => None,
        }
    }

    /// Owned children in declaration order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match *self {
            NodeRef::File(f) => f.nodes.iter().map(Node::node_ref).collect(),
            NodeRef::Clazz(c) => c
                .constructors
                .iter()
                .map(NodeRef::Constructor)
                .chain(c.methods.iter().map(NodeRef::MemberFunction))
                .chain(c.member_variables.iter().map(NodeRef::MemberVariable))
                .collect(),
            NodeRef::Constructor(c) => c.parameters.iter().map(NodeRef::Variable).collect(),
            NodeRef::MemberFunction(m) => m
                .parameters
                .iter()
                .map(NodeRef::Variable)
                .chain(std::iter::once(NodeRef::SimpleType(&m.return_type)))
                .collect(),
            NodeRef::Variable(v) => vec![NodeRef::SimpleType(&v.ty)],
            NodeRef::MemberVariable(v) => vec![NodeRef::SimpleType(&v.ty)],
            NodeRef::Enumz(e) => e.enum_constants.iter().map(NodeRef::EnumConstant).collect(),
            NodeRef::TypeAlias(t) => vec![NodeRef::SimpleType(&t.underlying_type)],
            NodeRef::IncludeDirective(_) | NodeRef::SimpleType(_) | NodeRef::EnumConstant(_) => {
                Vec::new()
            }
        }
    }

    /// The `i`-th entry of [`children`](Self::children), without collecting
    /// the others.
    pub fn child(&self, i: usize) -> Option<NodeRef<'a>> {
        match *self {
            NodeRef::File(f) => f.nodes.get(i).map(Node::node_ref),
            NodeRef::Clazz(c) => {
                let methods_at = c.constructors.len();
                let members_at = methods_at + c.methods.len();
                if i < methods_at {
                    c.constructors.get(i).map(NodeRef::Constructor)
                } else if i < members_at {
                    c.methods.get(i - methods_at).map(NodeRef::MemberFunction)
                } else {
                    c.member_variables.get(i - members_at).map(NodeRef::MemberVariable)
                }
            }
            NodeRef::Constructor(c) => c.parameters.get(i).map(NodeRef::Variable),
            NodeRef::MemberFunction(m) if i == m.parameters.len() => {
                Some(NodeRef::SimpleType(&m.return_type))
            }
            NodeRef::MemberFunction(m) => m.parameters.get(i).map(NodeRef::Variable),
            NodeRef::Variable(v) if i == 0 => Some(NodeRef::SimpleType(&v.ty)),
            NodeRef::MemberVariable(v) if i == 0 => Some(NodeRef::SimpleType(&v.ty)),
            NodeRef::TypeAlias(t) if i == 0 => Some(NodeRef::SimpleType(&t.underlying_type)),
            NodeRef::Enumz(e) => e.enum_constants.get(i).map(NodeRef::EnumConstant),
            _ => None,
        }
    }

    /// Same node identity, compared by address.
    pub fn ptr_eq(&self, other: &NodeRef<'_>) -> bool {
        std::ptr::eq(self.base(), other.base())
    }
}

/// Mutable access to graph bookkeeping, used when wiring parents.
pub trait TerraNode {
    fn base(&self) -> &NodeBase;
    fn base_mut(&mut self) -> &mut NodeBase;
    fn children_mut(&mut self) -> Vec<&mut dyn TerraNode>;

    /// Points every descendant's `parent` at its immediate owner.
    fn link_children(&mut self) {
        let id = self.base().id;
        for child in self.children_mut() {
            child.base_mut().parent = Some(id);
            child.link_children();
        }
    }
}

macro_rules! leaf_node {
    ($($ty:ident),*) => {
        $(impl TerraNode for $ty {
            fn base(&self) -> &NodeBase {
                &self.base
            }
            fn base_mut(&mut self) -> &mut NodeBase {
                &mut self.base
            }
            fn children_mut(&mut self) -> Vec<&mut dyn TerraNode> {
                Vec::new()
            }
        })*
    };
}

leaf_node!(SimpleType, EnumConstant, IncludeDirective);

macro_rules! typed_node {
    ($ty:ident, |$s:ident| $children:expr) => {
        impl TerraNode for $ty {
            fn base(&self) -> &NodeBase {
                &self.base
            }
            fn base_mut(&mut self) -> &mut NodeBase {
                &mut self.base
            }
            fn children_mut(&mut self) -> Vec<&mut dyn TerraNode> {
                let $s = self;
                $children
            }
        }
    };
}

typed_node!(Variable, |s| vec![&mut s.ty as &mut dyn TerraNode]);
typed_node!(MemberVariable, |s| vec![&mut s.ty as &mut dyn TerraNode]);
typed_node!(TypeAlias, |s| vec![&mut s.underlying_type as &mut dyn TerraNode]);
typed_node!(Constructor, |s| s
    .parameters
    .iter_mut()
    .map(|p| p as &mut dyn TerraNode)
    .collect());
typed_node!(MemberFunction, |s| {
    let mut out: Vec<&mut dyn TerraNode> = s
        .parameters
        .iter_mut()
        .map(|p| p as &mut dyn TerraNode)
        .collect();
    out.push(&mut s.return_type);
    out
});
typed_node!(Clazz, |s| {
    let mut out: Vec<&mut dyn TerraNode> = Vec::new();
    out.extend(s.constructors.iter_mut().map(|c| c as &mut dyn TerraNode));
    out.extend(s.methods.iter_mut().map(|m| m as &mut dyn TerraNode));
    out.extend(s.member_variables.iter_mut().map(|m| m as &mut dyn TerraNode));
    out
});
typed_node!(Enumz, |s| s
    .enum_constants
    .iter_mut()
    .map(|c| c as &mut dyn TerraNode)
    .collect());
typed_node!(CxxFile, |s| s
    .nodes
    .iter_mut()
    .map(|n| n as &mut dyn TerraNode)
    .collect());

impl Node {
    pub fn node_ref(&self) -> NodeRef<'_> {
        match self {
            Node::IncludeDirective(n) => NodeRef::IncludeDirective(n),
            Node::TypeAlias(n) => NodeRef::TypeAlias(n),
            Node::Clazz(n) => NodeRef::Clazz(n),
            Node::Constructor(n) => NodeRef::Constructor(n),
            Node::MemberFunction(n) => NodeRef::MemberFunction(n),
            Node::Variable(n) => NodeRef::Variable(n),
            Node::SimpleType(n) => NodeRef::SimpleType(n),
            Node::MemberVariable(n) => NodeRef::MemberVariable(n),
            Node::EnumConstant(n) => NodeRef::EnumConstant(n),
            Node::Enumz(n) => NodeRef::Enumz(n),
            Node::CxxFile(n) => NodeRef::File(n),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.node_ref().kind()
    }

    fn inner_mut(&mut self) -> &mut dyn TerraNode {
        match self {
            Node::IncludeDirective(n) => n,
            Node::TypeAlias(n) => n,
            Node::Clazz(n) => n,
            Node::Constructor(n) => n,
            Node::MemberFunction(n) => n,
            Node::Variable(n) => n,
            Node::SimpleType(n) => n,
            Node::MemberVariable(n) => n,
            Node::EnumConstant(n) => n,
            Node::Enumz(n) => n,
            Node::CxxFile(n) => n,
        }
    }
}

impl TerraNode for Node {
    fn base(&self) -> &NodeBase {
        self.node_ref().base()
    }
    fn base_mut(&mut self) -> &mut NodeBase {
        self.inner_mut().base_mut()
    }
    fn children_mut(&mut self) -> Vec<&mut dyn TerraNode> {
        self.inner_mut().children_mut()
    }
}
