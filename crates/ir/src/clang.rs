//! Model of clang's `-ast-dump=json` output.
//!
//! Only the node kinds the enrichment passes look at are named; everything
//! else lands in [`ClangKind::Other`] and is skipped structurally.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClangKind {
    TranslationUnitDecl,
    NamespaceDecl,
    #[serde(rename = "CXXRecordDecl")]
    CxxRecordDecl,
    #[serde(rename = "CXXConstructorDecl")]
    CxxConstructorDecl,
    #[serde(rename = "CXXCtorInitializer")]
    CxxCtorInitializer,
    ParmVarDecl,
    #[serde(rename = "CXXMethodDecl")]
    CxxMethodDecl,
    FieldDecl,
    EnumDecl,
    EnumConstantDecl,
    #[serde(rename = "CXXBoolLiteralExpr")]
    CxxBoolLiteralExpr,
    IntegerLiteral,
    FloatingLiteral,
    ImplicitCastExpr,
    #[serde(rename = "GNUNullExpr")]
    GnuNullExpr,
    #[serde(rename = "CXXNullPtrLiteralExpr")]
    CxxNullPtrLiteralExpr,
    DeclRefExpr,
    UnaryOperator,
    #[serde(rename = "CXXConstructExpr")]
    CxxConstructExpr,
    #[serde(rename = "CXXTemporaryObjectExpr")]
    CxxTemporaryObjectExpr,
    #[default]
    #[serde(other)]
    Other,
}

/// `struct`, `class` or `union`, from `tagUsed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagUsed {
    Struct,
    Class,
    Union,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClangType {
    pub qual_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desugared_qual_type: Option<String>,
}

/// Source position. clang omits `file` when it equals the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClangLoc {
    pub offset: Option<u64>,
    pub file: Option<String>,
    pub line: Option<u64>,
    pub col: Option<u64>,
    pub tok_len: Option<u64>,
    pub included_from: Option<JsonValue>,
    pub spelling_loc: Option<Box<ClangLoc>>,
    pub expansion_loc: Option<Box<ClangLoc>>,
}

impl ClangLoc {
    /// The location that carries position info: the expansion site for
    /// macro-produced nodes, otherwise the location itself.
    pub fn effective(&self) -> &ClangLoc {
        match &self.expansion_loc {
            Some(exp) => exp,
            None => self,
        }
    }

    /// A location with no fields at all, as clang emits for builtins.
    pub fn is_empty(&self) -> bool {
        let loc = self.effective();
        loc.offset.is_none() && loc.file.is_none() && loc.line.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClangRange {
    pub begin: ClangLoc,
    pub end: ClangLoc,
}

/// Declaration referenced by a `DeclRefExpr`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferencedDecl {
    pub id: String,
    pub kind: ClangKind,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ClangType,
}

/// Member named by a `CXXCtorInitializer`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnyInit {
    pub id: String,
    pub kind: ClangKind,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ClangType,
}

/// One node of the native AST. Fields absent in the dump default to empty.
///
/// Dropping releases `inner` iteratively, so arbitrarily deep trees do not
/// exhaust the stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClangNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub kind: ClangKind,
    pub name: Option<String>,
    pub loc: Option<ClangLoc>,
    pub range: Option<ClangRange>,
    pub tag_used: Option<TagUsed>,
    #[serde(default)]
    pub is_implicit: bool,
    #[serde(default)]
    pub complete_definition: bool,
    #[serde(rename = "type")]
    pub ty: Option<ClangType>,
    pub value: Option<JsonValue>,
    pub opcode: Option<String>,
    pub mangled_name: Option<String>,
    pub referenced_decl: Option<ReferencedDecl>,
    pub any_init: Option<AnyInit>,
    pub inner: Option<Vec<ClangNode>>,
}

impl Drop for ClangNode {
    fn drop(&mut self) {
        let mut pending = self.inner.take().unwrap_or_default();
        while let Some(mut node) = pending.pop() {
            if let Some(children) = node.inner.take() {
                pending.extend(children);
            }
        }
    }
}

impl ClangNode {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn qual_type(&self) -> Option<&str> {
        self.ty.as_ref().map(|t| t.qual_type.as_str())
    }

    pub fn inner(&self) -> &[ClangNode] {
        self.inner.as_deref().unwrap_or_default()
    }

    /// Literal text of `value`, rendered without JSON quoting.
    pub fn value_text(&self) -> Option<String> {
        self.value.as_ref().map(|v| match v {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn is_record(&self, tag: TagUsed) -> bool {
        self.kind == ClangKind::CxxRecordDecl && self.tag_used == Some(tag)
    }
}

/// Parses a whole native dump rooted at the translation unit.
///
/// Every AST level costs two JSON levels, so serde_json's nesting limit is
/// lifted and deep recursion moves onto a growable stack.
pub fn parse_clang_ast(content: &str) -> serde_json::Result<ClangNode> {
    let mut de = serde_json::Deserializer::from_str(content);
    de.disable_recursion_limit();
    let root = ClangNode::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(root)
}
