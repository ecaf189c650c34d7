//! Promotes untyped dump objects to concrete node variants.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::node::{
    Clazz, Constructor, CxxFile, EnumConstant, Enumz, IncludeDirective, MemberFunction,
    MemberVariable, Node, NodeKind, SimpleType, TypeAlias, Variable,
};

/// Field holding the node discriminator.
pub const TYPE_FIELD: &str = "__TYPE";

#[derive(Debug, Error)]
pub enum CastError {
    #[error("unsupported node type `{tag}`: {payload}")]
    UnsupportedNodeType { tag: String, payload: JsonValue },
    #[error("missing `__TYPE` discriminator: {payload}")]
    MissingDiscriminator { payload: JsonValue },
    #[error("malformed `{tag}` node: {source}")]
    Malformed {
        tag: NodeKind,
        #[source]
        source: serde_json::Error,
    },
}

impl CastError {
    /// Raw object that triggered the failure, when available.
    pub fn payload(&self) -> Option<&JsonValue> {
        match self {
            CastError::UnsupportedNodeType { payload, .. }
            | CastError::MissingDiscriminator { payload } => Some(payload),
            CastError::Malformed { .. } => None,
        }
    }
}

/// Turns a tagged JSON object into its node variant.
///
/// Every nested object carrying `__TYPE` is checked as well, so an unknown
/// tag anywhere in the subtree fails the whole cast. Arrays are containers,
/// not nodes: they are only descended into. Nested objects without a
/// discriminator (initializer entries, for instance) are left as plain data.
pub fn cast(value: JsonValue) -> Result<Node, CastError> {
    let kind = match value.get(TYPE_FIELD) {
        Some(JsonValue::String(tag)) => match NodeKind::from_tag(tag) {
            Some(kind) => kind,
            None => {
                return Err(CastError::UnsupportedNodeType {
                    tag: tag.clone(),
                    payload: value,
                })
            }
        },
        Some(other) => {
            return Err(CastError::UnsupportedNodeType {
                tag: other.to_string(),
                payload: value,
            })
        }
        None => return Err(CastError::MissingDiscriminator { payload: value }),
    };
    check_nested(&value)?;
    into_node(kind, value)
}

fn check_nested(value: &JsonValue) -> Result<(), CastError> {
    match value {
        JsonValue::Object(map) => {
            if let Some(tag) = map.get(TYPE_FIELD) {
                let known = tag.as_str().and_then(NodeKind::from_tag).is_some();
                if !known {
                    return Err(CastError::UnsupportedNodeType {
                        tag: tag.as_str().map(str::to_string).unwrap_or_else(|| tag.to_string()),
                        payload: value.clone(),
                    });
                }
            }
            map.values().try_for_each(check_nested)
        }
        JsonValue::Array(items) => items.iter().try_for_each(check_nested),
        _ => Ok(()),
    }
}

fn into_node(kind: NodeKind, value: JsonValue) -> Result<Node, CastError> {
    let malformed = |source| CastError::Malformed { tag: kind, source };
    let node = match kind {
        NodeKind::CxxFile => Node::CxxFile(de::<CxxFile>(value).map_err(malformed)?),
        NodeKind::IncludeDirective => {
            Node::IncludeDirective(de::<IncludeDirective>(value).map_err(malformed)?)
        }
        NodeKind::TypeAlias => Node::TypeAlias(de::<TypeAlias>(value).map_err(malformed)?),
        NodeKind::Clazz | NodeKind::Struct => {
            Node::Clazz(de::<Clazz>(value).map_err(malformed)?)
        }
        NodeKind::Constructor => Node::Constructor(de::<Constructor>(value).map_err(malformed)?),
        NodeKind::MemberFunction => {
            Node::MemberFunction(de::<MemberFunction>(value).map_err(malformed)?)
        }
        NodeKind::Variable => Node::Variable(de::<Variable>(value).map_err(malformed)?),
        NodeKind::SimpleType => Node::SimpleType(de::<SimpleType>(value).map_err(malformed)?),
        NodeKind::MemberVariable => {
            Node::MemberVariable(de::<MemberVariable>(value).map_err(malformed)?)
        }
        NodeKind::EnumConstant => {
            Node::EnumConstant(de::<EnumConstant>(value).map_err(malformed)?)
        }
        NodeKind::Enumz => Node::Enumz(de::<Enumz>(value).map_err(malformed)?),
    };
    Ok(node)
}

fn de<T: serde::de::DeserializeOwned>(value: JsonValue) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

/// Deserializes a dump: a JSON array of file objects.
pub fn files_from_json(content: &str) -> Result<Vec<CxxFile>, CastError> {
    let raw: JsonValue = serde_json::from_str(content).map_err(|source| CastError::Malformed {
        tag: NodeKind::CxxFile,
        source,
    })?;
    let items = match raw {
        JsonValue::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| match cast(item)? {
            Node::CxxFile(file) => Ok(file),
            other => Err(CastError::UnsupportedNodeType {
                tag: other.kind().to_string(),
                payload: serde_json::to_value(&other).unwrap_or(JsonValue::Null),
            }),
        })
        .collect()
}
