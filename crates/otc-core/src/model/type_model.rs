use serde::Serialize;

use super::reference::ComponentRef;
use super::type_expr::{TsKeyword, TypeExpr};

/// Classification of a resolved schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Primitive,
    Enum,
    Complex,
}

/// Which declaration form the renderer should use for a named model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeIdentifier {
    Type,
    Enum,
    Interface,
}

/// A literal enum member value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumLiteral {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl EnumLiteral {
    /// The literal as a type expression (used for union-style enum output).
    pub fn to_expr(&self) -> TypeExpr {
        match self {
            EnumLiteral::Null => TypeExpr::NULL,
            EnumLiteral::Bool(b) => TypeExpr::BooleanLiteral(*b),
            EnumLiteral::Number(n) => TypeExpr::NumberLiteral(n.clone()),
            EnumLiteral::String(s) => TypeExpr::StringLiteral(s.clone()),
        }
    }
}

/// A single enum member. Within one enum model all keys are unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumMember {
    pub key: String,
    pub kind: TsKeyword,
    pub value: EnumLiteral,
}

/// The canonical parsed-schema record produced by every strategy and
/// consumed by the renderer. `content` contains no unresolved references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeModel {
    pub kind: ModelKind,
    pub type_identifier: TypeIdentifier,

    /// Resolved identifier, or `None` for anonymous/inline schemas.
    pub name: Option<String>,

    /// Originating reference, or `None` when the schema was inline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ComponentRef>,

    pub content: TypeExpr,

    /// Normalized human-readable text, possibly empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Generic parameter names, empty unless this is a generic helper.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generic_args: Vec<String>,

    /// Enum members, empty for non-enum models.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<EnumMember>,

    /// Synthesized during resolution rather than declared by the document.
    pub internal: bool,
}
