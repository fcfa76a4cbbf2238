use std::fmt;

use serde::Serialize;

/// A TypeScript-level scalar keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TsKeyword {
    String,
    Number,
    Boolean,
    Object,
    Any,
    Unknown,
    Null,
    Void,
}

impl TsKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            TsKeyword::String => "string",
            TsKeyword::Number => "number",
            TsKeyword::Boolean => "boolean",
            TsKeyword::Object => "object",
            TsKeyword::Any => "any",
            TsKeyword::Unknown => "unknown",
            TsKeyword::Null => "null",
            TsKeyword::Void => "void",
        }
    }
}

impl fmt::Display for TsKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field of a record expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordField {
    pub name: String,
    pub expr: TypeExpr,
    pub optional: bool,
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An abstract type expression: the `content` payload of a resolved model.
/// Contains no unresolved references; every `Ref` names a registered
/// component (or a generic parameter of the enclosing helper type).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeExpr {
    Keyword(TsKeyword),
    StringLiteral(String),
    NumberLiteral(serde_json::Number),
    BooleanLiteral(bool),
    Ref(String),
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Record {
        fields: Vec<RecordField>,
        additional: Option<Box<TypeExpr>>,
    },
    /// Keyed map over string keys (`Record<string, T>`).
    Map(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Generic {
        base: String,
        args: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    pub const ANY: TypeExpr = TypeExpr::Keyword(TsKeyword::Any);
    pub const NULL: TypeExpr = TypeExpr::Keyword(TsKeyword::Null);

    /// Build a union, flattening nested unions, dropping duplicate members
    /// and collapsing the single-member case.
    pub fn union(members: Vec<TypeExpr>) -> TypeExpr {
        let mut flat: Vec<TypeExpr> = Vec::with_capacity(members.len());
        for member in members {
            match member {
                TypeExpr::Union(inner) => {
                    for m in inner {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        match flat.len() {
            0 => TypeExpr::ANY,
            1 => flat.remove(0),
            _ => TypeExpr::Union(flat),
        }
    }

    /// Build an intersection, dropping duplicate members (`T & T` is `T`)
    /// and collapsing the single-member case.
    pub fn intersection(members: Vec<TypeExpr>) -> TypeExpr {
        let mut flat: Vec<TypeExpr> = Vec::with_capacity(members.len());
        for member in members {
            if !flat.contains(&member) {
                flat.push(member);
            }
        }
        match flat.len() {
            0 => TypeExpr::ANY,
            1 => flat.remove(0),
            _ => TypeExpr::Intersection(flat),
        }
    }

    /// Widen with the null keyword.
    pub fn nullable(self) -> TypeExpr {
        TypeExpr::union(vec![self, TypeExpr::NULL])
    }
}
