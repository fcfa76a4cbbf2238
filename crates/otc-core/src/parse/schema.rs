use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// The `type` field can be a single keyword or an array of keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<RawSchema>),
}

/// `items` is one schema for ordinary arrays, or an ordered list of schemas
/// for tuple-shaped arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    One(Box<RawSchema>),
    Tuple(Vec<RawSchema>),
}

/// An open-ended schema node as it appears in the document. `$ref` is an
/// ordinary optional field so the dispatcher can classify references with
/// sibling keywords and the discriminator resolver can rewrite references
/// in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSchema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    // Object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, RawSchema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    // Array items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    // Composition
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<RawSchema>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<RawSchema>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<RawSchema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    // Enum values and optional symbolic member names
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(
        rename = "x-enum-varnames",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub enum_varnames: Vec<String>,

    #[serde(rename = "x-enumNames", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_names: Vec<String>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,
}

impl RawSchema {
    /// Whether any `allOf`/`oneOf`/`anyOf` combinator is present.
    pub fn has_combinators(&self) -> bool {
        !self.all_of.is_empty() || !self.one_of.is_empty() || !self.any_of.is_empty()
    }

    /// A `$ref` with no structural sibling keywords. Annotations
    /// (`description`, `title`, `nullable`) do not demote a reference.
    pub fn is_pure_ref(&self) -> bool {
        self.ref_path.is_some()
            && self.schema_type.is_none()
            && self.properties.is_empty()
            && self.additional_properties.is_none()
            && self.items.is_none()
            && !self.has_combinators()
            && self.discriminator.is_none()
            && self.enum_values.is_empty()
    }

    /// Symbolic enum member names, preferring `x-enum-varnames` over the
    /// older `x-enumNames` spelling.
    pub fn enum_symbol_names(&self) -> Option<&[String]> {
        if !self.enum_varnames.is_empty() {
            Some(&self.enum_varnames)
        } else if !self.enum_names.is_empty() {
            Some(&self.enum_names)
        } else {
            None
        }
    }

    /// Whether the node declares or implies an object shape.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self.schema_type,
            Some(TypeSet::Single(SchemaType::Object))
        ) || (self.schema_type.is_none()
            && (!self.properties.is_empty() || self.additional_properties.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_with_description_is_still_pure() {
        let schema: RawSchema = serde_yaml_ng::from_str(
            r##"
$ref: "#/components/schemas/Pet"
description: overridden docs
"##,
        )
        .unwrap();
        assert!(schema.is_pure_ref());
    }

    #[test]
    fn ref_with_properties_is_not_pure() {
        let schema: RawSchema = serde_yaml_ng::from_str(
            r##"
$ref: "#/components/schemas/Pet"
properties:
  name:
    type: string
"##,
        )
        .unwrap();
        assert!(!schema.is_pure_ref());
    }

    #[test]
    fn tuple_items_deserialize() {
        let schema: RawSchema = serde_yaml_ng::from_str(
            r#"
type: array
items:
  - type: string
  - type: integer
"#,
        )
        .unwrap();
        match schema.items {
            Some(Items::Tuple(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected tuple items, got {other:?}"),
        }
    }

    #[test]
    fn enum_symbol_names_prefer_varnames() {
        let schema: RawSchema = serde_yaml_ng::from_str(
            r#"
type: integer
enum: [1, 2]
x-enum-varnames: [One, Two]
x-enumNames: [Uno, Dos]
"#,
        )
        .unwrap();
        assert_eq!(schema.enum_symbol_names(), Some(&["One".to_string(), "Two".to_string()][..]));
    }
}
