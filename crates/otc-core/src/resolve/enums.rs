use std::collections::HashSet;

use serde_json::Value;

use crate::error::ResolveError;
use crate::model::type_expr::{TsKeyword, TypeExpr};
use crate::model::type_model::{EnumLiteral, EnumMember, ModelKind, TypeIdentifier, TypeModel};
use crate::parse::schema::{Items, RawSchema, SchemaType, TypeSet};

use super::names::NamePurpose;
use super::{SchemaResolver, normalize_description};

/// Guarantees member-key uniqueness within one enum's scope by appending a
/// deterministic counter in collision order. One instance per enum.
#[derive(Debug, Default)]
pub struct EnumKeyResolver {
    used: HashSet<String>,
}

impl EnumKeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, key: &str) -> String {
        if self.used.insert(key.to_string()) {
            return key.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{key}{counter}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl<'c> SchemaResolver<'c> {
    pub(crate) fn parse_enum(
        &mut self,
        schema: &RawSchema,
        type_name: Option<&str>,
        path: &[String],
    ) -> Result<TypeModel, ResolveError> {
        if self.config.extract_enums && type_name.is_none() {
            if let Some(base) = type_name_from_path(path) {
                return self.extract_enum(schema, &base, path);
            }
            log::warn!("no usable path name for inline enum at {path:?}; leaving it inline");
        }

        let values: Vec<Value> = schema
            .enum_values
            .iter()
            .filter(|value| !value.is_null())
            .cloned()
            .collect();

        // An enum of arrays reinterprets as a union of fixed-length tuples
        // of single-value enums.
        if values.first().is_some_and(Value::is_array) {
            let synthesized = tuple_union_schema(&values);
            return self.parse_schema(&synthesized, type_name, path);
        }

        let key_kind = enum_value_kind(schema);
        let mut keys = EnumKeyResolver::new();
        let mut members = Vec::new();

        match schema.enum_symbol_names() {
            Some(symbol_names) => {
                for (index, symbol) in symbol_names.iter().enumerate() {
                    let value = values.get(index);
                    let key = self.format_enum_key(Some(symbol.as_str()), value, &mut keys);
                    let member = match value {
                        Some(value) if !self.config.enum_names_as_values => EnumMember {
                            key,
                            kind: key_kind,
                            value: literal_for(value, key_kind),
                        },
                        // Symbolic names become the values, either by
                        // configuration or because no value was declared.
                        _ => EnumMember {
                            key,
                            kind: TsKeyword::String,
                            value: EnumLiteral::String(symbol.clone()),
                        },
                    };
                    members.push(member);
                }
            }
            None => {
                for value in &values {
                    let key = self.format_enum_key(None, Some(value), &mut keys);
                    members.push(EnumMember {
                        key,
                        kind: key_kind,
                        value: literal_for(value, key_kind),
                    });
                }
            }
        }

        let content = TypeExpr::union(members.iter().map(|m| m.value.to_expr()).collect());
        Ok(TypeModel {
            kind: ModelKind::Enum,
            type_identifier: if self.config.generate_union_enums {
                TypeIdentifier::Type
            } else {
                TypeIdentifier::Enum
            },
            name: type_name.map(str::to_string),
            reference: None,
            content,
            description: normalize_description(schema.description.as_deref()),
            generic_args: vec![],
            members,
            internal: false,
        })
    }

    /// Promote an inline enum to a standalone named component and return a
    /// reference wrapper for the extraction site.
    fn extract_enum(
        &mut self,
        schema: &RawSchema,
        base: &str,
        _path: &[String],
    ) -> Result<TypeModel, ResolveError> {
        let mut candidates = vec![self.names.format(base, NamePurpose::TypeName)];
        for suffix in &self.config.extract_enum_suffixes {
            candidates.push(
                self.names
                    .format(&format!("{base} {suffix}"), NamePurpose::TypeName),
            );
        }
        let type_name = self.component_names.resolve(&candidates)?;

        let reference = self.register_internal(&type_name, schema.clone());
        let component_model = self.resolve_component(&reference)?;

        Ok(TypeModel {
            kind: ModelKind::Enum,
            type_identifier: component_model.type_identifier,
            name: Some(type_name.clone()),
            reference: Some(reference),
            content: TypeExpr::Ref(type_name),
            description: component_model.description.clone(),
            generic_args: vec![],
            members: vec![],
            internal: true,
        })
    }

    /// Derive the member key: the symbolic name when supplied, else the
    /// string form of the value, both passed through enum-key formatting and
    /// the per-enum key resolver.
    fn format_enum_key(
        &mut self,
        symbol: Option<&str>,
        value: Option<&Value>,
        keys: &mut EnumKeyResolver,
    ) -> String {
        let mut formatted = symbol
            .map(|s| self.names.format(s, NamePurpose::EnumKey))
            .unwrap_or_default();
        if formatted.is_empty() {
            let label = value.map(value_label).unwrap_or_default();
            formatted = self.names.format(&label, NamePurpose::EnumKey);
        }
        keys.resolve(&formatted)
    }
}

/// The declared value kind governing literal formatting.
fn enum_value_kind(schema: &RawSchema) -> TsKeyword {
    match &schema.schema_type {
        Some(TypeSet::Single(SchemaType::String)) => TsKeyword::String,
        Some(TypeSet::Single(SchemaType::Number | SchemaType::Integer)) => TsKeyword::Number,
        Some(TypeSet::Single(SchemaType::Boolean)) => TsKeyword::Boolean,
        Some(TypeSet::Single(SchemaType::Null)) => TsKeyword::Null,
        _ => TsKeyword::Any,
    }
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn literal_for(value: &Value, kind: TsKeyword) -> EnumLiteral {
    match value {
        Value::Null => EnumLiteral::Null,
        Value::Number(n) if kind == TsKeyword::Number => EnumLiteral::Number(n.clone()),
        Value::Bool(b) if kind == TsKeyword::Boolean => EnumLiteral::Bool(*b),
        other => EnumLiteral::String(value_label(other)),
    }
}

/// Reinterpret `enum: [[..], [..]]` as `oneOf` fixed-length tuples of
/// single-value string enums.
fn tuple_union_schema(values: &[Value]) -> RawSchema {
    RawSchema {
        one_of: values
            .iter()
            .filter_map(Value::as_array)
            .map(|row| RawSchema {
                schema_type: Some(TypeSet::Single(SchemaType::Array)),
                items: Some(Items::Tuple(
                    row.iter()
                        .map(|member| RawSchema {
                            schema_type: Some(TypeSet::Single(SchemaType::String)),
                            enum_values: vec![member.clone()],
                            ..Default::default()
                        })
                        .collect(),
                )),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// A name base from the last two semantic path segments.
fn type_name_from_path(path: &[String]) -> Option<String> {
    match path {
        [] => None,
        [single] => Some(single.clone()),
        [.., parent, leaf] => Some(format!("{parent} {leaf}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_resolver_suffixes_in_collision_order() {
        let mut keys = EnumKeyResolver::new();
        assert_eq!(keys.resolve("FooBar"), "FooBar");
        assert_eq!(keys.resolve("FooBar"), "FooBar2");
        assert_eq!(keys.resolve("FooBar"), "FooBar3");
        assert_eq!(keys.resolve("Other"), "Other");
    }

    #[test]
    fn path_names_use_last_two_segments() {
        assert_eq!(type_name_from_path(&[]), None);
        assert_eq!(
            type_name_from_path(&["Pet".to_string()]),
            Some("Pet".to_string())
        );
        assert_eq!(
            type_name_from_path(&["Pet".to_string(), "owner".to_string(), "status".to_string()]),
            Some("owner status".to_string())
        );
    }
}
