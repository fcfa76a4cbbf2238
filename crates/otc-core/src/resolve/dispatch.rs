use crate::error::ResolveError;
use crate::model::reference::ComponentRef;
use crate::model::type_expr::{RecordField, TsKeyword, TypeExpr};
use crate::model::type_model::{ModelKind, TypeIdentifier, TypeModel};
use crate::parse::schema::{AdditionalProperties, Items, RawSchema, SchemaType, TypeSet};

use super::{SchemaResolver, normalize_description};

impl<'c> SchemaResolver<'c> {
    /// Classify a schema node and route it to the matching strategy.
    /// First match wins; every strategy populates the full model record.
    pub fn parse_schema(
        &mut self,
        schema: &RawSchema,
        type_name: Option<&str>,
        path: &[String],
    ) -> Result<TypeModel, ResolveError> {
        let mut model = self.classify(schema, type_name, path)?;
        if schema.nullable == Some(true) {
            model.content = model.content.nullable();
        }
        Ok(model)
    }

    fn classify(
        &mut self,
        schema: &RawSchema,
        type_name: Option<&str>,
        path: &[String],
    ) -> Result<TypeModel, ResolveError> {
        if schema.is_pure_ref() {
            return self.parse_ref(schema, type_name);
        }
        if let Some(discriminator) = &schema.discriminator {
            return self.parse_discriminator(schema, discriminator, type_name, path);
        }
        if !schema.enum_values.is_empty() {
            return self.parse_enum(schema, type_name, path);
        }
        if schema.has_combinators() {
            return self.parse_composite(schema, type_name, path);
        }
        if let Some(TypeSet::Multiple(types)) = &schema.schema_type {
            return self.parse_type_union(schema, types, type_name, path);
        }
        self.parse_shape(schema, type_name, path)
    }

    /// A `$ref` without structural siblings: return the referenced model as
    /// a named reference, preserving an overriding type name if one was
    /// supplied by the caller.
    fn parse_ref(
        &mut self,
        schema: &RawSchema,
        type_name: Option<&str>,
    ) -> Result<TypeModel, ResolveError> {
        let pointer = schema.ref_path.as_deref().unwrap_or_default();
        let reference = ComponentRef::from_pointer(pointer)?;
        if !self.registry.contains(&reference) {
            return Err(ResolveError::RefTargetNotFound(pointer.to_string()));
        }
        let target = self.resolve_component(&reference)?;
        let target_name = self
            .registry
            .type_name(&reference)
            .unwrap_or_else(|| reference.name())
            .to_string();

        Ok(TypeModel {
            kind: target.kind,
            type_identifier: TypeIdentifier::Type,
            name: type_name.map(str::to_string),
            reference: Some(reference),
            content: TypeExpr::Ref(target_name),
            description: normalize_description(schema.description.as_deref()),
            generic_args: vec![],
            members: vec![],
            internal: false,
        })
    }

    /// Plain `allOf`/`oneOf`/`anyOf` composition. The shape is complex
    /// unless every member reduces to the same primitive keyword.
    pub(crate) fn parse_composite(
        &mut self,
        schema: &RawSchema,
        type_name: Option<&str>,
        path: &[String],
    ) -> Result<TypeModel, ResolveError> {
        let combined = self.combinator_content(schema, path)?.unwrap_or(TypeExpr::ANY);

        let content = if schema.properties.is_empty() {
            combined
        } else {
            let own = self.record_content(schema, path)?;
            match combined {
                TypeExpr::Intersection(mut parts) => {
                    parts.push(own);
                    TypeExpr::intersection(parts)
                }
                other => TypeExpr::intersection(vec![other, own]),
            }
        };

        let kind = match content {
            TypeExpr::Keyword(_) => ModelKind::Primitive,
            _ => ModelKind::Complex,
        };
        Ok(TypeModel {
            kind,
            type_identifier: TypeIdentifier::Type,
            name: type_name.map(str::to_string),
            reference: None,
            content,
            description: normalize_description(schema.description.as_deref()),
            generic_args: vec![],
            members: vec![],
            internal: false,
        })
    }

    /// Combine only the combinator member list: intersection for `allOf`,
    /// union otherwise. Returns `None` when no combinator is present.
    pub(crate) fn combinator_content(
        &mut self,
        schema: &RawSchema,
        path: &[String],
    ) -> Result<Option<TypeExpr>, ResolveError> {
        let (members, all_of) = if !schema.one_of.is_empty() {
            (&schema.one_of, false)
        } else if !schema.any_of.is_empty() {
            (&schema.any_of, false)
        } else if !schema.all_of.is_empty() {
            (&schema.all_of, true)
        } else {
            return Ok(None);
        };

        let mut parts = Vec::with_capacity(members.len());
        for member in members {
            parts.push(self.inline_content(member, path)?);
        }
        Ok(Some(if all_of {
            TypeExpr::intersection(parts)
        } else {
            TypeExpr::union(parts)
        }))
    }

    /// `type` given as an array of scalar keywords: a union of single-type
    /// renditions of the same node.
    fn parse_type_union(
        &mut self,
        schema: &RawSchema,
        types: &[SchemaType],
        type_name: Option<&str>,
        path: &[String],
    ) -> Result<TypeModel, ResolveError> {
        let synthesized = RawSchema {
            one_of: types
                .iter()
                .map(|t| RawSchema {
                    schema_type: Some(TypeSet::Single(*t)),
                    ..Default::default()
                })
                .collect(),
            description: schema.description.clone(),
            ..Default::default()
        };
        self.parse_composite(&synthesized, type_name, path)
    }

    /// Object, keyed-map, array, tuple, and primitive shapes.
    fn parse_shape(
        &mut self,
        schema: &RawSchema,
        type_name: Option<&str>,
        path: &[String],
    ) -> Result<TypeModel, ResolveError> {
        // Keyed map: object-shaped with additionalProperties and no
        // declared properties.
        if schema.is_object_like() && schema.properties.is_empty() {
            match &schema.additional_properties {
                Some(AdditionalProperties::Schema(value)) => {
                    let value_expr = self.inline_content(value, path)?;
                    return Ok(self.complex_model(
                        TypeExpr::Map(Box::new(value_expr)),
                        type_name,
                        schema,
                    ));
                }
                Some(AdditionalProperties::Bool(true)) => {
                    return Ok(self.complex_model(
                        TypeExpr::Map(Box::new(TypeExpr::ANY)),
                        type_name,
                        schema,
                    ));
                }
                _ => {}
            }
        }

        if schema.is_object_like() && !schema.properties.is_empty() {
            let content = self.record_content(schema, path)?;
            return Ok(TypeModel {
                kind: ModelKind::Complex,
                type_identifier: TypeIdentifier::Interface,
                name: type_name.map(str::to_string),
                reference: None,
                content,
                description: normalize_description(schema.description.as_deref()),
                generic_args: vec![],
                members: vec![],
                internal: false,
            });
        }

        if matches!(
            schema.schema_type,
            Some(TypeSet::Single(SchemaType::Array))
        ) || (schema.schema_type.is_none() && schema.items.is_some())
        {
            let content = match &schema.items {
                Some(Items::Tuple(items)) => {
                    let mut elements = Vec::with_capacity(items.len());
                    for item in items {
                        elements.push(self.inline_content(item, path)?);
                    }
                    TypeExpr::Tuple(elements)
                }
                Some(Items::One(item)) => {
                    TypeExpr::Array(Box::new(self.inline_content(item, path)?))
                }
                None => TypeExpr::Array(Box::new(TypeExpr::ANY)),
            };
            return Ok(self.complex_model(content, type_name, schema));
        }

        // Scalar keyword, defaulting to the any placeholder when untyped.
        let keyword = match &schema.schema_type {
            Some(TypeSet::Single(t)) => scalar_keyword(*t),
            _ => TsKeyword::Any,
        };
        Ok(TypeModel {
            kind: ModelKind::Primitive,
            type_identifier: TypeIdentifier::Type,
            name: type_name.map(str::to_string),
            reference: None,
            content: TypeExpr::Keyword(keyword),
            description: normalize_description(schema.description.as_deref()),
            generic_args: vec![],
            members: vec![],
            internal: false,
        })
    }

    fn complex_model(
        &self,
        content: TypeExpr,
        type_name: Option<&str>,
        schema: &RawSchema,
    ) -> TypeModel {
        TypeModel {
            kind: ModelKind::Complex,
            type_identifier: TypeIdentifier::Type,
            name: type_name.map(str::to_string),
            reference: None,
            content,
            description: normalize_description(schema.description.as_deref()),
            generic_args: vec![],
            members: vec![],
            internal: false,
        }
    }

    /// Record content from `properties` + `additionalProperties`.
    pub(crate) fn record_content(
        &mut self,
        schema: &RawSchema,
        path: &[String],
    ) -> Result<TypeExpr, ResolveError> {
        let mut fields = Vec::with_capacity(schema.properties.len());
        for (property, node) in &schema.properties {
            let mut member_path = path.to_vec();
            member_path.push(property.clone());
            let expr = self.inline_content(node, &member_path)?;
            fields.push(RecordField {
                name: property.clone(),
                expr,
                optional: !schema.required.contains(property),
                read_only: node.read_only.unwrap_or(false),
                description: node.description.clone(),
            });
        }
        let additional = match &schema.additional_properties {
            Some(AdditionalProperties::Schema(value)) => {
                Some(Box::new(self.inline_content(value, path)?))
            }
            Some(AdditionalProperties::Bool(true)) => Some(Box::new(TypeExpr::ANY)),
            _ => None,
        };
        Ok(TypeExpr::Record { fields, additional })
    }

    /// Parse a nested schema and take just its content expression.
    pub(crate) fn inline_content(
        &mut self,
        schema: &RawSchema,
        path: &[String],
    ) -> Result<TypeExpr, ResolveError> {
        Ok(self.parse_schema(schema, None, path)?.content)
    }
}

fn scalar_keyword(schema_type: SchemaType) -> TsKeyword {
    match schema_type {
        SchemaType::String => TsKeyword::String,
        SchemaType::Number | SchemaType::Integer => TsKeyword::Number,
        SchemaType::Boolean => TsKeyword::Boolean,
        SchemaType::Object => TsKeyword::Object,
        SchemaType::Null => TsKeyword::Null,
        // Arrays are handled by the array strategy before this point.
        SchemaType::Array => TsKeyword::Any,
    }
}
