use std::rc::Rc;

use crate::error::ResolveError;
use crate::model::reference::ComponentRef;
use crate::model::type_expr::{RecordField, TypeExpr};
use crate::model::type_model::{ModelKind, TypeIdentifier, TypeModel};
use crate::parse::schema::{Discriminator, RawSchema};

use super::names::NamePurpose;
use super::{SchemaResolver, normalize_description};

/// The synthesized abstract component holding the discriminated schema's own
/// properties; variants are rewritten to extend it instead of the original
/// polymorphic schema.
struct AbstractShape {
    type_name: String,
    reference: ComponentRef,
}

impl<'c> SchemaResolver<'c> {
    /// Split a discriminated schema into an abstract shape plus tagged
    /// variants. Degrades to plain parsing when there is nothing to branch
    /// on: no usable name, or a discriminator without a mapping.
    pub(crate) fn parse_discriminator(
        &mut self,
        schema: &RawSchema,
        discriminator: &Discriminator,
        type_name: Option<&str>,
        path: &[String],
    ) -> Result<TypeModel, ResolveError> {
        let mut stripped = schema.clone();
        stripped.discriminator = None;

        let type_name = match type_name {
            Some(name) if !discriminator.mapping.is_empty() => name,
            _ => return self.parse_schema(&stripped, type_name, path),
        };

        // A combinator member list alongside the mapping is authoritative:
        // emitting both polymorphic encodings would conflict.
        let skip_mapping = !schema.one_of.is_empty() || !schema.any_of.is_empty();
        let self_reference = component_reference(path);

        let abstract_shape = self.build_abstract_shape(&stripped, type_name)?;
        let complex_content = self.combinator_content(&stripped, path)?;
        let variant_union = self.build_mapping_variants(
            discriminator,
            skip_mapping,
            abstract_shape.as_ref(),
            self_reference.as_ref(),
            path,
        )?;

        let mut union_members = Vec::new();
        if let Some(content) = complex_content {
            union_members.push(content);
        }
        if let Some(variants) = variant_union {
            match variants {
                TypeExpr::Union(members) => union_members.extend(members),
                other => union_members.push(other),
            }
        }

        let content = match (&abstract_shape, union_members.is_empty()) {
            (Some(shape), false) => TypeExpr::intersection(vec![
                TypeExpr::Ref(shape.type_name.clone()),
                TypeExpr::union(union_members),
            ]),
            (Some(shape), true) => TypeExpr::Ref(shape.type_name.clone()),
            (None, false) => TypeExpr::union(union_members),
            (None, true) => return self.parse_schema(&stripped, Some(type_name), path),
        };

        Ok(TypeModel {
            kind: ModelKind::Complex,
            type_identifier: TypeIdentifier::Type,
            name: Some(type_name.to_string()),
            reference: None,
            content,
            description: normalize_description(schema.description.as_deref()),
            generic_args: vec![],
            members: vec![],
            internal: false,
        })
    }

    /// Synthesize the abstract component from the schema's own non-composite
    /// residue. An empty residue yields no abstract shape.
    fn build_abstract_shape(
        &mut self,
        stripped: &RawSchema,
        type_name: &str,
    ) -> Result<Option<AbstractShape>, ResolveError> {
        let mut residual = stripped.clone();
        residual.all_of = Vec::new();
        residual.one_of = Vec::new();
        residual.any_of = Vec::new();
        if residual == RawSchema::default() {
            return Ok(None);
        }

        let candidates: Vec<String> = ["Abstract", "Discriminator", "Internal", "Polymorph"]
            .iter()
            .map(|prefix| {
                self.names
                    .format(&format!("{prefix} {type_name}"), NamePurpose::TypeName)
            })
            .collect();
        let abstract_name = self.component_names.resolve(&candidates)?;
        let reference = self.register_internal(&abstract_name, residual);
        self.resolve_component(&reference)?;

        Ok(Some(AbstractShape {
            type_name: abstract_name,
            reference,
        }))
    }

    /// Build one tagged variant per mapping entry, rewriting variant
    /// self-references onto the abstract shape. Returns `None` when the
    /// mapping union is suppressed by an authoritative combinator list (the
    /// rewrite side effect still applies).
    fn build_mapping_variants(
        &mut self,
        discriminator: &Discriminator,
        skip_mapping: bool,
        abstract_shape: Option<&AbstractShape>,
        self_reference: Option<&ComponentRef>,
        path: &[String],
    ) -> Result<Option<TypeExpr>, ResolveError> {
        let property = &discriminator.property_name;

        // With an abstract shape and two or more entries, one generic
        // tag-to-payload helper keeps the output linear in variant count.
        let mut helper_name = None;
        if !skip_mapping && discriminator.mapping.len() >= 2 {
            if let Some(shape) = abstract_shape {
                helper_name = Some(self.create_mapping_helper(&shape.type_name, property)?);
            }
        }

        let mut variants = Vec::with_capacity(discriminator.mapping.len());
        for (tag, target) in &discriminator.mapping {
            let target_ref = ComponentRef::from_mapping_target(target)?;
            if let (Some(shape), Some(own)) = (abstract_shape, self_reference) {
                self.registry
                    .rewrite_combinator_refs(&target_ref, own, &shape.reference);
            }

            let target_schema = RawSchema {
                ref_path: Some(target_ref.pointer()),
                ..Default::default()
            };
            let payload = self.inline_content(&target_schema, path)?;

            let variant = match &helper_name {
                Some(helper) => TypeExpr::Generic {
                    base: helper.clone(),
                    args: vec![TypeExpr::StringLiteral(tag.clone()), payload],
                },
                None => TypeExpr::intersection(vec![
                    tag_record(property, TypeExpr::StringLiteral(tag.clone())),
                    payload,
                ]),
            };
            variants.push(variant);
        }

        if skip_mapping {
            return Ok(None);
        }
        Ok(Some(TypeExpr::union(variants)))
    }

    /// Synthesize the generic two-parameter tag-to-payload helper once and
    /// register it as an internal component.
    fn create_mapping_helper(
        &mut self,
        abstract_name: &str,
        property: &str,
    ) -> Result<String, ResolveError> {
        let candidates: Vec<String> = [
            format!("{abstract_name} {property} Mapping"),
            format!("{abstract_name} Map Type By {property}"),
            format!("{abstract_name} Mapping"),
            format!("{abstract_name} Mapper"),
            format!("{abstract_name} MapType"),
        ]
        .iter()
        .map(|candidate| self.names.format(candidate, NamePurpose::TypeName))
        .collect();
        let helper_name = self.component_names.resolve(&candidates)?;

        let reference = self.register_internal(&helper_name, RawSchema::default());
        let model = Rc::new(TypeModel {
            kind: ModelKind::Complex,
            type_identifier: TypeIdentifier::Type,
            name: Some(helper_name.clone()),
            reference: Some(reference.clone()),
            content: TypeExpr::intersection(vec![
                tag_record(property, TypeExpr::Ref("Key".to_string())),
                TypeExpr::Ref("Type".to_string()),
            ]),
            description: String::new(),
            generic_args: vec!["Key".to_string(), "Type".to_string()],
            members: vec![],
            internal: true,
        });
        self.registry.complete(&reference, model);
        Ok(helper_name)
    }
}

fn tag_record(property: &str, value: TypeExpr) -> TypeExpr {
    TypeExpr::Record {
        fields: vec![RecordField {
            name: property.to_string(),
            expr: value,
            optional: false,
            read_only: false,
            description: None,
        }],
        additional: None,
    }
}

/// The component reference a top-level schema is being resolved under, used
/// to detect variant self-references. Nested paths never denote a component.
fn component_reference(path: &[String]) -> Option<ComponentRef> {
    match path {
        [label] => Some(ComponentRef::schema(label.clone())),
        _ => None,
    }
}
