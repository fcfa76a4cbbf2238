use std::collections::HashSet;
use std::rc::Rc;

use otc_core::config::GenConfig;
use otc_core::model::{ComponentRef, ModelKind, TypeExpr, TypeIdentifier, TypeModel};
use otc_core::model::type_model::EnumLiteral;
use otc_core::parse;
use otc_core::resolve::{self, SchemaResolver};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const POLYMORPHIC: &str = include_str!("fixtures/polymorphic.yaml");

fn find<'a>(models: &'a [Rc<TypeModel>], name: &str) -> &'a TypeModel {
    models
        .iter()
        .find(|m| m.name.as_deref() == Some(name))
        .map(|m| m.as_ref())
        .unwrap_or_else(|| panic!("missing model {name}"))
}

#[test]
fn resolution_is_idempotent() {
    let document = parse::from_yaml(PETSTORE).unwrap();
    let config = GenConfig::default();
    let mut resolver = SchemaResolver::new(&config);
    resolver.load_components(&document);

    let reference = ComponentRef::schema("Pet");
    let first = resolver.resolve_component(&reference).unwrap();
    let second = resolver.resolve_component(&reference).unwrap();
    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn self_referential_schema_resolves_to_named_forward_reference() {
    let document = parse::from_yaml(PETSTORE).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();
    assert!(compiled.errors.is_empty());

    let category = find(&compiled.models, "Category");
    let TypeExpr::Record { fields, .. } = &category.content else {
        panic!("Category should resolve to a record");
    };
    let parent = fields.iter().find(|f| f.name == "parent").unwrap();
    assert_eq!(parent.expr, TypeExpr::Ref("Category".to_string()));
}

#[test]
fn colliding_labels_format_to_distinct_identifiers() {
    let yaml = r#"
openapi: 3.0.0
info: {title: Collisions, version: "1"}
components:
  schemas:
    foo-bar:
      type: string
    FooBar:
      type: integer
    foo bar:
      type: boolean
"#;
    let document = parse::from_yaml(yaml).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    let names: Vec<&str> = compiled
        .models
        .iter()
        .filter_map(|m| m.name.as_deref())
        .collect();
    let unique: HashSet<&&str> = names.iter().collect();
    assert_eq!(names.len(), 3);
    assert_eq!(unique.len(), names.len(), "names must be pairwise distinct: {names:?}");
    assert!(names.contains(&"FooBar"));
    assert!(names.contains(&"FooBar2"));
    assert!(names.contains(&"FooBar3"));
}

#[test]
fn enum_keys_are_unique_within_one_enum() {
    let yaml = r#"
openapi: 3.0.0
info: {title: Enums, version: "1"}
components:
  schemas:
    Label:
      type: string
      enum: ["Foo Bar", "foo-bar"]
"#;
    let document = parse::from_yaml(yaml).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    let label = find(&compiled.models, "Label");
    assert_eq!(label.kind, ModelKind::Enum);
    let keys: Vec<&str> = label.members.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["FooBar", "FooBar2"]);
    assert_eq!(
        label.members[1].value,
        EnumLiteral::String("foo-bar".to_string())
    );
}

#[test]
fn discriminator_round_trip() {
    let document = parse::from_yaml(POLYMORPHIC).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();
    assert!(compiled.errors.is_empty());

    let pet = find(&compiled.models, "Pet");
    let TypeExpr::Intersection(parts) = &pet.content else {
        panic!("discriminated Pet should be an intersection, got {:?}", pet.content);
    };
    assert_eq!(parts[0], TypeExpr::Ref("AbstractPet".to_string()));

    let TypeExpr::Union(variants) = &parts[1] else {
        panic!("second member should be the variant union");
    };
    assert_eq!(variants.len(), 2);
    for (variant, (tag, payload)) in variants.iter().zip([("cat", "Cat"), ("dog", "Dog")]) {
        let TypeExpr::Generic { base, args } = variant else {
            panic!("variant should use the generic mapping helper");
        };
        assert_eq!(base, "AbstractPetPetTypeMapping");
        assert_eq!(args[0], TypeExpr::StringLiteral(tag.to_string()));
        assert_eq!(args[1], TypeExpr::Ref(payload.to_string()));
    }

    // The helper is synthesized once, generic over tag and payload.
    let helper = find(&compiled.models, "AbstractPetPetTypeMapping");
    assert!(helper.internal);
    assert_eq!(helper.generic_args, vec!["Key".to_string(), "Type".to_string()]);

    // The abstract shape carries the schema's own properties.
    let abstract_pet = find(&compiled.models, "AbstractPet");
    assert!(abstract_pet.internal);
    let TypeExpr::Record { fields, .. } = &abstract_pet.content else {
        panic!("abstract shape should be a record");
    };
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "name");
}

#[test]
fn variant_self_references_are_rewritten_to_the_abstract_shape() {
    let document = parse::from_yaml(POLYMORPHIC).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    let cat = find(&compiled.models, "Cat");
    let TypeExpr::Intersection(parts) = &cat.content else {
        panic!("Cat should be an intersection, got {:?}", cat.content);
    };
    assert_eq!(parts[0], TypeExpr::Ref("AbstractPet".to_string()));
    assert!(
        !parts.contains(&TypeExpr::Ref("Pet".to_string())),
        "variant must not point back at the polymorphic schema"
    );
}

#[test]
fn one_of_alongside_mapping_suppresses_the_mapping_type() {
    let document = parse::from_yaml(POLYMORPHIC).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    let shape = find(&compiled.models, "Shape");
    let TypeExpr::Intersection(parts) = &shape.content else {
        panic!("Shape should intersect its abstract shape with the oneOf union");
    };
    assert_eq!(parts[0], TypeExpr::Ref("AbstractShape".to_string()));
    let TypeExpr::Union(members) = &parts[1] else {
        panic!("oneOf member list should stay authoritative");
    };
    assert_eq!(
        members,
        &vec![
            TypeExpr::Ref("Circle".to_string()),
            TypeExpr::Ref("Square".to_string()),
        ]
    );

    assert!(
        !compiled.models.iter().any(|m| {
            m.name
                .as_deref()
                .is_some_and(|n| n.starts_with("AbstractShape") && n != "AbstractShape")
        }),
        "no mapping helper may be synthesized when oneOf is present"
    );
}

#[test]
fn discriminator_without_mapping_degrades_to_a_bare_object() {
    let document = parse::from_yaml(POLYMORPHIC).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    let tagged = find(&compiled.models, "Tagged");
    assert_eq!(tagged.kind, ModelKind::Complex);
    let TypeExpr::Record { fields, .. } = &tagged.content else {
        panic!("Tagged should parse as if the discriminator were absent");
    };
    assert_eq!(fields[0].name, "tag");
}

#[test]
fn array_of_arrays_enum_becomes_a_union_of_tuples() {
    let yaml = r#"
openapi: 3.0.0
info: {title: Enums, version: "1"}
components:
  schemas:
    Pairs:
      enum: [["a", "b"], ["c", "d"]]
"#;
    let document = parse::from_yaml(yaml).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    let pairs = find(&compiled.models, "Pairs");
    assert_eq!(pairs.kind, ModelKind::Complex);
    let TypeExpr::Union(rows) = &pairs.content else {
        panic!("expected a union of tuples, got {:?}", pairs.content);
    };
    assert_eq!(rows.len(), 2);
    let TypeExpr::Tuple(first) = &rows[0] else {
        panic!("each row should be a fixed-length tuple");
    };
    assert_eq!(
        first,
        &vec![
            TypeExpr::StringLiteral("a".to_string()),
            TypeExpr::StringLiteral("b".to_string()),
        ]
    );
}

#[test]
fn enum_names_as_values_overrides_declared_values() {
    let yaml = r#"
openapi: 3.0.0
info: {title: Enums, version: "1"}
components:
  schemas:
    Level:
      type: integer
      enum: [1, 2]
      x-enum-varnames: [One, Two]
"#;
    let document = parse::from_yaml(yaml).unwrap();
    let mut config = GenConfig::default();
    config.enum_names_as_values = true;
    let compiled = resolve::compile(&document, &config).unwrap();

    let level = find(&compiled.models, "Level");
    let values: Vec<&EnumLiteral> = level.members.iter().map(|m| &m.value).collect();
    assert_eq!(
        values,
        vec![
            &EnumLiteral::String("One".to_string()),
            &EnumLiteral::String("Two".to_string()),
        ]
    );
}

#[test]
fn declared_numeric_enum_values_stay_numeric() {
    let yaml = r#"
openapi: 3.0.0
info: {title: Enums, version: "1"}
components:
  schemas:
    Level:
      type: integer
      enum: [1, 2]
      x-enum-varnames: [One, Two]
"#;
    let document = parse::from_yaml(yaml).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    let level = find(&compiled.models, "Level");
    assert_eq!(level.members[0].key, "One");
    assert_eq!(level.members[0].value, EnumLiteral::Number(1.into()));
}

#[test]
fn additional_properties_resolve_to_a_keyed_map() {
    let document = parse::from_yaml(PETSTORE).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    let metadata = find(&compiled.models, "Metadata");
    assert_eq!(metadata.kind, ModelKind::Complex);
    assert_eq!(
        metadata.content,
        TypeExpr::Map(Box::new(TypeExpr::Keyword(
            otc_core::model::TsKeyword::Number
        )))
    );
}

#[test]
fn inline_enums_extract_to_named_components() {
    let document = parse::from_yaml(PETSTORE).unwrap();
    let mut config = GenConfig::default();
    config.extract_enums = true;
    let compiled = resolve::compile(&document, &config).unwrap();

    let pet = find(&compiled.models, "Pet");
    let TypeExpr::Record { fields, .. } = &pet.content else {
        panic!("Pet should be a record");
    };
    let status = fields.iter().find(|f| f.name == "status").unwrap();
    assert_eq!(status.expr, TypeExpr::Ref("PetStatus".to_string()));

    let extracted = find(&compiled.models, "PetStatus");
    assert_eq!(extracted.kind, ModelKind::Enum);
    assert_eq!(extracted.type_identifier, TypeIdentifier::Enum);
    assert!(extracted.internal);
    assert_eq!(extracted.members.len(), 3);
}

#[test]
fn route_use_sites_get_inferred_names() {
    let document = parse::from_yaml(PETSTORE).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    let list = compiled.routes.iter().find(|r| r.name == "listPets").unwrap();
    let response = list.response.as_ref().unwrap();
    assert_eq!(response.name.as_deref(), Some("ListPetsResponse"));
    assert_eq!(
        response.content,
        TypeExpr::Array(Box::new(TypeExpr::Ref("Pet".to_string())))
    );

    let create = compiled.routes.iter().find(|r| r.name == "createPet").unwrap();
    let request = create.request.as_ref().unwrap();
    assert_eq!(request.name.as_deref(), Some("CreatePetRequest"));
    assert_eq!(request.content, TypeExpr::Ref("NewPet".to_string()));

    // No operationId: the name derives from method + route.
    let delete = compiled
        .routes
        .iter()
        .find(|r| r.method == "delete")
        .unwrap();
    assert_eq!(delete.name, "deletePet");
}

#[test]
fn a_malformed_reference_does_not_block_the_rest_of_the_document() {
    let yaml = r##"
openapi: 3.0.0
info: {title: Broken, version: "1"}
components:
  schemas:
    Broken:
      type: object
      properties:
        missing:
          $ref: "#/components/schemas/DoesNotExist"
    Fine:
      type: string
"##;
    let document = parse::from_yaml(yaml).unwrap();
    let config = GenConfig::default();
    let compiled = resolve::compile(&document, &config).unwrap();

    assert_eq!(compiled.errors.len(), 1);
    assert_eq!(compiled.errors[0].0, ComponentRef::schema("Broken"));
    let fine = find(&compiled.models, "Fine");
    assert_eq!(fine.kind, ModelKind::Primitive);
}

#[test]
fn union_enum_output_uses_type_identifier() {
    let yaml = r#"
openapi: 3.0.0
info: {title: Enums, version: "1"}
components:
  schemas:
    Status:
      type: string
      enum: ["on", "off"]
"#;
    let document = parse::from_yaml(yaml).unwrap();
    let mut config = GenConfig::default();
    config.generate_union_enums = true;
    let compiled = resolve::compile(&document, &config).unwrap();

    let status = find(&compiled.models, "Status");
    assert_eq!(status.type_identifier, TypeIdentifier::Type);
    assert_eq!(
        status.content,
        TypeExpr::Union(vec![
            TypeExpr::StringLiteral("on".to_string()),
            TypeExpr::StringLiteral("off".to_string()),
        ])
    );
}
