use otc_core::config::GenConfig;
use otc_core::parse;
use otc_core::resolve;
use otc_core::CodeGenerator;
use otc_typescript::{TsOptions, TypescriptGenerator};

fn emit(yaml: &str, config: &GenConfig) -> String {
    let document = parse::from_yaml(yaml).unwrap();
    let compiled = resolve::compile(&document, config).unwrap();
    let files = TypescriptGenerator
        .generate(&compiled, &TsOptions::default())
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "data-contracts.ts");
    files[0].content.clone()
}

#[test]
fn emits_interfaces_enums_and_aliases() {
    let yaml = r##"
openapi: 3.0.0
info: {title: Mini, version: "1"}
paths:
  /things:
    get:
      operationId: listThings
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Thing"
components:
  schemas:
    Thing:
      type: object
      description: One thing.
      required: [id]
      properties:
        id:
          type: integer
        label:
          type: string
    Status:
      type: string
      enum: [ready, done]
    Id:
      type: integer
"##;
    let content = emit(yaml, &GenConfig::default());

    assert!(content.contains("export interface Thing {"));
    assert!(content.contains("id: number;"));
    assert!(content.contains("label?: string;"));
    assert!(content.contains("/** One thing. */"));

    assert!(content.contains("export enum Status {"));
    assert!(content.contains("Ready = \"ready\","));
    assert!(content.contains("Done = \"done\","));

    assert!(content.contains("export type Id = number;"));
    assert!(content.contains("export type ListThingsResponse = Thing[];"));
}

#[test]
fn emits_union_enums_as_type_aliases() {
    let yaml = r#"
openapi: 3.0.0
info: {title: Mini, version: "1"}
components:
  schemas:
    Status:
      type: string
      enum: [ready, done]
"#;
    let mut config = GenConfig::default();
    config.generate_union_enums = true;
    let content = emit(yaml, &config);
    assert!(content.contains("export type Status = \"ready\" | \"done\";"));
    assert!(!content.contains("export enum Status"));
}

#[test]
fn emits_generic_mapping_helper_for_discriminated_schemas() {
    let yaml = r##"
openapi: 3.0.0
info: {title: Zoo, version: "1"}
components:
  schemas:
    Pet:
      type: object
      properties:
        name:
          type: string
      discriminator:
        propertyName: pet_type
        mapping:
          cat: "#/components/schemas/Cat"
          dog: "#/components/schemas/Dog"
    Cat:
      type: object
      properties:
        hunts:
          type: boolean
    Dog:
      type: object
      properties:
        barks:
          type: boolean
"##;
    let content = emit(yaml, &GenConfig::default());

    assert!(content.contains(
        "export type AbstractPetPetTypeMapping<Key, Type> = { pet_type: Key } & Type;"
    ));
    assert!(content.contains(
        "export type Pet = AbstractPet & (AbstractPetPetTypeMapping<\"cat\", Cat> | AbstractPetPetTypeMapping<\"dog\", Dog>);"
    ));
    assert!(content.contains("export interface AbstractPet {"));
}
