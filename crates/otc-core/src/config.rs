use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;

use crate::model::type_model::TypeModel;
use crate::parse::schema::RawSchema;
use crate::resolve::RouteTypes;
use crate::resolve::names::NamePurpose;

pub type SchemaHook = Rc<dyn Fn(&RawSchema) -> Option<RawSchema>>;
pub type ParsedSchemaHook = Rc<dyn Fn(&RawSchema, &TypeModel) -> Option<TypeModel>>;
pub type RouteHook = Rc<dyn Fn(&RouteTypes) -> Option<RouteTypes>>;
pub type ConfigHook = Rc<dyn Fn(&GenConfig) -> Option<GenConfig>>;
/// Receives the computed identifier, the original label, and the purpose.
pub type FormatNameHook = Rc<dyn Fn(&str, &str, NamePurpose) -> Option<String>>;

/// Extension points invoked at well-defined moments of a compilation run.
/// Each hook receives the in-progress value and may return a replacement;
/// `None` means no override.
#[derive(Clone, Default)]
pub struct Hooks {
    /// Invoked when a component is registered, before any parsing.
    pub on_create_schema: Option<SchemaHook>,
    /// Invoked after a component's model has been computed, before caching.
    pub on_parse_schema: Option<ParsedSchemaHook>,
    /// Invoked after a route's request/response types have been resolved.
    pub on_create_route: Option<RouteHook>,
    /// Invoked on initial config assembly.
    pub on_init: Option<ConfigHook>,
    /// Invoked on final config assembly, right before compilation.
    pub on_prepare_config: Option<ConfigHook>,
    /// Invoked whenever a type name or enum key has been formatted.
    pub on_format_type_name: Option<FormatNameHook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn flag<T>(hook: &Option<T>) -> &'static str {
            if hook.is_some() { "set" } else { "unset" }
        }
        f.debug_struct("Hooks")
            .field("on_create_schema", &flag(&self.on_create_schema))
            .field("on_parse_schema", &flag(&self.on_parse_schema))
            .field("on_create_route", &flag(&self.on_create_route))
            .field("on_init", &flag(&self.on_init))
            .field("on_prepare_config", &flag(&self.on_prepare_config))
            .field("on_format_type_name", &flag(&self.on_format_type_name))
            .finish()
    }
}

/// Options recognized by the resolution engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Promote inline enums found at a named path to standalone components.
    pub extract_enums: bool,
    /// Emit every enum member's symbolic name as its literal value.
    pub enum_names_as_values: bool,
    /// Emit enums as unions of literals instead of tagged enums.
    pub generate_union_enums: bool,

    pub type_prefix: String,
    pub type_suffix: String,
    pub enum_key_prefix: String,
    pub enum_key_suffix: String,

    /// Inserted before labels that start with an invalid character.
    pub fix_invalid_type_name_prefix: String,
    pub fix_invalid_enum_key_prefix: String,

    /// Candidate suffixes when naming an extracted enum component.
    pub extract_enum_suffixes: Vec<String>,

    #[serde(skip)]
    pub hooks: Hooks,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            extract_enums: false,
            enum_names_as_values: false,
            generate_union_enums: false,
            type_prefix: String::new(),
            type_suffix: String::new(),
            enum_key_prefix: String::new(),
            enum_key_suffix: String::new(),
            fix_invalid_type_name_prefix: "Type".to_string(),
            fix_invalid_enum_key_prefix: "Value".to_string(),
            extract_enum_suffixes: vec!["Enum".to_string(), "Values".to_string()],
            hooks: Hooks::default(),
        }
    }
}

impl GenConfig {
    /// Apply the `on_init` hook to a freshly assembled config.
    pub fn finalize(self) -> GenConfig {
        if let Some(hook) = self.hooks.on_init.clone() {
            if let Some(replaced) = hook(&self) {
                return replaced;
            }
        }
        self
    }
}

/// Top-level project configuration loaded from `.otc.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OtcConfig {
    pub input: String,
    pub output: String,
    pub codegen: GenConfig,
}

impl Default for OtcConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "src/generated".to_string(),
            codegen: GenConfig::default(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".otc.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OtcConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OtcConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# otc configuration — https://github.com/otc-rs/otc
input: openapi.yaml
output: src/generated

codegen:
  extract_enums: false        # promote inline enums to named components
  enum_names_as_values: false # use symbolic names as member values
  generate_union_enums: false # union-of-literals instead of enum declarations
  type_prefix: ""
  type_suffix: ""
  enum_key_prefix: ""
  enum_key_suffix: ""
  fix_invalid_type_name_prefix: Type
  fix_invalid_enum_key_prefix: Value
"#
}
