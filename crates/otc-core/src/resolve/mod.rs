pub mod discriminator;
pub mod dispatch;
pub mod enums;
pub mod names;
pub mod registry;

use std::rc::Rc;

use serde::Serialize;

use crate::config::GenConfig;
use crate::error::ResolveError;
use crate::model::reference::ComponentRef;
use crate::model::type_expr::TypeExpr;
use crate::model::type_model::{ModelKind, TypeIdentifier, TypeModel};
use crate::parse::document::ApiDocument;
use crate::parse::operation::Operation;
use crate::parse::schema::RawSchema;

use names::{ComponentNameResolver, NamePurpose, TypeNameFormatter};
use registry::{ComponentRegistry, ResolutionState};

/// One resolved route use-site: request and response models parsed under
/// names inferred from the operation.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTypes {
    pub name: String,
    pub method: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<TypeModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<TypeModel>,
}

/// Output of a compilation run: resolved models in stable order (declared
/// components in document order, synthesized ones after in creation order),
/// route types, and the recoverable errors encountered along the way.
#[derive(Debug)]
pub struct CompiledTypes {
    pub models: Vec<Rc<TypeModel>>,
    pub routes: Vec<RouteTypes>,
    pub errors: Vec<(ComponentRef, ResolveError)>,
}

/// The resolution engine: a single-threaded recursive-descent compiler over
/// the document graph. Owns the component registry (the only shared mutable
/// resource) and the per-run naming state.
pub struct SchemaResolver<'c> {
    pub(crate) config: &'c GenConfig,
    pub registry: ComponentRegistry,
    pub(crate) names: TypeNameFormatter<'c>,
    pub(crate) component_names: ComponentNameResolver,
}

impl<'c> SchemaResolver<'c> {
    pub fn new(config: &'c GenConfig) -> Self {
        Self {
            config,
            registry: ComponentRegistry::new(),
            names: TypeNameFormatter::new(config),
            component_names: ComponentNameResolver::new(),
        }
    }

    /// Register every declared component, claiming a collision-free
    /// identifier for each in declaration order.
    pub fn load_components(&mut self, document: &ApiDocument) {
        if let Some(components) = &document.components {
            for (label, schema) in &components.schemas {
                self.register_declared(label, schema.clone());
            }
        }
    }

    /// Register a declared component under its document label.
    pub fn register_declared(&mut self, label: &str, raw: RawSchema) -> ComponentRef {
        let raw = self.apply_create_hook(raw);
        let formatted = self.names.format(label, NamePurpose::TypeName);
        let type_name = self.component_names.claim(&formatted);
        let reference = ComponentRef::schema(label);
        self.registry.register(reference.clone(), raw, type_name, false);
        reference
    }

    /// Register a synthesized component under an already-claimed identifier.
    pub(crate) fn register_internal(&mut self, type_name: &str, raw: RawSchema) -> ComponentRef {
        let raw = self.apply_create_hook(raw);
        let reference = ComponentRef::schema(type_name);
        self.registry
            .register(reference.clone(), raw, type_name.to_string(), true);
        reference
    }

    fn apply_create_hook(&self, raw: RawSchema) -> RawSchema {
        match &self.config.hooks.on_create_schema {
            Some(hook) => hook(&raw).unwrap_or(raw),
            None => raw,
        }
    }

    /// Resolve a component to its type model. The first resolution computes
    /// and caches the model; later calls return the identical cached value.
    /// A cyclic re-entry observes the in-progress marker and yields a named
    /// forward reference instead of recursing.
    pub fn resolve_component(
        &mut self,
        reference: &ComponentRef,
    ) -> Result<Rc<TypeModel>, ResolveError> {
        let (raw, type_name, internal) = {
            let component = self
                .registry
                .get(reference)
                .ok_or_else(|| ResolveError::RefTargetNotFound(reference.pointer()))?;
            match &component.state {
                ResolutionState::Resolved(model) => return Ok(Rc::clone(model)),
                ResolutionState::InProgress => {
                    return Ok(Rc::new(TypeModel {
                        kind: ModelKind::Complex,
                        type_identifier: TypeIdentifier::Type,
                        name: None,
                        reference: Some(reference.clone()),
                        content: TypeExpr::Ref(component.type_name.clone()),
                        description: String::new(),
                        generic_args: vec![],
                        members: vec![],
                        internal: component.internal,
                    }));
                }
                ResolutionState::Unresolved => (
                    component.raw.clone(),
                    component.type_name.clone(),
                    component.internal,
                ),
            }
        };

        self.registry.begin(reference);
        let path = vec![reference.name().to_string()];
        let mut model = match self.parse_schema(&raw, Some(&type_name), &path) {
            Ok(model) => model,
            Err(error) => {
                self.registry.fail(reference);
                return Err(error);
            }
        };
        model.name = Some(type_name);
        model.reference = Some(reference.clone());
        model.internal = internal;

        if let Some(hook) = self.config.hooks.on_parse_schema.clone() {
            if let Some(replacement) = hook(&raw, &model) {
                model = replacement;
            }
        }

        let model = Rc::new(model);
        self.registry.complete(reference, Rc::clone(&model));
        Ok(model)
    }

    /// Resolve every registered component, recovering per component: one
    /// malformed component must not block the rest of the document.
    pub fn resolve_all(&mut self) -> Result<Vec<(ComponentRef, ResolveError)>, ResolveError> {
        let mut errors = Vec::new();
        for reference in self.registry.references() {
            if let Err(error) = self.resolve_component(&reference) {
                if error.is_fatal() {
                    return Err(error);
                }
                log::warn!("skipping component {reference}: {error}");
                errors.push((reference, error));
            }
        }
        Ok(errors)
    }

    /// Parse the route-level use sites under inferred names.
    pub fn resolve_routes(
        &mut self,
        document: &ApiDocument,
    ) -> Result<Vec<RouteTypes>, ResolveError> {
        let mut routes = Vec::new();
        for (route_path, item) in &document.paths {
            for (method, operation) in item.operations() {
                let op_name = operation
                    .operation_id
                    .clone()
                    .unwrap_or_else(|| names::route_operation_name(method, route_path));

                let request =
                    self.route_model(&op_name, "Request", request_schema(operation))?;
                let response =
                    self.route_model(&op_name, "Response", response_schema(operation))?;

                let mut route = RouteTypes {
                    name: op_name,
                    method: method.to_string(),
                    path: route_path.clone(),
                    request,
                    response,
                };
                if let Some(hook) = self.config.hooks.on_create_route.clone() {
                    if let Some(replacement) = hook(&route) {
                        route = replacement;
                    }
                }
                routes.push(route);
            }
        }
        Ok(routes)
    }

    fn route_model(
        &mut self,
        op_name: &str,
        suffix: &str,
        schema: Option<&RawSchema>,
    ) -> Result<Option<TypeModel>, ResolveError> {
        let Some(schema) = schema else {
            return Ok(None);
        };
        let formatted = self
            .names
            .format(&format!("{op_name} {suffix}"), NamePurpose::TypeName);
        let type_name = self.component_names.claim(&formatted);
        let path = vec![op_name.to_string(), suffix.to_lowercase()];
        match self.parse_schema(schema, Some(&type_name), &path) {
            Ok(mut model) => {
                model.name = Some(type_name);
                Ok(Some(model))
            }
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                log::warn!("skipping {type_name}: {error}");
                Ok(None)
            }
        }
    }

    /// All resolved models in stable output order.
    pub fn models(&self) -> Vec<Rc<TypeModel>> {
        self.registry.resolved_models()
    }
}

fn request_schema(operation: &Operation) -> Option<&RawSchema> {
    operation
        .request_body
        .as_ref()?
        .content
        .values()
        .find_map(|media| media.schema.as_ref())
}

fn response_schema(operation: &Operation) -> Option<&RawSchema> {
    operation
        .responses
        .iter()
        .find(|(status, _)| status.starts_with('2'))
        .and_then(|(_, response)| response.content.values().find_map(|media| media.schema.as_ref()))
}

/// Compile a parsed document into its emit-ready type models.
pub fn compile(document: &ApiDocument, config: &GenConfig) -> Result<CompiledTypes, ResolveError> {
    let prepared;
    let config = match config.hooks.on_prepare_config.clone() {
        Some(hook) => {
            prepared = hook(config).unwrap_or_else(|| config.clone());
            &prepared
        }
        None => config,
    };

    let mut resolver = SchemaResolver::new(config);
    resolver.load_components(document);
    let errors = resolver.resolve_all()?;
    let routes = resolver.resolve_routes(document)?;
    Ok(CompiledTypes {
        models: resolver.models(),
        routes,
        errors,
    })
}

pub(crate) fn normalize_description(description: Option<&str>) -> String {
    description.map(str::trim).unwrap_or_default().to_string()
}
