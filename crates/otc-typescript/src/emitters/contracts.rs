use minijinja::{Environment, context};
use otc_core::model::{ModelKind, TypeExpr, TypeIdentifier, TypeModel};
use otc_core::resolve::CompiledTypes;

use crate::render::{enum_literal_to_ts, field_declaration, type_expr_to_ts};

/// Emit `data-contracts.ts` with every resolved model followed by the route
/// contracts.
pub fn emit_contracts(compiled: &CompiledTypes) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(
        "data-contracts.ts.j2",
        include_str!("../../templates/data-contracts.ts.j2"),
    )?;
    let tmpl = env.get_template("data-contracts.ts.j2")?;

    let models: Vec<minijinja::Value> = compiled
        .models
        .iter()
        .filter(|model| model.name.is_some())
        .map(|model| model_to_ctx(model))
        .collect();

    let routes: Vec<minijinja::Value> = compiled
        .routes
        .iter()
        .flat_map(|route| [route.request.as_ref(), route.response.as_ref()])
        .flatten()
        .map(model_to_ctx)
        .collect();

    log::debug!(
        "emitting {} model(s) and {} route contract(s)",
        models.len(),
        routes.len()
    );
    tmpl.render(context! { models => models, routes => routes })
}

fn model_to_ctx(model: &TypeModel) -> minijinja::Value {
    let name = model.name.clone().unwrap_or_default();
    let description = model.description.clone();

    if model.kind == ModelKind::Enum
        && model.type_identifier == TypeIdentifier::Enum
        && !model.members.is_empty()
    {
        let members: Vec<minijinja::Value> = model
            .members
            .iter()
            .map(|member| {
                context! {
                    key => member.key.clone(),
                    value => enum_literal_to_ts(&member.value),
                }
            })
            .collect();
        return context! {
            kind => "enum",
            name => name,
            description => description,
            members => members,
        };
    }

    if model.type_identifier == TypeIdentifier::Interface && model.generic_args.is_empty() {
        if let TypeExpr::Record { fields, additional } = &model.content {
            let field_ctxs: Vec<minijinja::Value> = fields
                .iter()
                .map(|field| {
                    context! {
                        decl => field_declaration(field),
                        description => field.description.clone(),
                    }
                })
                .collect();
            return context! {
                kind => "interface",
                name => name,
                description => description,
                fields => field_ctxs,
                additional => additional.as_deref().map(type_expr_to_ts),
            };
        }
    }

    let generics = if model.generic_args.is_empty() {
        String::new()
    } else {
        format!("<{}>", model.generic_args.join(", "))
    };
    context! {
        kind => "alias",
        name => name,
        description => description,
        generics => generics,
        content => type_expr_to_ts(&model.content),
    }
}
