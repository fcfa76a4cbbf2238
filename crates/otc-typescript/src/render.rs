use otc_core::model::type_model::EnumLiteral;
use otc_core::model::{RecordField, TypeExpr};

/// Render a type expression as TypeScript source text.
pub fn type_expr_to_ts(expr: &TypeExpr) -> String {
    match expr {
        TypeExpr::Keyword(keyword) => keyword.as_str().to_string(),
        TypeExpr::StringLiteral(value) => format!("\"{}\"", escape_string(value)),
        TypeExpr::NumberLiteral(value) => value.to_string(),
        TypeExpr::BooleanLiteral(value) => value.to_string(),
        TypeExpr::Ref(name) => name.clone(),
        TypeExpr::Array(inner) => {
            let rendered = type_expr_to_ts(inner);
            if is_compound(inner) {
                format!("({rendered})[]")
            } else {
                format!("{rendered}[]")
            }
        }
        TypeExpr::Tuple(items) => {
            let rendered: Vec<String> = items.iter().map(type_expr_to_ts).collect();
            format!("[{}]", rendered.join(", "))
        }
        TypeExpr::Record { fields, additional } => {
            render_record(fields, additional.as_deref())
        }
        TypeExpr::Map(value) => format!("Record<string, {}>", type_expr_to_ts(value)),
        TypeExpr::Union(members) => {
            let rendered: Vec<String> = members.iter().map(type_expr_to_ts).collect();
            rendered.join(" | ")
        }
        TypeExpr::Intersection(members) => {
            let rendered: Vec<String> = members
                .iter()
                .map(|member| {
                    let text = type_expr_to_ts(member);
                    // Union members bind looser than `&`.
                    if matches!(member, TypeExpr::Union(_)) {
                        format!("({text})")
                    } else {
                        text
                    }
                })
                .collect();
            rendered.join(" & ")
        }
        TypeExpr::Generic { base, args } => {
            let rendered: Vec<String> = args.iter().map(type_expr_to_ts).collect();
            format!("{base}<{}>", rendered.join(", "))
        }
    }
}

/// Render an inline record literal.
pub fn render_record(fields: &[RecordField], additional: Option<&TypeExpr>) -> String {
    let mut parts: Vec<String> = fields.iter().map(field_declaration).collect();
    if let Some(value) = additional {
        parts.push(format!("[key: string]: {}", type_expr_to_ts(value)));
    }
    if parts.is_empty() {
        return "object".to_string();
    }
    format!("{{ {} }}", parts.join("; "))
}

/// One `name?: type` field declaration, without the trailing separator.
pub fn field_declaration(field: &RecordField) -> String {
    format!(
        "{}{}{}: {}",
        if field.read_only { "readonly " } else { "" },
        quote_field_name(&field.name),
        if field.optional { "?" } else { "" },
        type_expr_to_ts(&field.expr)
    )
}

/// Render an enum member's literal value.
pub fn enum_literal_to_ts(literal: &EnumLiteral) -> String {
    match literal {
        EnumLiteral::Null => "null".to_string(),
        EnumLiteral::Bool(value) => value.to_string(),
        EnumLiteral::Number(value) => value.to_string(),
        EnumLiteral::String(value) => format!("\"{}\"", escape_string(value)),
    }
}

fn is_compound(expr: &TypeExpr) -> bool {
    matches!(expr, TypeExpr::Union(_) | TypeExpr::Intersection(_))
}

fn quote_field_name(name: &str) -> String {
    let plain = !name.is_empty()
        && !name.chars().next().is_some_and(|c| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", escape_string(name))
    }
}

fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
