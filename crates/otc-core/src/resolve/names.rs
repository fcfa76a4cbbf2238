use std::collections::{HashMap, HashSet};

use heck::ToPascalCase;

use crate::config::GenConfig;
use crate::error::ResolveError;

/// Which identifier policy applies. Type names and enum keys carry
/// independent prefix/suffix configuration and independent caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamePurpose {
    TypeName,
    EnumKey,
}

/// Pure string-transformation service turning arbitrary labels into valid
/// identifiers, memoized per (prefix, label, suffix) triple keyed by
/// purpose. Created fresh per compilation run.
pub struct TypeNameFormatter<'c> {
    config: &'c GenConfig,
    cache: HashMap<(NamePurpose, String), String>,
}

impl<'c> TypeNameFormatter<'c> {
    pub fn new(config: &'c GenConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
        }
    }

    /// Format a label into a valid identifier under the given purpose.
    pub fn format(&mut self, label: &str, purpose: NamePurpose) -> String {
        let (prefix, suffix, fix_prefix) = match purpose {
            NamePurpose::TypeName => (
                self.config.type_prefix.as_str(),
                self.config.type_suffix.as_str(),
                self.config.fix_invalid_type_name_prefix.as_str(),
            ),
            NamePurpose::EnumKey => (
                self.config.enum_key_prefix.as_str(),
                self.config.enum_key_suffix.as_str(),
                self.config.fix_invalid_enum_key_prefix.as_str(),
            ),
        };

        // Constant-style names like LEFT_ARROW pass through with only
        // prefix/suffix concatenation.
        if is_constant_case(label) {
            return [prefix, label, suffix]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("_");
        }

        let cache_key = (purpose, format!("{prefix}_{label}_{suffix}"));
        if let Some(hit) = self.cache.get(&cache_key) {
            return hit.clone();
        }

        let fixed = fix_label(label, fix_prefix);
        let formatted = format!("{prefix}_{fixed}_{suffix}").to_pascal_case();
        let result = match &self.config.hooks.on_format_type_name {
            Some(hook) => match hook(&formatted, label, purpose) {
                Some(overridden) if !overridden.is_empty() => overridden,
                _ => formatted,
            },
            None => formatted,
        };

        self.cache.insert(cache_key, result.clone());
        result
    }
}

fn is_constant_case(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_')
}

fn is_valid_name(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
}

fn starts_valid(label: &str) -> bool {
    label
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
}

fn fix_label(label: &str, fix_prefix: &str) -> String {
    if is_valid_name(label) {
        return label.to_string();
    }

    let mut name = label.to_string();
    if !starts_valid(&name) {
        name = format!("{fix_prefix} {name}");
    }

    // Legacy dialect artifacts (TSOA-style composite names).
    if name.contains('.') {
        name = replace_legacy_artifacts(&name);
    }

    if name.contains('-') {
        name = name.to_pascal_case();
    }

    name
}

fn replace_legacy_artifacts(name: &str) -> String {
    let mut out = strip_exclude_keyof(name);
    out = out.replace("%22~AND~%22", "And").replace("%22~OR~%22", "Or");
    out = out.replace(".%22", "_").replace("%22", "_").replace('.', "_");
    trim_trailing_underscore_runs(&out)
}

/// Replace `Exclude_keyof<Ident>` occurrences with `ExcludeKeys`.
fn strip_exclude_keyof(name: &str) -> String {
    const MARKER: &str = "Exclude_keyof";
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(pos) = rest.find(MARKER) {
        out.push_str(&rest[..pos]);
        out.push_str("ExcludeKeys");
        let tail = &rest[pos + MARKER.len()..];
        let skip = tail.chars().take_while(|c| c.is_ascii_alphabetic()).count();
        rest = &tail[skip..];
    }
    out.push_str(rest);
    out
}

/// Drop a trailing run of two or more underscores.
fn trim_trailing_underscore_runs(name: &str) -> String {
    let trailing = name.chars().rev().take_while(|c| *c == '_').count();
    if trailing >= 2 {
        name[..name.len() - trailing].to_string()
    } else {
        name.to_string()
    }
}

/// Claims identifiers across independently-proposed candidates so no two
/// components share a formatted name. Process-scoped per compilation run.
#[derive(Debug, Default)]
pub struct ComponentNameResolver {
    claimed: HashSet<String>,
}

impl ComponentNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the first candidate not already claimed, claiming it before
    /// returning. Exhausting the list is fatal: silently aliasing two
    /// distinct components would corrupt the output.
    pub fn resolve(&mut self, candidates: &[String]) -> Result<String, ResolveError> {
        for candidate in candidates {
            if self.claimed.insert(candidate.clone()) {
                return Ok(candidate.clone());
            }
        }
        Err(ResolveError::NameCandidatesExhausted(candidates.to_vec()))
    }

    /// Claim `base`, falling back to deterministic counter suffixes in
    /// collision order.
    pub fn claim(&mut self, base: &str) -> String {
        if self.claimed.insert(base.to_string()) {
            return base.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{base}{counter}");
            if self.claimed.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }
}

/// Derive a camelCase operation name from HTTP method + route path, used
/// when the document supplies no operationId.
///
/// Examples:
/// - `GET /users` → `listUsers`
/// - `GET /users/{userId}` → `getUser`
/// - `POST /users/{userId}/messages` → `createUsersMessages`
pub fn route_operation_name(method: &str, path: &str) -> String {
    let mut resource_parts: Vec<&str> = Vec::new();
    let mut ends_with_param = false;

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment.starts_with('{') && segment.ends_with('}') {
            ends_with_param = true;
        } else {
            resource_parts.push(segment);
            ends_with_param = false;
        }
    }

    let prefix = match method.to_uppercase().as_str() {
        "GET" if ends_with_param => "get",
        "GET" => "list",
        "POST" => "create",
        "PUT" => "update",
        "DELETE" => "delete",
        "PATCH" => "patch",
        "OPTIONS" => "options",
        "HEAD" => "head",
        "TRACE" => "trace",
        other => return format!("{}{}", other.to_lowercase(), join_pascal(&resource_parts, false)),
    };

    if resource_parts.is_empty() {
        return prefix.to_string();
    }
    format!("{prefix}{}", join_pascal(&resource_parts, ends_with_param))
}

fn join_pascal(parts: &[&str], singularize_last: bool) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        let word = if singularize_last && i == parts.len() - 1 {
            singularize(part)
        } else {
            (*part).to_string()
        };
        out.push_str(&word.to_pascal_case());
    }
    out
}

/// Naive singularization: strips a trailing plural marker.
fn singularize(word: &str) -> String {
    if word.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}
