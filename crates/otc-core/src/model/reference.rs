use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::ResolveError;

/// A structured path identifying one named component, e.g.
/// `#/components/schemas/Pet`. The registry is the single source of truth
/// for what a reference maps to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    segments: Vec<String>,
}

impl ComponentRef {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Reference to a named schema component.
    pub fn schema(name: impl Into<String>) -> Self {
        Self::new(["components".to_string(), "schemas".to_string(), name.into()])
    }

    /// Parse a `$ref` pointer like `#/components/schemas/Pet`.
    pub fn from_pointer(pointer: &str) -> Result<Self, ResolveError> {
        let rest = pointer
            .strip_prefix("#/")
            .ok_or_else(|| ResolveError::MalformedRef(pointer.to_string()))?;
        let segments: Vec<String> = rest
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return Err(ResolveError::MalformedRef(pointer.to_string()));
        }
        Ok(Self { segments })
    }

    /// Discriminator mapping targets may be full pointers or bare schema
    /// names; both identify a schema component.
    pub fn from_mapping_target(target: &str) -> Result<Self, ResolveError> {
        if target.starts_with('#') {
            Self::from_pointer(target)
        } else {
            Ok(Self::schema(target))
        }
    }

    pub fn pointer(&self) -> String {
        format!("#/{}", self.segments.join("/"))
    }

    /// The last path segment: the component's declared label.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pointer())
    }
}

impl Serialize for ComponentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.pointer())
    }
}
