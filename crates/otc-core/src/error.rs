use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported document version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed reference: {0}")]
    MalformedRef(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    /// Every candidate identifier was already claimed by another component.
    /// Aliasing two distinct components would corrupt the output, so this
    /// aborts the whole run instead of degrading.
    #[error("no free type name among candidates {0:?}")]
    NameCandidatesExhausted(Vec<String>),
}

impl ResolveError {
    /// Whether this error must abort the run rather than skip one component.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResolveError::NameCandidatesExhausted(_))
    }
}
