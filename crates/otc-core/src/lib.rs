pub mod config;
pub mod error;
pub mod model;
pub mod parse;
pub mod resolve;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that turn compiled type models into files.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        compiled: &resolve::CompiledTypes,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
