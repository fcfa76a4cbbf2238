pub mod emitters;
pub mod render;

use otc_core::resolve::CompiledTypes;
use otc_core::{CodeGenerator, GeneratedFile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}

/// Options for the TypeScript contracts generator.
#[derive(Debug, Clone, Default)]
pub struct TsOptions {
    /// Override the default `data-contracts.ts` file name.
    pub file_name: Option<String>,
}

/// Renders compiled type models into TypeScript source files.
#[derive(Debug, Default)]
pub struct TypescriptGenerator;

impl CodeGenerator for TypescriptGenerator {
    type Config = TsOptions;
    type Error = EmitError;

    fn generate(
        &self,
        compiled: &CompiledTypes,
        config: &TsOptions,
    ) -> Result<Vec<GeneratedFile>, EmitError> {
        let content = emitters::contracts::emit_contracts(compiled)?;
        let path = config
            .file_name
            .clone()
            .unwrap_or_else(|| "data-contracts.ts".to_string());
        Ok(vec![GeneratedFile { path, content }])
    }
}
