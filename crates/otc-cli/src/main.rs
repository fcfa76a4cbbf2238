use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use otc_core::config::{self, CONFIG_FILE_NAME, OtcConfig};
use otc_core::model::TypeModel;
use otc_core::parse;
use otc_core::parse::document::ApiDocument;
use otc_core::resolve::{self, CompiledTypes, RouteTypes};
use otc_core::{CodeGenerator, GeneratedFile};
use otc_typescript::{TsOptions, TypescriptGenerator};

#[derive(Parser)]
#[command(name = "otc", about = "OpenAPI to TypeScript type-model compiler", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript contracts from a schema document
    Generate {
        /// Path to the schema document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory for generated files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse and resolve a schema document, reporting any failures
    Validate {
        /// Path to the schema document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the resolved type models of a schema document
    Inspect {
        /// Path to the schema document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new otc configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, output } => cmd_generate(input, output),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Init { force } => init_at(Path::new(CONFIG_FILE_NAME), force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "otc", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the project config from the current directory, falling back to
/// defaults when no config file exists.
fn try_load_config() -> Result<OtcConfig> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&path)
        .map_err(|e| anyhow::anyhow!(e))?
        .unwrap_or_default())
}

fn load_document(path: &Path) -> Result<ApiDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        parse::from_json(&content)?
    } else {
        parse::from_yaml(&content)?
    };
    Ok(document)
}

fn compile_document(path: &Path, config: &OtcConfig) -> Result<CompiledTypes> {
    let document = load_document(path)?;
    let gen_config = config.codegen.clone().finalize();
    let compiled = resolve::compile(&document, &gen_config)?;
    for (reference, error) in &compiled.errors {
        log::warn!("skipped {reference}: {error}");
    }
    Ok(compiled)
}

fn cmd_generate(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config = try_load_config()?;
    let input = input.unwrap_or_else(|| PathBuf::from(&config.input));
    let output = output.unwrap_or_else(|| PathBuf::from(&config.output));

    let compiled = compile_document(&input, &config)?;
    let files = TypescriptGenerator.generate(&compiled, &TsOptions::default())?;
    write_files(&files, &output)?;

    println!(
        "Generated {} file(s) into {} ({} models, {} routes)",
        files.len(),
        output.display(),
        compiled.models.len(),
        compiled.routes.len()
    );
    if !compiled.errors.is_empty() {
        println!(
            "{} component(s) could not be resolved; re-run with RUST_LOG=warn for details",
            compiled.errors.len()
        );
    }
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<()> {
    let config = try_load_config()?;
    let compiled = compile_document(input, &config)?;
    if !compiled.errors.is_empty() {
        anyhow::bail!(
            "{} of {} component(s) failed to resolve",
            compiled.errors.len(),
            compiled.models.len() + compiled.errors.len()
        );
    }
    println!(
        "OK: {} models, {} routes",
        compiled.models.len(),
        compiled.routes.len()
    );
    Ok(())
}

#[derive(serde::Serialize)]
struct InspectDump<'a> {
    models: Vec<&'a TypeModel>,
    routes: &'a [RouteTypes],
}

fn cmd_inspect(input: &Path, format: InspectFormat) -> Result<()> {
    let config = try_load_config()?;
    let compiled = compile_document(input, &config)?;
    let dump = InspectDump {
        models: compiled.models.iter().map(|m| m.as_ref()).collect(),
        routes: &compiled.routes,
    };
    match format {
        InspectFormat::Yaml => print!("{}", serde_yaml_ng::to_string(&dump)?),
        InspectFormat::Json => println!("{}", serde_json::to_string_pretty(&dump)?),
    }
    Ok(())
}

fn init_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    fs::write(path, config::default_config_content())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn write_files(files: &[GeneratedFile], output: &Path) -> Result<()> {
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    for file in files {
        let path = output.join(&file.path);
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
