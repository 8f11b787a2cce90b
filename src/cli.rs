//! Command-line interface for suitegen.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::analysis::{collect_go_files, AnalysisContext, FileFacts};
use crate::config::{Config, DEFAULT_CONFIG_NAMES, DEFAULT_CONFIG_TEMPLATE};
use crate::report::{self, Format};
use crate::scaffold::{self, ScaffoldPlan};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_NOTHING: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "SUITEGEN_LOG";

/// Generate testify suite scaffolds for Go struct types.
///
/// suitegen reads Go source files, finds struct types and their methods,
/// and writes one `<type>_test.go` suite per type with a test method per
/// method and a sub-test per branch. Existing scaffolds only gain the test
/// methods they are missing.
#[derive(Parser)]
#[command(name = "suitegen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write or update scaffold files
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),
    /// Print the extracted types, methods and branches
    Inspect(InspectArgs),
    /// Create a suitegen config file
    Init(InitArgs),
}

/// Arguments for the generate command.
#[derive(Parser)]
pub struct GenerateArgs {
    /// Go file or directory to scaffold
    pub path: PathBuf,

    /// Output directory (default: config output_dir, else next to each source file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print what would be written instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Analyze files in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the inspect command.
#[derive(Parser)]
pub struct InspectArgs {
    /// Go file or directory to inspect
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "suitegen.yaml")]
    pub output: PathBuf,
}

/// Install the stderr tracing subscriber.
///
/// `SUITEGEN_LOG` takes precedence; otherwise `verbose` selects debug output
/// for this crate and warnings for everything else.
pub fn init_tracing(verbose: bool) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn")),
        Err(_) if verbose => EnvFilter::new("warn,suitegen=debug"),
        Err(_) => EnvFilter::new("warn"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Files selected by a path argument.
struct Inputs {
    /// Directory display paths are relative to.
    base_dir: PathBuf,
    files: Vec<PathBuf>,
    /// The argument named a single file.
    single: bool,
}

fn resolve_inputs(path: &Path, config: &Config) -> anyhow::Result<Inputs> {
    let abs_path = path
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("cannot access path {:?}: {}", path, e))?;

    if fs::metadata(&abs_path)?.is_dir() {
        let files = collect_go_files(&abs_path, config.include_test_files)?;
        return Ok(Inputs {
            base_dir: abs_path,
            files,
            single: false,
        });
    }

    let base_dir = abs_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(Inputs {
        base_dir,
        files: vec![abs_path],
        single: true,
    })
}

/// Analyze the inputs. A single file must parse; in a directory, files that
/// fail are logged and skipped.
fn analyze(ctx: &AnalysisContext, inputs: &Inputs, parallel: bool) -> anyhow::Result<Vec<FileFacts>> {
    if inputs.single {
        let facts = inputs
            .files
            .iter()
            .map(|f| ctx.analyze_file(f))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(facts);
    }

    if parallel {
        Ok(ctx.analyze_files_parallel(&inputs.files))
    } else {
        Ok(ctx.analyze_files(&inputs.files))
    }
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let cwd = std::env::current_dir()?;
    let (config, path) = Config::load(explicit, &cwd)?;
    match path {
        Some(path) => tracing::debug!(config = %path.display(), "loaded config"),
        None => tracing::debug!("no config file found, using defaults"),
    }
    Ok(config)
}

/// Counts reported at the end of a generate run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub types: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Run the generate command.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<i32> {
    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let inputs = match resolve_inputs(&args.path, &config) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if inputs.files.is_empty() {
        eprintln!("Warning: no Go files found in {}", args.path.display());
        return Ok(EXIT_NOTHING);
    }

    let ctx = AnalysisContext::new(&inputs.base_dir);
    let facts = match analyze(&ctx, &inputs, args.parallel) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let output_dir = args
        .output
        .clone()
        .or_else(|| config.output_dir.as_ref().map(PathBuf::from));

    let summary = generate(&ctx, &facts, output_dir.as_deref(), &config, args.dry_run)?;
    tracing::info!(?summary, "generate finished");

    if summary.failed > 0 {
        return Ok(EXIT_ERROR);
    }
    if summary.types == 0 {
        eprintln!("Warning: no struct types found in {}", args.path.display());
        return Ok(EXIT_NOTHING);
    }

    println!(
        "{} created, {} updated, {} unchanged, {} skipped",
        summary.created, summary.updated, summary.unchanged, summary.skipped
    );
    Ok(EXIT_SUCCESS)
}

/// Write or merge one scaffold per type.
///
/// Scaffolds land in `output_dir` when given, else next to their source
/// file. Per-type failures are reported and counted, not fatal.
pub fn generate(
    ctx: &AnalysisContext,
    facts: &[FileFacts],
    output_dir: Option<&Path>,
    config: &Config,
    dry_run: bool,
) -> anyhow::Result<GenerateSummary> {
    let mut summary = GenerateSummary::default();
    // Scaffold targets claimed so far, with the source file that claimed them.
    let mut planned: HashMap<PathBuf, String> = HashMap::new();

    for file in facts {
        let source_path = ctx.base_dir().join(&file.path);
        let target_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => source_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| ctx.base_dir().to_path_buf()),
        };

        for ty in &file.types {
            summary.types += 1;

            if !scaffold::should_scaffold(ty, config) {
                tracing::debug!(type_name = %ty.name, "skipping type");
                summary.skipped += 1;
                continue;
            }

            let target = target_dir.join(scaffold::output_file_name(&ty.name));
            if let Some(first) = planned.get(&target) {
                eprintln!(
                    "Error: {}: type {} in {} collides with the scaffold for {}",
                    target.display(),
                    ty.name,
                    file.path,
                    first
                );
                summary.failed += 1;
                continue;
            }
            planned.insert(target.clone(), file.path.clone());

            let plan = match scaffold::plan_scaffold(&file.package_name, ty, &target, config) {
                Ok(plan) => plan,
                Err(e) => {
                    eprintln!("Error: {}: {}", target.display(), e);
                    summary.failed += 1;
                    continue;
                }
            };

            match plan {
                ScaffoldPlan::Create(text) => {
                    if dry_run {
                        println!("// would create {}", target.display());
                        println!("{}", text);
                    } else {
                        fs::create_dir_all(&target_dir)?;
                        fs::write(&target, text)?;
                        println!("Created {}", target.display());
                    }
                    summary.created += 1;
                }
                ScaffoldPlan::Merge { source, added } => {
                    if dry_run {
                        println!("// would add {} to {}", added.join(", "), target.display());
                    } else {
                        fs::write(&target, source)?;
                        println!("Updated {} (+{})", target.display(), added.join(", "));
                    }
                    summary.updated += 1;
                }
                ScaffoldPlan::Unchanged => {
                    tracing::debug!(target = %target.display(), "scaffold up to date");
                    summary.unchanged += 1;
                }
            }
        }
    }

    Ok(summary)
}

/// Run the inspect command.
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let inputs = match resolve_inputs(&args.path, &config) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let ctx = AnalysisContext::new(&inputs.base_dir);
    let facts = match analyze(&ctx, &inputs, false) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    match format {
        Format::Json => report::write_json(&facts)?,
        Format::Pretty => report::write_pretty(&args.path.to_string_lossy(), &facts),
    }

    if facts.iter().all(|f| f.types.is_empty()) {
        return Ok(EXIT_NOTHING);
    }
    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = fs::write(&args.output, DEFAULT_CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    if DEFAULT_CONFIG_NAMES.iter().any(|n| args.output == Path::new(n)) {
        println!("  2. Run: suitegen generate .");
    } else {
        println!(
            "  2. Run: suitegen generate . --config {}",
            args.output.display()
        );
    }

    Ok(EXIT_SUCCESS)
}
