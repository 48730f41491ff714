use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use depresolve::build_model::ProjectBuildModel;
use depresolve::config::{init_project, load_config, load_overrides, ResolverConfig};
use depresolve::dependency::DependencyResolver;
use depresolve::origin::OriginResolver;
use depresolve::types::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Resolves JVM artifacts and dependencies to their source repositories.
#[derive(Parser)]
#[command(
    name = "depresolve",
    about = "Resolve JVM artifacts and dependencies to their source repositories"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default .depresolve/config.json and override table
    Init {
        /// Project path (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Resolve every dependency declared by a source unit
    ResolveDeps {
        /// Source unit JSON file ("-" for stdin)
        #[arg(short, long)]
        unit: String,
        /// Project path (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Resolve origin URIs (jar: or file:) to their targets
    ResolveOrigin {
        /// Source unit JSON file ("-" for stdin)
        #[arg(short, long)]
        unit: String,
        /// Project path (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
        /// Origin URIs to resolve
        #[arg(required = true)]
        origins: Vec<String>,
    },
}

/// One line of `resolve-origin` output.
#[derive(Serialize)]
struct OriginResolution {
    origin: String,
    target: Option<ResolvedTarget>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so stdout only carries JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> depresolve::errors::Result<()> {
    match cli.command {
        Commands::Init { path, force } => {
            let project_path = resolve_path(path);
            let config_path = init_project(&project_path, force)?;
            info!(path = %config_path.display(), "wrote default configuration");
        }
        Commands::ResolveDeps { unit, path } => {
            let project_path = resolve_path(path);
            let unit = read_unit(&unit)?;
            let config = load_config(&project_path)?;
            let resolver = dependency_resolver(&unit, &config, &project_path)?;
            let resolutions = resolver.resolve_all(&unit.dependencies);
            println!("{}", serde_json::to_string_pretty(&resolutions)?);
        }
        Commands::ResolveOrigin {
            unit,
            path,
            origins,
        } => {
            let project_path = resolve_path(path);
            let unit = read_unit(&unit)?;
            let config = load_config(&project_path)?;
            let deps = dependency_resolver(&unit, &config, &project_path)?;
            let build_model =
                ProjectBuildModel::from_unit(&unit, config.local_repository_roots(&project_path));
            let resolver = OriginResolver::new(&unit, &project_path, deps, Box::new(build_model));

            let results: Vec<OriginResolution> = origins
                .into_iter()
                .map(|origin| {
                    let target = resolver.resolve_uri(&origin);
                    OriginResolution { origin, target }
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }
    Ok(())
}

fn dependency_resolver(
    unit: &SourceUnit,
    config: &ResolverConfig,
    project_path: &Path,
) -> depresolve::errors::Result<DependencyResolver> {
    let overrides = load_overrides(&config.overrides_path(project_path))?;
    Ok(DependencyResolver::new(&unit.name, config, overrides))
}

/// Reads a source unit from a JSON file, or from stdin when `source` is `-`.
fn read_unit(source: &str) -> depresolve::errors::Result<SourceUnit> {
    let contents = if source == "-" {
        io::read_to_string(io::stdin())?
    } else {
        fs::read_to_string(source)?
    };
    Ok(serde_json::from_str(&contents)?)
}

/// Resolves an optional path argument to an absolute `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => fs::canonicalize(&p).unwrap_or_else(|_| PathBuf::from(p)),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
