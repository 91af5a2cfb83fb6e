pub mod report;

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::config::resolve::resolve_settings;
use crate::config::Settings;
use crate::core::environment::Environment;
use crate::core::package::{check_outdated_packages, Package};
use crate::error::{DepscopeError, Result};
use crate::graph::distance::{DistanceOptions, OutputShape};
use crate::index::{FixedIndex, PackageIndex, PypiClient};
use crate::manifest::{check_outdated_manifest, read_manifest, reconcile, ManifestEntry};
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "depscope")]
#[command(about = "Dependency graph distance, lineage and staleness analysis", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Distances(DistancesArgs),
    Lineage(LineageArgs),
    Links(LinksArgs),
    Outdated(OutdatedArgs),
    ManifestOutdated(ManifestOutdatedArgs),
    Reconcile(ReconcileArgs),
}

#[derive(Args, Debug)]
pub struct GraphSource {
    #[arg(short, long)]
    pub graph: PathBuf,
}

#[derive(Args, Debug)]
pub struct IndexSource {
    #[arg(long)]
    pub index_file: Option<PathBuf>,
    #[arg(long)]
    pub parallel: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DistancesArgs {
    pub package: String,
    #[command(flatten)]
    pub source: GraphSource,
    #[arg(long)]
    pub include_root: bool,
    #[arg(long)]
    pub keep_unreached: bool,
    #[arg(long, value_enum, default_value_t = OutputShape::Map)]
    pub shape: OutputShape,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LineageArgs {
    pub package: String,
    #[command(flatten)]
    pub source: GraphSource,
    #[arg(long)]
    pub keep_unreached: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LinksArgs {
    pub package: String,
    #[command(flatten)]
    pub source: GraphSource,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OutdatedArgs {
    pub packages: Vec<String>,
    #[command(flatten)]
    pub source: GraphSource,
    #[arg(long)]
    pub package_file: Option<PathBuf>,
    #[command(flatten)]
    pub index: IndexSource,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ManifestOutdatedArgs {
    pub manifest: PathBuf,
    #[command(flatten)]
    pub index: IndexSource,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    pub manifest: PathBuf,
    #[command(flatten)]
    pub source: GraphSource,
    #[arg(long)]
    pub json: bool,
}

pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("depscope={level}"))),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;
    let settings = resolve_settings(&cwd, cli.config)?.settings;
    let color = !cli.no_color && settings.output.color.unwrap_or(true);
    output::set_colors(color && env::var_os("NO_COLOR").is_none());

    match cli.command {
        Commands::Distances(args) => handle_distances(args, &settings),
        Commands::Lineage(args) => handle_lineage(args, &settings),
        Commands::Links(args) => handle_links(args),
        Commands::Outdated(args) => handle_outdated(args, &settings),
        Commands::ManifestOutdated(args) => handle_manifest_outdated(args, &settings),
        Commands::Reconcile(args) => handle_reconcile(args),
    }
}

fn load_environment(source: &GraphSource) -> Result<Environment> {
    Environment::load(&source.graph)
}

fn unknown_package(name: &str) -> DepscopeError {
    DepscopeError::Other(anyhow::anyhow!("package '{name}' not found in graph"))
}

fn handle_distances(args: DistancesArgs, settings: &Settings) -> Result<()> {
    let mut environment = load_environment(&args.source)?;
    let options = DistanceOptions {
        include_root: args.include_root || settings.analysis.include_root,
        keep_unreached: args.keep_unreached || settings.analysis.keep_unreached,
        shape: args.shape,
    };
    let distances = environment
        .distances_for(&args.package, options, false)?
        .ok_or_else(|| unknown_package(&args.package))?;

    if args.json {
        return print_json(&distances.entries());
    }
    print!(
        "{}",
        report::render_distances(&format!("Distances from {}:", args.package), distances)
    );
    Ok(())
}

fn handle_lineage(args: LineageArgs, settings: &Settings) -> Result<()> {
    let mut environment = load_environment(&args.source)?;
    let keep_unreached = args.keep_unreached || settings.analysis.keep_unreached;
    let trace = environment
        .lineage_for(&args.package, keep_unreached, false)?
        .ok_or_else(|| unknown_package(&args.package))?;

    if args.json {
        return print_json(&trace.entries());
    }
    print!(
        "{}",
        report::render_distances(&format!("Ancestor trace of {}:", args.package), trace)
    );
    Ok(())
}

fn handle_links(args: LinksArgs) -> Result<()> {
    let environment = load_environment(&args.source)?;
    let package = environment
        .package(&args.package)
        .ok_or_else(|| unknown_package(&args.package))?;
    let (ancestors, descendants) = package.direct_links(environment.edges())?;

    if args.json {
        return print_json(&json!({
            "ancestors": ancestors,
            "descendants": descendants,
        }));
    }
    print!(
        "{}",
        report::render_links(&package.name, &ancestors, &descendants)
    );
    Ok(())
}

fn handle_outdated(args: OutdatedArgs, settings: &Settings) -> Result<()> {
    let environment = load_environment(&args.source)?;
    let index = build_index(args.index.index_file.as_deref(), settings)?;
    let jobs = args.index.parallel.or(settings.analysis.parallel);

    let selected: Vec<&Package> = if args.packages.is_empty() && args.package_file.is_none() {
        environment.packages().collect()
    } else {
        environment
            .resolve_package_list(&args.packages, args.package_file.as_deref())
            .iter()
            .filter_map(|name| environment.package(name))
            .collect()
    };
    if selected.is_empty() {
        output::warn("no packages to check");
    } else if !args.json {
        output::info(&format!("checking {} package(s)", selected.len()));
    }

    let verdicts = check_outdated_packages(&selected, index.as_ref(), jobs);
    if args.json {
        return print_json(&verdicts);
    }
    for entry in &verdicts {
        print!(
            "{}",
            report::render_verdict(&entry.package, entry.version.as_deref(), &entry.verdict)
        );
    }
    Ok(())
}

fn handle_manifest_outdated(args: ManifestOutdatedArgs, settings: &Settings) -> Result<()> {
    let Some(entries) = load_manifest_entries(&args.manifest, args.json)? else {
        return Ok(());
    };
    let index = build_index(args.index.index_file.as_deref(), settings)?;
    let jobs = args.index.parallel.or(settings.analysis.parallel);

    let verdicts = check_outdated_manifest(&entries, index.as_ref(), jobs);
    if args.json {
        return print_json(&verdicts);
    }
    for entry in &verdicts {
        print!(
            "{}",
            report::render_verdict(&entry.package, Some(&entry.version), &entry.verdict)
        );
    }
    Ok(())
}

fn handle_reconcile(args: ReconcileArgs) -> Result<()> {
    let Some(entries) = load_manifest_entries(&args.manifest, args.json)? else {
        return Ok(());
    };
    let environment = load_environment(&args.source)?;
    let result = reconcile(&entries, &environment.installed());

    if args.json {
        return print_json(&result);
    }
    print!("{}", report::render_reconciliation(&result));
    Ok(())
}

fn load_manifest_entries(path: &Path, json: bool) -> Result<Option<Vec<ManifestEntry>>> {
    let entries = read_manifest(path).map_err(|err| DepscopeError::Other(anyhow::Error::new(err)))?;
    if entries.is_none() {
        output::warn(&format!("no manifest data: could not read {}", path.display()));
        if json {
            println!("null");
        }
    }
    Ok(entries)
}

fn build_index(index_file: Option<&Path>, settings: &Settings) -> Result<Box<dyn PackageIndex>> {
    if let Some(path) = index_file {
        let index = FixedIndex::load(path)
            .with_context(|| format!("failed to load index file {}", path.display()))?;
        return Ok(Box::new(index));
    }
    let client = PypiClient::new(
        settings.index.url.clone(),
        Duration::from_secs(settings.index.timeout_secs),
        &settings.index.user_agent,
    )
    .context("failed to set up package index client")?;
    Ok(Box::new(client))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|err| DepscopeError::Other(anyhow::Error::new(err)))?
    );
    Ok(())
}
