//! genpdf CLI

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use gp_basis::{BasisTable, FLAVOR_NAMES, FLAVOR_PIDS, FlavorSelection};
use gp_generate::{GenerateRequest, Generator, ParentSource};
use gp_lhagrid::{DATA_PATH_ENV, Registry};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "genpdf")]
#[command(about = "genpdf - generate filtered LHAPDF debug sets")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// LHAPDF data directory (repeatable). The first one receives installs.
    #[arg(long, global = true, env = "LHAPDF_DATA_PATH", value_delimiter = ':')]
    data_path: Vec<PathBuf>,

    /// Directory new sets are written to. Defaults to the current directory.
    #[arg(long, global = true)]
    work_dir: Option<PathBuf>,

    /// YAML configuration file (data_paths, work_dir, grid).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a set that keeps only some flavors or evolution components
    #[command(allow_negative_numbers = true)]
    Generate {
        /// Name of the new set
        name: String,

        /// Pids (e.g. 21 -1 2), flavor names (e.g. u dbar), evolution labels
        /// (e.g. g S V3) or `custom`
        #[arg(required_unless_present = "combination")]
        labels: Vec<String>,

        /// Parent set: an installed set name, or `toy`. Defaults to x(1-x).
        #[arg(short, long)]
        parent: Option<String>,

        /// Export every member of the parent, not only the central one
        #[arg(short, long)]
        all: bool,

        /// Install the result into the first data directory
        #[arg(short, long)]
        install: bool,

        /// Metadata overrides as a YAML mapping, e.g. '{SetDesc: test}'
        #[arg(long)]
        info_update: Option<String>,

        /// Project onto a flavor combination: 14 comma-separated weights in
        /// flavor order (repeatable). Replaces LABELS.
        #[arg(long, conflicts_with = "labels", allow_hyphen_values = true)]
        combination: Vec<String>,
    },

    /// Move a set from the work directory into the first data directory
    Install {
        /// Set name
        name: String,
    },

    /// Print the metadata of an installed set as JSON
    Info {
        /// Set name
        name: String,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the sets found in the data directories
    List,

    /// Print the flavor basis (pid, name)
    Flavors,

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let data_paths = if cli.data_path.is_empty() { config.data_paths.clone() } else { cli.data_path };
    let registry = Registry::new(data_paths);
    let work_dir =
        cli.work_dir.or_else(|| config.work_dir.clone()).unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Generate { name, labels, parent, all, install, info_update, combination } => {
            cmd_generate(
                registry,
                work_dir,
                &config,
                GenerateArgs { name, labels, parent, all, install, info_update, combination },
            )
        }
        Commands::Install { name } => cmd_install(registry, work_dir, &name),
        Commands::Info { name, output } => cmd_info(&registry, &name, output.as_ref()),
        Commands::List => cmd_list(&registry),
        Commands::Flavors => {
            for (pid, name) in FLAVOR_PIDS.iter().zip(FLAVOR_NAMES) {
                println!("{pid:>3} {name}");
            }
            Ok(())
        }
        Commands::Version => {
            println!("genpdf {}", gp_core::VERSION);
            Ok(())
        }
    }
}

struct GenerateArgs {
    name: String,
    labels: Vec<String>,
    parent: Option<String>,
    all: bool,
    install: bool,
    info_update: Option<String>,
    combination: Vec<String>,
}

fn cmd_generate(
    registry: Registry,
    work_dir: PathBuf,
    config: &Config,
    args: GenerateArgs,
) -> Result<()> {
    let table = BasisTable::standard()?;
    let selection = if args.combination.is_empty() {
        FlavorSelection::classify(&table, &args.labels)?
    } else {
        let vectors = args
            .combination
            .iter()
            .map(|c| parse_weights(c))
            .collect::<Result<Vec<_>>>()?;
        FlavorSelection::combinations(&table, vectors)?
    };

    let info_update = args
        .info_update
        .as_deref()
        .map(serde_yaml_ng::from_str::<serde_yaml_ng::Value>)
        .transpose()
        .context("parsing --info-update")?;

    let request = GenerateRequest {
        name: args.name,
        parent: ParentSource::from_name(args.parent.as_deref()),
        all_members: args.all,
        info_update,
        install: args.install,
        grid: config.grid.clone(),
    };

    std::fs::create_dir_all(&work_dir)
        .with_context(|| format!("creating work directory {}", work_dir.display()))?;
    let generator = Generator::new(&table, registry, work_dir);
    let out = generator.generate_selection(&request, &selection)?;
    tracing::info!(
        name = %out.name,
        members = out.members,
        installed = out.installed,
        path = %out.path.display(),
        "set written"
    );
    println!("{}", out.path.display());
    Ok(())
}

fn cmd_install(registry: Registry, work_dir: PathBuf, name: &str) -> Result<()> {
    let table = BasisTable::standard()?;
    let generator = Generator::new(&table, registry, work_dir);
    let dest = generator.install(name)?;
    tracing::info!(set = name, path = %dest.display(), "set installed");
    println!("{}", dest.display());
    Ok(())
}

fn cmd_info(registry: &Registry, name: &str, output: Option<&PathBuf>) -> Result<()> {
    let info = registry.load_info(name)?;
    let value = serde_json::to_value(info.as_mapping())
        .with_context(|| format!("converting metadata of '{name}' to JSON"))?;
    write_json(output, value)
}

fn cmd_list(registry: &Registry) -> Result<()> {
    if registry.paths().is_empty() {
        bail!("no data directory configured (use --data-path or {DATA_PATH_ENV})");
    }
    for name in registry.list_sets()? {
        println!("{name}");
    }
    Ok(())
}

fn parse_weights(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|w| {
            w.trim().parse::<f64>().with_context(|| format!("invalid weight '{w}' in '{text}'"))
        })
        .collect()
}

fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
