use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use serde_json::json;
use sm_catalog::Catalog;
use sm_core::{
    EmotionCategory, EntryId, EntrySource, OwnerId, TemplateShape, clamp_count, tag_set, template,
};

#[derive(Parser)]
#[command(name = "starmap", about = "Constellation coordinate engine for dream-diary star maps")]
struct Cli {
    /// Universe file (TOML) with regions, entries and optional engine settings
    #[arg(long, global = true, env = "STARMAP_UNIVERSE")]
    universe: Option<PathBuf>,

    /// Seed for the random source (unseeded templates become reproducible)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized template for a category and entry count
    Template {
        category: String,
        count: usize,
    },

    /// Compute coordinates for a new entry
    Assign {
        category: String,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Id of an already stored entry being re-placed
        #[arg(long)]
        entry_id: Option<EntryId>,
    },

    /// Compute coordinates for an edited entry
    Relocate {
        entry_id: EntryId,
        category: String,

        /// Comma-separated tags (defaults to the entry's stored tags)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// List entries connected to an entry within its region
    Connected {
        entry_id: EntryId,

        #[arg(long, default_value_t = 5)]
        max: usize,
    },

    /// Similarity graph of an owner's entries in one region
    Graph { owner_id: OwnerId, category: String },

    /// Lay out constellation groups in a region and connect them by pattern
    Constellations {
        category: String,

        /// Comma-separated entry ids of one group (repeatable)
        #[arg(long = "group", required = true)]
        groups: Vec<Group>,
    },

    /// Recompute every constellation of an owner (not implemented yet)
    Relayout { owner_id: OwnerId },
}

#[derive(Clone, Debug)]
struct Group(Vec<EntryId>);

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<EntryId>()
                    .map_err(|e| format!("invalid entry id '{part}': {e}"))
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Group)
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    match &cli.command {
        Commands::Template { category, count } => cmd_template(category, *count, &mut rng),
        Commands::Assign {
            category,
            tags,
            entry_id,
        } => cmd_assign(&cli, category, tags, *entry_id, &mut rng),
        Commands::Relocate {
            entry_id,
            category,
            tags,
        } => cmd_relocate(&cli, *entry_id, category, tags.as_deref(), &mut rng),
        Commands::Connected { entry_id, max } => cmd_connected(&cli, *entry_id, *max),
        Commands::Graph { owner_id, category } => cmd_graph(&cli, *owner_id, category),
        Commands::Constellations { category, groups } => {
            cmd_constellations(&cli, category, groups, &mut rng)
        }
        Commands::Relayout { owner_id } => cmd_relayout(&cli, *owner_id),
    }
}

fn open_catalog(cli: &Cli) -> Result<Catalog> {
    let Some(path) = cli.universe.as_deref() else {
        bail!("no universe file given (use --universe or STARMAP_UNIVERSE)");
    };
    load(path)
}

fn load(path: &Path) -> Result<Catalog> {
    Catalog::open(path).with_context(|| format!("failed to load universe {}", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn cmd_template(category: &str, count: usize, rng: &mut SmallRng) -> Result<()> {
    let category = EmotionCategory::from_str_lossy(category);
    let count = clamp_count(count);
    let shape = TemplateShape::select(category, count);
    let points = template(category, count, rng);
    print_json(&json!({
        "category": category.as_str(),
        "shape": shape.as_str(),
        "deterministic": shape.is_deterministic(),
        "points": points,
    }))
}

fn cmd_assign(
    cli: &Cli,
    category: &str,
    tags: &[String],
    entry_id: Option<EntryId>,
    rng: &mut SmallRng,
) -> Result<()> {
    let catalog = open_catalog(cli)?;
    let placement = catalog
        .engine()
        .assign_coordinates(category, &tag_set(tags.iter().cloned()), entry_id, rng)?;
    print_json(&placement)
}

fn cmd_relocate(
    cli: &Cli,
    entry_id: EntryId,
    category: &str,
    tags: Option<&[String]>,
    rng: &mut SmallRng,
) -> Result<()> {
    let catalog = open_catalog(cli)?;
    let entry = catalog
        .entry(entry_id)
        .ok_or(sm_core::CoordinateError::EntryNotFound(entry_id))?;
    let tags = match tags {
        Some(tags) => tag_set(tags.iter().cloned()),
        None => entry.tags.clone(),
    };
    let placement = catalog
        .engine()
        .relocate_coordinates(&entry, category, &tags, rng)?;
    print_json(&placement)
}

fn cmd_connected(cli: &Cli, entry_id: EntryId, max: usize) -> Result<()> {
    let catalog = open_catalog(cli)?;
    let connected = catalog.engine().find_connected_entries(entry_id, max)?;
    print_json(&json!({ "entry_id": entry_id, "connected": connected }))
}

fn cmd_graph(cli: &Cli, owner_id: OwnerId, category: &str) -> Result<()> {
    let catalog = open_catalog(cli)?;
    let graph = catalog.engine().region_graph(owner_id, category)?;
    print_json(&graph)
}

fn cmd_constellations(
    cli: &Cli,
    category: &str,
    groups: &[Group],
    rng: &mut SmallRng,
) -> Result<()> {
    let catalog = open_catalog(cli)?;
    let groups: Vec<Vec<EntryId>> = groups.iter().map(|g| g.0.clone()).collect();
    let set = catalog
        .engine()
        .layout_constellations(category, &groups, rng)?;
    print_json(&set)
}

fn cmd_relayout(cli: &Cli, owner_id: OwnerId) -> Result<()> {
    let catalog = open_catalog(cli)?;
    let graph = catalog.engine().relayout_region(owner_id)?;
    print_json(&graph)
}
