use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use mdag_builder::{BuildConfig, BuildReport, Builder, ChunkPlan, Node};
use mdag_store::{DirKvStore, InMemoryKvStore, KvStore, Object};
use mdag_types::ObjectId;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Add(args) => cmd_add(args, config, &cli.format),
        Command::Plan(args) => cmd_plan(args, &config, &cli.format),
        Command::CatObject(args) => cmd_cat_object(args, &cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BuildConfig> {
    match path {
        Some(path) => BuildConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(BuildConfig::default()),
    }
}

fn build(args: &AddArgs, mut config: BuildConfig) -> anyhow::Result<BuildReport> {
    if let Some(algorithm) = args.hash {
        config.algorithm = algorithm;
    }
    let root = Node::from_path(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;

    let store: Box<dyn KvStore> = match &args.store {
        Some(dir) => Box::new(DirKvStore::open(dir)?),
        None => Box::new(InMemoryKvStore::new()),
    };
    let mut hasher = config.algorithm.hasher();
    let report = Builder::new(store.as_ref(), hasher.as_mut())
        .with_config(config)?
        .build(&root)?;
    Ok(report)
}

fn cmd_add(args: AddArgs, config: BuildConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let report = build(&args, config)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("{} {}", "root".green().bold(), report.root.to_string().yellow());
            println!("  Algorithm: {}", report.algorithm.to_string().cyan());
            if let Some(height) = report.height {
                println!("  Height: {height}");
            }
            println!(
                "  Objects: {} written, {} already present ({} bytes)",
                report.stats.written.to_string().bold(),
                report.stats.deduplicated,
                report.stats.bytes_written
            );
            if args.store.is_none() {
                println!("  {}", "(no --store given; nothing persisted)".dimmed());
            }
        }
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs, config: &BuildConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let plan = ChunkPlan::for_size(args.size, config)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => {
            println!("Size: {} bytes", plan.size.to_string().bold());
            println!(
                "  Chunks: {} of at most {} bytes",
                plan.num_chunks, config.chunk_size
            );
            println!("  Height: {} (fan-out {})", plan.height.to_string().yellow(), config.max_links);
        }
    }
    Ok(())
}

fn cmd_cat_object(args: CatObjectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let id = ObjectId::from_hex(&args.id)?;
    let store = DirKvStore::open(&args.store)?;
    let object = store.get_object(&id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&describe(&object))?),
        OutputFormat::Text => match &object {
            Object::Leaf { data } => {
                println!("{} {} bytes", "leaf".green().bold(), data.len());
            }
            Object::Internal { links } => {
                println!("{} {} links", "internal".green().bold(), links.len());
                for link in links {
                    println!(
                        "  {:<4} {} {:>12} {}",
                        link.kind.to_string().cyan(),
                        link.hash.short_hex().yellow(),
                        link.size,
                        link.name.as_deref().unwrap_or("")
                    );
                }
            }
        },
    }
    Ok(())
}

fn describe(object: &Object) -> serde_json::Value {
    match object {
        Object::Leaf { data } => serde_json::json!({ "kind": "leaf", "size": data.len() }),
        Object::Internal { links } => serde_json::json!({ "kind": "internal", "links": links }),
    }
}
