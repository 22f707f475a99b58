use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mdag_crypto::HashAlgorithm;

#[derive(Parser)]
#[command(
    name = "mdag",
    about = "Chunk and hash files into a content-addressed Merkle DAG",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with chunk_size, max_links and algorithm
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a file or directory into the store and print its root hash
    Add(AddArgs),
    /// Show how a file of the given size would be chunked
    Plan(PlanArgs),
    /// Decode and print one stored object
    CatObject(CatObjectArgs),
}

#[derive(Args)]
pub struct AddArgs {
    pub path: PathBuf,
    /// Object directory; objects are only hashed when omitted
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// Digest algorithm, overriding the configuration file
    #[arg(long)]
    pub hash: Option<HashAlgorithm>,
}

#[derive(Args)]
pub struct PlanArgs {
    /// File size in bytes
    pub size: u64,
}

#[derive(Args)]
pub struct CatObjectArgs {
    /// Hex object id
    pub id: String,
    #[arg(long)]
    pub store: PathBuf,
}
