// CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ossx")]
#[command(author = "hatlonely <hatlonely@foxmail.com>")]
#[command(version = "0.1.0")]
#[command(about = "Manage files in a single S3-compatible bucket", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.ossx/config.yaml, falls back to environment)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a local file
    Put(PutArgs),
    /// Download an object to a local file
    Get(GetArgs),
    /// Remove an object
    Rm(RmArgs),
    /// Check whether an object exists
    Exists(ExistsArgs),
    /// List all object keys in the bucket
    Ls,
    /// Show the total size of all objects in the bucket
    Du(DuArgs),
}

#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub source: PathBuf,

    /// Object key (default: local file name)
    pub key: Option<String>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object key
    pub key: String,

    /// Local destination (default: last segment of the key)
    pub destination: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Object key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Object key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct DuArgs {
    /// Print the exact byte count instead of a human-readable size
    #[arg(short, long)]
    pub bytes: bool,
}
