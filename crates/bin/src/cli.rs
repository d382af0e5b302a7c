//! CLI argument definitions for the myopie binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

/// Output format flag
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Format {
    /// Aligned tables and plain text
    #[default]
    Human,
    /// One JSON document per command
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Human => OutputFormat::Human,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Reactive template renderer tools
#[derive(Parser, Debug)]
#[command(name = "myopie")]
#[command(about = "Myopie: reconcile markup into a live page")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "human")]
    pub format: Format,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile markup into a page's mount point and print the result
    Patch(PatchArgs),
    /// Print the value at a path of a JSON data file
    Get(GetArgs),
}

/// Arguments for the patch command
#[derive(clap::Args, Debug)]
pub struct PatchArgs {
    /// HTML file holding the live page
    #[arg(short, long)]
    pub page: PathBuf,

    /// CSS selector of the mount point
    #[arg(short, long, env = "MYOPIE_MOUNT")]
    pub mount: String,

    /// HTML file holding the markup to reconcile
    #[arg(long)]
    pub markup: PathBuf,
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// JSON file holding the data
    #[arg(short, long)]
    pub data: PathBuf,

    /// Slash separated path, `\/` for a literal slash
    #[arg(default_value = "")]
    pub path: String,
}
