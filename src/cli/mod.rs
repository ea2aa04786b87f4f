//! Command-line interface for genome-store.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **import**: Build a binary genome file from a record table
//! - **info**: Summarize a genome file
//! - **get**: Look up RSIDs in a genome file
//! - **export**: Dump a genome file back to a record table
//!
//! ## Usage
//!
//! ```text
//! # Build a genome file from a table
//! genome-store import genotypes.tsv.gz -o sample.genome
//!
//! # Look up APOE markers
//! genome-store get sample.genome rs429358 rs7412
//!
//! # JSON output for scripting
//! genome-store info sample.genome --format json
//!
//! # Dump back to CSV
//! genome-store export sample.genome -o sample.csv
//! ```

use clap::{Parser, Subcommand};

pub mod export;
pub mod get;
pub mod import;
pub mod info;

#[derive(Parser)]
#[command(name = "genome-store")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Store and query SNP genotypes by RSID")]
#[command(
    long_about = "genome-store keeps the SNP genotypes of one sample in a compact binary file.\n\nImport a record table once, then:\n- Look up genotypes by RSID in constant time\n- Check for the presence of a Y chromosome\n- Export the records back to TSV, CSV or JSON"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a genome file from a record table
    Import(import::ImportArgs),

    /// Summarize a genome file
    Info(info::InfoArgs),

    /// Look up one or more RSIDs
    Get(get::GetArgs),

    /// Write a genome file back out as a record table
    Export(export::ExportArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
pub(crate) fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}
