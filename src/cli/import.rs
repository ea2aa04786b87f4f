use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::tsv::{import_table_file, ImportSummary};
use crate::store::config::{DuplicatePolicy, GenomeConfig};
use crate::store::genome::Genome;

#[derive(Args)]
pub struct ImportArgs {
    /// Record table with rsid, chromosome, position and genotype columns
    /// (.tsv or .csv, optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output genome file
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Initial table capacity, rounded up to a power of two
    #[arg(long)]
    pub capacity: Option<usize>,

    /// How to handle rows for an RSID that was already imported
    #[arg(long, value_enum)]
    pub on_duplicate: Option<DuplicatePolicy>,

    /// JSON configuration file; flags above override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: ImportArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => GenomeConfig::load_from_file(path)?,
        None => GenomeConfig::default(),
    };
    if let Some(capacity) = args.capacity {
        config = config.with_initial_capacity(capacity);
    }
    if let Some(policy) = args.on_duplicate {
        config = config.with_duplicate_policy(policy);
    }

    let mut genome = Genome::with_config(config)?;
    let summary = import_table_file(&args.input, &mut genome)?;

    if verbose {
        eprintln!(
            "Imported {} rows from {} ({} duplicates)",
            summary.rows,
            args.input.display(),
            summary.duplicates
        );
    }

    genome.save(&args.output)?;

    match format {
        OutputFormat::Text => print_text_summary(&args, &summary, &genome),
        OutputFormat::Json => print_json_summary(&args, &summary, &genome)?,
        OutputFormat::Tsv => print_tsv_summary(&summary, &genome),
    }

    Ok(())
}

fn print_text_summary(args: &ImportArgs, summary: &ImportSummary, genome: &Genome) {
    println!("Import Results");
    println!("{}", "=".repeat(60));
    println!("\nInput: {}", args.input.display());
    println!("  Rows: {}", summary.rows);
    println!("  Inserted: {}", summary.inserted);
    println!("  Duplicates: {}", summary.duplicates);
    println!("\nOutput: {}", args.output.display());
    println!("  Records: {}", genome.len());
    println!("  Capacity: {}", genome.capacity());
    println!("  Load factor: {:.4}", genome.load_factor());
}

fn print_json_summary(
    args: &ImportArgs,
    summary: &ImportSummary,
    genome: &Genome,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "input": args.input.display().to_string(),
        "output": args.output.display().to_string(),
        "summary": summary,
        "records": genome.len(),
        "capacity": genome.capacity(),
        "load_factor": genome.load_factor(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(summary: &ImportSummary, genome: &Genome) {
    println!("rows\tinserted\tduplicates\trecords\tcapacity\tload_factor");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{:.4}",
        summary.rows,
        summary.inserted,
        summary.duplicates,
        genome.len(),
        genome.capacity(),
        genome.load_factor(),
    );
}
