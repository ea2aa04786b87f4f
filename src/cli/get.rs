use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::snp::SnpView;
use crate::store::genome::{Genome, GenomeError};

#[derive(Args)]
pub struct GetArgs {
    /// Genome file written by `import`
    #[arg(required = true)]
    pub genome: PathBuf,

    /// RSIDs to look up (e.g. rs7412 or 7412)
    #[arg(required = true, num_args = 1..)]
    pub rsids: Vec<String>,
}

pub fn run(args: GetArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let genome = Genome::load_from_file(&args.genome)?;

    if verbose {
        eprintln!("Loaded {} records from {}", genome.len(), args.genome.display());
    }

    let results: Vec<(&str, Result<SnpView, GenomeError>)> = args
        .rsids
        .iter()
        .map(|key| (key.as_str(), genome.lookup(key)))
        .collect();

    match format {
        OutputFormat::Text => print_text_results(&results),
        OutputFormat::Json => print_json_results(&results)?,
        OutputFormat::Tsv => print_tsv_results(&results),
    }

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} lookups failed", results.len());
    }
    Ok(())
}

fn print_text_results(results: &[(&str, Result<SnpView, GenomeError>)]) {
    for (key, result) in results {
        match result {
            Ok(view) => println!(
                "{}\t{}\tchromosome {}\tposition {}",
                view.rsid, view.genotype, view.chromosome, view.position
            ),
            Err(e) => println!("{key}\t{e}"),
        }
    }
}

fn print_json_results(results: &[(&str, Result<SnpView, GenomeError>)]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = results
        .iter()
        .map(|(key, result)| match result {
            Ok(view) => serde_json::json!({ "key": key, "snp": view }),
            Err(e) => serde_json::json!({
                "key": key,
                "error": error_kind(e),
                "message": e.to_string(),
            }),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(results: &[(&str, Result<SnpView, GenomeError>)]) {
    println!("key\trsid\tgenotype\tchromosome\tposition\terror");
    for (key, result) in results {
        match result {
            Ok(view) => println!(
                "{key}\t{}\t{}\t{}\t{}\t",
                view.rsid, view.genotype, view.chromosome, view.position
            ),
            Err(e) => println!("{key}\t\t\t\t\t{}", error_kind(e)),
        }
    }
}

fn error_kind(error: &GenomeError) -> &'static str {
    match error {
        GenomeError::InvalidKey(_) => "invalid_key",
        GenomeError::NotFound(_) => "not_found",
        GenomeError::DuplicateKey(_) => "duplicate_key",
        GenomeError::Format(_) => "format",
        GenomeError::Io(_) => "io",
        GenomeError::InvalidConfig(_) => "invalid_config",
    }
}
