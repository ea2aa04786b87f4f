use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::{count_to_f64, OutputFormat};
use crate::store::genome::Genome;

#[derive(Args)]
pub struct InfoArgs {
    /// Genome file written by `import`
    #[arg(required = true)]
    pub genome: PathBuf,
}

/// Summary statistics for a genome
#[derive(Debug, Serialize)]
pub struct GenomeInfo {
    pub records: usize,
    pub capacity: usize,
    pub load_factor: f64,
    pub has_y_chromosome: bool,
    /// Fraction of records with both alleles called
    pub call_rate: f64,
    /// Fraction of called records that are homozygous
    pub homozygosity: f64,
}

impl GenomeInfo {
    #[must_use]
    pub fn from_genome(genome: &Genome) -> Self {
        let called = genome.iter().filter(|(_, snp)| snp.genotype.is_called()).count();
        let homozygous = genome
            .iter()
            .filter(|(_, snp)| snp.genotype.is_homozygous())
            .count();

        Self {
            records: genome.len(),
            capacity: genome.capacity(),
            load_factor: genome.load_factor(),
            has_y_chromosome: genome.has_y_chromosome(),
            call_rate: ratio(called, genome.len()),
            homozygosity: ratio(homozygous, called),
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        count_to_f64(part) / count_to_f64(whole)
    }
}

pub fn run(args: InfoArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let genome = Genome::load_from_file(&args.genome)?;
    let info = GenomeInfo::from_genome(&genome);

    if verbose {
        eprintln!("Loaded {} records from {}", info.records, args.genome.display());
    }

    match format {
        OutputFormat::Text => {
            println!("Genome: {}", args.genome.display());
            println!("{}", "=".repeat(60));
            println!("  Records: {}", info.records);
            println!("  Capacity: {}", info.capacity);
            println!("  Load factor: {:.4}", info.load_factor);
            println!("  Y chromosome: {}", info.has_y_chromosome);
            println!("  Call rate: {:.2}%", info.call_rate * 100.0);
            println!("  Homozygosity: {:.2}%", info.homozygosity * 100.0);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Tsv => {
            println!("records\tcapacity\tload_factor\thas_y_chromosome\tcall_rate\thomozygosity");
            println!(
                "{}\t{}\t{:.4}\t{}\t{:.4}\t{:.4}",
                info.records,
                info.capacity,
                info.load_factor,
                info.has_y_chromosome,
                info.call_rate,
                info.homozygosity,
            );
        }
    }

    Ok(())
}
