use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::snp::SnpView;
use crate::parsing::tsv::{delimiter_for, write_table};
use crate::store::genome::Genome;

#[derive(Args)]
pub struct ExportArgs {
    /// Genome file written by `import`
    #[arg(required = true)]
    pub genome: PathBuf,

    /// Output file (.tsv or .csv). If not specified, prints to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let genome = Genome::load_from_file(&args.genome)?;

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    match format {
        OutputFormat::Json => {
            let records: Vec<SnpView> = genome
                .records_sorted()
                .iter()
                .map(|(rsid, snp)| SnpView::new(*rsid, snp))
                .collect();
            serde_json::to_writer_pretty(&mut writer, &records)?;
            writeln!(writer)?;
        }
        OutputFormat::Text | OutputFormat::Tsv => {
            let delimiter = args.output.as_deref().map_or('\t', delimiter_for);
            write_table(&genome, &mut writer, delimiter)?;
        }
    }
    writer.flush()?;

    if verbose {
        match &args.output {
            Some(path) => eprintln!("Exported {} records to {}", genome.len(), path.display()),
            None => eprintln!("Exported {} records", genome.len()),
        }
    }

    Ok(())
}
