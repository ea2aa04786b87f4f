use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::chromosome::Chromosome;
use crate::core::nucleotide::Genotype;
use crate::core::rsid::Rsid;
use crate::core::snp::Snp;
use crate::store::genome::{Genome, GenomeError};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record table: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Genome(#[from] GenomeError),
}

/// Column names written by [`write_table`] and recognized as a header on import
pub const TABLE_COLUMNS: [&str; 4] = ["rsid", "chromosome", "position", "genotype"];

/// Counts from a completed import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Data rows read
    pub rows: usize,
    /// Rows whose RSID was not yet stored
    pub inserted: usize,
    /// Rows whose RSID was already stored (kept or replaced per duplicate policy)
    pub duplicates: usize,
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Pick the field delimiter from the file name: `,` for `.csv[.gz]`, tab otherwise
#[must_use]
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn delimiter_for(path: &Path) -> char {
    let path_str = path.to_string_lossy().to_lowercase();
    let stem = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".bgz"))
        .unwrap_or(&path_str);
    if stem.ends_with(".csv") {
        ','
    } else {
        '\t'
    }
}

/// Import a record table file into `genome`, decompressing `.gz` input.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if a row is malformed.
pub fn import_table_file(path: &Path, genome: &mut Genome) -> Result<ImportSummary, ParseError> {
    let file = File::open(path)?;
    let delimiter = delimiter_for(path);

    if is_gzipped(path) {
        parse_table_reader(BufReader::new(MultiGzDecoder::new(file)), delimiter, genome)
    } else {
        parse_table_reader(BufReader::new(file), delimiter, genome)
    }
}

/// Import record table text with columns: rsid, chromosome, position, genotype
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a row is malformed.
pub fn parse_table_text(
    text: &str,
    delimiter: char,
    genome: &mut Genome,
) -> Result<ImportSummary, ParseError> {
    parse_table_reader(text.as_bytes(), delimiter, genome)
}

/// Import records from a reader.
///
/// Blank lines and `#` comments are skipped, and a first data line naming
/// the columns is treated as a header. Rows for an RSID that is already
/// stored are counted as duplicates and logged instead of aborting.
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure, or `ParseError::InvalidFormat`
/// with a 1-based line number if a row has fewer than 4 fields or an
/// unparseable RSID, chromosome, position or genotype.
pub fn parse_table_reader<R: BufRead>(
    reader: R,
    delimiter: char,
    genome: &mut Genome,
) -> Result<ImportSummary, ParseError> {
    let mut summary = ImportSummary::default();
    let mut first_data_line = true;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == TABLE_COLUMNS[0] || first == "snp" || first == "id" {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;
        let (rsid, snp) = parse_row(&fields, line_num)?;
        summary.rows += 1;

        if genome.has(rsid) {
            summary.duplicates += 1;
            match genome.insert(rsid, snp) {
                Ok(()) => debug!(%rsid, line = line_num, "replaced duplicate record"),
                Err(GenomeError::DuplicateKey(_)) => {
                    warn!(%rsid, line = line_num, "skipping duplicate record");
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            genome.insert(rsid, snp)?;
            summary.inserted += 1;
        }
    }

    Ok(summary)
}

fn parse_row(fields: &[&str], line_num: usize) -> Result<(Rsid, Snp), ParseError> {
    if fields.len() < 4 {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num} has fewer than 4 fields"
        )));
    }

    let rsid: Rsid = fields[0].parse().map_err(|_| {
        ParseError::InvalidFormat(format!("Invalid RSID on line {line_num}: '{}'", fields[0]))
    })?;
    let chromosome: Chromosome = fields[1].parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "Invalid chromosome on line {line_num}: '{}'",
            fields[1]
        ))
    })?;
    let position: u32 = fields[2].parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "Invalid position on line {line_num}: '{}'",
            fields[2]
        ))
    })?;
    let genotype = Genotype::parse(fields[3]).ok_or_else(|| {
        ParseError::InvalidFormat(format!(
            "Invalid genotype on line {line_num}: '{}'",
            fields[3]
        ))
    })?;

    Ok((rsid, Snp::new(genotype, chromosome, position)))
}

/// Write every record as a table in ascending RSID order, with a header line
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_table<W: Write>(
    genome: &Genome,
    writer: &mut W,
    delimiter: char,
) -> std::io::Result<()> {
    writeln!(writer, "{}", TABLE_COLUMNS.join(delimiter.to_string().as_str()))?;
    for (rsid, snp) in genome.records_sorted() {
        writeln!(
            writer,
            "{rsid}{delimiter}{}{delimiter}{}{delimiter}{}",
            snp.chromosome,
            snp.position,
            snp.genotype
        )?;
    }
    Ok(())
}
