//! # genome-store
//!
//! A compact, RSID-keyed store for SNP genotype data from consumer genome
//! sequencing and genotyping arrays.
//!
//! For every reference SNP identifier (RSID) the store records the called
//! genotype (a pair of bases, including indel markers and no-calls), the
//! chromosome and the base-pair position. About a million records fit in a
//! few megabytes, point lookups are expected O(1), and the whole collection
//! persists to a small binary file so later analysis sessions can reload it
//! without re-parsing raw data.
//!
//! ## Features
//!
//! - **Compact records**: genotype and chromosome pack into 11 bits beside a 32-bit position
//! - **Open addressing**: power-of-two table with bounded linear probing and doubling growth
//! - **Deterministic files**: records saved in ascending RSID order, replaced atomically
//! - **Validated loads**: corrupt files are rejected without touching the in-memory genome
//! - **Y chromosome detection**: tracked as records are inserted or loaded
//!
//! ## Example
//!
//! ```rust,no_run
//! use genome_store::{Genome, GenomeError};
//! use std::path::Path;
//!
//! let genome = Genome::load_from_file(Path::new("sample.genome")).unwrap();
//!
//! match genome.lookup("rs7412") {
//!     Ok(view) => println!("{} {} {}", view.genotype, view.chromosome, view.position),
//!     Err(GenomeError::NotFound(rsid)) => println!("{rsid} was not genotyped"),
//!     Err(e) => eprintln!("{e}"),
//! }
//!
//! println!("Y chromosome: {}", genome.has_y_chromosome());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Nucleotides, genotypes, chromosomes, RSIDs and the SNP record
//! - [`store`]: The RSID hash map, binary codec and `Genome` facade
//! - [`parsing`]: Import and export of delimited record tables
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod store;

// Re-export commonly used types for convenience
pub use crate::core::chromosome::{Chromosome, ChromosomeKind};
pub use crate::core::nucleotide::{Genotype, Nucleotide};
pub use crate::core::rsid::Rsid;
pub use crate::core::snp::{PackedSnp, Snp, SnpView};
pub use crate::store::config::{DuplicatePolicy, GenomeConfig};
pub use crate::store::genome::{Genome, GenomeError, GenotypeSource};
