//! Import and export of genotype record tables.
//!
//! The table is this crate's own interchange format, not a vendor dialect:
//! one record per line with the columns `rsid`, `chromosome`, `position`,
//! `genotype`, separated by tabs (`.tsv`) or commas (`.csv`), optionally
//! gzip-compressed (`.gz`).
//!
//! ## Example
//!
//! ```rust,no_run
//! use genome_store::Genome;
//! use genome_store::parsing::tsv::{import_table_file, write_table};
//! use std::path::Path;
//!
//! let mut genome = Genome::new();
//! let summary = import_table_file(Path::new("genotypes.tsv.gz"), &mut genome).unwrap();
//! println!("{} records, {} duplicates", summary.inserted, summary.duplicates);
//!
//! write_table(&genome, &mut std::io::stdout(), '\t').unwrap();
//! ```
//!
//! ## Columns
//!
//! | Column     | Example   | Notes |
//! |------------|-----------|-------|
//! | rsid       | rs7412    | `rs` prefix optional |
//! | chromosome | 19        | 1-22, X, Y, MT; `chr` prefix accepted; 0 for unknown |
//! | position   | 45412079  | 1-based |
//! | genotype   | CT        | two alleles from A/C/G/T/D/I, `-` for no call |

pub mod tsv;
