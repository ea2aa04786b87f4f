//! RSID-keyed genotype storage and its binary persistence.
//!
//! A [`Genome`] owns a single [`RsidMap`], an open-addressing table sized for
//! the roughly one million markers on a consumer genotyping array. Genomes are
//! saved to and loaded from a compact binary format so repeated sessions can
//! skip re-parsing raw data.
//!
//! ## Example
//!
//! ```rust,no_run
//! use genome_store::{Chromosome, Genome, Genotype, Rsid, Snp};
//! use std::path::Path;
//!
//! let mut genome = Genome::new();
//! let snp = Snp::new(Genotype::parse("AG").unwrap(), Chromosome::autosome(1).unwrap(), 100);
//! genome.insert(Rsid::new(123), snp).unwrap();
//!
//! genome.save(Path::new("sample.genome")).unwrap();
//!
//! let loaded = Genome::load_from_file(Path::new("sample.genome")).unwrap();
//! let view = loaded.lookup("rs123").unwrap();
//! assert_eq!(view.genotype, "AG");
//! ```
//!
//! [`Genome`]: genome::Genome
//! [`RsidMap`]: map::RsidMap

pub mod codec;
pub mod config;
pub mod genome;
pub mod map;
