//! Core value types for SNP genotype records.
//!
//! - [`Nucleotide`] and [`Genotype`]: called alleles, including indel markers and no-calls
//! - [`Chromosome`]: autosomes 1-22, X, Y, MT, or unknown
//! - [`Rsid`]: the numeric key every record is stored under
//! - [`Snp`]: the fixed-size record (genotype, chromosome, position)
//!
//! ## Packed Codes
//!
//! Records are packed into 11 bits plus a 32-bit position, both in memory
//! (see [`PackedSnp`]) and on disk:
//!
//! | Nucleotide | Code | | Chromosome | Code |
//! |------------|------|-|------------|------|
//! | no call    | 0    | | unknown    | 0    |
//! | A          | 1    | | 1-22       | 1-22 |
//! | C          | 2    | | X          | 23   |
//! | G          | 3    | | Y          | 24   |
//! | T          | 4    | | MT         | 25   |
//! | D          | 5    | |            |      |
//! | I          | 6    | |            |      |
//!
//! [`Nucleotide`]: nucleotide::Nucleotide
//! [`Genotype`]: nucleotide::Genotype
//! [`Chromosome`]: chromosome::Chromosome
//! [`Rsid`]: rsid::Rsid
//! [`Snp`]: snp::Snp
//! [`PackedSnp`]: snp::PackedSnp

pub mod chromosome;
pub mod nucleotide;
pub mod rsid;
pub mod snp;
