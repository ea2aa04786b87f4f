use serde::Serialize;

use crate::core::chromosome::Chromosome;
use crate::core::nucleotide::{Genotype, Nucleotide};
use crate::core::rsid::Rsid;
use crate::store::genome::GenomeError;

/// A single genotyped marker. The RSID is the key it is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Snp {
    pub genotype: Genotype,
    pub chromosome: Chromosome,
    /// 1-based base-pair offset; meaningless when the chromosome is unknown
    pub position: u32,
}

impl Snp {
    #[must_use]
    pub fn new(genotype: Genotype, chromosome: Chromosome, position: u32) -> Self {
        Self {
            genotype,
            chromosome,
            position,
        }
    }

    #[must_use]
    pub fn genotype_text(&self) -> String {
        self.genotype.to_text()
    }

    /// Genotype and chromosome packed into 11 bits
    #[must_use]
    pub fn packed(&self) -> PackedSnp {
        PackedSnp::pack(self.genotype, self.chromosome)
    }

    /// Rebuild a record from its packed form and position.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Format` if the packed value carries an invalid code.
    pub fn from_packed(packed: PackedSnp, position: u32) -> Result<Self, GenomeError> {
        let (genotype, chromosome) = packed.unpack()?;
        Ok(Self::new(genotype, chromosome, position))
    }
}

/// Packed genotype + chromosome.
///
/// | bits  | field          |
/// |-------|----------------|
/// | 0-2   | first allele   |
/// | 3-5   | second allele  |
/// | 6-10  | chromosome     |
/// | 11-15 | unused, zero   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedSnp(pub u16);

const ALLELE_MASK: u16 = (1 << Nucleotide::BITS) - 1;
const CHROMOSOME_SHIFT: u32 = 2 * Nucleotide::BITS;
const CHROMOSOME_MASK: u16 = (1 << Chromosome::BITS) - 1;
const USED_BITS: u32 = CHROMOSOME_SHIFT + Chromosome::BITS;

impl PackedSnp {
    #[must_use]
    pub fn pack(genotype: Genotype, chromosome: Chromosome) -> Self {
        let first = u16::from(genotype.first.code());
        let second = u16::from(genotype.second.code()) << Nucleotide::BITS;
        let chromosome = u16::from(chromosome.code()) << CHROMOSOME_SHIFT;
        Self(first | second | chromosome)
    }

    /// # Errors
    ///
    /// Returns `GenomeError::Format` if an unused bit is set or a field holds
    /// a code outside its enumeration.
    pub fn unpack(self) -> Result<(Genotype, Chromosome), GenomeError> {
        let raw = self.0;
        if raw >> USED_BITS != 0 {
            return Err(GenomeError::Format(format!(
                "packed record {raw:#06x} has unused bits set"
            )));
        }

        #[allow(clippy::cast_possible_truncation)] // masked to 3 and 5 bits
        let (first, second, chromosome) = (
            (raw & ALLELE_MASK) as u8,
            ((raw >> Nucleotide::BITS) & ALLELE_MASK) as u8,
            ((raw >> CHROMOSOME_SHIFT) & CHROMOSOME_MASK) as u8,
        );

        let genotype = Genotype::new(Nucleotide::from_code(first)?, Nucleotide::from_code(second)?);
        Ok((genotype, Chromosome::from_code(chromosome)?))
    }
}

/// Boundary view of a record as handed to callers outside the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnpView {
    pub rsid: Rsid,
    pub genotype: String,
    pub chromosome: Chromosome,
    pub position: u32,
}

impl SnpView {
    #[must_use]
    pub fn new(rsid: Rsid, snp: &Snp) -> Self {
        Self {
            rsid,
            genotype: snp.genotype_text(),
            chromosome: snp.chromosome,
            position: snp.position,
        }
    }
}
