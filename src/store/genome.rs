use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::core::chromosome::Chromosome;
use crate::core::rsid::Rsid;
use crate::core::snp::{Snp, SnpView};
use crate::store::codec;
use crate::store::config::{DuplicatePolicy, GenomeConfig};
use crate::store::map::RsidMap;

#[derive(Error, Debug)]
pub enum GenomeError {
    #[error("Invalid RSID: {0}")]
    InvalidKey(String),

    #[error("No {0} in genome")]
    NotFound(Rsid),

    #[error("Duplicate {0} in genome")]
    DuplicateKey(Rsid),

    #[error("Invalid genome file: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Read-only, mapping-like access to genotype records.
///
/// Host integrations adapt this to their own collection protocol.
pub trait GenotypeSource {
    /// Number of stored records
    fn size(&self) -> usize;

    fn has(&self, rsid: Rsid) -> bool;

    /// # Errors
    ///
    /// Returns `GenomeError::NotFound` if the RSID is not stored.
    fn get(&self, rsid: Rsid) -> Result<Snp, GenomeError>;
}

/// A genome: every genotyped SNP of one sample, keyed by RSID.
///
/// Populated once (by inserts or [`Genome::load`]) and then queried. Reads
/// take `&self` and never mutate, so a populated genome can be shared across
/// threads; inserts and loads take `&mut self`.
#[derive(Debug)]
pub struct Genome {
    map: RsidMap,
    config: GenomeConfig,
    has_y_chromosome: bool,
}

impl Genome {
    /// Create an empty genome with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(GenomeConfig::default())
    }

    /// Create an empty genome with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::InvalidConfig` if the configuration fails validation.
    pub fn with_config(config: GenomeConfig) -> Result<Self, GenomeError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GenomeConfig) -> Self {
        let map = RsidMap::with_settings(
            config.initial_capacity,
            config.max_load_factor,
            config.max_probe,
        );
        Self {
            map,
            config,
            has_y_chromosome: false,
        }
    }

    /// Create a genome from a file written by [`Genome::save`]
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Io` or `GenomeError::Format`; see [`Genome::load`].
    pub fn load_from_file(path: &Path) -> Result<Self, GenomeError> {
        let mut genome = Self::new();
        genome.load(path)?;
        Ok(genome)
    }

    #[must_use]
    pub fn config(&self) -> &GenomeConfig {
        &self.config
    }

    /// Insert a record.
    ///
    /// # Errors
    ///
    /// Under [`DuplicatePolicy::Reject`], returns `GenomeError::DuplicateKey`
    /// if the RSID is already stored; the stored record is left unchanged.
    pub fn insert(&mut self, rsid: Rsid, snp: Snp) -> Result<(), GenomeError> {
        match self.config.duplicate_policy {
            DuplicatePolicy::Reject => {
                if !self.map.insert(rsid.get(), snp) {
                    return Err(GenomeError::DuplicateKey(rsid));
                }
            }
            DuplicatePolicy::Overwrite => {
                let replaced = self.map.insert_or_replace(rsid.get(), snp);
                if replaced.is_some_and(|old| old.chromosome == Chromosome::Y)
                    && snp.chromosome != Chromosome::Y
                {
                    self.has_y_chromosome = self
                        .map
                        .iter()
                        .any(|(_, s)| s.chromosome == Chromosome::Y);
                    return Ok(());
                }
            }
        }
        self.has_y_chromosome |= snp.chromosome == Chromosome::Y;
        Ok(())
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Ratio of stored records to table capacity, in `[0, 1)`
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.map.load_factor()
    }

    #[must_use]
    pub fn has(&self, rsid: Rsid) -> bool {
        self.map.contains(rsid.get())
    }

    /// Look up the record for an RSID.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::NotFound` if the RSID is not stored.
    pub fn get(&self, rsid: Rsid) -> Result<Snp, GenomeError> {
        self.map
            .get(rsid.get())
            .copied()
            .ok_or(GenomeError::NotFound(rsid))
    }

    /// Borrow the record for an RSID, if stored
    #[must_use]
    pub fn find(&self, rsid: Rsid) -> Option<&Snp> {
        self.map.get(rsid.get())
    }

    /// Look up a record by an untrusted text key such as `rs123` or `123`.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::InvalidKey` if the key is not a 32-bit RSID, or
    /// `GenomeError::NotFound` if it is not stored.
    pub fn lookup(&self, key: &str) -> Result<SnpView, GenomeError> {
        let rsid: Rsid = key.parse()?;
        self.get(rsid).map(|snp| SnpView::new(rsid, &snp))
    }

    /// Look up a record by an untrusted integer key.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::InvalidKey` for negative keys or keys above
    /// `u32::MAX`, or `GenomeError::NotFound` if the RSID is not stored.
    pub fn get_checked(&self, key: i64) -> Result<SnpView, GenomeError> {
        let rsid = Rsid::try_from(key)?;
        self.get(rsid).map(|snp| SnpView::new(rsid, &snp))
    }

    /// True if any stored record is placed on the Y chromosome, called or not
    #[must_use]
    pub fn has_y_chromosome(&self) -> bool {
        self.has_y_chromosome
    }

    /// Records in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (Rsid, &Snp)> {
        self.map.iter().map(|(rsid, snp)| (Rsid(rsid), snp))
    }

    /// Records in ascending RSID order
    #[must_use]
    pub fn records_sorted(&self) -> Vec<(Rsid, Snp)> {
        self.map
            .sorted_entries()
            .into_iter()
            .map(|(rsid, snp)| (Rsid(rsid), snp))
            .collect()
    }

    /// Save to the binary format, atomically replacing `path`.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Io` if the file cannot be written; any previous
    /// file at `path` is left intact.
    pub fn save(&self, path: &Path) -> Result<(), GenomeError> {
        codec::save_to_path(path, &self.map)
    }

    /// Replace the contents of this genome with a file written by [`Genome::save`].
    ///
    /// The file is decoded into a fresh table and swapped in only when every
    /// record validates, so on error the genome is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Format` if the file fails validation, or
    /// `GenomeError::Io` if it cannot be read.
    pub fn load(&mut self, path: &Path) -> Result<(), GenomeError> {
        let table = codec::load_from_path(path, &self.config)?;
        debug!(
            previous = self.map.len(),
            loaded = table.map.len(),
            "replacing genome contents"
        );
        self.map = table.map;
        self.has_y_chromosome = table.has_y_chromosome;
        Ok(())
    }
}

impl Default for Genome {
    fn default() -> Self {
        Self::new()
    }
}

impl GenotypeSource for Genome {
    fn size(&self) -> usize {
        self.len()
    }

    fn has(&self, rsid: Rsid) -> bool {
        Genome::has(self, rsid)
    }

    fn get(&self, rsid: Rsid) -> Result<Snp, GenomeError> {
        Genome::get(self, rsid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nucleotide::Genotype;

    fn small_genome() -> Genome {
        Genome::with_config(GenomeConfig::default().with_initial_capacity(64)).unwrap()
    }

    fn snp(genotype: &str, chromosome: &str, position: u32) -> Snp {
        Snp::new(
            Genotype::parse(genotype).unwrap(),
            chromosome.parse().unwrap(),
            position,
        )
    }

    #[test]
    fn test_empty_genome() {
        let genome = Genome::new();
        assert_eq!(genome.len(), 0);
        assert!(!genome.has(Rsid(1)));
        assert!(!genome.has_y_chromosome());
        assert!(matches!(genome.get(Rsid(1)), Err(GenomeError::NotFound(Rsid(1)))));
        assert!(genome.load_factor().abs() < f64::EPSILON);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut genome = small_genome();
        genome.insert(Rsid(123), snp("AG", "1", 100)).unwrap();

        let view = genome.lookup("rs123").unwrap();
        assert_eq!(view.genotype, "AG");
        assert_eq!(view.chromosome.to_string(), "1");
        assert_eq!(view.position, 100);
        assert_eq!(genome.get(Rsid(123)).unwrap(), snp("AG", "1", 100));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut genome = small_genome();
        genome.insert(Rsid(5), snp("AA", "2", 10)).unwrap();
        let err = genome.insert(Rsid(5), snp("GG", "3", 20)).unwrap_err();
        assert!(matches!(err, GenomeError::DuplicateKey(Rsid(5))));
        assert_eq!(genome.get(Rsid(5)).unwrap(), snp("AA", "2", 10));
        assert_eq!(genome.len(), 1);
    }

    #[test]
    fn test_duplicate_overwrite_policy() {
        let config = GenomeConfig::default()
            .with_initial_capacity(64)
            .with_duplicate_policy(DuplicatePolicy::Overwrite);
        let mut genome = Genome::with_config(config).unwrap();
        genome.insert(Rsid(5), snp("A", "Y", 10)).unwrap();
        assert!(genome.has_y_chromosome());

        genome.insert(Rsid(5), snp("GG", "3", 20)).unwrap();
        assert_eq!(genome.get(Rsid(5)).unwrap(), snp("GG", "3", 20));
        assert_eq!(genome.len(), 1);
        assert!(!genome.has_y_chromosome());
    }

    #[test]
    fn test_y_chromosome_presence() {
        let mut genome = small_genome();
        genome.insert(Rsid(1), snp("AA", "1", 1)).unwrap();
        genome.insert(Rsid(2), snp("CT", "X", 2)).unwrap();
        assert!(!genome.has_y_chromosome());

        // an uncalled Y marker still counts
        genome.insert(Rsid(3), snp("--", "Y", 3)).unwrap();
        assert!(genome.has_y_chromosome());
    }

    #[test]
    fn test_invalid_keys() {
        let genome = small_genome();
        assert!(matches!(
            genome.get_checked(1 << 33),
            Err(GenomeError::InvalidKey(_))
        ));
        assert!(matches!(genome.get_checked(-4), Err(GenomeError::InvalidKey(_))));
        assert!(matches!(genome.lookup("i5000"), Err(GenomeError::InvalidKey(_))));
        assert!(matches!(genome.get_checked(17), Err(GenomeError::NotFound(_))));
    }

    #[test]
    fn test_genotype_source_trait() {
        fn count_present(source: &dyn GenotypeSource, keys: &[u32]) -> usize {
            keys.iter().filter(|k| source.has(Rsid(**k))).count()
        }

        let mut genome = small_genome();
        genome.insert(Rsid(10), snp("TT", "5", 1)).unwrap();
        genome.insert(Rsid(20), snp("TT", "5", 2)).unwrap();

        assert_eq!(count_present(&genome, &[10, 15, 20]), 2);
        assert_eq!(GenotypeSource::size(&genome), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GenomeConfig::default().with_max_load_factor(1.2);
        assert!(matches!(
            Genome::with_config(config),
            Err(GenomeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genome.bin");

        let mut genome = small_genome();
        for (rsid, genotype, chromosome) in [(3, "AG", "1"), (1, "DI", "MT"), (2, "C", "Y")] {
            genome
                .insert(Rsid(rsid), snp(genotype, chromosome, rsid * 1000))
                .unwrap();
        }
        genome.save(&path).unwrap();

        let loaded = Genome::load_from_file(&path).unwrap();
        assert_eq!(loaded.len(), genome.len());
        assert_eq!(loaded.capacity(), genome.capacity());
        assert!((loaded.load_factor() - genome.load_factor()).abs() < f64::EPSILON);
        assert!(loaded.has_y_chromosome());
        for (rsid, snp) in genome.iter() {
            assert_eq!(loaded.get(rsid).unwrap(), *snp);
        }
    }

    #[test]
    fn test_failed_load_keeps_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.bin");
        std::fs::write(&path, b"not a genome file at all, just text").unwrap();

        let mut genome = small_genome();
        genome.insert(Rsid(42), snp("GG", "Y", 7)).unwrap();

        assert!(matches!(genome.load(&path), Err(GenomeError::Format(_))));
        assert_eq!(genome.len(), 1);
        assert!(genome.has(Rsid(42)));
        assert!(genome.has_y_chromosome());

        let missing = dir.path().join("missing.bin");
        assert!(matches!(genome.load(&missing), Err(GenomeError::Io(_))));
        assert_eq!(genome.len(), 1);
    }
}
