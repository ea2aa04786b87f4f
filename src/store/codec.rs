//! Binary persistence for a whole RSID map.
//!
//! Layout, little-endian, encoded with bincode's fixed-width defaults:
//!
//! ```text
//! MAGIC     [u8; 4]  "SNPG"
//! VERSION   u32
//! SIZE      u64      number of records
//! CAPACITY  u64      table capacity at save time
//! SIZE x record:
//!   RSID      u32
//!   PACKED    u16    genotype + chromosome, see `PackedSnp`
//!   POSITION  u32
//! ```
//!
//! Records are written in ascending RSID order and must be strictly ascending
//! on read.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::core::chromosome::Chromosome;
use crate::core::snp::{PackedSnp, Snp};
use crate::store::config::GenomeConfig;
use crate::store::genome::GenomeError;
use crate::store::map::{required_capacity, RsidMap, DEFAULT_CAPACITY};

pub const MAGIC: [u8; 4] = *b"SNPG";
pub const FORMAT_VERSION: u32 = 1;

/// Encoded header size in bytes
pub const HEADER_LEN: usize = 24;
/// Encoded record size in bytes
pub const RECORD_LEN: usize = 10;

/// More records than distinct 32-bit RSIDs cannot be a valid file
const MAX_RECORDS: u64 = 1 << 32;

/// Stored capacities up to this many slots are honored regardless of SIZE
const MAX_TRUSTED_CAPACITY: usize = 1 << 26;

#[derive(Debug, Serialize, Deserialize)]
struct FileHeader {
    magic: [u8; 4],
    version: u32,
    size: u64,
    capacity: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileRecord {
    rsid: u32,
    packed: u16,
    position: u32,
}

/// A decoded table plus what was learned while rebuilding it
#[derive(Debug)]
pub struct DecodedTable {
    pub map: RsidMap,
    pub has_y_chromosome: bool,
}

fn encode_error(err: bincode::Error) -> GenomeError {
    match *err {
        bincode::ErrorKind::Io(e) => GenomeError::Io(e),
        other => GenomeError::Format(other.to_string()),
    }
}

fn decode_error(err: bincode::Error) -> GenomeError {
    match *err {
        bincode::ErrorKind::Io(e) if e.kind() == ErrorKind::UnexpectedEof => {
            GenomeError::Format("truncated genome file".to_string())
        }
        bincode::ErrorKind::Io(e) => GenomeError::Io(e),
        other => GenomeError::Format(other.to_string()),
    }
}

/// Write a map to `writer` in the binary layout
///
/// # Errors
///
/// Returns `GenomeError::Io` if writing fails.
pub fn write_table<W: Write>(writer: &mut W, map: &RsidMap) -> Result<(), GenomeError> {
    let header = FileHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
        size: map.len() as u64,
        capacity: map.capacity() as u64,
    };
    bincode::serialize_into(&mut *writer, &header).map_err(encode_error)?;

    for (rsid, snp) in map.sorted_entries() {
        let record = FileRecord {
            rsid,
            packed: snp.packed().0,
            position: snp.position,
        };
        bincode::serialize_into(&mut *writer, &record).map_err(encode_error)?;
    }

    debug!(records = map.len(), "encoded genome table");
    Ok(())
}

/// Read a table written by [`write_table`], rebuilding a fresh map.
///
/// Nothing is returned unless the whole stream validates.
///
/// # Errors
///
/// Returns `GenomeError::Format` for a bad magic marker, unsupported version,
/// implausible size, truncated or trailing data, out-of-order or duplicate
/// RSIDs, or invalid codes; `GenomeError::Io` for other read failures.
///
/// An unusable CAPACITY is not an error: the table is rebuilt at the capacity
/// the records require instead.
pub fn read_table<R: Read>(reader: &mut R, config: &GenomeConfig) -> Result<DecodedTable, GenomeError> {
    let header: FileHeader = bincode::deserialize_from(&mut *reader).map_err(decode_error)?;

    if header.magic != MAGIC {
        return Err(GenomeError::Format(format!(
            "bad magic marker {:?}, expected {:?}",
            String::from_utf8_lossy(&header.magic),
            String::from_utf8_lossy(&MAGIC)
        )));
    }
    if header.version != FORMAT_VERSION {
        return Err(GenomeError::Format(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            header.version
        )));
    }

    let size = checked_size(header.size)?;

    // Decode into a scratch buffer first so a lying header cannot force a
    // huge table allocation before the records are proven to exist.
    let mut records: Vec<(u32, Snp)> = Vec::with_capacity(size.min(DEFAULT_CAPACITY));
    let mut previous: Option<u32> = None;
    for _ in 0..size {
        let record: FileRecord = bincode::deserialize_from(&mut *reader).map_err(decode_error)?;
        if previous.is_some_and(|p| record.rsid <= p) {
            return Err(GenomeError::Format(format!(
                "record rs{} is out of order or duplicated",
                record.rsid
            )));
        }
        previous = Some(record.rsid);
        records.push((record.rsid, Snp::from_packed(PackedSnp(record.packed), record.position)?));
    }

    let mut trailing = [0u8; 1];
    if reader.read(&mut trailing)? != 0 {
        return Err(GenomeError::Format(
            "trailing data after last record".to_string(),
        ));
    }

    let required = required_capacity(size, config.max_load_factor);
    let capacity = match trusted_capacity(header.capacity, size, required) {
        Some(stored) => stored.max(required),
        None => {
            warn!(
                stored = header.capacity,
                records = size,
                rebuilt = required,
                "ignoring implausible stored capacity"
            );
            required
        }
    };
    let mut map = RsidMap::with_settings(capacity, config.max_load_factor, config.max_probe);
    let mut has_y_chromosome = false;
    for (rsid, snp) in records {
        has_y_chromosome |= snp.chromosome == Chromosome::Y;
        map.insert(rsid, snp);
    }

    debug!(records = map.len(), capacity = map.capacity(), "decoded genome table");
    Ok(DecodedTable {
        map,
        has_y_chromosome,
    })
}

fn checked_size(size: u64) -> Result<usize, GenomeError> {
    if size > MAX_RECORDS {
        return Err(GenomeError::Format(format!(
            "record count {size} exceeds the RSID space"
        )));
    }
    usize::try_from(size)
        .map_err(|_| GenomeError::Format(format!("record count {size} too large")))
}

/// CAPACITY is informational. It is kept when it is a power of two larger
/// than SIZE and no bigger than `MAX_TRUSTED_CAPACITY` or 16 times what the
/// records require.
fn trusted_capacity(capacity: u64, size: usize, required: usize) -> Option<usize> {
    let capacity = usize::try_from(capacity).ok()?;
    let ceiling = required.saturating_mul(16).max(MAX_TRUSTED_CAPACITY);
    (capacity.is_power_of_two() && capacity > size && capacity <= ceiling).then_some(capacity)
}

/// Save a map to `path`, replacing any existing file atomically.
///
/// The table is written to a temporary file in the same directory, synced,
/// then renamed over `path`. On failure the temporary file is removed and
/// `path` is left as it was.
///
/// # Errors
///
/// Returns `GenomeError::Io` if the temporary file cannot be created,
/// written, synced or renamed.
pub fn save_to_path(path: &Path, map: &RsidMap) -> Result<(), GenomeError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_table(&mut writer, map)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| GenomeError::Io(e.error))?;

    info!(path = %path.display(), records = map.len(), "saved genome");
    Ok(())
}

/// Load a table from `path`
///
/// # Errors
///
/// See [`read_table`]; opening the file may also fail with `GenomeError::Io`.
pub fn load_from_path(path: &Path, config: &GenomeConfig) -> Result<DecodedTable, GenomeError> {
    let mut reader = BufReader::new(File::open(path)?);
    let table = read_table(&mut reader, config)?;
    info!(path = %path.display(), records = table.map.len(), "loaded genome");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nucleotide::Genotype;

    fn sample_map() -> RsidMap {
        let mut map = RsidMap::with_capacity(64);
        let rows = [
            (429_358, "TC", "19", 45_411_941),
            (7412, "CC", "19", 45_412_079),
            (2_032_597, "A", "Y", 14_607_122),
            (9, "--", "0", 0),
        ];
        for (rsid, genotype, chromosome, position) in rows {
            let snp = Snp::new(
                Genotype::parse(genotype).unwrap(),
                chromosome.parse().unwrap(),
                position,
            );
            map.insert(rsid, snp);
        }
        map
    }

    fn encode(map: &RsidMap) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_table(&mut bytes, map).unwrap();
        bytes
    }

    #[test]
    fn test_layout_is_bit_exact() {
        let bytes = encode(&sample_map());
        assert_eq!(bytes.len(), HEADER_LEN + 4 * RECORD_LEN);
        assert_eq!(&bytes[0..4], b"SNPG");
        assert_eq!(&bytes[4..8], &1u32.to_le_bytes());
        assert_eq!(&bytes[8..16], &4u64.to_le_bytes());
        assert_eq!(&bytes[16..24], &64u64.to_le_bytes());

        // first record is the smallest RSID
        assert_eq!(&bytes[24..28], &9u32.to_le_bytes());
        assert_eq!(&bytes[28..30], &0u16.to_le_bytes());
        assert_eq!(&bytes[30..34], &0u32.to_le_bytes());

        // second record is rs7412 CC on chromosome 19
        let packed = 2u16 | (2 << 3) | (19 << 6);
        assert_eq!(&bytes[34..38], &7412u32.to_le_bytes());
        assert_eq!(&bytes[38..40], &packed.to_le_bytes());
        assert_eq!(&bytes[40..44], &45_412_079u32.to_le_bytes());
    }

    #[test]
    fn test_output_is_deterministic() {
        let a = sample_map();
        let mut b = RsidMap::with_capacity(64);
        for (rsid, snp) in a.sorted_entries().into_iter().rev() {
            b.insert(rsid, snp);
        }
        assert_eq!(encode(&a), encode(&b));
    }

    #[test]
    fn test_read_rebuilds_table() {
        let bytes = encode(&sample_map());
        let table = read_table(&mut bytes.as_slice(), &GenomeConfig::default()).unwrap();
        assert_eq!(table.map.len(), 4);
        assert_eq!(table.map.capacity(), 64);
        assert!(table.has_y_chromosome);
        assert_eq!(table.map.get(7412).unwrap().genotype.to_text(), "CC");
        assert_eq!(table.map.get(2_032_597).unwrap().genotype.to_text(), "A-");
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode(&sample_map());
        bytes[0] = b'X';
        let err = read_table(&mut bytes.as_slice(), &GenomeConfig::default()).unwrap_err();
        assert!(matches!(err, GenomeError::Format(msg) if msg.contains("magic")));
    }

    #[test]
    fn test_bad_version() {
        let mut bytes = encode(&sample_map());
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        let err = read_table(&mut bytes.as_slice(), &GenomeConfig::default()).unwrap_err();
        assert!(matches!(err, GenomeError::Format(msg) if msg.contains("version")));
    }

    #[test]
    fn test_truncated_records() {
        let bytes = encode(&sample_map());
        let truncated = &bytes[..bytes.len() - 3];
        let err = read_table(&mut &truncated[..], &GenomeConfig::default()).unwrap_err();
        assert!(matches!(err, GenomeError::Format(msg) if msg.contains("truncated")));
    }

    #[test]
    fn test_trailing_data() {
        let mut bytes = encode(&sample_map());
        bytes.push(0);
        assert!(matches!(
            read_table(&mut bytes.as_slice(), &GenomeConfig::default()),
            Err(GenomeError::Format(_))
        ));
    }

    #[test]
    fn test_invalid_chromosome_code() {
        let mut bytes = encode(&sample_map());
        let packed = 1u16 | (30 << 6);
        bytes[28..30].copy_from_slice(&packed.to_le_bytes());
        assert!(matches!(
            read_table(&mut bytes.as_slice(), &GenomeConfig::default()),
            Err(GenomeError::Format(_))
        ));
    }

    #[test]
    fn test_out_of_order_records() {
        let mut bytes = encode(&sample_map());
        // overwrite the second RSID with the first one
        bytes[34..38].copy_from_slice(&9u32.to_le_bytes());
        let err = read_table(&mut bytes.as_slice(), &GenomeConfig::default()).unwrap_err();
        assert!(matches!(err, GenomeError::Format(msg) if msg.contains("out of order")));
    }

    #[test]
    fn test_implausible_record_count() {
        let mut bytes = encode(&sample_map());
        bytes[8..16].copy_from_slice(&(1u64 << 40).to_le_bytes());
        assert!(matches!(
            read_table(&mut bytes.as_slice(), &GenomeConfig::default()),
            Err(GenomeError::Format(_))
        ));
    }

    #[test]
    fn test_implausible_capacity_is_rebuilt() {
        for stored in [0u64, 2, 100, 1 << 40, u64::MAX] {
            let mut bytes = encode(&sample_map());
            bytes[16..24].copy_from_slice(&stored.to_le_bytes());
            let table = read_table(&mut bytes.as_slice(), &GenomeConfig::default()).unwrap();
            assert_eq!(table.map.capacity(), 8, "stored capacity {stored}");
            assert_eq!(table.map.len(), 4);
            assert_eq!(table.map.get(7412).unwrap().position, 45_412_079);
        }
    }

    #[test]
    fn test_large_stored_capacity_is_kept() {
        let mut map = RsidMap::with_capacity(1 << 22);
        for (rsid, snp) in sample_map().sorted_entries() {
            map.insert(rsid, snp);
        }
        let bytes = encode(&map);
        let table = read_table(&mut bytes.as_slice(), &GenomeConfig::default()).unwrap();
        assert_eq!(table.map.capacity(), 1 << 22);
        assert_eq!(table.map.sorted_entries(), map.sorted_entries());
    }

    #[test]
    fn test_save_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genome.bin");
        std::fs::write(&path, b"old contents").unwrap();

        save_to_path(&path, &sample_map()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"SNPG");
        // only the target remains, no leftover temporary files
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_failure_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("genome.bin");
        assert!(matches!(
            save_to_path(&path, &sample_map()),
            Err(GenomeError::Io(_))
        ));
        assert!(!path.exists());
    }
}
