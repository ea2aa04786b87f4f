//! Open-addressing hash map from RSID to [`Snp`].
//!
//! Capacity is always a power of two, slots are found by linear probing from
//! an avalanche hash of the RSID, and no probe sequence is ever longer than
//! `max_probe`. The table doubles when an insert would push the load factor
//! past `max_load_factor` or when a probe sequence runs out; there is no
//! removal, so lookups never need tombstones.

use tracing::{debug, warn};

use crate::core::snp::Snp;

/// Default number of slots, the first power of two above one million
pub const DEFAULT_CAPACITY: usize = 1 << 20;

/// Default load factor threshold that triggers growth
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;

/// Default bound on the length of a probe sequence
pub const DEFAULT_MAX_PROBE: usize = 64;

const MIN_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Entry {
    rsid: u32,
    snp: Snp,
}

enum Probe {
    Found(usize),
    Vacant(usize),
    Exhausted,
}

/// Murmur3 finalizer. A bijection on `u32`, so distinct RSIDs never share a hash.
#[inline]
fn hash(rsid: u32) -> u32 {
    let mut h = rsid;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

fn probe(slots: &[Option<Entry>], rsid: u32, max_probe: usize) -> Probe {
    let mask = slots.len() - 1;
    let start = hash(rsid) as usize & mask;

    for step in 0..max_probe.min(slots.len()) {
        let index = (start + step) & mask;
        match &slots[index] {
            None => return Probe::Vacant(index),
            Some(entry) if entry.rsid == rsid => return Probe::Found(index),
            Some(_) => {}
        }
    }
    Probe::Exhausted
}

/// Round a requested capacity up to a usable power of two
#[must_use]
pub fn normalize_capacity(requested: usize) -> usize {
    requested.max(MIN_CAPACITY).next_power_of_two()
}

/// Smallest capacity that holds `len` entries below `max_load_factor`
#[must_use]
pub fn required_capacity(len: usize, max_load_factor: f64) -> usize {
    let mut capacity = normalize_capacity(len);
    while max_len(capacity, max_load_factor) < len {
        capacity *= 2;
    }
    capacity
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn max_len(capacity: usize, max_load_factor: f64) -> usize {
    (capacity as f64 * max_load_factor) as usize
}

pub struct RsidMap {
    slots: Vec<Option<Entry>>,
    len: usize,
    max_load_factor: f64,
    max_probe: usize,
}

impl RsidMap {
    /// Create a map with the default capacity and growth settings
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_settings(capacity, DEFAULT_MAX_LOAD_FACTOR, DEFAULT_MAX_PROBE)
    }

    /// Create a map with explicit growth settings.
    ///
    /// `capacity` is rounded up to a power of two. A `max_load_factor`
    /// outside `(0, 1)` can never be satisfied, so it is replaced with
    /// [`DEFAULT_MAX_LOAD_FACTOR`].
    #[must_use]
    pub fn with_settings(capacity: usize, max_load_factor: f64, max_probe: usize) -> Self {
        let max_load_factor = if max_load_factor > 0.0 && max_load_factor < 1.0 {
            max_load_factor
        } else {
            warn!(max_load_factor, "unusable load factor, using the default");
            DEFAULT_MAX_LOAD_FACTOR
        };
        Self {
            slots: vec![None; normalize_capacity(capacity)],
            len: 0,
            max_load_factor,
            max_probe: max_probe.max(1),
        }
    }

    /// Insert a record for an RSID that is not yet present.
    ///
    /// Returns `false`, leaving the stored record untouched, if the RSID is
    /// already in the map.
    pub fn insert(&mut self, rsid: u32, snp: Snp) -> bool {
        if let Probe::Found(_) = probe(&self.slots, rsid, self.max_probe) {
            return false;
        }
        self.insert_new(rsid, snp);
        true
    }

    /// Insert a record, replacing and returning any record already stored
    /// under the same RSID
    pub fn insert_or_replace(&mut self, rsid: u32, snp: Snp) -> Option<Snp> {
        if let Probe::Found(index) = probe(&self.slots, rsid, self.max_probe) {
            let old = self.slots[index].replace(Entry { rsid, snp });
            return old.map(|entry| entry.snp);
        }
        self.insert_new(rsid, snp);
        None
    }

    fn insert_new(&mut self, rsid: u32, snp: Snp) {
        while self.len + 1 > max_len(self.slots.len(), self.max_load_factor) {
            self.grow();
        }

        loop {
            match probe(&self.slots, rsid, self.max_probe) {
                Probe::Vacant(index) => {
                    self.slots[index] = Some(Entry { rsid, snp });
                    self.len += 1;
                    return;
                }
                Probe::Found(index) => {
                    self.slots[index] = Some(Entry { rsid, snp });
                    return;
                }
                Probe::Exhausted => {
                    debug!(rsid, "probe bound exceeded");
                    self.grow();
                }
            }
        }
    }

    /// Double the table, doubling again if a reinsertion runs out of probes
    fn grow(&mut self) {
        let mut capacity = self.slots.len() * 2;
        loop {
            if let Some(slots) = self.rehash_into(capacity) {
                debug!(
                    from = self.slots.len(),
                    to = capacity,
                    len = self.len,
                    "growing RSID map"
                );
                self.slots = slots;
                return;
            }
            capacity *= 2;
        }
    }

    fn rehash_into(&self, capacity: usize) -> Option<Vec<Option<Entry>>> {
        let mut slots = vec![None; capacity];
        for entry in self.slots.iter().flatten() {
            match probe(&slots, entry.rsid, self.max_probe) {
                Probe::Vacant(index) => slots[index] = Some(*entry),
                Probe::Found(_) | Probe::Exhausted => return None,
            }
        }
        Some(slots)
    }

    /// Look up the record stored for an RSID
    #[must_use]
    pub fn get(&self, rsid: u32) -> Option<&Snp> {
        match probe(&self.slots, rsid, self.max_probe) {
            Probe::Found(index) => self.slots[index].as_ref().map(|entry| &entry.snp),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    #[must_use]
    pub fn contains(&self, rsid: u32) -> bool {
        self.get(rsid).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Occupied slots over capacity, always in `[0, 1)`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Occupied entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Snp)> {
        self.slots
            .iter()
            .flatten()
            .map(|entry| (entry.rsid, &entry.snp))
    }

    /// Occupied entries in ascending RSID order
    #[must_use]
    pub fn sorted_entries(&self) -> Vec<(u32, Snp)> {
        let mut entries: Vec<(u32, Snp)> = self.iter().map(|(rsid, snp)| (rsid, *snp)).collect();
        entries.sort_unstable_by_key(|(rsid, _)| *rsid);
        entries
    }
}

impl Default for RsidMap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RsidMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsidMap")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("max_load_factor", &self.max_load_factor)
            .field("max_probe", &self.max_probe)
            .finish()
    }
}
