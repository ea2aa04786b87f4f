use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::genome::GenomeError;

/// Reference SNP identifier, the numeric part of `rs123`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rsid(pub u32);

impl Rsid {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Rsid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rs{}", self.0)
    }
}

impl From<u32> for Rsid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl TryFrom<u64> for Rsid {
    type Error = GenomeError;

    fn try_from(key: u64) -> Result<Self, Self::Error> {
        u32::try_from(key)
            .map(Self)
            .map_err(|_| GenomeError::InvalidKey(format!("RSID {key} out of range")))
    }
}

impl TryFrom<i64> for Rsid {
    type Error = GenomeError;

    fn try_from(key: i64) -> Result<Self, Self::Error> {
        u32::try_from(key)
            .map(Self)
            .map_err(|_| GenomeError::InvalidKey(format!("RSID {key} out of range")))
    }
}

impl FromStr for Rsid {
    type Err = GenomeError;

    /// Accepts `rs123`, `RS123` or a bare `123`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("rs")
            .or_else(|| trimmed.strip_prefix("RS"))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GenomeError::InvalidKey(format!(
                "'{s}' is not a numeric RSID"
            )));
        }

        digits
            .parse::<u32>()
            .map(Self)
            .map_err(|_| GenomeError::InvalidKey(format!("RSID '{s}' out of range")))
    }
}
