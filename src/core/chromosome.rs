use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::store::genome::GenomeError;

/// Chromosome a SNP is placed on.
///
/// Stored as its packed code: `0` for unknown/unplaced, `1..=22` for
/// autosomes, `23` for X, `24` for Y and `25` for the mitochondrial genome.
/// The field is private so every value is one of those 26 codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Chromosome(u8);

/// Pattern-matchable view of a [`Chromosome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromosomeKind {
    Unknown,
    Autosome(u8),
    X,
    Y,
    Mt,
}

impl Chromosome {
    /// Number of bits a chromosome occupies in a packed record
    pub const BITS: u32 = 5;

    pub const UNKNOWN: Self = Self(0);
    pub const X: Self = Self(23);
    pub const Y: Self = Self(24);
    pub const MT: Self = Self(25);

    const MAX_CODE: u8 = 25;

    /// Autosome `1..=22`, or `None` for anything else
    #[must_use]
    pub fn autosome(n: u8) -> Option<Self> {
        (1..=22).contains(&n).then_some(Self(n))
    }

    /// Decode a packed code.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Format` for any code above 25.
    pub fn from_code(code: u8) -> Result<Self, GenomeError> {
        if code <= Self::MAX_CODE {
            Ok(Self(code))
        } else {
            Err(GenomeError::Format(format!("invalid chromosome code {code}")))
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn kind(self) -> ChromosomeKind {
        match self.0 {
            0 => ChromosomeKind::Unknown,
            23 => ChromosomeKind::X,
            24 => ChromosomeKind::Y,
            25 => ChromosomeKind::Mt,
            n => ChromosomeKind::Autosome(n),
        }
    }

    #[must_use]
    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }

    #[must_use]
    pub fn is_autosome(self) -> bool {
        matches!(self.kind(), ChromosomeKind::Autosome(_))
    }
}

impl std::fmt::Display for Chromosome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            ChromosomeKind::Unknown => write!(f, "0"),
            ChromosomeKind::Autosome(n) => write!(f, "{n}"),
            ChromosomeKind::X => write!(f, "X"),
            ChromosomeKind::Y => write!(f, "Y"),
            ChromosomeKind::Mt => write!(f, "MT"),
        }
    }
}

impl FromStr for Chromosome {
    type Err = GenomeError;

    /// Accepts NCBI (`1`, `X`, `MT`) and UCSC (`chr1`, `chrX`, `chrM`) names.
    /// `0`, `-` and the empty string mean unknown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_prefix("chr")
            .or_else(|| trimmed.strip_prefix("CHR"))
            .unwrap_or(trimmed);

        match name.to_ascii_uppercase().as_str() {
            "" | "0" | "-" => Ok(Self::UNKNOWN),
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            "MT" | "M" => Ok(Self::MT),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Self::autosome)
                .ok_or_else(|| GenomeError::Format(format!("invalid chromosome '{s}'"))),
        }
    }
}

/// Autosomes and unknown serialize as integers, the rest as their names
impl Serialize for Chromosome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind() {
            ChromosomeKind::Unknown => serializer.serialize_u8(0),
            ChromosomeKind::Autosome(n) => serializer.serialize_u8(n),
            ChromosomeKind::X => serializer.serialize_str("X"),
            ChromosomeKind::Y => serializer.serialize_str("Y"),
            ChromosomeKind::Mt => serializer.serialize_str("MT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_code_mapping() {
        assert_eq!(Chromosome::from_code(0).unwrap(), Chromosome::UNKNOWN);
        assert_eq!(Chromosome::from_code(22).unwrap().kind(), ChromosomeKind::Autosome(22));
        assert_eq!(Chromosome::from_code(23).unwrap(), Chromosome::X);
        assert_eq!(Chromosome::from_code(24).unwrap(), Chromosome::Y);
        assert_eq!(Chromosome::from_code(25).unwrap(), Chromosome::MT);
        assert!(matches!(
            Chromosome::from_code(26),
            Err(GenomeError::Format(_))
        ));
        assert!(Chromosome::from_code(31).is_err());
    }

    #[test]
    fn test_autosome_bounds() {
        assert!(Chromosome::autosome(0).is_none());
        assert!(Chromosome::autosome(23).is_none());
        assert_eq!(Chromosome::autosome(1).unwrap().code(), 1);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("1".parse::<Chromosome>().unwrap().code(), 1);
        assert_eq!("chr22".parse::<Chromosome>().unwrap().code(), 22);
        assert_eq!("x".parse::<Chromosome>().unwrap(), Chromosome::X);
        assert_eq!("chrY".parse::<Chromosome>().unwrap(), Chromosome::Y);
        assert_eq!("chrM".parse::<Chromosome>().unwrap(), Chromosome::MT);
        assert_eq!("MT".parse::<Chromosome>().unwrap(), Chromosome::MT);
        assert_eq!("0".parse::<Chromosome>().unwrap(), Chromosome::UNKNOWN);
        assert!("23".parse::<Chromosome>().is_err());
        assert!("chrUn".parse::<Chromosome>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for code in 0..=25 {
            let chromosome = Chromosome::from_code(code).unwrap();
            let parsed: Chromosome = chromosome.to_string().parse().unwrap();
            assert_eq!(parsed, chromosome);
        }
    }

    #[test]
    fn test_serialize_mixed_representation() {
        let json = serde_json::to_string(&[
            Chromosome::autosome(7).unwrap(),
            Chromosome::X,
            Chromosome::MT,
            Chromosome::UNKNOWN,
        ])
        .unwrap();
        assert_eq!(json, r#"[7,"X","MT",0]"#);
    }
}
