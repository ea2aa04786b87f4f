use serde::{Deserialize, Serialize};

use crate::store::genome::GenomeError;

/// A single called base, or an indel marker, as reported by a genotyping array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nucleotide {
    /// Missing or uncalled base, written as `-`
    #[default]
    NoCall = 0,
    A = 1,
    C = 2,
    G = 3,
    T = 4,
    /// Deletion allele
    D = 5,
    /// Insertion allele
    I = 6,
}

impl Nucleotide {
    /// Number of bits a nucleotide occupies in a packed record
    pub const BITS: u32 = 3;

    /// Compact code used in packed records
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a packed code.
    ///
    /// # Errors
    ///
    /// Returns `GenomeError::Format` for any code outside `0..=6`.
    pub fn from_code(code: u8) -> Result<Self, GenomeError> {
        match code {
            0 => Ok(Self::NoCall),
            1 => Ok(Self::A),
            2 => Ok(Self::C),
            3 => Ok(Self::G),
            4 => Ok(Self::T),
            5 => Ok(Self::D),
            6 => Ok(Self::I),
            _ => Err(GenomeError::Format(format!("invalid nucleotide code {code}"))),
        }
    }

    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::T => 'T',
            Self::C => 'C',
            Self::G => 'G',
            Self::D => 'D',
            Self::I => 'I',
            Self::NoCall => '-',
        }
    }

    /// Parse a base character (case-insensitive). `-` and `0` mean no call.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'T' => Some(Self::T),
            'C' => Some(Self::C),
            'G' => Some(Self::G),
            'D' => Some(Self::D),
            'I' => Some(Self::I),
            '-' | '0' => Some(Self::NoCall),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_called(self) -> bool {
        self != Self::NoCall
    }
}

impl std::fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// An ordered pair of alleles in the order they were read from source data.
///
/// `(A, G)` and `(G, A)` are distinct values; no canonical ordering is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Genotype {
    pub first: Nucleotide,
    pub second: Nucleotide,
}

impl Genotype {
    #[must_use]
    pub fn new(first: Nucleotide, second: Nucleotide) -> Self {
        Self { first, second }
    }

    /// Both alleles carry a call
    #[must_use]
    pub fn is_called(&self) -> bool {
        self.first.is_called() && self.second.is_called()
    }

    #[must_use]
    pub fn is_homozygous(&self) -> bool {
        self.is_called() && self.first == self.second
    }

    /// Two-character text form, e.g. `AG` or `--`
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(2);
        text.push(self.first.to_char());
        text.push(self.second.to_char());
        text
    }

    /// Parse a genotype from text.
    ///
    /// Accepts two characters (`AG`, `--`, `DI`), a single character for
    /// haploid calls on X/Y/MT (`A` becomes `(A, NoCall)`), or an empty string
    /// for no call.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let first = match chars.next() {
            Some(c) => Nucleotide::from_char(c)?,
            None => return Some(Self::default()),
        };
        let second = match chars.next() {
            Some(c) => Nucleotide::from_char(c)?,
            None => Nucleotide::NoCall,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Self::new(first, second))
    }
}

impl std::fmt::Display for Genotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.first, self.second)
    }
}
