// abif: Decoding ABIF sequencer trace files and re-calling bases.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Nucleotides and IUPAC ambiguity codes.
//!
//! A [DnaBase] is a non-empty set of the four canonical bases stored as a
//! 4-bit mask (A = 1, T = 2, G = 4, C = 8). Each of the 15 possible sets has
//! one IUPAC letter. Adding two bases takes the union of the sets.
//!
//! Bases are ordered by their position in `ATGCWRMKYSDHVBN`.

use std::ops::{Add, AddAssign};
use std::str::FromStr;

const BIT_A: u8 = 0b0001;
const BIT_T: u8 = 0b0010;
const BIT_G: u8 = 0b0100;
const BIT_C: u8 = 0b1000;

// Letter of each mask, index 0 unused.
const LETTERS: [char; 16] = ['-', 'A', 'T', 'W', 'G', 'R', 'K', 'D', 'C', 'M', 'Y', 'H', 'S', 'V', 'B', 'N'];

const RANKS: [char; 15] = ['A', 'T', 'G', 'C', 'W', 'R', 'M', 'K', 'Y', 'S', 'D', 'H', 'V', 'B', 'N'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    pub value: char,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?} is not an IUPAC nucleotide code", self.value)
    }
}

impl std::error::Error for InvalidBaseError {}

/// A nucleotide or an ambiguity code.
///
/// ## Usage
///
/// ```rust
/// use abif::sequence::base::DnaBase;
///
/// let w = DnaBase::A + DnaBase::T;
/// assert_eq!(w, DnaBase::W);
/// assert_eq!(w.letter(), 'W');
/// assert_eq!(DnaBase::parse('S').unwrap(), DnaBase::G + DnaBase::C);
/// assert!(DnaBase::try_parse('x').is_none());
/// ```
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DnaBase {
    bits: u8,
}

impl DnaBase {
    pub const A: DnaBase = DnaBase { bits: BIT_A };
    pub const T: DnaBase = DnaBase { bits: BIT_T };
    pub const G: DnaBase = DnaBase { bits: BIT_G };
    pub const C: DnaBase = DnaBase { bits: BIT_C };
    pub const W: DnaBase = DnaBase { bits: BIT_A | BIT_T };
    pub const R: DnaBase = DnaBase { bits: BIT_A | BIT_G };
    pub const M: DnaBase = DnaBase { bits: BIT_A | BIT_C };
    pub const K: DnaBase = DnaBase { bits: BIT_T | BIT_G };
    pub const Y: DnaBase = DnaBase { bits: BIT_T | BIT_C };
    pub const S: DnaBase = DnaBase { bits: BIT_G | BIT_C };
    pub const D: DnaBase = DnaBase { bits: BIT_A | BIT_T | BIT_G };
    pub const H: DnaBase = DnaBase { bits: BIT_A | BIT_T | BIT_C };
    pub const V: DnaBase = DnaBase { bits: BIT_A | BIT_G | BIT_C };
    pub const B: DnaBase = DnaBase { bits: BIT_T | BIT_G | BIT_C };
    pub const N: DnaBase = DnaBase { bits: BIT_A | BIT_T | BIT_G | BIT_C };

    /// All 15 codes in rank order.
    pub const ALL: [DnaBase; 15] = [
        DnaBase::A, DnaBase::T, DnaBase::G, DnaBase::C,
        DnaBase::W, DnaBase::R, DnaBase::M, DnaBase::K, DnaBase::Y, DnaBase::S,
        DnaBase::D, DnaBase::H, DnaBase::V, DnaBase::B,
        DnaBase::N,
    ];

    /// Base with mask `bits`, None if the mask is empty or wider than 4 bits.
    pub fn from_bits(
        bits: u8,
    ) -> Option<DnaBase> {
        if bits == 0 || bits > 0b1111 {
            return None;
        }
        Some(DnaBase { bits })
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Base for the uppercase IUPAC letter `value`, None for anything else.
    pub fn try_parse(
        value: char,
    ) -> Option<DnaBase> {
        let bits = LETTERS.iter().skip(1).position(|x| *x == value)? + 1;
        Some(DnaBase { bits: bits as u8 })
    }

    pub fn parse(
        value: char,
    ) -> Result<DnaBase, InvalidBaseError> {
        DnaBase::try_parse(value).ok_or(InvalidBaseError { value })
    }

    pub fn letter(&self) -> char {
        LETTERS[self.bits as usize]
    }

    /// Position in `ATGCWRMKYSDHVBN`.
    pub fn rank(&self) -> usize {
        let letter = self.letter();
        RANKS.iter().position(|x| *x == letter).unwrap_or(RANKS.len())
    }

    /// True for every code other than A, T, G and C.
    pub fn is_ambiguous(&self) -> bool {
        self.bits.count_ones() > 1
    }

    /// Watson-Crick complement, applied to every base in the set.
    pub fn complement(&self) -> DnaBase {
        // Swap A with T and G with C.
        let bits = ((self.bits & 0b0101) << 1) | ((self.bits & 0b1010) >> 1);
        DnaBase { bits }
    }

    /// The canonical bases in the set, in A, T, G, C order.
    pub fn as_atgc(&self) -> Vec<DnaBase> {
        [DnaBase::A, DnaBase::T, DnaBase::G, DnaBase::C]
            .into_iter()
            .filter(|base| self.bits & base.bits != 0)
            .collect()
    }

    /// True if every base in `other` is also in `self`.
    pub fn contains(
        &self,
        other: DnaBase,
    ) -> bool {
        self.bits & other.bits == other.bits
    }
}

impl Add for DnaBase {
    type Output = DnaBase;

    fn add(self, rhs: DnaBase) -> DnaBase {
        DnaBase { bits: self.bits | rhs.bits }
    }
}

impl AddAssign for DnaBase {
    fn add_assign(&mut self, rhs: DnaBase) {
        self.bits |= rhs.bits;
    }
}

impl Ord for DnaBase {
    fn cmp(&self, other: &DnaBase) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for DnaBase {
    fn partial_cmp(&self, other: &DnaBase) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<char> for DnaBase {
    type Error = InvalidBaseError;

    fn try_from(value: char) -> Result<DnaBase, InvalidBaseError> {
        DnaBase::parse(value)
    }
}

impl From<DnaBase> for char {
    fn from(base: DnaBase) -> char {
        base.letter()
    }
}

impl FromStr for DnaBase {
    type Err = InvalidBaseError;

    fn from_str(s: &str) -> Result<DnaBase, InvalidBaseError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(value), None) => DnaBase::parse(value),
            (Some(value), Some(_)) => Err(InvalidBaseError { value }),
            (None, _) => Err(InvalidBaseError { value: '\0' }),
        }
    }
}

impl std::fmt::Display for DnaBase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn letter_table() {
        use super::DnaBase;

        let expected: Vec<(DnaBase, char, u8)> = vec![
            (DnaBase::A, 'A', 0b0001), (DnaBase::T, 'T', 0b0010), (DnaBase::G, 'G', 0b0100), (DnaBase::C, 'C', 0b1000),
            (DnaBase::W, 'W', 0b0011), (DnaBase::R, 'R', 0b0101), (DnaBase::M, 'M', 0b1001),
            (DnaBase::K, 'K', 0b0110), (DnaBase::Y, 'Y', 0b1010), (DnaBase::S, 'S', 0b1100),
            (DnaBase::D, 'D', 0b0111), (DnaBase::H, 'H', 0b1011), (DnaBase::V, 'V', 0b1101),
            (DnaBase::B, 'B', 0b1110), (DnaBase::N, 'N', 0b1111),
        ];

        for (base, letter, bits) in expected {
            assert_eq!(base.letter(), letter);
            assert_eq!(base.bits(), bits);
            assert_eq!(DnaBase::parse(letter).unwrap(), base);
            assert_eq!(DnaBase::from_bits(bits), Some(base));
        }
    }

    #[test]
    fn parse_invalid() {
        use super::{DnaBase, InvalidBaseError};

        assert_eq!(DnaBase::parse('X'), Err(InvalidBaseError { value: 'X' }));
        assert_eq!(DnaBase::parse('a'), Err(InvalidBaseError { value: 'a' }));
        assert_eq!(DnaBase::parse('-'), Err(InvalidBaseError { value: '-' }));
        assert_eq!(DnaBase::try_parse('U'), None);
        assert!("AT".parse::<DnaBase>().is_err());
        assert_eq!("G".parse::<DnaBase>(), Ok(DnaBase::G));
    }

    #[test]
    fn from_bits_rejects_empty_and_wide() {
        use super::DnaBase;

        assert_eq!(DnaBase::from_bits(0), None);
        assert_eq!(DnaBase::from_bits(16), None);
    }

    #[test]
    fn union_is_idempotent_and_commutative() {
        use super::DnaBase;

        for a in DnaBase::ALL {
            assert_eq!(a + a, a);
            for b in DnaBase::ALL {
                assert_eq!(a + b, b + a);
            }
        }
    }

    #[test]
    fn union_of_all_is_n() {
        use super::DnaBase;

        assert_eq!(DnaBase::A + DnaBase::T + DnaBase::G + DnaBase::C, DnaBase::N);
        assert_eq!(DnaBase::A + DnaBase::T, DnaBase::W);
        assert_eq!(DnaBase::W + DnaBase::S, DnaBase::N);
        assert_eq!(DnaBase::R + DnaBase::T, DnaBase::D);

        let mut got = DnaBase::T;
        got += DnaBase::C;
        assert_eq!(got, DnaBase::Y);
    }

    #[test]
    fn ordering_follows_rank_table() {
        use super::DnaBase;

        let mut got = vec![DnaBase::N, DnaBase::C, DnaBase::W, DnaBase::A, DnaBase::G, DnaBase::T];
        got.sort();

        assert_eq!(got, vec![DnaBase::A, DnaBase::T, DnaBase::G, DnaBase::C, DnaBase::W, DnaBase::N]);
        // Mask order would put C (8) after W (3).
        assert!(DnaBase::C < DnaBase::W);
        for (rank, base) in DnaBase::ALL.iter().enumerate() {
            assert_eq!(base.rank(), rank);
        }
    }

    #[test]
    fn complement() {
        use super::DnaBase;

        assert_eq!(DnaBase::A.complement(), DnaBase::T);
        assert_eq!(DnaBase::G.complement(), DnaBase::C);
        assert_eq!(DnaBase::R.complement(), DnaBase::Y);
        assert_eq!(DnaBase::W.complement(), DnaBase::W);
        assert_eq!(DnaBase::N.complement(), DnaBase::N);
        for base in DnaBase::ALL {
            assert_eq!(base.complement().complement(), base);
        }
    }

    #[test]
    fn as_atgc_and_ambiguity() {
        use super::DnaBase;

        assert_eq!(DnaBase::V.as_atgc(), vec![DnaBase::A, DnaBase::G, DnaBase::C]);
        assert_eq!(DnaBase::T.as_atgc(), vec![DnaBase::T]);
        assert!(!DnaBase::C.is_ambiguous());
        assert!(DnaBase::K.is_ambiguous());
        assert!(DnaBase::H.contains(DnaBase::W));
        assert!(!DnaBase::H.contains(DnaBase::G));
    }
}
