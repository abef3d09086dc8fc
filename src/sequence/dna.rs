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

//! Immutable sequences of [DnaBase].
use crate::sequence::base::DnaBase;
use crate::sequence::base::InvalidBaseError;

use std::cell::OnceCell;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::str::FromStr;

/// An ordered, immutable run of bases.
///
/// The text form is built on first use and kept.
///
/// ## Usage
///
/// ```rust
/// use abif::sequence::dna::DnaSequence;
///
/// let seq: DnaSequence = "ACGTN".parse().unwrap();
/// let tail = seq.sub_sequence(3, 2).unwrap();
///
/// assert_eq!(tail.as_str(), "TN");
/// assert_eq!(DnaSequence::concat(&seq, &tail).to_string(), "ACGTNTN");
/// assert_eq!(seq.complement().as_str(), "TGCAN");
/// ```
///
#[derive(Debug, Clone, Default)]
pub struct DnaSequence {
    bases: Vec<DnaBase>,
    text: OnceCell<String>,
}

impl DnaSequence {
    pub fn new(
        bases: Vec<DnaBase>,
    ) -> Self {
        DnaSequence { bases, text: OnceCell::new() }
    }

    pub fn empty() -> Self {
        DnaSequence::default()
    }

    /// `count` copies of `base`.
    pub fn repeat(
        base: DnaBase,
        count: usize,
    ) -> Self {
        DnaSequence::new(vec![base; count])
    }

    pub fn parse(
        value: &str,
    ) -> Result<Self, InvalidBaseError> {
        let bases = value.chars().map(DnaBase::parse).collect::<Result<Vec<DnaBase>, InvalidBaseError>>()?;
        Ok(DnaSequence::new(bases))
    }

    /// Like [parse](DnaSequence::parse) but returns None on the first
    /// character that is not an IUPAC code.
    pub fn try_parse(
        value: &str,
    ) -> Option<Self> {
        DnaSequence::parse(value).ok()
    }

    pub fn concat(
        first: &DnaSequence,
        second: &DnaSequence,
    ) -> Self {
        let mut bases = Vec::with_capacity(first.len() + second.len());
        bases.extend_from_slice(&first.bases);
        bases.extend_from_slice(&second.bases);
        DnaSequence::new(bases)
    }

    pub fn concat3(
        first: &DnaSequence,
        second: &DnaSequence,
        third: &DnaSequence,
    ) -> Self {
        let mut bases = Vec::with_capacity(first.len() + second.len() + third.len());
        bases.extend_from_slice(&first.bases);
        bases.extend_from_slice(&second.bases);
        bases.extend_from_slice(&third.bases);
        DnaSequence::new(bases)
    }

    /// `len` bases starting at `start`, None if that runs past the end.
    pub fn sub_sequence(
        &self,
        start: usize,
        len: usize,
    ) -> Option<DnaSequence> {
        let end = start.checked_add(len)?;
        let bases = self.bases.get(start..end)?;
        Some(DnaSequence::new(bases.to_vec()))
    }

    pub fn complement(&self) -> DnaSequence {
        DnaSequence::new(self.bases.iter().map(|base| base.complement()).collect())
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<DnaBase> {
        self.bases.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn as_slice(&self) -> &[DnaBase] {
        &self.bases
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, DnaBase>> {
        self.bases.iter().copied()
    }

    /// The letters of the bases.
    pub fn as_str(&self) -> &str {
        self.text.get_or_init(|| self.bases.iter().map(|base| base.letter()).collect())
    }
}

impl PartialEq for DnaSequence {
    fn eq(&self, other: &DnaSequence) -> bool {
        self.bases == other.bases
    }
}

impl Eq for DnaSequence {}

impl Hash for DnaSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bases.hash(state);
    }
}

impl Ord for DnaSequence {
    fn cmp(&self, other: &DnaSequence) -> std::cmp::Ordering {
        // Lexicographic by base rank, shorter first on a common prefix.
        self.bases.cmp(&other.bases)
    }
}

impl PartialOrd for DnaSequence {
    fn partial_cmp(&self, other: &DnaSequence) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::ops::Index<usize> for DnaSequence {
    type Output = DnaBase;

    fn index(&self, index: usize) -> &DnaBase {
        &self.bases[index]
    }
}

impl Add<&DnaSequence> for &DnaSequence {
    type Output = DnaSequence;

    fn add(self, rhs: &DnaSequence) -> DnaSequence {
        DnaSequence::concat(self, rhs)
    }
}

impl Add<DnaBase> for &DnaSequence {
    type Output = DnaSequence;

    fn add(self, rhs: DnaBase) -> DnaSequence {
        let mut bases = Vec::with_capacity(self.len() + 1);
        bases.extend_from_slice(&self.bases);
        bases.push(rhs);
        DnaSequence::new(bases)
    }
}

impl From<Vec<DnaBase>> for DnaSequence {
    fn from(bases: Vec<DnaBase>) -> Self {
        DnaSequence::new(bases)
    }
}

impl From<DnaBase> for DnaSequence {
    fn from(base: DnaBase) -> Self {
        DnaSequence::new(vec![base])
    }
}

impl FromIterator<DnaBase> for DnaSequence {
    fn from_iter<I: IntoIterator<Item = DnaBase>>(iter: I) -> Self {
        DnaSequence::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DnaSequence {
    type Item = DnaBase;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DnaBase>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromStr for DnaSequence {
    type Err = InvalidBaseError;

    fn from_str(s: &str) -> Result<DnaSequence, InvalidBaseError> {
        DnaSequence::parse(s)
    }
}

impl std::fmt::Display for DnaSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
