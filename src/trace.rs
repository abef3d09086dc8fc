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

//! Four-channel fluorescence trace.
use crate::sequence::base::DnaBase;

/// Intensities of the four channels at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracePoint {
    pub a: i16,
    pub t: i16,
    pub g: i16,
    pub c: i16,
}

impl TracePoint {
    /// Largest of the four intensities.
    pub fn max(&self) -> i16 {
        self.a.max(self.t).max(self.g).max(self.c)
    }

    /// Union of the bases whose channel reaches [max](TracePoint::max).
    pub fn max_bases(&self) -> DnaBase {
        let max = self.max();
        [(self.a, DnaBase::A), (self.t, DnaBase::T), (self.g, DnaBase::G), (self.c, DnaBase::C)]
            .into_iter()
            .filter(|(value, _)| *value == max)
            .map(|(_, base)| base)
            .reduce(|acc, base| acc + base)
            .unwrap_or(DnaBase::N)
    }
}

/// Four aligned intensity series, one per base.
///
/// All channels have the same length. Constructing from series of unequal
/// length keeps the common prefix.
///
/// ## Usage
///
/// ```rust
/// use abif::trace::{TraceData, TracePoint};
///
/// let trace = TraceData::new(vec![10, 20], vec![5, 5, 5], vec![20, 1], vec![15, 2]);
/// assert_eq!(trace.len(), 2);
/// assert_eq!(trace.get(0), Some(TracePoint { a: 10, t: 5, g: 20, c: 15 }));
/// ```
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraceData {
    a: Vec<i16>,
    t: Vec<i16>,
    g: Vec<i16>,
    c: Vec<i16>,
}

impl TraceData {
    pub fn new(
        mut a: Vec<i16>,
        mut t: Vec<i16>,
        mut g: Vec<i16>,
        mut c: Vec<i16>,
    ) -> Self {
        let len = a.len().min(t.len()).min(g.len()).min(c.len());
        a.truncate(len);
        t.truncate(len);
        g.truncate(len);
        c.truncate(len);
        TraceData { a, t, g, c }
    }

    pub fn a(&self) -> &[i16] { &self.a }
    pub fn t(&self) -> &[i16] { &self.t }
    pub fn g(&self) -> &[i16] { &self.g }
    pub fn c(&self) -> &[i16] { &self.c }

    /// Series of a canonical base, None for ambiguity codes.
    pub fn channel(
        &self,
        base: DnaBase,
    ) -> Option<&[i16]> {
        match base {
            DnaBase::A => Some(&self.a),
            DnaBase::T => Some(&self.t),
            DnaBase::G => Some(&self.g),
            DnaBase::C => Some(&self.c),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<TracePoint> {
        if index >= self.len() {
            return None;
        }
        Some(TracePoint { a: self.a[index], t: self.t[index], g: self.g[index], c: self.c[index] })
    }

    pub fn iter(&self) -> impl Iterator<Item = TracePoint> + '_ {
        (0..self.len()).map(|idx| TracePoint { a: self.a[idx], t: self.t[idx], g: self.g[idx], c: self.c[idx] })
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn new_truncates_to_shortest() {
        use super::TraceData;

        let got = TraceData::new(vec![1, 2, 3], vec![4, 5], vec![6, 7, 8, 9], vec![10, 11, 12]);

        assert_eq!(got.len(), 2);
        assert_eq!(got.a(), &[1, 2]);
        assert_eq!(got.t(), &[4, 5]);
        assert_eq!(got.g(), &[6, 7]);
        assert_eq!(got.c(), &[10, 11]);
    }

    #[test]
    fn empty_channel_empties_trace() {
        use super::TraceData;

        let got = TraceData::new(vec![1, 2, 3], vec![], vec![6], vec![10]);

        assert!(got.is_empty());
        assert_eq!(got.get(0), None);
        assert_eq!(got.iter().count(), 0);
    }

    #[test]
    fn get_and_iter() {
        use super::{TraceData, TracePoint};

        let trace = TraceData::new(vec![10, 20], vec![5, 6], vec![20, 7], vec![15, 8]);

        let expected = vec![
            TracePoint { a: 10, t: 5, g: 20, c: 15 },
            TracePoint { a: 20, t: 6, g: 7, c: 8 },
        ];

        assert_eq!(trace.iter().collect::<Vec<TracePoint>>(), expected);
        assert_eq!(trace.get(1), Some(expected[1]));
        assert_eq!(trace.get(2), None);
    }

    #[test]
    fn channel_by_base() {
        use super::TraceData;
        use crate::sequence::base::DnaBase;

        let trace = TraceData::new(vec![1], vec![2], vec![3], vec![4]);

        assert_eq!(trace.channel(DnaBase::A), Some(&[1_i16][..]));
        assert_eq!(trace.channel(DnaBase::T), Some(&[2_i16][..]));
        assert_eq!(trace.channel(DnaBase::G), Some(&[3_i16][..]));
        assert_eq!(trace.channel(DnaBase::C), Some(&[4_i16][..]));
        assert_eq!(trace.channel(DnaBase::N), None);
    }

    #[test]
    fn point_max_and_ties() {
        use super::TracePoint;
        use crate::sequence::base::DnaBase;

        let point = TracePoint { a: 7, t: 3, g: 7, c: -1 };

        assert_eq!(point.max(), 7);
        assert_eq!(point.max_bases(), DnaBase::R);
    }

    #[test]
    fn all_zero_point_is_n() {
        use super::TracePoint;
        use crate::sequence::base::DnaBase;

        let point = TracePoint::default();

        assert_eq!(point.max_bases(), DnaBase::N);
    }
}
