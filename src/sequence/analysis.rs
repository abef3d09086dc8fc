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

//! Calling peaks and bases from a four-channel trace.
//!
//! At each position the largest of the four intensities is compared with
//! the largest at the previous position. A position is a peak when the
//! maximum rose (or stayed level) into it and falls (or stays level) right
//! after it. Because the fall can only be seen at the next position, a peak
//! is detected one step after it occurs and the reported index is the
//! position before the detection.
//!
//! The base called at a peak is the union of every channel that reaches the
//! maximum there, so a tie between channels is called as an IUPAC
//! ambiguity code.

use crate::sequence::base::DnaBase;
use crate::sequence::dna::DnaSequence;
use crate::trace::TraceData;
use crate::trace::TracePoint;

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentRangeError {
    pub start: usize,
    pub end: Option<usize>,
    pub len: usize,
}

impl std::fmt::Display for ArgumentRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.end {
            Some(end) => write!(f, "range {}..={} is not valid for a trace of length {}", self.start, end, self.len),
            None => write!(f, "range {}.. is not valid for a trace of length {}", self.start, self.len),
        }
    }
}

impl std::error::Error for ArgumentRangeError {}

/// Peaks called from a trace and the base at each peak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisData {
    peaks: Vec<usize>,
    sequence: DnaSequence,
}

impl AnalysisData {
    /// Trace indices of the peaks, ascending.
    pub fn peaks(&self) -> &[usize] {
        &self.peaks
    }

    /// One base per peak.
    pub fn sequence(&self) -> &DnaSequence {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Call peaks in positions `start..=end` of `trace`.
///
/// `end` defaults to the last position. Terminates with an
/// [ArgumentRangeError] if the trace is empty, if `end` is before `start`,
/// or if `end` is past the last position.
///
/// A peak is seen one position late, when the maximum intensity stops
/// rising, and is reported at the position before that, together with the
/// bases whose intensity equals the maximum there. The intensity before
/// `start` is taken to be 0, so `start` itself is a peak if the trace falls
/// right after it. Position `end + 1` is looked at when it exists.
///
/// ## Usage
///
/// ```rust
/// use abif::sequence::analysis::call_peaks;
/// use abif::trace::TraceData;
///
/// let trace = TraceData::new(vec![0, 5, 3], vec![0, 0, 0], vec![0, 0, 0], vec![0, 0, 0]);
/// let got = call_peaks(&trace, 0, None).unwrap();
///
/// assert_eq!(got.peaks(), &[1]);
/// assert_eq!(got.sequence().as_str(), "A");
/// ```
///
pub fn call_peaks(
    trace: &TraceData,
    start: usize,
    end: Option<usize>,
) -> Result<AnalysisData, ArgumentRangeError> {
    let len = trace.len();
    let range_error = ArgumentRangeError { start, end, len };
    if len == 0 {
        return Err(range_error);
    }
    let last = end.unwrap_or(len - 1);
    if last < start || last >= len {
        return Err(range_error);
    }

    let mut peaks: Vec<usize> = Vec::new();
    let mut bases: Vec<DnaBase> = Vec::new();

    let mut prev_max: i32 = 0;
    let mut prev_deviation: i32 = 1;
    let mut prev_point: Option<TracePoint> = None;

    // Visit one position past `last` so a peak at `last` can be seen.
    let stop = (last + 1).min(len - 1);
    for (idx, point) in trace.iter().enumerate().take(stop + 1).skip(start) {
        let max = point.max() as i32;
        let deviation = max - prev_max;
        if let Some(peak) = prev_point {
            if deviation <= 0 && prev_deviation >= 0 {
                peaks.push(idx - 1);
                bases.push(peak.max_bases());
            }
        }
        prev_deviation = deviation;
        prev_max = max;
        prev_point = Some(point);
    }

    debug!("called {} peaks in positions {}..={}", peaks.len(), start, last);

    Ok(AnalysisData { peaks, sequence: DnaSequence::new(bases) })
}
