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

//! Named access to the trace records of a sequencer run.
//!
//! Sequencers store the data of a run under well-known tags:
//!
//!   - `CTNM` #1: name of the capillary container.
//!   - `DATA` #1-#4: raw trace, channels in A, G, C, T order.
//!   - `DATA` #9-#12: processed trace, same channel order.
//!   - `PLOC` #2: peak locations in the processed trace.
//!   - `PBAS` #2: base calls, one ASCII letter per peak.
//!
//! [Ab1Wrapper] reads these from a decoded [Ab1File] on first use and keeps
//! the results.

use crate::Ab1File;
use crate::decoder::Directory;
use crate::parser::ElementValue;
use crate::sequence::analysis::AnalysisData;
use crate::sequence::analysis::call_peaks;
use crate::sequence::dna::DnaSequence;
use crate::trace::TraceData;

use std::cell::OnceCell;
use std::path::Path;

use bstr::ByteSlice;
use log::{debug, info};

type E = Box<dyn std::error::Error>;

const TAG_CONTAINER: &str = "CTNM";
const TAG_TRACE: &str = "DATA";
const TAG_PEAKS: &str = "PLOC";
const TAG_BASES: &str = "PBAS";

// Tag numbers of the A, G, C and T channels.
const RAW_CHANNELS: [i32; 4] = [1, 2, 3, 4];
const ANALYZED_CHANNELS: [i32; 4] = [9, 10, 11, 12];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTagError {
    pub name: String,
    pub number: i32,
}

impl std::fmt::Display for MissingTagError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "tag {}#{} is not in the file", self.name, self.number)
    }
}

impl std::error::Error for MissingTagError {}

/// A tag is present but holds values of the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValueError {
    pub name: String,
    pub number: i32,
    pub expected: String,
}

impl std::fmt::Display for TagValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "tag {}#{} should hold {}", self.name, self.number, self.expected)
    }
}

impl std::error::Error for TagValueError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlreadyAnalyzedError;

impl std::fmt::Display for AlreadyAnalyzedError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "peaks have already been called, pass overwrite to call them again")
    }
}

impl std::error::Error for AlreadyAnalyzedError {}

/// Decoded file with cached views of its trace records.
///
/// ## Usage
///
/// ```rust
/// use abif::decode_from_slice;
/// use abif::encoder::Encoder;
/// use abif::trace::TracePoint;
/// use abif::wrapper::Ab1Wrapper;
///
/// let mut encoder = Encoder::new(101);
/// encoder.add_pstring("CTNM", 1, "Sample1");
/// for number in 1..=4 {
///     encoder.add_shorts("DATA", number, &[10, 20, 15, 5]);
/// }
///
/// let wrapper = Ab1Wrapper::new(decode_from_slice(&encoder.encode().unwrap()).unwrap());
///
/// assert_eq!(wrapper.container_name().unwrap(), "Sample1");
/// let trace = wrapper.raw_trace().unwrap();
/// assert_eq!(trace.get(0), Some(TracePoint { a: 10, t: 10, g: 10, c: 10 }));
/// ```
///
#[derive(Debug, Clone)]
pub struct Ab1Wrapper {
    file: Ab1File,

    // Caches
    raw_trace: OnceCell<TraceData>,
    analyzed_trace: OnceCell<TraceData>,
    peaks: OnceCell<Vec<i16>>,
    base_calls: OnceCell<DnaSequence>,

    analysis: Option<AnalysisData>,
}

impl Ab1Wrapper {
    pub fn new(
        file: Ab1File,
    ) -> Self {
        Ab1Wrapper {
            file,
            raw_trace: OnceCell::new(), analyzed_trace: OnceCell::new(),
            peaks: OnceCell::new(), base_calls: OnceCell::new(),
            analysis: None,
        }
    }

    /// Open and decode the file at `path`, see [open](crate::open).
    pub fn open<P: AsRef<Path>>(
        path: P,
    ) -> Result<Self, E> {
        Ok(Ab1Wrapper::new(crate::open(path)?))
    }

    pub fn file(&self) -> &Ab1File {
        &self.file
    }

    pub fn into_inner(self) -> Ab1File {
        self.file
    }

    fn get_or_missing(
        &self,
        name: &str,
        number: i32,
    ) -> Result<&Directory, MissingTagError> {
        self.file.store.get(name, number).ok_or(MissingTagError { name: name.to_string(), number })
    }

    /// Name of the capillary container, from `CTNM` #1.
    pub fn container_name(&self) -> Result<&str, E> {
        let record = self.get_or_missing(TAG_CONTAINER, 1)?;
        let name = record.elements().first().and_then(|x| x.as_str());
        Ok(name.ok_or(TagValueError { name: TAG_CONTAINER.to_string(), number: 1, expected: "text".to_string() })?)
    }

    fn read_trace(
        &self,
        numbers: [i32; 4],
    ) -> Result<TraceData, E> {
        let mut channels: Vec<Vec<i16>> = Vec::with_capacity(4);
        for number in numbers {
            let record = self.get_or_missing(TAG_TRACE, number)?;
            channels.push(integer_values(record)?);
        }
        let [a, g, c, t]: [Vec<i16>; 4] = channels.try_into().map_err(|_| TagValueError { name: TAG_TRACE.to_string(), number: numbers[0], expected: "four channels".to_string() })?;
        debug!("Read {} trace points from {}#{}..{}", a.len(), TAG_TRACE, numbers[0], numbers[3]);
        Ok(TraceData::new(a, t, g, c))
    }

    /// Raw trace from `DATA` #1-#4.
    pub fn raw_trace(&self) -> Result<&TraceData, E> {
        if let Some(trace) = self.raw_trace.get() {
            return Ok(trace);
        }
        let trace = self.read_trace(RAW_CHANNELS)?;
        Ok(self.raw_trace.get_or_init(|| trace))
    }

    /// Processed trace from `DATA` #9-#12.
    pub fn analyzed_trace(&self) -> Result<&TraceData, E> {
        if let Some(trace) = self.analyzed_trace.get() {
            return Ok(trace);
        }
        let trace = self.read_trace(ANALYZED_CHANNELS)?;
        Ok(self.analyzed_trace.get_or_init(|| trace))
    }

    /// Peak locations written by the sequencer, from `PLOC` #2.
    pub fn peaks(&self) -> Result<&[i16], E> {
        if let Some(peaks) = self.peaks.get() {
            return Ok(peaks);
        }
        let peaks = integer_values(self.get_or_missing(TAG_PEAKS, 2)?)?;
        Ok(self.peaks.get_or_init(|| peaks))
    }

    /// Base calls written by the sequencer, from `PBAS` #2.
    ///
    /// Calls that are not all IUPAC letters give an empty sequence.
    pub fn base_call_sequence(&self) -> Result<&DnaSequence, E> {
        if let Some(sequence) = self.base_calls.get() {
            return Ok(sequence);
        }
        let record = self.get_or_missing(TAG_BASES, 2)?;
        let text = letter_values(record)?;
        let sequence = DnaSequence::try_parse(&text).unwrap_or_default();
        Ok(self.base_calls.get_or_init(|| sequence))
    }

    /// Call peaks in positions `start..=end` of the processed trace.
    ///
    /// `end` defaults to the last position. Terminates with an
    /// [AlreadyAnalyzedError] if peaks were called before and `overwrite` is
    /// false, and with an
    /// [ArgumentRangeError](crate::sequence::analysis::ArgumentRangeError)
    /// for an invalid range.
    ///
    pub fn run_peak_analysis(
        &mut self,
        start: usize,
        end: Option<usize>,
        overwrite: bool,
    ) -> Result<&AnalysisData, E> {
        if !overwrite && self.analysis.is_some() {
            return Err(Box::new(AlreadyAnalyzedError));
        }
        let analysis = call_peaks(self.analyzed_trace()?, start, end)?;
        info!("Called {} peaks", analysis.len());
        Ok(&*self.analysis.insert(analysis))
    }

    /// Result of the last [run_peak_analysis](Ab1Wrapper::run_peak_analysis).
    pub fn analysis(&self) -> Option<&AnalysisData> {
        self.analysis.as_ref()
    }
}

impl From<Ab1File> for Ab1Wrapper {
    fn from(file: Ab1File) -> Self {
        Ab1Wrapper::new(file)
    }
}

fn integer_values(
    record: &Directory,
) -> Result<Vec<i16>, TagValueError> {
    record.elements().iter().map(|x| x.as_i16()).collect::<Option<Vec<i16>>>().ok_or(TagValueError {
        name: record.name().to_string(), number: record.number(), expected: "integers".to_string(),
    })
}

fn letter_values(
    record: &Directory,
) -> Result<String, TagValueError> {
    let mut bytes: Vec<u8> = Vec::with_capacity(record.elements().len());
    for value in record.elements() {
        match value {
            ElementValue::Char(x) => bytes.push(*x as u8),
            ElementValue::Byte(x) => bytes.push(*x),
            ElementValue::Text(x) => bytes.extend_from_slice(x.as_bytes()),
            _ => return Err(TagValueError { name: record.name().to_string(), number: record.number(), expected: "characters".to_string() }),
        }
    }
    Ok(bytes.to_str_lossy().into_owned())
}

// Tests
#[cfg(test)]
mod tests {

    fn wrap(encoder: &crate::encoder::Encoder) -> super::Ab1Wrapper {
        use super::Ab1Wrapper;
        use crate::decode_from_slice;

        Ab1Wrapper::new(decode_from_slice(&encoder.encode().unwrap()).unwrap())
    }

    #[test]
    fn container_name() {
        use super::Ab1Wrapper;
        use crate::encoder::Encoder;

        let mut encoder = Encoder::new(101);
        encoder.add_pstring("CTNM", 1, "Sample1");

        let got: Ab1Wrapper = wrap(&encoder);

        assert_eq!(got.container_name().unwrap(), "Sample1");
    }

    #[test]
    fn container_name_wrong_kind() {
        use super::TagValueError;
        use crate::encoder::Encoder;

        let mut encoder = Encoder::new(101);
        encoder.add_longs("CTNM", 1, &[1]);

        let got = wrap(&encoder).container_name().unwrap_err();

        assert!(got.downcast_ref::<TagValueError>().is_some());
    }

    #[test]
    fn raw_trace_channel_order() {
        use crate::encoder::Encoder;
        use crate::trace::TracePoint;

        let mut encoder = Encoder::new(101);
        encoder.add_shorts("DATA", 1, &[1, 10]);
        encoder.add_shorts("DATA", 2, &[2, 20]);
        encoder.add_shorts("DATA", 3, &[3, 15]);
        encoder.add_shorts("DATA", 4, &[4, 5]);

        let wrapper = wrap(&encoder);
        let got = wrapper.raw_trace().unwrap();

        assert_eq!(got.a(), &[1, 10]);
        assert_eq!(got.get(1), Some(TracePoint { a: 10, t: 5, g: 20, c: 15 }));
        assert_eq!(got.get(0), Some(TracePoint { a: 1, t: 4, g: 2, c: 3 }));
    }

    #[test]
    fn analyzed_trace_uses_tags_9_to_12() {
        use crate::encoder::Encoder;
        use crate::trace::TracePoint;

        let mut encoder = Encoder::new(101);
        for number in 1..=4 {
            encoder.add_shorts("DATA", number, &[0, 0, 0]);
        }
        encoder.add_shorts("DATA", 9, &[1, 2, 3]);
        encoder.add_shorts("DATA", 10, &[4, 5, 6]);
        encoder.add_shorts("DATA", 11, &[7, 8, 9]);
        encoder.add_shorts("DATA", 12, &[10, 11]);

        let wrapper = wrap(&encoder);
        let got = wrapper.analyzed_trace().unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got.get(1), Some(TracePoint { a: 2, t: 11, g: 5, c: 8 }));
        assert_eq!(wrapper.raw_trace().unwrap().len(), 3);
    }

    #[test]
    fn missing_channel_is_error() {
        use super::MissingTagError;
        use crate::encoder::Encoder;

        let mut encoder = Encoder::new(101);
        encoder.add_shorts("DATA", 1, &[1]);
        encoder.add_shorts("DATA", 2, &[1]);
        encoder.add_shorts("DATA", 4, &[1]);

        let wrapper = wrap(&encoder);
        let got = wrapper.raw_trace().unwrap_err();

        assert_eq!(got.downcast_ref::<MissingTagError>(), Some(&MissingTagError { name: "DATA".to_string(), number: 3 }));
        // The store is still usable.
        assert_eq!(wrapper.file().store.len(), 3);
    }

    #[test]
    fn peaks_coerced_to_i16() {
        use crate::encoder::Encoder;

        let mut encoder = Encoder::new(101);
        encoder.add_shorts("PLOC", 1, &[9, 9]);
        encoder.add_longs("PLOC", 2, &[12, 30, 70000]);

        let wrapper = wrap(&encoder);

        assert_eq!(wrapper.peaks().unwrap(), &[12, 30, 70000_i32 as i16]);
    }

    #[test]
    fn base_call_sequence() {
        use crate::encoder::Encoder;

        let mut encoder = Encoder::new(101);
        encoder.add_chars("PBAS", 1, b"NNNN");
        encoder.add_chars("PBAS", 2, b"GATTACAN");

        let wrapper = wrap(&encoder);

        assert_eq!(wrapper.base_call_sequence().unwrap().as_str(), "GATTACAN");
    }

    #[test]
    fn unparsable_base_calls_are_empty() {
        use crate::encoder::Encoder;

        let mut encoder = Encoder::new(101);
        encoder.add_chars("PBAS", 2, b"GAT-ACA");

        let wrapper = wrap(&encoder);

        assert!(wrapper.base_call_sequence().unwrap().is_empty());
    }

    #[test]
    fn run_peak_analysis_overwrite() {
        use super::AlreadyAnalyzedError;
        use crate::encoder::Encoder;

        let mut encoder = Encoder::new(101);
        encoder.add_shorts("DATA", 9, &[0, 5, 3]);
        encoder.add_shorts("DATA", 10, &[0, 0, 0]);
        encoder.add_shorts("DATA", 11, &[0, 0, 0]);
        encoder.add_shorts("DATA", 12, &[0, 0, 0]);

        let mut wrapper = wrap(&encoder);
        assert!(wrapper.analysis().is_none());

        let got = wrapper.run_peak_analysis(0, None, false).unwrap();
        assert_eq!(got.peaks(), &[1]);
        assert_eq!(got.sequence().as_str(), "A");

        let again = wrapper.run_peak_analysis(0, None, false).unwrap_err();
        assert!(again.downcast_ref::<AlreadyAnalyzedError>().is_some());

        let replaced = wrapper.run_peak_analysis(0, Some(0), true).unwrap();
        assert!(replaced.is_empty());
        assert!(wrapper.analysis().unwrap().is_empty());
    }

    #[test]
    fn run_peak_analysis_bad_range() {
        use crate::encoder::Encoder;
        use crate::sequence::analysis::ArgumentRangeError;

        let mut encoder = Encoder::new(101);
        for number in 9..=12 {
            encoder.add_shorts("DATA", number, &[0, 5, 3]);
        }

        let mut wrapper = wrap(&encoder);
        let got = wrapper.run_peak_analysis(2, Some(1), true).unwrap_err();

        assert!(got.downcast_ref::<ArgumentRangeError>().is_some());
        assert!(wrapper.analysis().is_none());
    }
}
