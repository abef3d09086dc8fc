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

//! FASTA output of base calls.
use std::io::Write;

use crate::sequence::dna::DnaSequence;
use crate::wrapper::Ab1Wrapper;

type E = Box<dyn std::error::Error>;

/// Bases per sequence line.
pub const LINE_WIDTH: usize = 50;

/// Format one FASTA record.
///
/// Writes a `> name` header followed by `sequence` in lines of at most
/// [LINE_WIDTH] bases. An empty sequence gives only the header.
///
pub fn format_fasta<W: Write>(
    name: &str,
    sequence: &DnaSequence,
    conn: &mut W,
) -> Result<(), E> {
    writeln!(conn, "> {}", name)?;
    for line in sequence.as_str().as_bytes().chunks(LINE_WIDTH) {
        conn.write_all(line)?;
        conn.write_all(b"\n")?;
    }
    Ok(())
}

/// Format the base calls of `wrapper`.
///
/// The record is named after the container. If peaks have been called with
/// [run_peak_analysis](Ab1Wrapper::run_peak_analysis), their bases follow
/// as a second record with `_ReAnalyzed` appended to the name.
///
pub fn format_wrapper_fasta<W: Write>(
    wrapper: &Ab1Wrapper,
    conn: &mut W,
) -> Result<(), E> {
    let name = wrapper.container_name()?;
    format_fasta(name, wrapper.base_call_sequence()?, conn)?;
    if let Some(analysis) = wrapper.analysis() {
        format_fasta(&format!("{}_ReAnalyzed", name), analysis.sequence(), conn)?;
    }
    conn.flush()?;
    Ok(())
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn format_fasta_wraps_lines() {
        use super::format_fasta;
        use crate::sequence::base::DnaBase;
        use crate::sequence::dna::DnaSequence;

        let seq = DnaSequence::concat(&DnaSequence::repeat(DnaBase::A, 50), &DnaSequence::repeat(DnaBase::C, 7));

        let mut expected: Vec<u8> = b"> sample\n".to_vec();
        expected.append(&mut [b'A'; 50].to_vec());
        expected.append(&mut b"\nCCCCCCC\n".to_vec());

        let mut got: Vec<u8> = Vec::new();
        format_fasta("sample", &seq, &mut got).unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn format_fasta_empty() {
        use super::format_fasta;
        use crate::sequence::dna::DnaSequence;

        let mut got: Vec<u8> = Vec::new();
        format_fasta("empty", &DnaSequence::empty(), &mut got).unwrap();

        assert_eq!(got, b"> empty\n".to_vec());
    }

    #[test]
    fn format_wrapper_fasta_with_analysis() {
        use super::format_wrapper_fasta;
        use crate::decode_from_slice;
        use crate::encoder::Encoder;
        use crate::wrapper::Ab1Wrapper;

        let mut encoder = Encoder::new(101);
        encoder.add_pstring("CTNM", 1, "Sample1");
        encoder.add_chars("PBAS", 2, b"GATC");
        encoder.add_shorts("DATA", 9, &[0, 5, 3]);
        encoder.add_shorts("DATA", 10, &[0, 0, 0]);
        encoder.add_shorts("DATA", 11, &[0, 0, 0]);
        encoder.add_shorts("DATA", 12, &[0, 0, 0]);
        let mut wrapper = Ab1Wrapper::new(decode_from_slice(&encoder.encode().unwrap()).unwrap());

        let mut got: Vec<u8> = Vec::new();
        format_wrapper_fasta(&wrapper, &mut got).unwrap();
        assert_eq!(got, b"> Sample1\nGATC\n".to_vec());

        wrapper.run_peak_analysis(0, None, false).unwrap();
        let mut got: Vec<u8> = Vec::new();
        format_wrapper_fasta(&wrapper, &mut got).unwrap();
        assert_eq!(got, b"> Sample1\nGATC\n> Sample1_ReAnalyzed\nA\n".to_vec());
    }
}
