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

//! Writing decoded files as plain text.
//!
//! Each export has a `format_*` function in its own module that writes to
//! any [Write]. [export_to_write] picks the function for an [ExportKind].
//!
//! ## Usage
//!
//! ```rust
//! use abif::decode_from_slice;
//! use abif::encoder::Encoder;
//! use abif::printer::{export_to_write, ExportKind};
//! use abif::wrapper::Ab1Wrapper;
//!
//! let mut encoder = Encoder::new(101);
//! encoder.add_shorts("DATA", 1, &[10, 11]);
//! encoder.add_shorts("DATA", 2, &[20, 21]);
//! encoder.add_shorts("DATA", 3, &[15, 16]);
//! encoder.add_shorts("DATA", 4, &[5, 6]);
//! let wrapper = Ab1Wrapper::new(decode_from_slice(&encoder.encode().unwrap()).unwrap());
//!
//! let mut output: Vec<u8> = Vec::new();
//! export_to_write(&wrapper, ExportKind::Raw, &mut output).unwrap();
//!
//! assert_eq!(output, b"A,T,G,C\n10,5,20,15\n11,6,21,16\n".to_vec());
//! ```
//!

use crate::wrapper::Ab1Wrapper;

use std::io::Write;

use csv::format_metadata_csv;
use csv::format_trace_csv;
use fasta::format_wrapper_fasta;
use json::format_elements_json;

pub mod csv;
pub mod fasta;
pub mod json;
pub mod text;

type E = Box<dyn std::error::Error>;

/// Supported exports.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportKind {
    /// Raw trace as CSV.
    Raw,
    /// Processed trace as CSV.
    Analyzed,
    /// One CSV row per directory entry.
    Meta,
    /// Every record and its elements as JSON.
    Json,
    /// Base calls, and re-called bases if any, as FASTA.
    #[default]
    Fasta,
}

impl ExportKind {
    /// File extension for outputs of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Raw => "raw.csv",
            ExportKind::Analyzed => "analyzed.csv",
            ExportKind::Meta => "meta.csv",
            ExportKind::Json => "json",
            ExportKind::Fasta => "fasta",
        }
    }
}

impl std::str::FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(ExportKind::Raw),
            "analyzed" => Ok(ExportKind::Analyzed),
            "meta" => Ok(ExportKind::Meta),
            "json" => Ok(ExportKind::Json),
            "fasta" => Ok(ExportKind::Fasta),
            _ => Err(format!("'{}' is not a valid ExportKind", s)),
        }
    }
}

/// Write `wrapper` to `conn` as `kind`.
pub fn export_to_write<W: Write>(
    wrapper: &Ab1Wrapper,
    kind: ExportKind,
    conn: &mut W,
) -> Result<(), E> {
    match kind {
        ExportKind::Raw => format_trace_csv(wrapper.raw_trace()?, conn)?,
        ExportKind::Analyzed => format_trace_csv(wrapper.analyzed_trace()?, conn)?,
        ExportKind::Meta => format_metadata_csv(&wrapper.file().store, conn)?,
        ExportKind::Json => format_elements_json(&wrapper.file().store, conn)?,
        ExportKind::Fasta => format_wrapper_fasta(wrapper, conn)?,
    }
    conn.flush()?;
    Ok(())
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn parse_export_kind() {
        use super::ExportKind;

        assert_eq!("raw".parse::<ExportKind>(), Ok(ExportKind::Raw));
        assert_eq!("analyzed".parse::<ExportKind>(), Ok(ExportKind::Analyzed));
        assert_eq!("meta".parse::<ExportKind>(), Ok(ExportKind::Meta));
        assert_eq!("json".parse::<ExportKind>(), Ok(ExportKind::Json));
        assert_eq!("fasta".parse::<ExportKind>(), Ok(ExportKind::Fasta));
        assert!("sam".parse::<ExportKind>().is_err());
    }

    #[test]
    fn export_missing_trace_is_error() {
        use super::{export_to_write, ExportKind};
        use crate::decode_from_slice;
        use crate::encoder::Encoder;
        use crate::wrapper::{Ab1Wrapper, MissingTagError};

        let mut encoder = Encoder::new(101);
        encoder.add_pstring("CTNM", 1, "Sample1");
        let wrapper = Ab1Wrapper::new(decode_from_slice(&encoder.encode().unwrap()).unwrap());

        let mut output: Vec<u8> = Vec::new();
        let got = export_to_write(&wrapper, ExportKind::Analyzed, &mut output).unwrap_err();

        assert_eq!(got.downcast_ref::<MissingTagError>(), Some(&MissingTagError { name: "DATA".to_string(), number: 9 }));
        assert!(output.is_empty());
    }
}
