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

//! Decoders for the two string kinds.

use crate::bitinfo::BitInfo;
use crate::bitinfo::OutOfRangeError;
use crate::parser::ElementParser;
use crate::parser::ElementValue;

/// Pascal string: one length byte followed by that many characters.
///
/// Terminates with an [OutOfRangeError] if the length byte points past the
/// end of the payload.
pub struct PStringParser;

impl ElementParser for PStringParser {
    fn element_size(&self) -> i16 {
        -1
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        let len = bytes.read::<u8>(0)? as usize;
        Ok(ElementValue::Text(bytes.read_ascii(1, Some(len))?))
    }
}

/// C string: characters up to, but excluding, the first null byte.
///
/// The payload length is the data size recorded in the directory, so a
/// string without a terminator is read to the end of the payload.
pub struct CStringParser;

impl ElementParser for CStringParser {
    fn element_size(&self) -> i16 {
        -1
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        let len = bytes.as_slice().iter().position(|x| *x == 0).unwrap_or(bytes.len());
        Ok(ElementValue::Text(bytes.read_ascii(0, Some(len))?))
    }
}
