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

//! Decoders for the scalar element kinds.

use crate::bitinfo::BitInfo;
use crate::bitinfo::OutOfRangeError;
use crate::parser::ElementParser;
use crate::parser::ElementValue;

macro_rules! scalar_parser {
    ($(#[$doc:meta])* $name:ident, $t:ty, $variant:ident) => {
        $(#[$doc])*
        pub struct $name;

        impl ElementParser for $name {
            fn element_size(&self) -> i16 {
                std::mem::size_of::<$t>() as i16
            }

            fn parse_element(
                &self,
                bytes: &BitInfo,
            ) -> Result<ElementValue, OutOfRangeError> {
                Ok(ElementValue::$variant(bytes.read::<$t>(0)?))
            }
        }
    };
}

scalar_parser!(
    /// Unsigned 8-bit integer.
    ByteParser, u8, Byte);
scalar_parser!(
    /// Signed 8-bit integer, also used for ASCII base calls.
    CharParser, i8, Char);
scalar_parser!(
    /// Unsigned 16-bit integer.
    WordParser, u16, Word);
scalar_parser!(
    /// Signed 16-bit integer.
    ShortParser, i16, Short);
scalar_parser!(
    /// Signed 32-bit integer.
    LongParser, i32, Long);
scalar_parser!(FloatParser, f32, Float);
scalar_parser!(DoubleParser, f64, Double);

/// One byte, true if non-zero.
pub struct BoolParser;

impl ElementParser for BoolParser {
    fn element_size(&self) -> i16 {
        1
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::Bool(bytes.read::<u8>(0)? > 0))
    }
}
