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

//! Decoders for the structured element kinds.
//!
//! Field order and offsets within an element follow the ABIF format
//! documentation; all multi-byte fields are big-endian.

use crate::bitinfo::BitInfo;
use crate::bitinfo::OutOfRangeError;
use crate::parser::ElementParser;
use crate::parser::ElementValue;
use crate::parser::values::*;

pub struct DateParser;

impl ElementParser for DateParser {
    fn element_size(&self) -> i16 {
        4
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::Date(Date {
            year: bytes.read::<i16>(0)?,
            month: bytes.read::<u8>(2)?,
            day: bytes.read::<u8>(3)?,
        }))
    }
}

pub struct TimeParser;

impl ElementParser for TimeParser {
    fn element_size(&self) -> i16 {
        4
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::Time(Time {
            hour: bytes.read::<u8>(0)?,
            minute: bytes.read::<u8>(1)?,
            second: bytes.read::<u8>(2)?,
            hsecond: bytes.read::<u8>(3)?,
        }))
    }
}

pub struct ThumbParser;

impl ElementParser for ThumbParser {
    fn element_size(&self) -> i16 {
        10
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::Thumb(ThumbPrint {
            d: bytes.read::<i32>(0)?,
            u: bytes.read::<i32>(4)?,
            c: bytes.read::<u8>(8)?,
            n: bytes.read::<u8>(9)?,
        }))
    }
}

pub struct RationalParser;

impl ElementParser for RationalParser {
    fn element_size(&self) -> i16 {
        8
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        let numerator = bytes.read::<i32>(0)?;
        let denominator = bytes.read::<i32>(4)?;
        Ok(ElementValue::Rational(IntegerFraction::new(numerator, denominator)))
    }
}

pub struct PointParser;

impl ElementParser for PointParser {
    fn element_size(&self) -> i16 {
        4
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::Point(Point { v: bytes.read::<i16>(0)?, h: bytes.read::<i16>(2)? }))
    }
}

pub struct VPointParser;

impl ElementParser for VPointParser {
    fn element_size(&self) -> i16 {
        8
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::VPoint(VPoint { v: bytes.read::<i32>(0)?, h: bytes.read::<i32>(4)? }))
    }
}

pub struct RectParser;

impl ElementParser for RectParser {
    fn element_size(&self) -> i16 {
        8
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::Rect(Rect {
            top: bytes.read::<i16>(0)?,
            left: bytes.read::<i16>(2)?,
            bottom: bytes.read::<i16>(4)?,
            right: bytes.read::<i16>(6)?,
        }))
    }
}

pub struct VRectParser;

impl ElementParser for VRectParser {
    fn element_size(&self) -> i16 {
        16
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::VRect(VRect {
            top: bytes.read::<i32>(0)?,
            left: bytes.read::<i32>(4)?,
            bottom: bytes.read::<i32>(8)?,
            right: bytes.read::<i32>(12)?,
        }))
    }
}

pub struct TagParser;

impl ElementParser for TagParser {
    fn element_size(&self) -> i16 {
        8
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::Tag(Tag { name: bytes.read_ascii(0, Some(4))?, number: bytes.read::<i32>(4)? }))
    }
}
