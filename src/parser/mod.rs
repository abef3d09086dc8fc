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

//! Element decoders, one per element type code.
//!
//! Each decoder implements [ElementParser]. Fixed-size decoders split the
//! payload into `element_count` chunks of [element_size](ElementParser::element_size)
//! bytes and decode each chunk on its own. Variable-size decoders report an
//! element size of -1 and turn the whole payload into exactly one value.
//!
//! Use [get_parser] to look up the decoder for a type code. Codes that have
//! no decoder get the passthrough decoder that returns the payload bytes
//! unmodified, so an unrecognized type never fails a decode.
//!
//! ## Usage
//!
//! ```rust
//! use abif::bitinfo::BitInfo;
//! use abif::headers::entry::ElementTypeCode;
//! use abif::parser::{get_parser, ElementValue};
//!
//! let parser = get_parser(ElementTypeCode::Short);
//! let payload = BitInfo::new(vec![0, 10, 0, 20, 255, 255]);
//!
//! let got = parser.parse(&payload, 3).unwrap();
//!
//! assert_eq!(parser.element_size(), 2);
//! assert_eq!(got, vec![ElementValue::Short(10), ElementValue::Short(20), ElementValue::Short(-1)]);
//! ```
//!

pub mod composite;
pub mod numeric;
pub mod text;
pub mod values;

use crate::bitinfo::BitInfo;
use crate::bitinfo::OutOfRangeError;
use crate::headers::entry::ElementTypeCode;
use crate::parser::composite::*;
use crate::parser::numeric::*;
use crate::parser::text::*;
use crate::parser::values::*;

use serde::Serialize;

type E = Box<dyn std::error::Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementCountError {
    pub element_count: i32,
}

impl std::fmt::Display for ElementCountError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "element count must be positive, got {}", self.element_count)
    }
}

impl std::error::Error for ElementCountError {}

/// A single decoded element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ElementValue {
    Bool(bool),
    Byte(u8),
    Char(i8),
    Word(u16),
    Short(i16),
    Long(i32),
    Float(f32),
    Double(f64),
    Date(Date),
    Time(Time),
    Thumb(ThumbPrint),
    Rational(IntegerFraction),
    Point(Point),
    Rect(Rect),
    VPoint(VPoint),
    VRect(VRect),
    Tag(Tag),
    Text(String),
    /// Undecoded payload of a type without a dedicated decoder.
    Raw(Vec<u8>),
}

impl ElementValue {
    /// Integer value of the integer kinds, None for everything else.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ElementValue::Byte(v) => Some(*v as i64),
            ElementValue::Char(v) => Some(*v as i64),
            ElementValue::Word(v) => Some(*v as i64),
            ElementValue::Short(v) => Some(*v as i64),
            ElementValue::Long(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Integer value truncated to 16 bits.
    pub fn as_i16(&self) -> Option<i16> {
        self.as_i64().map(|v| v as i16)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ElementValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ElementValue::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl std::fmt::Display for ElementValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ElementValue::Bool(v) => write!(f, "{}", v),
            ElementValue::Byte(v) => write!(f, "{}", v),
            ElementValue::Char(v) => write!(f, "{}", v),
            ElementValue::Word(v) => write!(f, "{}", v),
            ElementValue::Short(v) => write!(f, "{}", v),
            ElementValue::Long(v) => write!(f, "{}", v),
            ElementValue::Float(v) => write!(f, "{}", v),
            ElementValue::Double(v) => write!(f, "{}", v),
            ElementValue::Date(v) => write!(f, "{}", v),
            ElementValue::Time(v) => write!(f, "{}", v),
            ElementValue::Thumb(v) => write!(f, "{}", v),
            ElementValue::Rational(v) => write!(f, "{}", v),
            ElementValue::Point(v) => write!(f, "{}", v),
            ElementValue::Rect(v) => write!(f, "{}", v),
            ElementValue::VPoint(v) => write!(f, "{}", v),
            ElementValue::VRect(v) => write!(f, "{}", v),
            ElementValue::Tag(v) => write!(f, "{}", v),
            ElementValue::Text(v) => write!(f, "{}", v),
            ElementValue::Raw(v) => write!(f, "{:?}", v),
        }
    }
}

/// Decoder for the elements of one type code.
///
/// Implementations are stateless unit structs shared through [get_parser].
pub trait ElementParser: Sync {
    /// Bytes per element, or -1 if the whole payload is one value.
    fn element_size(&self) -> i16;

    /// Decode one element from `bytes`.
    ///
    /// For fixed-size decoders `bytes` is exactly one element long, for
    /// variable-size decoders it is the whole payload.
    fn parse_element(&self, bytes: &BitInfo) -> Result<ElementValue, OutOfRangeError>;

    /// Decode `element_count` elements from a payload.
    ///
    /// Variable-size decoders ignore `element_count` and always return one
    /// value. Fixed-size decoders terminate with an [ElementCountError] if
    /// `element_count` is not positive and with an [OutOfRangeError] if the
    /// payload is shorter than `element_count` elements.
    ///
    fn parse(
        &self,
        bytes: &BitInfo,
        element_count: i32,
    ) -> Result<Vec<ElementValue>, E> {
        let element_size = self.element_size();
        if element_size < 0 {
            return Ok(vec![self.parse_element(bytes)?]);
        }
        if element_count <= 0 {
            return Err(Box::new(ElementCountError { element_count }));
        }

        let element_size = element_size as usize;
        let values = (0..(element_count as usize)).map(|idx| {
            let chunk = bytes.slice(idx * element_size, element_size)?;
            self.parse_element(&chunk)
        }).collect::<Result<Vec<ElementValue>, OutOfRangeError>>()?;

        Ok(values)
    }
}

/// Returns the decoder for `code`.
///
/// BCD, the compressed kinds, the header type, user-defined types and codes
/// outside the known table all resolve to [UnknownParser].
pub fn get_parser(
    code: ElementTypeCode,
) -> &'static dyn ElementParser {
    match code {
        ElementTypeCode::Byte => &ByteParser,
        ElementTypeCode::Char => &CharParser,
        ElementTypeCode::Word => &WordParser,
        ElementTypeCode::Short => &ShortParser,
        ElementTypeCode::Long => &LongParser,
        ElementTypeCode::Float => &FloatParser,
        ElementTypeCode::Double => &DoubleParser,
        ElementTypeCode::Bool => &BoolParser,
        ElementTypeCode::Rational => &RationalParser,
        ElementTypeCode::Date => &DateParser,
        ElementTypeCode::Time => &TimeParser,
        ElementTypeCode::Thumb => &ThumbParser,
        ElementTypeCode::Point => &PointParser,
        ElementTypeCode::Rect => &RectParser,
        ElementTypeCode::VPoint => &VPointParser,
        ElementTypeCode::VRect => &VRectParser,
        ElementTypeCode::Tag => &TagParser,
        ElementTypeCode::PString => &PStringParser,
        ElementTypeCode::CString => &CStringParser,
        ElementTypeCode::Bcd
            | ElementTypeCode::DeltaComp
            | ElementTypeCode::LzwComp
            | ElementTypeCode::DeltaLzw
            | ElementTypeCode::Header
            | ElementTypeCode::User(_)
            | ElementTypeCode::Unknown(_) => &UnknownParser,
    }
}

/// Passthrough decoder returning the payload bytes as they are.
pub struct UnknownParser;

impl ElementParser for UnknownParser {
    fn element_size(&self) -> i16 {
        -1
    }

    fn parse_element(
        &self,
        bytes: &BitInfo,
    ) -> Result<ElementValue, OutOfRangeError> {
        Ok(ElementValue::Raw(bytes.to_vec()))
    }
}
