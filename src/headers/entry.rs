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
use std::io::Read;

use bincode::{Encode, Decode};
use bincode::encode_into_std_write;
use bincode::decode_from_slice;
use bstr::ByteSlice;

use crate::headers::abif_config;
use crate::headers::file::FormatError;

type E = Box<dyn std::error::Error>;

/// Encoded length of a [DirectoryEntry] in bytes.
pub const ENTRY_LEN: usize = 28;

#[derive(Debug, Clone)]
pub struct TagNameError {
    pub name: String,
}

impl std::fmt::Display for TagNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "tag name `{}` is not 4 ASCII characters", self.name)
    }
}

impl std::error::Error for TagNameError {}

/// Element type codes used in the directory.
///
/// Codes without a dedicated decoder (BCD, the compressed kinds, the header
/// and user-defined types, and anything not listed) are kept as-is and
/// decoded as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementTypeCode {
    Byte,
    Char,
    Word,
    Short,
    Long,
    Rational,
    Float,
    Double,
    Bcd,
    Date,
    Time,
    Thumb,
    Bool,
    Point,
    Rect,
    VPoint,
    VRect,
    PString,
    CString,
    Tag,
    DeltaComp,
    LzwComp,
    DeltaLzw,
    Header,
    /// User-defined type, code 1024 or above.
    User(i16),
    Unknown(i16),
}

impl ElementTypeCode {
    pub fn from_code(
        code: i16,
    ) -> Self {
        match code {
            1 => ElementTypeCode::Byte,
            2 => ElementTypeCode::Char,
            3 => ElementTypeCode::Word,
            4 => ElementTypeCode::Short,
            5 => ElementTypeCode::Long,
            6 => ElementTypeCode::Rational,
            7 => ElementTypeCode::Float,
            8 => ElementTypeCode::Double,
            9 => ElementTypeCode::Bcd,
            10 => ElementTypeCode::Date,
            11 => ElementTypeCode::Time,
            12 => ElementTypeCode::Thumb,
            13 => ElementTypeCode::Bool,
            14 => ElementTypeCode::Point,
            15 => ElementTypeCode::Rect,
            16 => ElementTypeCode::VPoint,
            17 => ElementTypeCode::VRect,
            18 => ElementTypeCode::PString,
            19 => ElementTypeCode::CString,
            20 => ElementTypeCode::Tag,
            128 => ElementTypeCode::DeltaComp,
            256 => ElementTypeCode::LzwComp,
            384 => ElementTypeCode::DeltaLzw,
            1023 => ElementTypeCode::Header,
            code if code >= 1024 => ElementTypeCode::User(code),
            code => ElementTypeCode::Unknown(code),
        }
    }

    /// The on-disk code, identical to the one this value was created from.
    pub fn code(&self) -> i16 {
        match self {
            ElementTypeCode::Byte => 1,
            ElementTypeCode::Char => 2,
            ElementTypeCode::Word => 3,
            ElementTypeCode::Short => 4,
            ElementTypeCode::Long => 5,
            ElementTypeCode::Rational => 6,
            ElementTypeCode::Float => 7,
            ElementTypeCode::Double => 8,
            ElementTypeCode::Bcd => 9,
            ElementTypeCode::Date => 10,
            ElementTypeCode::Time => 11,
            ElementTypeCode::Thumb => 12,
            ElementTypeCode::Bool => 13,
            ElementTypeCode::Point => 14,
            ElementTypeCode::Rect => 15,
            ElementTypeCode::VPoint => 16,
            ElementTypeCode::VRect => 17,
            ElementTypeCode::PString => 18,
            ElementTypeCode::CString => 19,
            ElementTypeCode::Tag => 20,
            ElementTypeCode::DeltaComp => 128,
            ElementTypeCode::LzwComp => 256,
            ElementTypeCode::DeltaLzw => 384,
            ElementTypeCode::Header => 1023,
            ElementTypeCode::User(code) => *code,
            ElementTypeCode::Unknown(code) => *code,
        }
    }
}

impl std::fmt::Display for ElementTypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ElementTypeCode::User(code) => write!(f, "User({})", code),
            ElementTypeCode::Unknown(code) => write!(f, "Unknown({})", code),
            other => write!(f, "{:?}", other),
        }
    }
}

/// On-disk layout of a directory entry.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawEntry {
    pub name: [u8; 4],
    pub number: i32,
    pub element_type: i16,
    pub element_size: i16,
    pub element_count: i32,
    pub data_size: i32,
    pub data_offset: i32,
    pub data_handle: i32,
}

/// One 28 byte record of the tag table.
///
/// Describes a single tagged item: what type its elements are, how many
/// there are, and where its payload is. If `data_size` is at most 4 the
/// payload is stored in the `data_offset` field itself, see
/// [inline_data](DirectoryEntry::inline_data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub number: i32,
    pub element_type: ElementTypeCode,
    /// Bytes per element, -1 for variable size elements.
    pub element_size: i16,
    pub element_count: i32,
    pub data_size: i32,
    pub data_offset: i32,
    /// Reserved.
    pub data_handle: i32,
}

impl DirectoryEntry {
    /// True if the payload is stored in the `data_offset` field.
    pub fn is_inline(&self) -> bool {
        self.data_size <= 4
    }

    /// The first `data_size` bytes of the `data_offset` field, in file order.
    pub fn inline_data(&self) -> Vec<u8> {
        let size = self.data_size.clamp(0, 4) as usize;
        self.data_offset.to_be_bytes()[0..size].to_vec()
    }

    pub(crate) fn from_raw(
        raw: &RawEntry,
    ) -> Result<Self, FormatError> {
        let name = raw.name.to_str_lossy().into_owned();
        if !raw.name.is_ascii() {
            return Err(FormatError::new(&format!("tag name {:?} is not ASCII", raw.name)));
        }
        if raw.element_count < 0 {
            return Err(FormatError::new(&format!("tag {}#{} has a negative element count {}", name, raw.number, raw.element_count)));
        }
        if raw.data_size < 0 {
            return Err(FormatError::new(&format!("tag {}#{} has a negative data size {}", name, raw.number, raw.data_size)));
        }
        Ok(DirectoryEntry {
            name,
            number: raw.number,
            element_type: ElementTypeCode::from_code(raw.element_type),
            element_size: raw.element_size,
            element_count: raw.element_count,
            data_size: raw.data_size,
            data_offset: raw.data_offset,
            data_handle: raw.data_handle,
        })
    }

    pub(crate) fn to_raw(
        &self,
    ) -> Result<RawEntry, TagNameError> {
        let name: [u8; 4] = self.name.as_bytes().try_into().map_err(|_| TagNameError { name: self.name.clone() })?;
        if !name.is_ascii() {
            return Err(TagNameError { name: self.name.clone() });
        }
        Ok(RawEntry {
            name,
            number: self.number,
            element_type: self.element_type.code(),
            element_size: self.element_size,
            element_count: self.element_count,
            data_size: self.data_size,
            data_offset: self.data_offset,
            data_handle: self.data_handle,
        })
    }
}

pub fn encode_directory_entry(
    entry: &DirectoryEntry,
) -> Result<Vec<u8>, E> {
    let raw = entry.to_raw()?;
    let mut bytes: Vec<u8> = Vec::with_capacity(ENTRY_LEN);
    let nbytes = encode_into_std_write(
        raw,
        &mut bytes,
        abif_config(),
    )?;
    assert_eq!(nbytes, ENTRY_LEN);
    Ok(bytes)
}

pub fn decode_directory_entry(
    entry_bytes: &[u8],
) -> Result<DirectoryEntry, E> {
    let raw: RawEntry = decode_from_slice(entry_bytes, abif_config())?.0;
    Ok(DirectoryEntry::from_raw(&raw)?)
}

/// Read exactly one directory entry from `conn`.
pub fn read_directory_entry<R: Read>(
    conn: &mut R,
) -> Result<DirectoryEntry, E> {
    let mut entry_bytes: [u8; ENTRY_LEN] = [0_u8; ENTRY_LEN];
    conn.read_exact(&mut entry_bytes)?;
    let res = decode_directory_entry(&entry_bytes)?;
    Ok(res)
}
