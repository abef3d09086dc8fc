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

//! Writing ABIF containers.
//!
//! [Encoder] collects tagged items and lays them out as a valid ABIF file:
//! the 34-byte header, then the payloads that do not fit in an entry, then
//! the tag table. Payloads of at most 4 bytes are stored left-aligned in the
//! `data_offset` field of their entry.
use crate::headers::entry::DirectoryEntry;
use crate::headers::entry::ElementTypeCode;
use crate::headers::entry::ENTRY_LEN;
use crate::headers::entry::encode_directory_entry;
use crate::headers::file::FileHeader;
use crate::headers::file::HEADER_LEN;
use crate::headers::file::encode_file_header;

use std::io::Write;

type E = Box<dyn std::error::Error>;

/// One tagged item waiting to be written.
#[derive(Debug, Clone, PartialEq)]
struct EncoderItem {
    name: String,
    number: i32,
    element_type: ElementTypeCode,
    element_size: i16,
    element_count: i32,
    payload: Vec<u8>,
}

/// Builder for ABIF files.
///
/// Items are written in the order they were added.
///
/// ## Usage
///
/// ```rust
/// use abif::decode_from_slice;
/// use abif::encoder::Encoder;
/// use abif::parser::ElementValue;
///
/// let mut encoder = Encoder::new(101);
/// encoder.add_pstring("CTNM", 1, "Sample1");
/// encoder.add_shorts("DATA", 1, &[10, 20, 15, 5]);
/// let bytes = encoder.encode().unwrap();
///
/// let file = decode_from_slice(&bytes).unwrap();
/// assert_eq!(file.store.get("CTNM", 1).unwrap().elements(), &[ElementValue::Text("Sample1".to_string())]);
/// assert_eq!(file.store.get("DATA", 1).unwrap().elements().len(), 4);
/// ```
///
#[derive(Debug, Clone, PartialEq)]
pub struct Encoder {
    version: i16,
    items: Vec<EncoderItem>,
}

impl Encoder {
    pub fn new(
        version: i16,
    ) -> Self {
        Encoder { version, items: Vec::new() }
    }

    /// Add an item with an already encoded payload.
    pub fn add(
        &mut self,
        name: &str,
        number: i32,
        element_type: ElementTypeCode,
        element_size: i16,
        element_count: i32,
        payload: &[u8],
    ) -> &mut Self {
        self.items.push(EncoderItem {
            name: name.to_string(), number, element_type,
            element_size, element_count, payload: payload.to_vec(),
        });
        self
    }

    pub fn add_bytes(
        &mut self,
        name: &str,
        number: i32,
        values: &[u8],
    ) -> &mut Self {
        self.add(name, number, ElementTypeCode::Byte, 1, values.len() as i32, values)
    }

    /// Add `values` as signed chars, the type base calls are stored in.
    pub fn add_chars(
        &mut self,
        name: &str,
        number: i32,
        values: &[u8],
    ) -> &mut Self {
        self.add(name, number, ElementTypeCode::Char, 1, values.len() as i32, values)
    }

    pub fn add_shorts(
        &mut self,
        name: &str,
        number: i32,
        values: &[i16],
    ) -> &mut Self {
        let payload: Vec<u8> = values.iter().flat_map(|x| x.to_be_bytes()).collect();
        self.add(name, number, ElementTypeCode::Short, 2, values.len() as i32, &payload)
    }

    pub fn add_longs(
        &mut self,
        name: &str,
        number: i32,
        values: &[i32],
    ) -> &mut Self {
        let payload: Vec<u8> = values.iter().flat_map(|x| x.to_be_bytes()).collect();
        self.add(name, number, ElementTypeCode::Long, 4, values.len() as i32, &payload)
    }

    /// Add a length-prefixed string. Text past 255 bytes is cut off.
    pub fn add_pstring(
        &mut self,
        name: &str,
        number: i32,
        text: &str,
    ) -> &mut Self {
        let bytes = &text.as_bytes()[0..text.len().min(u8::MAX as usize)];
        let mut payload: Vec<u8> = Vec::with_capacity(bytes.len() + 1);
        payload.push(bytes.len() as u8);
        payload.extend_from_slice(bytes);
        self.add(name, number, ElementTypeCode::PString, 1, payload.len() as i32, &payload)
    }

    /// Add a NUL-terminated string.
    pub fn add_cstring(
        &mut self,
        name: &str,
        number: i32,
        text: &str,
    ) -> &mut Self {
        let mut payload: Vec<u8> = text.as_bytes().to_vec();
        payload.push(0);
        self.add(name, number, ElementTypeCode::CString, 1, payload.len() as i32, &payload)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lay out the header, payloads and tag table.
    ///
    /// Terminates with a [TagNameError](crate::headers::entry::TagNameError)
    /// if a tag name is not 4 ASCII characters.
    ///
    pub fn encode(
        &self,
    ) -> Result<Vec<u8>, E> {
        let mut payloads: Vec<u8> = Vec::new();
        let mut entries: Vec<DirectoryEntry> = Vec::with_capacity(self.items.len());

        for item in self.items.iter() {
            let data_size = item.payload.len() as i32;
            let data_offset = if item.payload.len() <= 4 {
                let mut inline = [0_u8; 4];
                inline[0..item.payload.len()].copy_from_slice(&item.payload);
                i32::from_be_bytes(inline)
            } else {
                let offset = HEADER_LEN + payloads.len();
                payloads.extend_from_slice(&item.payload);
                offset as i32
            };
            entries.push(DirectoryEntry {
                name: item.name.clone(), number: item.number, element_type: item.element_type,
                element_size: item.element_size, element_count: item.element_count,
                data_size, data_offset, data_handle: 0,
            });
        }

        let table_offset = HEADER_LEN + payloads.len();
        let root = DirectoryEntry {
            name: "tdir".to_string(), number: 1, element_type: ElementTypeCode::Header,
            element_size: ENTRY_LEN as i16, element_count: entries.len() as i32,
            data_size: (entries.len() * ENTRY_LEN) as i32, data_offset: table_offset as i32, data_handle: 0,
        };

        let mut out: Vec<u8> = Vec::with_capacity(table_offset + entries.len() * ENTRY_LEN);
        out.append(&mut encode_file_header(&FileHeader { version: self.version, root })?);
        out.append(&mut payloads);
        for entry in entries.iter() {
            out.append(&mut encode_directory_entry(entry)?);
        }

        Ok(out)
    }

    pub fn encode_to_write<W: Write>(
        &self,
        conn_out: &mut W,
    ) -> Result<(), E> {
        conn_out.write_all(&self.encode()?)?;
        conn_out.flush()?;
        Ok(())
    }
}
