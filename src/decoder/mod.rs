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

//! Resolving directory entries into decoded records.
//!
//! A [Directory] owns one [DirectoryEntry] and the values decoded from its
//! payload. Payloads of at most 4 bytes live inside the entry itself, larger
//! ones are stored at an absolute offset in the file. [resolve_directory]
//! fetches the payload from wherever it is and restores the read cursor
//! afterwards, so entries can be read from the tag table one after another
//! while their payloads are scattered around the file.
//!
//! [Decoder] walks the whole tag table of a file and yields one [Directory]
//! per entry.

use crate::bitinfo::BitInfo;
use crate::headers::entry::DirectoryEntry;
use crate::headers::entry::ElementTypeCode;
use crate::headers::entry::read_directory_entry;
use crate::headers::file::FileHeader;
use crate::headers::file::FormatError;
use crate::headers::file::read_file_header;
use crate::parser::ElementValue;
use crate::parser::get_parser;

use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

use log::{debug, warn};

type E = Box<dyn std::error::Error>;

/// A decoded record: a directory entry and its elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    entry: DirectoryEntry,
    elements: Vec<ElementValue>,
}

impl Directory {
    pub fn new(
        entry: DirectoryEntry,
        elements: Vec<ElementValue>,
    ) -> Self {
        Directory { entry, elements }
    }

    pub fn entry(&self) -> &DirectoryEntry {
        &self.entry
    }

    pub fn elements(&self) -> &[ElementValue] {
        &self.elements
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn number(&self) -> i32 {
        self.entry.number
    }

    pub fn element_type(&self) -> ElementTypeCode {
        self.entry.element_type
    }

    /// True if more than one value was decoded.
    pub fn is_array(&self) -> bool {
        self.elements.len() > 1
    }
}

/// Fetch the payload bytes of `entry`.
///
/// Inline payloads are taken from the entry without touching `conn`. For
/// external payloads the stream position of `conn` is the same after the
/// call as before it, also when reading the payload fails.
///
pub fn read_payload<R: Read + Seek>(
    entry: &DirectoryEntry,
    conn: &mut R,
) -> Result<Vec<u8>, E> {
    if entry.is_inline() {
        return Ok(entry.inline_data());
    }
    if entry.data_offset < 0 {
        return Err(Box::new(FormatError::new(&format!("tag {}#{} has a negative data offset {}", entry.name, entry.number, entry.data_offset))));
    }

    let pos = conn.stream_position()?;
    conn.seek(SeekFrom::Start(entry.data_offset as u64))?;

    let mut bytes: Vec<u8> = Vec::new();
    let res = conn.by_ref().take(entry.data_size as u64).read_to_end(&mut bytes);
    conn.seek(SeekFrom::Start(pos))?;
    res?;

    if bytes.len() != entry.data_size as usize {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("tag {}#{} needs {} bytes at offset {} but the file ends after {}", entry.name, entry.number, entry.data_size, entry.data_offset, bytes.len()),
        )));
    }

    Ok(bytes)
}

/// Fetch and decode the payload of `entry`.
pub fn resolve_directory<R: Read + Seek>(
    entry: DirectoryEntry,
    conn: &mut R,
) -> Result<Directory, E> {
    let payload = BitInfo::new(read_payload(&entry, conn)?);

    if let ElementTypeCode::Unknown(code) = entry.element_type {
        warn!("{}#{} has unknown element type {}, keeping raw bytes", entry.name, entry.number, code);
    }
    debug!("{}#{}: {} x {} ({} bytes)", entry.name, entry.number, entry.element_type, entry.element_count, entry.data_size);

    let elements = get_parser(entry.element_type).parse(&payload, entry.element_count)?;

    Ok(Directory::new(entry, elements))
}

/// Read the next directory entry from `conn` and decode its payload.
///
/// Consumes exactly 28 bytes from `conn`.
pub fn read_directory<R: Read + Seek>(
    conn: &mut R,
) -> Result<Directory, E> {
    let entry = read_directory_entry(conn)?;
    resolve_directory(entry, conn)
}

/// Iterator over the records of an ABIF file.
///
/// Reads the file header on construction, then yields one [Directory] per
/// entry of the tag table. Iteration stops after the first error.
///
/// ## Usage
///
/// ```rust
/// use abif::decoder::Decoder;
/// use abif::encoder::Encoder;
/// use abif::headers::entry::ElementTypeCode;
/// use std::io::Cursor;
///
/// let mut encoder = Encoder::new(101);
/// encoder.add_pstring("CTNM", 1, "Sample1");
/// encoder.add_shorts("DATA", 1, &[10, 20, 15, 5]);
/// let mut input = Cursor::new(encoder.encode().unwrap());
///
/// let decoder = Decoder::new(&mut input).unwrap();
/// assert_eq!(decoder.file_header().version, 101);
///
/// let records = decoder.collect::<Result<Vec<_>, _>>().unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].element_type(), ElementTypeCode::Short);
/// ```
///
pub struct Decoder<'a, R: Read + Seek> {
    // Inputs
    conn: &'a mut R,

    header: FileHeader,

    // Internals
    index: usize,
    failed: bool,
}

impl<'a, R: Read + Seek> Decoder<'a, R> {
    pub fn new(
        conn: &'a mut R,
    ) -> Result<Self, E> {
        let header = read_file_header(conn)?;
        if header.root.data_offset < 0 {
            return Err(Box::new(FormatError::new(&format!("tag table offset {} is negative", header.root.data_offset))));
        }
        conn.seek(SeekFrom::Start(header.root.data_offset as u64))?;
        debug!("ABIF version {}, {} tags at offset {}", header.version, header.root.element_count, header.root.data_offset);

        Ok(Decoder {
            conn, header,
            index: 0_usize, failed: false,
        })
    }
}

impl<R: Read + Seek> Decoder<'_, R> {
    pub fn file_header(
        &self
    ) -> &FileHeader {
        &self.header
    }

    /// Number of entries in the tag table.
    pub fn n_entries(
        &self
    ) -> usize {
        self.header.root.element_count as usize
    }
}

impl<R: Read + Seek> Iterator for Decoder<'_, R> {
    type Item = Result<Directory, E>;

    fn next(
        &mut self,
    ) -> Option<Result<Directory, E>> {
        if self.failed || self.index >= self.n_entries() {
            return None;
        }
        self.index += 1;
        let res = read_directory(self.conn);
        if res.is_err() {
            self.failed = true;
        }
        Some(res)
    }
}
