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

use crate::headers::abif_config;
use crate::headers::entry::DirectoryEntry;
use crate::headers::entry::RawEntry;

type E = Box<dyn std::error::Error>;

/// The magic bytes every ABIF file starts with.
pub const ABIF_MAGIC: [u8; 4] = *b"ABIF";

/// Encoded length of a [FileHeader] in bytes.
pub const HEADER_LEN: usize = 34;

/// The input is not a structurally valid ABIF container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    pub message: String,
}

impl FormatError {
    pub fn new(
        message: &str,
    ) -> Self {
        FormatError { message: message.to_string() }
    }
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "invalid ABIF file: {}", self.message)
    }
}

impl std::error::Error for FormatError {}

#[derive(Encode, Decode)]
struct RawFileHeader {
    magic: [u8; 4],
    version: i16,
    root: RawEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version: i16,
    /// Entry describing the tag table.
    pub root: DirectoryEntry,
}

pub fn encode_file_header(
    header: &FileHeader,
) -> Result<Vec<u8>, E> {
    let raw = RawFileHeader { magic: ABIF_MAGIC, version: header.version, root: header.root.to_raw()? };
    let mut bytes: Vec<u8> = Vec::with_capacity(HEADER_LEN);
    let nbytes = encode_into_std_write(
        &raw,
        &mut bytes,
        abif_config(),
    )?;
    assert_eq!(nbytes, HEADER_LEN);
    Ok(bytes)
}

/// Decode a [FileHeader] from its first 34 bytes.
///
/// Terminates with a [FormatError] if the input does not start with `ABIF`.
///
pub fn decode_file_header(
    header_bytes: &[u8],
) -> Result<FileHeader, E> {
    check_magic(header_bytes)?;
    let raw: RawFileHeader = decode_from_slice(header_bytes, abif_config())?.0;
    Ok(FileHeader { version: raw.version, root: DirectoryEntry::from_raw(&raw.root)? })
}

fn check_magic(
    bytes: &[u8],
) -> Result<(), FormatError> {
    if bytes.len() < ABIF_MAGIC.len() || bytes[0..4] != ABIF_MAGIC {
        let got = &bytes[0..bytes.len().min(4)];
        return Err(FormatError::new(&format!("file should start with ABIF, not {:?}", got)));
    }
    Ok(())
}

/// Read the magic, version and root entry from the start of `conn`.
///
/// Consumes exactly [HEADER_LEN] bytes on success. The magic is checked
/// before anything else is read, so a short non-ABIF input is reported as a
/// [FormatError] rather than an I/O error.
///
pub fn read_file_header<R: Read>(
    conn: &mut R,
) -> Result<FileHeader, E> {
    let mut header_bytes: [u8; HEADER_LEN] = [0_u8; HEADER_LEN];
    let mut nread = 0;
    while nread < 4 {
        let n = conn.read(&mut header_bytes[nread..4])?;
        if n == 0 {
            break;
        }
        nread += n;
    }
    check_magic(&header_bytes[0..nread])?;
    conn.read_exact(&mut header_bytes[4..HEADER_LEN])?;
    let res = decode_file_header(&header_bytes)?;
    Ok(res)
}
