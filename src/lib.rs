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

//! abif is a library and a command-line client for:
//!
//!   - Decoding ABIF (.ab1) trace files written by capillary sequencers.
//!   - Looking up the decoded records by tag name and number.
//!   - Reading the fluorescence traces, peak locations and base calls.
//!   - Re-calling bases from the processed trace with a local maximum rule.
//!   - Exporting traces, metadata and sequences as CSV, JSON or FASTA.
//!
//! Gzip-compressed inputs are inflated on the fly.
//!
//! ## Usage
//!
//! ### Command line
//!
//! The abif CLI supports the following subcommands:
//!   - `abif show` print the decoded records of a file.
//!   - `abif export` write the traces, metadata or sequences of a file.
//!   - `abif analyze` re-call bases from the processed trace.
//!
//! ### Rust API
//!
//! [open], [decode_from_read] and [decode_from_slice] decode a whole file
//! into an [Ab1File]. Its [store](Ab1File::store) holds every record of the
//! file, and [Ab1Wrapper](wrapper::Ab1Wrapper) gives named access to the
//! records sequencers write the trace and base calls into.
//!
//! For access to a single record at a time, the following are provided:
//!
//!   - [Decoder](decoder::Decoder): takes a [Read] + [Seek] positioned at the start of an ABIF file and yields its records.
//!   - [Encoder](encoder::Encoder): assembles tagged items into the bytes of an ABIF file.
//!   - [get_parser](parser::get_parser): returns the decoder for the elements of one type code.
//!
//! See documentation for the appropriate functions or structs for usage examples.
//!
//! ## File format specification
//!
//! An ABIF file has the following structure, all integers are big-endian:
//!
//!   - bytes 0..4: the ASCII magic `ABIF`.
//!   - bytes 4..6: file format version as i16.
//!   - bytes 6..34: a directory entry describing the tag table. Its element
//!     count is the number of tags and its data offset is the byte offset of
//!     the table.
//!   - the tag table: one 28-byte directory entry per tag.
//!   - payloads: at the offset given by their entry, or inside the entry
//!     itself if the payload is at most 4 bytes.
//!
//! See [headers] for the layout of a directory entry.
//!

use decoder::Decoder;
use headers::file::FileHeader;
use store::DirectoryStore;

use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::info;

pub mod bitinfo;
pub mod decoder;
pub mod encoder;
pub mod headers;
pub mod parser;
pub mod printer;
pub mod sequence;
pub mod store;
pub mod trace;
pub mod wrapper;

type E = Box<dyn std::error::Error>;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A decoded ABIF file.
#[derive(Debug, Clone)]
pub struct Ab1File {
    /// Version and tag table location.
    pub header: FileHeader,
    /// Every record in the tag table.
    pub store: DirectoryStore,
}

impl Ab1File {
    pub fn version(&self) -> i16 {
        self.header.version
    }
}

/// Decode an ABIF file from something that implements [Read] and [Seek].
///
/// `conn` must be positioned at the start of the file; payload offsets are
/// absolute.
///
/// ## Errors
///
/// Terminates on the first record that cannot be decoded. The error can be
/// inspected with `downcast_ref` and is one of
/// [FormatError](headers::file::FormatError),
/// [OutOfRangeError](bitinfo::OutOfRangeError),
/// [ElementCountError](parser::ElementCountError),
/// [DuplicateKeyError](store::DuplicateKeyError) or [std::io::Error].
///
/// ## Usage
///
/// ```rust
/// use abif::decode_from_read;
/// use abif::encoder::Encoder;
/// use std::io::Cursor;
///
/// let mut encoder = Encoder::new(101);
/// encoder.add_shorts("DATA", 1, &[10, 20, 15, 5]);
/// encoder.add_shorts("DATA", 2, &[1, 2, 3, 4]);
///
/// let mut input = Cursor::new(encoder.encode().unwrap());
/// let file = decode_from_read(&mut input).unwrap();
///
/// assert_eq!(file.version(), 101);
/// assert_eq!(file.store.len(), 2);
/// ```
///
pub fn decode_from_read<R: Read + Seek>(
    conn: &mut R,
) -> Result<Ab1File, E> {
    let mut decoder = Decoder::new(conn)?;
    let header = decoder.file_header().clone();

    let mut store = DirectoryStore::new();
    for record in decoder.by_ref() {
        store.add(record?)?;
    }

    Ok(Ab1File { header, store })
}

/// Decode an ABIF file held in memory.
pub fn decode_from_slice(
    bytes: &[u8],
) -> Result<Ab1File, E> {
    let mut conn = Cursor::new(bytes);
    decode_from_read(&mut conn)
}

/// Open and decode the ABIF file at `path`.
///
/// Gzip-compressed files are recognised by their first two bytes and
/// inflated into memory before decoding.
///
pub fn open<P: AsRef<Path>>(
    path: P,
) -> Result<Ab1File, E> {
    let path = path.as_ref();
    let mut conn = BufReader::new(File::open(path)?);

    let mut magic = [0_u8; 2];
    let mut nread = 0;
    while nread < magic.len() {
        let n = conn.read(&mut magic[nread..])?;
        if n == 0 {
            break;
        }
        nread += n;
    }
    conn.seek(SeekFrom::Start(0))?;

    let file = if nread == magic.len() && magic == GZIP_MAGIC {
        let mut bytes: Vec<u8> = Vec::new();
        MultiGzDecoder::new(conn).read_to_end(&mut bytes)?;
        decode_from_slice(&bytes)?
    } else {
        decode_from_read(&mut conn)?
    };

    info!("Read {} records from {}", file.store.len(), path.display());

    Ok(file)
}
